//! In-memory [`ApiClient`] implementation.
//!
//! Behaves like the real backend at the contract level: ids are assigned
//! server-side, deletes of missing ids fail with a 404-style remote error,
//! bulk operations are atomic, and student risk levels are recomputed from
//! GPA the way the scoring service would. Every method records its call so
//! tests can assert that a rejected form never reached the network.

use crate::api::payload::{
    CreateAdvisor, CreateIntervention, CreateMeeting, CreateStudent, CreateUser, UpdateAdvisor,
    UpdateIntervention, UpdateMeeting, UpdateStudent, UpdateUser,
};
use crate::api::{ApiClient, ApiResult};
use crate::core::{
    Advisor, EntityId, Intervention, InterventionStatus, Meeting, MeetingStatus, Notification,
    RiskLevel, Role, Student, User,
};
use crate::riskboard_error::RiskboardError;
use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use std::collections::BTreeMap;
use std::sync::Mutex;

#[derive(Debug, Default)]
struct MemoryState {
    users: Vec<User>,
    students: Vec<Student>,
    advisors: Vec<Advisor>,
    notifications: Vec<Notification>,
    interventions: Vec<Intervention>,
    meetings: Vec<Meeting>,
    next_id: EntityId,
}

impl MemoryState {
    fn allocate_id(&mut self) -> EntityId {
        self.next_id += 1;
        self.next_id
    }

    fn recompute_caseloads(&mut self) {
        for advisor in &mut self.advisors {
            advisor.caseload = self
                .students
                .iter()
                .filter(|student| student.advisor_id == Some(advisor.id))
                .count() as u32;
        }
    }
}

/// What the backend's scoring service would assign for a GPA.
fn risk_for_gpa(gpa: Option<f64>) -> RiskLevel {
    match gpa {
        None => RiskLevel::Unknown,
        Some(gpa) if gpa < 2.0 => RiskLevel::Critical,
        Some(gpa) if gpa < 2.5 => RiskLevel::High,
        Some(gpa) if gpa < 3.0 => RiskLevel::Medium,
        Some(_) => RiskLevel::Low,
    }
}

fn not_found(entity: &str, id: EntityId) -> RiskboardError {
    RiskboardError::remote(404, format!("{entity} {id} not found"))
}

pub struct MemoryApi {
    state: Mutex<MemoryState>,
    calls: Mutex<BTreeMap<&'static str, usize>>,
    fail_next: Mutex<Option<RiskboardError>>,
}

impl Default for MemoryApi {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryApi {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(MemoryState {
                next_id: 100,
                ..Default::default()
            }),
            calls: Mutex::new(BTreeMap::new()),
            fail_next: Mutex::new(None),
        }
    }

    /// A populated instance for demo mode and tests that want data.
    pub fn seeded() -> Self {
        let api = Self::new();
        {
            let mut state = api.state.lock().unwrap();
            seed(&mut state);
        }
        api
    }

    /// Queue an error to be returned by the next recorded call.
    pub fn fail_next_with(&self, error: RiskboardError) {
        *self.fail_next.lock().unwrap() = Some(error);
    }

    /// How many times a method (e.g. `"create_user"`) has been invoked.
    pub fn call_count(&self, method: &'static str) -> usize {
        self.calls.lock().unwrap().get(method).copied().unwrap_or(0)
    }

    fn begin(&self, method: &'static str) -> ApiResult<()> {
        *self.calls.lock().unwrap().entry(method).or_insert(0) += 1;
        match self.fail_next.lock().unwrap().take() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

fn seed(state: &mut MemoryState) {
    let at = |day: u32, hour: u32| Utc.with_ymd_and_hms(2026, 3, day, hour, 0, 0).unwrap();

    state.users = vec![
        User {
            id: 1,
            name: "Priya Raman".to_string(),
            email: "priya@example.edu".to_string(),
            role: Role::Admin,
            department: None,
            active: true,
        },
        User {
            id: 2,
            name: "Marcus Webb".to_string(),
            email: "marcus@example.edu".to_string(),
            role: Role::Advisor,
            department: Some("mathematics".to_string()),
            active: true,
        },
        User {
            id: 3,
            name: "Elena Voss".to_string(),
            email: "elena@example.edu".to_string(),
            role: Role::Advisor,
            department: Some("physics".to_string()),
            active: false,
        },
    ];
    state.advisors = vec![
        Advisor {
            id: 11,
            name: "Marcus Webb".to_string(),
            email: "marcus@example.edu".to_string(),
            department: Some("mathematics".to_string()),
            caseload: 0,
        },
        Advisor {
            id: 12,
            name: "Elena Voss".to_string(),
            email: "elena@example.edu".to_string(),
            department: Some("physics".to_string()),
            caseload: 0,
        },
    ];
    let roster: &[(&str, Option<f64>, Option<u8>, &str, Option<EntityId>)] = &[
        ("John Doe", Some(2.1), Some(2), "mathematics", Some(11)),
        ("Jane Smith", Some(3.8), Some(3), "mathematics", Some(11)),
        ("Ana Silva", Some(1.9), Some(1), "physics", Some(12)),
        ("Omar Haddad", Some(2.7), Some(4), "physics", Some(12)),
        ("Mei Chen", None, Some(2), "chemistry", None),
        ("Leo Novak", Some(3.1), Some(1), "mathematics", Some(11)),
    ];
    state.students = roster
        .iter()
        .enumerate()
        .map(|(index, (name, gpa, year, department, advisor_id))| Student {
            id: 21 + index as EntityId,
            name: (*name).to_string(),
            email: format!(
                "{}@example.edu",
                name.to_lowercase().replace(' ', ".")
            ),
            year: *year,
            department: Some((*department).to_string()),
            gpa: *gpa,
            risk_level: risk_for_gpa(*gpa),
            advisor_id: *advisor_id,
        })
        .collect();
    state.notifications = vec![
        Notification {
            id: 41,
            recipient_id: 2,
            title: "Risk level change".to_string(),
            body: "Ana Silva moved to critical risk".to_string(),
            read: false,
            created_at: at(2, 9),
        },
        Notification {
            id: 42,
            recipient_id: 2,
            title: "Meeting reminder".to_string(),
            body: "Advising session with John Doe tomorrow".to_string(),
            read: true,
            created_at: at(3, 8),
        },
    ];
    state.interventions = vec![Intervention {
        id: 61,
        student_id: 23,
        advisor_id: 12,
        category: "tutoring".to_string(),
        status: InterventionStatus::InProgress,
        summary: "Weekly calculus tutoring".to_string(),
        created_at: at(1, 10),
    }];
    state.meetings = vec![Meeting {
        id: 81,
        student_id: 21,
        advisor_id: 11,
        scheduled_at: at(4, 10),
        location: Some("Advising office 210".to_string()),
        status: MeetingStatus::Scheduled,
        notes: None,
    }];
    state.next_id = 100;
    state.recompute_caseloads();
}

#[async_trait]
impl ApiClient for MemoryApi {
    async fn fetch_users(&self) -> ApiResult<Vec<User>> {
        self.begin("fetch_users")?;
        Ok(self.state.lock().unwrap().users.clone())
    }

    async fn create_user(&self, payload: CreateUser) -> ApiResult<User> {
        self.begin("create_user")?;
        let mut state = self.state.lock().unwrap();
        let user = User {
            id: state.allocate_id(),
            name: payload.name,
            email: payload.email,
            role: payload.role,
            department: payload.department,
            active: true,
        };
        state.users.push(user.clone());
        Ok(user)
    }

    async fn update_user(&self, id: EntityId, patch: UpdateUser) -> ApiResult<User> {
        self.begin("update_user")?;
        let mut state = self.state.lock().unwrap();
        let user = state
            .users
            .iter_mut()
            .find(|user| user.id == id)
            .ok_or_else(|| not_found("user", id))?;
        if let Some(name) = patch.name {
            user.name = name;
        }
        if let Some(email) = patch.email {
            user.email = email;
        }
        if let Some(role) = patch.role {
            user.role = role;
        }
        if let Some(department) = patch.department {
            user.department = Some(department);
        }
        if let Some(active) = patch.active {
            user.active = active;
        }
        // A password change is accepted and discarded; the canonical shape
        // never carries credentials.
        Ok(user.clone())
    }

    async fn delete_user(&self, id: EntityId) -> ApiResult<()> {
        self.begin("delete_user")?;
        let mut state = self.state.lock().unwrap();
        let before = state.users.len();
        state.users.retain(|user| user.id != id);
        if state.users.len() == before {
            return Err(not_found("user", id));
        }
        Ok(())
    }

    async fn fetch_students(&self) -> ApiResult<Vec<Student>> {
        self.begin("fetch_students")?;
        Ok(self.state.lock().unwrap().students.clone())
    }

    async fn create_student(&self, payload: CreateStudent) -> ApiResult<Student> {
        self.begin("create_student")?;
        let mut state = self.state.lock().unwrap();
        let student = Student {
            id: state.allocate_id(),
            name: payload.name,
            email: payload.email,
            year: payload.year,
            department: payload.department,
            gpa: None,
            risk_level: RiskLevel::Unknown,
            advisor_id: payload.advisor_id,
        };
        state.students.push(student.clone());
        state.recompute_caseloads();
        Ok(student)
    }

    async fn update_student(&self, id: EntityId, patch: UpdateStudent) -> ApiResult<Student> {
        self.begin("update_student")?;
        let mut state = self.state.lock().unwrap();
        let student = state
            .students
            .iter_mut()
            .find(|student| student.id == id)
            .ok_or_else(|| not_found("student", id))?;
        if let Some(name) = patch.name {
            student.name = name;
        }
        if let Some(email) = patch.email {
            student.email = email;
        }
        if let Some(year) = patch.year {
            student.year = Some(year);
        }
        if let Some(department) = patch.department {
            student.department = Some(department);
        }
        if let Some(advisor_id) = patch.advisor_id {
            student.advisor_id = Some(advisor_id);
        }
        let updated = student.clone();
        state.recompute_caseloads();
        Ok(updated)
    }

    async fn delete_student(&self, id: EntityId) -> ApiResult<()> {
        self.begin("delete_student")?;
        let mut state = self.state.lock().unwrap();
        let before = state.students.len();
        state.students.retain(|student| student.id != id);
        if state.students.len() == before {
            return Err(not_found("student", id));
        }
        state.recompute_caseloads();
        Ok(())
    }

    async fn fetch_advisors(&self) -> ApiResult<Vec<Advisor>> {
        self.begin("fetch_advisors")?;
        Ok(self.state.lock().unwrap().advisors.clone())
    }

    async fn create_advisor(&self, payload: CreateAdvisor) -> ApiResult<Advisor> {
        self.begin("create_advisor")?;
        let mut state = self.state.lock().unwrap();
        let advisor = Advisor {
            id: state.allocate_id(),
            name: payload.name,
            email: payload.email,
            department: payload.department,
            caseload: 0,
        };
        state.advisors.push(advisor.clone());
        Ok(advisor)
    }

    async fn update_advisor(&self, id: EntityId, patch: UpdateAdvisor) -> ApiResult<Advisor> {
        self.begin("update_advisor")?;
        let mut state = self.state.lock().unwrap();
        let advisor = state
            .advisors
            .iter_mut()
            .find(|advisor| advisor.id == id)
            .ok_or_else(|| not_found("advisor", id))?;
        if let Some(name) = patch.name {
            advisor.name = name;
        }
        if let Some(email) = patch.email {
            advisor.email = email;
        }
        if let Some(department) = patch.department {
            advisor.department = Some(department);
        }
        Ok(advisor.clone())
    }

    async fn delete_advisor(&self, id: EntityId) -> ApiResult<()> {
        self.begin("delete_advisor")?;
        let mut state = self.state.lock().unwrap();
        let before = state.advisors.len();
        state.advisors.retain(|advisor| advisor.id != id);
        if state.advisors.len() == before {
            return Err(not_found("advisor", id));
        }
        Ok(())
    }

    async fn fetch_notifications(&self) -> ApiResult<Vec<Notification>> {
        self.begin("fetch_notifications")?;
        Ok(self.state.lock().unwrap().notifications.clone())
    }

    async fn delete_notification(&self, id: EntityId) -> ApiResult<()> {
        self.begin("delete_notification")?;
        let mut state = self.state.lock().unwrap();
        let before = state.notifications.len();
        state.notifications.retain(|notification| notification.id != id);
        if state.notifications.len() == before {
            return Err(not_found("notification", id));
        }
        Ok(())
    }

    async fn mark_notifications_read(&self, ids: &[EntityId]) -> ApiResult<usize> {
        self.begin("mark_notifications_read")?;
        let mut state = self.state.lock().unwrap();
        // Atomic batch: verify every id before touching any record.
        for id in ids {
            if !state.notifications.iter().any(|n| n.id == *id) {
                return Err(not_found("notification", *id));
            }
        }
        for notification in &mut state.notifications {
            if ids.contains(&notification.id) {
                notification.read = true;
            }
        }
        Ok(ids.len())
    }

    async fn fetch_interventions(&self) -> ApiResult<Vec<Intervention>> {
        self.begin("fetch_interventions")?;
        Ok(self.state.lock().unwrap().interventions.clone())
    }

    async fn create_intervention(&self, payload: CreateIntervention) -> ApiResult<Intervention> {
        self.begin("create_intervention")?;
        let mut state = self.state.lock().unwrap();
        let intervention = Intervention {
            id: state.allocate_id(),
            student_id: payload.student_id,
            advisor_id: payload.advisor_id,
            category: payload.category,
            status: InterventionStatus::Planned,
            summary: payload.summary,
            created_at: Utc::now(),
        };
        state.interventions.push(intervention.clone());
        Ok(intervention)
    }

    async fn update_intervention(
        &self,
        id: EntityId,
        patch: UpdateIntervention,
    ) -> ApiResult<Intervention> {
        self.begin("update_intervention")?;
        let mut state = self.state.lock().unwrap();
        let intervention = state
            .interventions
            .iter_mut()
            .find(|intervention| intervention.id == id)
            .ok_or_else(|| not_found("intervention", id))?;
        if let Some(category) = patch.category {
            intervention.category = category;
        }
        if let Some(summary) = patch.summary {
            intervention.summary = summary;
        }
        if let Some(status) = patch.status {
            intervention.status = status;
        }
        Ok(intervention.clone())
    }

    async fn delete_intervention(&self, id: EntityId) -> ApiResult<()> {
        self.begin("delete_intervention")?;
        let mut state = self.state.lock().unwrap();
        let before = state.interventions.len();
        state.interventions.retain(|intervention| intervention.id != id);
        if state.interventions.len() == before {
            return Err(not_found("intervention", id));
        }
        Ok(())
    }

    async fn fetch_meetings(&self) -> ApiResult<Vec<Meeting>> {
        self.begin("fetch_meetings")?;
        Ok(self.state.lock().unwrap().meetings.clone())
    }

    async fn create_meeting(&self, payload: CreateMeeting) -> ApiResult<Meeting> {
        self.begin("create_meeting")?;
        let mut state = self.state.lock().unwrap();
        let meeting = Meeting {
            id: state.allocate_id(),
            student_id: payload.student_id,
            advisor_id: payload.advisor_id,
            scheduled_at: payload.scheduled_at,
            location: payload.location,
            status: MeetingStatus::Scheduled,
            notes: None,
        };
        state.meetings.push(meeting.clone());
        Ok(meeting)
    }

    async fn update_meeting(&self, id: EntityId, patch: UpdateMeeting) -> ApiResult<Meeting> {
        self.begin("update_meeting")?;
        let mut state = self.state.lock().unwrap();
        let meeting = state
            .meetings
            .iter_mut()
            .find(|meeting| meeting.id == id)
            .ok_or_else(|| not_found("meeting", id))?;
        if let Some(scheduled_at) = patch.scheduled_at {
            meeting.scheduled_at = scheduled_at;
        }
        if let Some(location) = patch.location {
            meeting.location = Some(location);
        }
        if let Some(status) = patch.status {
            meeting.status = status;
        }
        if let Some(notes) = patch.notes {
            meeting.notes = Some(notes);
        }
        Ok(meeting.clone())
    }

    async fn delete_meeting(&self, id: EntityId) -> ApiResult<()> {
        self.begin("delete_meeting")?;
        let mut state = self.state.lock().unwrap();
        let before = state.meetings.len();
        state.meetings.retain(|meeting| meeting.id != id);
        if state.meetings.len() == before {
            return Err(not_found("meeting", id));
        }
        Ok(())
    }

    async fn assign_advisor(
        &self,
        student_ids: &[EntityId],
        advisor_id: EntityId,
    ) -> ApiResult<usize> {
        self.begin("assign_advisor")?;
        let mut state = self.state.lock().unwrap();
        if !state.advisors.iter().any(|advisor| advisor.id == advisor_id) {
            return Err(not_found("advisor", advisor_id));
        }
        // Atomic batch: verify every id before touching any record.
        for id in student_ids {
            if !state.students.iter().any(|s| s.id == *id) {
                return Err(not_found("student", *id));
            }
        }
        for student in &mut state.students {
            if student_ids.contains(&student.id) {
                student.advisor_id = Some(advisor_id);
            }
        }
        state.recompute_caseloads();
        Ok(student_ids.len())
    }
}
