//! Per-entity form types and their payload conversions.

use super::validate::{self, take};
use super::{FormResult, MIN_PASSWORD_LEN};
use crate::api::payload::{
    CreateAdvisor, CreateIntervention, CreateMeeting, CreateStudent, CreateUser, UpdateAdvisor,
    UpdateIntervention, UpdateMeeting, UpdateStudent, UpdateUser,
};
use crate::core::{
    Advisor, EntityId, Intervention, InterventionStatus, Meeting, MeetingStatus, Role, Student,
    User,
};
use crate::riskboard_error::{FieldViolation, RiskboardError};
use chrono::{DateTime, NaiveDateTime, Utc};

fn reject_if_any<T>(violations: Vec<FieldViolation>, build: impl FnOnce() -> T) -> FormResult<T> {
    if violations.is_empty() {
        Ok(build())
    } else {
        Err(RiskboardError::validation(violations))
    }
}

/// Emits `Some(candidate)` only when the cleaned value differs from the
/// record being edited.
fn changed(candidate: String, existing: &str) -> Option<String> {
    if candidate == existing {
        None
    } else {
        Some(candidate)
    }
}

// ============================================================================
// USERS
// ============================================================================

/// Account create/edit form, as typed.
#[derive(Debug, Clone, Default)]
pub struct UserForm {
    pub name: String,
    pub email: String,
    /// Blank on an edit form means "do not change the password".
    pub password: String,
    pub role: Role,
    pub department: String,
    pub active: bool,
}

impl UserForm {
    pub fn into_create(self) -> FormResult<CreateUser> {
        let mut violations = Vec::new();
        let name = take(validate::required("name", &self.name), &mut violations);
        let email = take(validate::email("email", &self.email), &mut violations);
        let password = take(
            validate::min_len("password", &self.password, MIN_PASSWORD_LEN),
            &mut violations,
        );

        reject_if_any(violations, || CreateUser {
            name: name.unwrap(),
            email: email.unwrap(),
            password: password.unwrap(),
            role: self.role,
            department: validate::optional(&self.department),
        })
    }

    /// Builds a patch carrying only the fields that differ from `existing`.
    pub fn into_patch(self, existing: &User) -> FormResult<UpdateUser> {
        let mut violations = Vec::new();
        let name = take(validate::required("name", &self.name), &mut violations);
        let email = take(validate::email("email", &self.email), &mut violations);

        // A blank password is stripped, not sent as an empty string.
        let password = match validate::optional(&self.password) {
            None => None,
            Some(typed) => take(
                validate::min_len("password", &typed, MIN_PASSWORD_LEN),
                &mut violations,
            ),
        };

        reject_if_any(violations, || UpdateUser {
            name: changed(name.unwrap(), &existing.name),
            email: changed(email.unwrap(), &existing.email),
            password,
            role: (self.role != existing.role).then_some(self.role),
            department: match validate::optional(&self.department) {
                Some(dept) if existing.department.as_deref() != Some(dept.as_str()) => Some(dept),
                _ => None,
            },
            active: (self.active != existing.active).then_some(self.active),
        })
    }
}

// ============================================================================
// STUDENTS
// ============================================================================

#[derive(Debug, Clone, Default)]
pub struct StudentForm {
    pub name: String,
    pub email: String,
    pub year: String,
    pub department: String,
    pub advisor_id: Option<EntityId>,
}

impl StudentForm {
    pub fn into_create(self) -> FormResult<CreateStudent> {
        let mut violations = Vec::new();
        let name = take(validate::required("name", &self.name), &mut violations);
        let email = take(validate::email("email", &self.email), &mut violations);
        let year = take(validate::year("year", &self.year), &mut violations);

        reject_if_any(violations, || CreateStudent {
            name: name.unwrap(),
            email: email.unwrap(),
            year: year.unwrap(),
            department: validate::optional(&self.department),
            advisor_id: self.advisor_id,
        })
    }

    pub fn into_patch(self, existing: &Student) -> FormResult<UpdateStudent> {
        let mut violations = Vec::new();
        let name = take(validate::required("name", &self.name), &mut violations);
        let email = take(validate::email("email", &self.email), &mut violations);
        let year = take(validate::year("year", &self.year), &mut violations);

        reject_if_any(violations, || UpdateStudent {
            name: changed(name.unwrap(), &existing.name),
            email: changed(email.unwrap(), &existing.email),
            year: year.unwrap().filter(|candidate| existing.year != Some(*candidate)),
            department: match validate::optional(&self.department) {
                Some(dept) if existing.department.as_deref() != Some(dept.as_str()) => Some(dept),
                _ => None,
            },
            advisor_id: self
                .advisor_id
                .filter(|candidate| existing.advisor_id != Some(*candidate)),
        })
    }
}

// ============================================================================
// ADVISORS
// ============================================================================

#[derive(Debug, Clone, Default)]
pub struct AdvisorForm {
    pub name: String,
    pub email: String,
    pub department: String,
}

impl AdvisorForm {
    pub fn into_create(self) -> FormResult<CreateAdvisor> {
        let mut violations = Vec::new();
        let name = take(validate::required("name", &self.name), &mut violations);
        let email = take(validate::email("email", &self.email), &mut violations);

        reject_if_any(violations, || CreateAdvisor {
            name: name.unwrap(),
            email: email.unwrap(),
            department: validate::optional(&self.department),
        })
    }

    pub fn into_patch(self, existing: &Advisor) -> FormResult<UpdateAdvisor> {
        let mut violations = Vec::new();
        let name = take(validate::required("name", &self.name), &mut violations);
        let email = take(validate::email("email", &self.email), &mut violations);

        reject_if_any(violations, || UpdateAdvisor {
            name: changed(name.unwrap(), &existing.name),
            email: changed(email.unwrap(), &existing.email),
            department: match validate::optional(&self.department) {
                Some(dept) if existing.department.as_deref() != Some(dept.as_str()) => Some(dept),
                _ => None,
            },
        })
    }
}

// ============================================================================
// INTERVENTIONS
// ============================================================================

#[derive(Debug, Clone, Default)]
pub struct InterventionForm {
    pub student_id: Option<EntityId>,
    pub advisor_id: Option<EntityId>,
    pub category: String,
    pub summary: String,
    pub status: Option<InterventionStatus>,
}

impl InterventionForm {
    pub fn into_create(self) -> FormResult<CreateIntervention> {
        let mut violations = Vec::new();
        let category = take(validate::required("category", &self.category), &mut violations);
        let summary = take(validate::required("summary", &self.summary), &mut violations);
        if self.student_id.is_none() {
            violations.push(FieldViolation::new("student", "must be selected"));
        }
        if self.advisor_id.is_none() {
            violations.push(FieldViolation::new("advisor", "must be selected"));
        }

        reject_if_any(violations, || CreateIntervention {
            student_id: self.student_id.unwrap(),
            advisor_id: self.advisor_id.unwrap(),
            category: category.unwrap(),
            summary: summary.unwrap(),
        })
    }

    pub fn into_patch(self, existing: &Intervention) -> FormResult<UpdateIntervention> {
        let mut violations = Vec::new();
        let category = take(validate::required("category", &self.category), &mut violations);
        let summary = take(validate::required("summary", &self.summary), &mut violations);

        reject_if_any(violations, || UpdateIntervention {
            category: changed(category.unwrap(), &existing.category),
            summary: changed(summary.unwrap(), &existing.summary),
            status: self.status.filter(|candidate| *candidate != existing.status),
        })
    }
}

// ============================================================================
// MEETINGS
// ============================================================================

/// Accepted formats for the scheduled-at field.
const MEETING_TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

#[derive(Debug, Clone, Default)]
pub struct MeetingForm {
    pub student_id: Option<EntityId>,
    pub advisor_id: Option<EntityId>,
    /// As typed, e.g. `2026-09-14 10:30`.
    pub scheduled_at: String,
    pub location: String,
    pub status: Option<MeetingStatus>,
    pub notes: String,
}

fn parse_meeting_time(field: &'static str, value: &str) -> Result<DateTime<Utc>, FieldViolation> {
    let trimmed = validate::required(field, value)?;
    NaiveDateTime::parse_from_str(&trimmed, MEETING_TIME_FORMAT)
        .map(|naive| naive.and_utc())
        .map_err(|_| FieldViolation::new(field, "must look like 2026-09-14 10:30"))
}

impl MeetingForm {
    pub fn into_create(self) -> FormResult<CreateMeeting> {
        let mut violations = Vec::new();
        let scheduled_at = take(
            parse_meeting_time("scheduled_at", &self.scheduled_at),
            &mut violations,
        );
        if self.student_id.is_none() {
            violations.push(FieldViolation::new("student", "must be selected"));
        }
        if self.advisor_id.is_none() {
            violations.push(FieldViolation::new("advisor", "must be selected"));
        }

        reject_if_any(violations, || CreateMeeting {
            student_id: self.student_id.unwrap(),
            advisor_id: self.advisor_id.unwrap(),
            scheduled_at: scheduled_at.unwrap(),
            location: validate::optional(&self.location),
        })
    }

    pub fn into_patch(self, existing: &Meeting) -> FormResult<UpdateMeeting> {
        let mut violations = Vec::new();
        let scheduled_at = take(
            parse_meeting_time("scheduled_at", &self.scheduled_at),
            &mut violations,
        );

        reject_if_any(violations, || UpdateMeeting {
            scheduled_at: scheduled_at
                .filter(|candidate| *candidate != existing.scheduled_at),
            location: match validate::optional(&self.location) {
                Some(loc) if existing.location.as_deref() != Some(loc.as_str()) => Some(loc),
                _ => None,
            },
            status: self.status.filter(|candidate| *candidate != existing.status),
            notes: match validate::optional(&self.notes) {
                Some(notes) if existing.notes.as_deref() != Some(notes.as_str()) => Some(notes),
                _ => None,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn existing_user() -> User {
        User {
            id: 7,
            name: "Ada Lovelace".to_string(),
            email: "ada@example.edu".to_string(),
            role: Role::Advisor,
            department: Some("math".to_string()),
            active: true,
        }
    }

    #[test]
    fn test_create_rejects_short_password() {
        let form = UserForm {
            name: "Ada".to_string(),
            email: "ada@example.edu".to_string(),
            password: "ab".to_string(),
            role: Role::Advisor,
            ..Default::default()
        };
        let err = form.into_create().unwrap_err();
        assert_eq!(err.violations().len(), 1);
        assert_eq!(err.violations()[0].field, "password");
    }

    #[test]
    fn test_create_collects_all_violations() {
        let form = UserForm::default();
        let err = form.into_create().unwrap_err();
        let fields: Vec<_> = err.violations().iter().map(|v| v.field).collect();
        assert_eq!(fields, vec!["name", "email", "password"]);
    }

    #[test]
    fn test_patch_strips_blank_password() {
        let form = UserForm {
            name: "Ada Lovelace".to_string(),
            email: "ada@example.edu".to_string(),
            password: "   ".to_string(),
            role: Role::Advisor,
            department: "math".to_string(),
            active: true,
        };
        let patch = form.into_patch(&existing_user()).unwrap();
        assert_eq!(patch, UpdateUser::default());
        assert!(patch.is_empty());
    }

    #[test]
    fn test_patch_carries_only_changed_fields() {
        let form = UserForm {
            name: "Ada Lovelace".to_string(),
            email: "ada.l@example.edu".to_string(),
            password: String::new(),
            role: Role::Admin,
            department: "math".to_string(),
            active: true,
        };
        let patch = form.into_patch(&existing_user()).unwrap();
        assert_eq!(
            patch,
            UpdateUser {
                email: Some("ada.l@example.edu".to_string()),
                role: Some(Role::Admin),
                ..Default::default()
            }
        );
    }

    #[test]
    fn test_patch_validates_typed_password() {
        let form = UserForm {
            name: "Ada Lovelace".to_string(),
            email: "ada@example.edu".to_string(),
            password: "abc".to_string(),
            role: Role::Advisor,
            department: "math".to_string(),
            active: true,
        };
        let err = form.into_patch(&existing_user()).unwrap_err();
        assert_eq!(err.violations()[0].field, "password");
    }

    #[test]
    fn test_meeting_time_parse() {
        let form = MeetingForm {
            student_id: Some(1),
            advisor_id: Some(2),
            scheduled_at: "2026-09-14 10:30".to_string(),
            ..Default::default()
        };
        let payload = form.into_create().unwrap();
        assert_eq!(payload.scheduled_at.to_rfc3339(), "2026-09-14T10:30:00+00:00");
    }

    #[test]
    fn test_intervention_requires_selections() {
        let form = InterventionForm {
            category: "tutoring".to_string(),
            summary: "weekly sessions".to_string(),
            ..Default::default()
        };
        let err = form.into_create().unwrap_err();
        let fields: Vec<_> = err.violations().iter().map(|v| v.field).collect();
        assert_eq!(fields, vec!["student", "advisor"]);
    }
}
