//! Application state for the dashboard.
//!
//! State is explicit and unidirectional: one [`DashboardStore`] owns every
//! collection, every transition is an [`Action`], and [`DashboardStore::apply`]
//! is the only place state changes. The async side (fetches, mutations)
//! lives in [`dispatch`] and communicates back exclusively through actions,
//! so the reducer stays synchronous and testable.

pub mod dispatch;

pub use dispatch::{Dispatcher, Mutation};

use crate::core::{
    Advisor, EntityId, Intervention, Meeting, Notification, Role, Student, User,
};
use crate::riskboard_error::RiskboardError;
use crate::view::{SortDirection, ViewState};
use im::Vector;
use std::collections::BTreeSet;

/// The collections the dashboard can present.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collection {
    Users,
    Students,
    Advisors,
    Notifications,
    Interventions,
    Meetings,
}

impl Collection {
    pub fn all() -> &'static [Collection] {
        &[
            Collection::Users,
            Collection::Students,
            Collection::Advisors,
            Collection::Notifications,
            Collection::Interventions,
            Collection::Meetings,
        ]
    }

    /// Tab label.
    pub fn title(&self) -> &'static str {
        match self {
            Collection::Users => "Users",
            Collection::Students => "Students",
            Collection::Advisors => "Advisors",
            Collection::Notifications => "Notifications",
            Collection::Interventions => "Interventions",
            Collection::Meetings => "Meetings",
        }
    }

    /// Plural noun for counts and empty-state copy.
    pub fn entity(&self) -> &'static str {
        match self {
            Collection::Users => "users",
            Collection::Students => "students",
            Collection::Advisors => "advisors",
            Collection::Notifications => "notifications",
            Collection::Interventions => "interventions",
            Collection::Meetings => "meetings",
        }
    }

    /// Which collections a role gets tabs for. Enforcement is server-side;
    /// this only shapes the UI.
    pub fn visible_to(&self, role: Role) -> bool {
        match role {
            Role::Admin => true,
            Role::Advisor => !matches!(self, Collection::Users),
            Role::Student => matches!(self, Collection::Notifications | Collection::Meetings),
        }
    }
}

/// A dismissible inline error banner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Banner {
    pub message: String,
    pub user_fixable: bool,
    pub retryable: bool,
}

impl Banner {
    pub fn from_error(error: &RiskboardError) -> Self {
        Self {
            message: error.to_string(),
            user_fixable: error.is_user_fixable(),
            retryable: error.is_retryable(),
        }
    }
}

/// Non-record state for one collection: its view, flags, and banners.
#[derive(Debug, Clone)]
pub struct CollectionMeta {
    pub view: ViewState,
    pub busy: bool,
    pub banner: Option<Banner>,
    /// Transient success copy, e.g. after a bulk action.
    pub notice: Option<String>,
    /// Delete confirmation in progress for this id.
    pub pending_delete: Option<EntityId>,
    /// Rows selected for a bulk action.
    pub selected: BTreeSet<EntityId>,
    /// True once at least one fetch has landed.
    pub loaded: bool,
    load_seq: u64,
}

impl CollectionMeta {
    fn new(view: ViewState) -> Self {
        Self {
            view,
            busy: false,
            banner: None,
            notice: None,
            pending_delete: None,
            selected: BTreeSet::new(),
            loaded: false,
            load_seq: 0,
        }
    }

    /// Accept a completion only if it belongs to the newest issued fetch.
    fn accept(&mut self, seq: u64) -> bool {
        if seq == self.load_seq {
            self.busy = false;
            true
        } else {
            log::debug!("dropping stale completion (seq {seq}, current {})", self.load_seq);
            false
        }
    }
}

/// Every state transition the dashboard knows.
#[derive(Debug, Clone)]
pub enum Action {
    // View-state edits
    SearchChanged(Collection, String),
    FilterSelected(Collection, String, String),
    SortClicked(Collection, String),
    PageChanged(Collection, usize),

    // Load lifecycle
    LoadStarted(Collection, u64),
    UsersLoaded { seq: u64, records: Vec<User> },
    StudentsLoaded { seq: u64, records: Vec<Student> },
    AdvisorsLoaded { seq: u64, records: Vec<Advisor> },
    NotificationsLoaded { seq: u64, records: Vec<Notification> },
    InterventionsLoaded { seq: u64, records: Vec<Intervention> },
    MeetingsLoaded { seq: u64, records: Vec<Meeting> },
    LoadFailed { collection: Collection, seq: u64, error: RiskboardError },

    // Mutation lifecycle
    MutationStarted(Collection),
    MutationSucceeded(Collection),
    MutationFailed { collection: Collection, error: RiskboardError },
    BulkCompleted { collection: Collection, count: usize },

    // Delete confirmation
    DeleteRequested(Collection, EntityId),
    DeleteCancelled(Collection),

    // Selection and banners
    SelectionToggled(Collection, EntityId),
    SelectionCleared(Collection),
    BannerDismissed(Collection),
}

/// The sort a collection opens with: riskiest students first, newest
/// notifications and interventions first, names and upcoming meetings
/// ascending.
pub fn default_view(collection: Collection, page_size: usize) -> ViewState {
    match collection {
        Collection::Users | Collection::Advisors => ViewState::new("name", page_size),
        Collection::Students => {
            ViewState::new("risk_level", page_size).with_direction(SortDirection::Desc)
        }
        Collection::Notifications | Collection::Interventions => {
            ViewState::new("created_at", page_size).with_direction(SortDirection::Desc)
        }
        Collection::Meetings => ViewState::new("scheduled_at", page_size),
    }
}

/// All dashboard state, injected into the UI rather than ambient.
pub struct DashboardStore {
    pub role: Role,
    pub users: Vector<User>,
    pub students: Vector<Student>,
    pub advisors: Vector<Advisor>,
    pub notifications: Vector<Notification>,
    pub interventions: Vector<Intervention>,
    pub meetings: Vector<Meeting>,
    users_meta: CollectionMeta,
    students_meta: CollectionMeta,
    advisors_meta: CollectionMeta,
    notifications_meta: CollectionMeta,
    interventions_meta: CollectionMeta,
    meetings_meta: CollectionMeta,
}

impl DashboardStore {
    pub fn new(role: Role, page_size: usize) -> Self {
        Self {
            role,
            users: Vector::new(),
            students: Vector::new(),
            advisors: Vector::new(),
            notifications: Vector::new(),
            interventions: Vector::new(),
            meetings: Vector::new(),
            users_meta: CollectionMeta::new(default_view(Collection::Users, page_size)),
            students_meta: CollectionMeta::new(default_view(Collection::Students, page_size)),
            advisors_meta: CollectionMeta::new(default_view(Collection::Advisors, page_size)),
            notifications_meta: CollectionMeta::new(default_view(
                Collection::Notifications,
                page_size,
            )),
            interventions_meta: CollectionMeta::new(default_view(
                Collection::Interventions,
                page_size,
            )),
            meetings_meta: CollectionMeta::new(default_view(Collection::Meetings, page_size)),
        }
    }

    pub fn visible_collections(&self) -> Vec<Collection> {
        Collection::all()
            .iter()
            .copied()
            .filter(|collection| collection.visible_to(self.role))
            .collect()
    }

    pub fn meta(&self, collection: Collection) -> &CollectionMeta {
        match collection {
            Collection::Users => &self.users_meta,
            Collection::Students => &self.students_meta,
            Collection::Advisors => &self.advisors_meta,
            Collection::Notifications => &self.notifications_meta,
            Collection::Interventions => &self.interventions_meta,
            Collection::Meetings => &self.meetings_meta,
        }
    }

    pub fn meta_mut(&mut self, collection: Collection) -> &mut CollectionMeta {
        match collection {
            Collection::Users => &mut self.users_meta,
            Collection::Students => &mut self.students_meta,
            Collection::Advisors => &mut self.advisors_meta,
            Collection::Notifications => &mut self.notifications_meta,
            Collection::Interventions => &mut self.interventions_meta,
            Collection::Meetings => &mut self.meetings_meta,
        }
    }

    /// The reducer: applies one action to the store.
    pub fn apply(&mut self, action: Action) {
        match action {
            Action::SearchChanged(collection, term) => {
                self.meta_mut(collection).view.set_search(term);
            }
            Action::FilterSelected(collection, category, value) => {
                self.meta_mut(collection).view.set_filter(category, value);
            }
            Action::SortClicked(collection, key) => {
                self.meta_mut(collection).view.toggle_sort(key);
            }
            Action::PageChanged(collection, page) => {
                self.meta_mut(collection).view.set_page(page);
            }

            Action::LoadStarted(collection, seq) => {
                let meta = self.meta_mut(collection);
                meta.load_seq = seq;
                meta.busy = true;
            }
            Action::UsersLoaded { seq, records } => {
                if self.users_meta.accept(seq) {
                    self.users = Vector::from(records);
                    self.users_meta.loaded = true;
                }
            }
            Action::StudentsLoaded { seq, records } => {
                if self.students_meta.accept(seq) {
                    self.students = Vector::from(records);
                    self.students_meta.loaded = true;
                }
            }
            Action::AdvisorsLoaded { seq, records } => {
                if self.advisors_meta.accept(seq) {
                    self.advisors = Vector::from(records);
                    self.advisors_meta.loaded = true;
                }
            }
            Action::NotificationsLoaded { seq, records } => {
                if self.notifications_meta.accept(seq) {
                    self.notifications = Vector::from(records);
                    self.notifications_meta.loaded = true;
                }
            }
            Action::InterventionsLoaded { seq, records } => {
                if self.interventions_meta.accept(seq) {
                    self.interventions = Vector::from(records);
                    self.interventions_meta.loaded = true;
                }
            }
            Action::MeetingsLoaded { seq, records } => {
                if self.meetings_meta.accept(seq) {
                    self.meetings = Vector::from(records);
                    self.meetings_meta.loaded = true;
                }
            }
            Action::LoadFailed { collection, seq, error } => {
                let meta = self.meta_mut(collection);
                if meta.accept(seq) {
                    meta.banner = Some(Banner::from_error(&error));
                }
            }

            Action::MutationStarted(collection) => {
                let meta = self.meta_mut(collection);
                meta.busy = true;
                meta.banner = None;
                meta.notice = None;
            }
            Action::MutationSucceeded(collection) => {
                let meta = self.meta_mut(collection);
                meta.busy = false;
                meta.pending_delete = None;
            }
            Action::MutationFailed { collection, error } => {
                let meta = self.meta_mut(collection);
                meta.busy = false;
                meta.banner = Some(Banner::from_error(&error));
            }
            Action::BulkCompleted { collection, count } => {
                let meta = self.meta_mut(collection);
                meta.notice = Some(format!("Applied to {count} {}", collection.entity()));
                meta.selected.clear();
            }

            Action::DeleteRequested(collection, id) => {
                self.meta_mut(collection).pending_delete = Some(id);
            }
            Action::DeleteCancelled(collection) => {
                self.meta_mut(collection).pending_delete = None;
            }

            Action::SelectionToggled(collection, id) => {
                let selected = &mut self.meta_mut(collection).selected;
                if !selected.remove(&id) {
                    selected.insert(id);
                }
            }
            Action::SelectionCleared(collection) => {
                self.meta_mut(collection).selected.clear();
            }
            Action::BannerDismissed(collection) => {
                let meta = self.meta_mut(collection);
                meta.banner = None;
                meta.notice = None;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::RiskLevel;

    fn store() -> DashboardStore {
        DashboardStore::new(Role::Admin, 10)
    }

    fn student(id: EntityId) -> Student {
        Student {
            id,
            name: format!("student {id}"),
            email: format!("s{id}@example.edu"),
            year: None,
            department: None,
            gpa: None,
            risk_level: RiskLevel::Low,
            advisor_id: None,
        }
    }

    #[test]
    fn test_load_lifecycle_sets_and_clears_busy() {
        let mut store = store();
        store.apply(Action::LoadStarted(Collection::Students, 1));
        assert!(store.meta(Collection::Students).busy);

        store.apply(Action::StudentsLoaded { seq: 1, records: vec![student(1)] });
        assert!(!store.meta(Collection::Students).busy);
        assert_eq!(store.students.len(), 1);
    }

    #[test]
    fn test_stale_completion_is_dropped() {
        let mut store = store();
        store.apply(Action::LoadStarted(Collection::Students, 1));
        store.apply(Action::LoadStarted(Collection::Students, 2));

        // The slow first response lands after the second fetch was issued.
        store.apply(Action::StudentsLoaded { seq: 1, records: vec![student(1)] });
        assert!(store.students.is_empty());
        assert!(store.meta(Collection::Students).busy);

        store.apply(Action::StudentsLoaded { seq: 2, records: vec![student(2), student(3)] });
        assert_eq!(store.students.len(), 2);
        assert!(!store.meta(Collection::Students).busy);
    }

    #[test]
    fn test_failed_load_clears_busy_and_raises_banner() {
        let mut store = store();
        store.apply(Action::LoadStarted(Collection::Users, 1));
        store.apply(Action::LoadFailed {
            collection: Collection::Users,
            seq: 1,
            error: RiskboardError::remote(500, "Internal error"),
        });

        let meta = store.meta(Collection::Users);
        assert!(!meta.busy);
        let banner = meta.banner.as_ref().unwrap();
        assert_eq!(banner.message, "Internal error");
        assert!(banner.retryable);
    }

    #[test]
    fn test_mutation_failure_keeps_banner_until_dismissed() {
        let mut store = store();
        store.apply(Action::MutationStarted(Collection::Users));
        store.apply(Action::MutationFailed {
            collection: Collection::Users,
            error: RiskboardError::remote(409, "Email already registered"),
        });
        assert_eq!(
            store.meta(Collection::Users).banner.as_ref().unwrap().message,
            "Email already registered"
        );

        store.apply(Action::BannerDismissed(Collection::Users));
        assert!(store.meta(Collection::Users).banner.is_none());
    }

    #[test]
    fn test_delete_requires_explicit_confirmation_state() {
        let mut store = store();
        store.apply(Action::DeleteRequested(Collection::Students, 7));
        assert_eq!(store.meta(Collection::Students).pending_delete, Some(7));

        store.apply(Action::DeleteCancelled(Collection::Students));
        assert_eq!(store.meta(Collection::Students).pending_delete, None);
    }

    #[test]
    fn test_bulk_completion_reports_count_and_clears_selection() {
        let mut store = store();
        store.apply(Action::SelectionToggled(Collection::Notifications, 41));
        store.apply(Action::SelectionToggled(Collection::Notifications, 42));
        assert_eq!(store.meta(Collection::Notifications).selected.len(), 2);

        store.apply(Action::BulkCompleted { collection: Collection::Notifications, count: 2 });
        let meta = store.meta(Collection::Notifications);
        assert!(meta.selected.is_empty());
        assert_eq!(meta.notice.as_deref(), Some("Applied to 2 notifications"));
    }

    #[test]
    fn test_role_shapes_visible_collections() {
        let admin = DashboardStore::new(Role::Admin, 10);
        assert_eq!(admin.visible_collections().len(), 6);

        let advisor = DashboardStore::new(Role::Advisor, 10);
        assert!(!advisor.visible_collections().contains(&Collection::Users));

        let student = DashboardStore::new(Role::Student, 10);
        assert_eq!(
            student.visible_collections(),
            vec![Collection::Notifications, Collection::Meetings]
        );
    }
}
