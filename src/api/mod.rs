//! Remote API boundary: the client trait, wire DTOs, and the HTTP wrapper.
//!
//! Everything above this module works with canonical [`crate::core`] types;
//! wire-shape normalization stops here. The dashboard always holds the
//! client behind `Arc<dyn ApiClient>` so tests and demo mode can substitute
//! the in-memory implementation from [`crate::testkit`].

pub mod http;
pub mod payload;
pub mod wire;

pub use http::HttpApi;
pub use payload::{
    CreateAdvisor, CreateIntervention, CreateMeeting, CreateStudent, CreateUser, UpdateAdvisor,
    UpdateIntervention, UpdateMeeting, UpdateStudent, UpdateUser,
};

use crate::core::{Advisor, EntityId, Intervention, Meeting, Notification, Student, User};
use crate::riskboard_error::RiskboardError;
use async_trait::async_trait;

pub type ApiResult<T> = Result<T, RiskboardError>;

/// The backend contract the dashboard consumes.
///
/// Reads are always full-collection fetches; every mutation is followed by a
/// refetch of the authoritative collection rather than a local patch. Bulk
/// operations are atomic at this layer: one acted-upon count or one error,
/// never per-item results.
#[async_trait]
pub trait ApiClient: Send + Sync {
    // --- users -----------------------------------------------------------

    async fn fetch_users(&self) -> ApiResult<Vec<User>>;
    async fn create_user(&self, payload: CreateUser) -> ApiResult<User>;
    async fn update_user(&self, id: EntityId, patch: UpdateUser) -> ApiResult<User>;
    async fn delete_user(&self, id: EntityId) -> ApiResult<()>;

    // --- students --------------------------------------------------------

    async fn fetch_students(&self) -> ApiResult<Vec<Student>>;
    async fn create_student(&self, payload: CreateStudent) -> ApiResult<Student>;
    async fn update_student(&self, id: EntityId, patch: UpdateStudent) -> ApiResult<Student>;
    async fn delete_student(&self, id: EntityId) -> ApiResult<()>;

    // --- advisors --------------------------------------------------------

    async fn fetch_advisors(&self) -> ApiResult<Vec<Advisor>>;
    async fn create_advisor(&self, payload: CreateAdvisor) -> ApiResult<Advisor>;
    async fn update_advisor(&self, id: EntityId, patch: UpdateAdvisor) -> ApiResult<Advisor>;
    async fn delete_advisor(&self, id: EntityId) -> ApiResult<()>;

    // --- notifications ---------------------------------------------------

    async fn fetch_notifications(&self) -> ApiResult<Vec<Notification>>;
    async fn delete_notification(&self, id: EntityId) -> ApiResult<()>;
    /// Marks the given notifications read. Returns the acted-upon count.
    async fn mark_notifications_read(&self, ids: &[EntityId]) -> ApiResult<usize>;

    // --- interventions ---------------------------------------------------

    async fn fetch_interventions(&self) -> ApiResult<Vec<Intervention>>;
    async fn create_intervention(&self, payload: CreateIntervention) -> ApiResult<Intervention>;
    async fn update_intervention(
        &self,
        id: EntityId,
        patch: UpdateIntervention,
    ) -> ApiResult<Intervention>;
    async fn delete_intervention(&self, id: EntityId) -> ApiResult<()>;

    // --- meetings --------------------------------------------------------

    async fn fetch_meetings(&self) -> ApiResult<Vec<Meeting>>;
    async fn create_meeting(&self, payload: CreateMeeting) -> ApiResult<Meeting>;
    async fn update_meeting(&self, id: EntityId, patch: UpdateMeeting) -> ApiResult<Meeting>;
    async fn delete_meeting(&self, id: EntityId) -> ApiResult<()>;

    /// Assigns an advisor to every student in the id set. Returns the
    /// acted-upon count.
    async fn assign_advisor(
        &self,
        student_ids: &[EntityId],
        advisor_id: EntityId,
    ) -> ApiResult<usize>;
}
