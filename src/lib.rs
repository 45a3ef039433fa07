// Export modules for library usage
pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod core;
pub mod forms;
pub mod riskboard_error;
pub mod store;
pub mod testkit;
pub mod tui;
pub mod view;

// Re-export commonly used types
pub use crate::core::{
    Advisor, EntityId, Intervention, InterventionStatus, Meeting, MeetingStatus, Notification,
    RiskLevel, Role, Student, User,
};

pub use crate::riskboard_error::{ErrorCode, FieldViolation, RiskboardError};

pub use crate::view::{
    compute_view, empty_state_message, schemas, summary::RiskSummary, FieldValue, FilterWidening,
    SortDirection, ViewResult, ViewSchema, ViewState,
};

pub use crate::api::{ApiClient, ApiResult, HttpApi};

pub use crate::store::{
    default_view, Action, Banner, Collection, DashboardStore, Dispatcher, Mutation,
};

pub use crate::forms::{AdvisorForm, InterventionForm, MeetingForm, StudentForm, UserForm};

pub use crate::config::RiskboardConfig;
