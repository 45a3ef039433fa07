//! Form state and client-side validation for entity mutations.
//!
//! Forms hold exactly what the user typed. Converting a form into a request
//! payload validates it; a failed conversion yields a
//! [`RiskboardError::Validation`](crate::riskboard_error::RiskboardError)
//! and guarantees no network call was made. Edit forms diff against the
//! existing record and emit only changed fields.

pub mod entities;
pub mod validate;

pub use entities::{AdvisorForm, InterventionForm, MeetingForm, StudentForm, UserForm};

use crate::riskboard_error::RiskboardError;

/// Result of a form-to-payload conversion.
pub type FormResult<T> = Result<T, RiskboardError>;

/// Minimum accepted password length.
pub const MIN_PASSWORD_LEN: usize = 6;
