//! Canonical entity types shared across the dashboard.
//!
//! Wire payloads arrive with inconsistent field spellings across endpoints;
//! the API layer normalizes them into these shapes at the fetch boundary
//! (see [`crate::api::wire`]). View and store logic only ever sees canonical
//! types - nothing downstream branches on casing or wire quirks.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Backend-assigned entity identifier.
pub type EntityId = u64;

/// Access role attached to a signed-in account.
///
/// Role enforcement happens server-side; the client only uses the role to
/// decide which collections to present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    Advisor,
    Student,
}

impl Default for Role {
    fn default() -> Self {
        Role::Student
    }
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Advisor => "advisor",
            Role::Student => "student",
        }
    }

    /// Parse a wire spelling, case-insensitively. Unrecognized roles map to
    /// the least-privileged one.
    pub fn from_wire(value: &str) -> Self {
        match value.to_ascii_lowercase().as_str() {
            "admin" => Role::Admin,
            "advisor" => Role::Advisor,
            _ => Role::Student,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Risk classification computed by the backend for a student.
///
/// The ordering used everywhere in the dashboard is the fixed rank table
/// below, never the lexical order of the labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Critical,
    High,
    Medium,
    Low,
    Unknown,
}

impl RiskLevel {
    /// Fixed severity rank: critical=4, high=3, medium=2, low=1, unknown=0.
    pub fn rank(&self) -> u8 {
        match self {
            RiskLevel::Critical => 4,
            RiskLevel::High => 3,
            RiskLevel::Medium => 2,
            RiskLevel::Low => 1,
            RiskLevel::Unknown => 0,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Critical => "critical",
            RiskLevel::High => "high",
            RiskLevel::Medium => "medium",
            RiskLevel::Low => "low",
            RiskLevel::Unknown => "unknown",
        }
    }

    /// Parse a wire spelling, case-insensitively. Anything unrecognized
    /// (including a missing field upstream) normalizes to `Unknown`.
    pub fn from_wire(value: &str) -> Self {
        match value.to_ascii_lowercase().as_str() {
            "critical" => RiskLevel::Critical,
            "high" => RiskLevel::High,
            "medium" | "moderate" => RiskLevel::Medium,
            "low" => RiskLevel::Low,
            _ => RiskLevel::Unknown,
        }
    }

    /// All levels in rank order, highest first.
    pub fn all() -> &'static [RiskLevel] {
        &[
            RiskLevel::Critical,
            RiskLevel::High,
            RiskLevel::Medium,
            RiskLevel::Low,
            RiskLevel::Unknown,
        ]
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A dashboard account (admin, advisor, or student login).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: EntityId,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub department: Option<String>,
    pub active: bool,
}

/// A monitored student record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Student {
    pub id: EntityId,
    pub name: String,
    pub email: String,
    /// Enrollment year (1-based), when the backend knows it.
    pub year: Option<u8>,
    pub department: Option<String>,
    pub gpa: Option<f64>,
    pub risk_level: RiskLevel,
    pub advisor_id: Option<EntityId>,
}

/// An advisor with an assigned caseload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Advisor {
    pub id: EntityId,
    pub name: String,
    pub email: String,
    pub department: Option<String>,
    /// Number of students currently assigned.
    pub caseload: u32,
}

/// An in-app notification addressed to one account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: EntityId,
    pub recipient_id: EntityId,
    pub title: String,
    pub body: String,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterventionStatus {
    Planned,
    InProgress,
    Completed,
    Cancelled,
}

impl InterventionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InterventionStatus::Planned => "planned",
            InterventionStatus::InProgress => "in_progress",
            InterventionStatus::Completed => "completed",
            InterventionStatus::Cancelled => "cancelled",
        }
    }

    pub fn from_wire(value: &str) -> Self {
        match value.to_ascii_lowercase().as_str() {
            "in_progress" | "inprogress" | "active" => InterventionStatus::InProgress,
            "completed" | "done" => InterventionStatus::Completed,
            "cancelled" | "canceled" => InterventionStatus::Cancelled,
            _ => InterventionStatus::Planned,
        }
    }
}

impl fmt::Display for InterventionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A support action opened by an advisor for a student.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Intervention {
    pub id: EntityId,
    pub student_id: EntityId,
    pub advisor_id: EntityId,
    /// Free-form category label, e.g. "tutoring" or "attendance".
    pub category: String,
    pub status: InterventionStatus,
    pub summary: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeetingStatus {
    Scheduled,
    Completed,
    Cancelled,
}

impl MeetingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MeetingStatus::Scheduled => "scheduled",
            MeetingStatus::Completed => "completed",
            MeetingStatus::Cancelled => "cancelled",
        }
    }

    pub fn from_wire(value: &str) -> Self {
        match value.to_ascii_lowercase().as_str() {
            "completed" | "done" => MeetingStatus::Completed,
            "cancelled" | "canceled" => MeetingStatus::Cancelled,
            _ => MeetingStatus::Scheduled,
        }
    }
}

impl fmt::Display for MeetingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A scheduled advisor/student meeting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Meeting {
    pub id: EntityId,
    pub student_id: EntityId,
    pub advisor_id: EntityId,
    pub scheduled_at: DateTime<Utc>,
    pub location: Option<String>,
    pub status: MeetingStatus,
    pub notes: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_risk_rank_table() {
        assert_eq!(RiskLevel::Critical.rank(), 4);
        assert_eq!(RiskLevel::High.rank(), 3);
        assert_eq!(RiskLevel::Medium.rank(), 2);
        assert_eq!(RiskLevel::Low.rank(), 1);
        assert_eq!(RiskLevel::Unknown.rank(), 0);
    }

    #[test]
    fn test_risk_from_wire_is_case_insensitive() {
        assert_eq!(RiskLevel::from_wire("HIGH"), RiskLevel::High);
        assert_eq!(RiskLevel::from_wire("Critical"), RiskLevel::Critical);
        assert_eq!(RiskLevel::from_wire("moderate"), RiskLevel::Medium);
    }

    #[test]
    fn test_unrecognized_risk_normalizes_to_unknown() {
        assert_eq!(RiskLevel::from_wire("n/a"), RiskLevel::Unknown);
        assert_eq!(RiskLevel::from_wire(""), RiskLevel::Unknown);
    }

    #[test]
    fn test_role_from_wire_defaults_to_student() {
        assert_eq!(Role::from_wire("ADMIN"), Role::Admin);
        assert_eq!(Role::from_wire("viewer"), Role::Student);
    }

    #[test]
    fn test_status_wire_spellings() {
        assert_eq!(
            InterventionStatus::from_wire("inProgress".to_ascii_lowercase().as_str()),
            InterventionStatus::InProgress
        );
        assert_eq!(MeetingStatus::from_wire("canceled"), MeetingStatus::Cancelled);
    }
}
