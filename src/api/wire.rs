//! Wire-shape DTOs and their normalization into canonical types.
//!
//! Different backend endpoints spell the same logical field differently
//! (`riskLevel` vs `risk_level`, `fullName` vs `name`). Each DTO accepts
//! every observed spelling via serde aliases and converts into exactly one
//! canonical shape. View and store code never see a wire type.

use crate::core::{
    Advisor, EntityId, Intervention, InterventionStatus, Meeting, MeetingStatus, Notification,
    RiskLevel, Role, Student, User,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;

fn default_true() -> bool {
    true
}

#[derive(Debug, Deserialize)]
pub struct UserWire {
    pub id: EntityId,
    #[serde(alias = "fullName", alias = "full_name")]
    pub name: String,
    #[serde(alias = "emailAddress", alias = "email_address")]
    pub email: String,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default = "default_true", alias = "isActive", alias = "is_active")]
    pub active: bool,
}

impl From<UserWire> for User {
    fn from(wire: UserWire) -> Self {
        User {
            id: wire.id,
            name: wire.name,
            email: wire.email,
            role: Role::from_wire(wire.role.as_deref().unwrap_or("")),
            department: wire.department,
            active: wire.active,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct StudentWire {
    pub id: EntityId,
    #[serde(alias = "fullName", alias = "full_name")]
    pub name: String,
    #[serde(alias = "emailAddress", alias = "email_address")]
    pub email: String,
    #[serde(default, alias = "enrollmentYear", alias = "enrollment_year")]
    pub year: Option<u8>,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default, alias = "currentGpa", alias = "current_gpa")]
    pub gpa: Option<f64>,
    #[serde(default, alias = "riskLevel")]
    pub risk_level: Option<String>,
    #[serde(default, alias = "advisorId")]
    pub advisor_id: Option<EntityId>,
}

impl From<StudentWire> for Student {
    fn from(wire: StudentWire) -> Self {
        Student {
            id: wire.id,
            name: wire.name,
            email: wire.email,
            year: wire.year,
            department: wire.department,
            gpa: wire.gpa,
            risk_level: wire
                .risk_level
                .as_deref()
                .map(RiskLevel::from_wire)
                .unwrap_or(RiskLevel::Unknown),
            advisor_id: wire.advisor_id,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct AdvisorWire {
    pub id: EntityId,
    #[serde(alias = "fullName", alias = "full_name")]
    pub name: String,
    #[serde(alias = "emailAddress", alias = "email_address")]
    pub email: String,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default, alias = "studentCount", alias = "student_count")]
    pub caseload: u32,
}

impl From<AdvisorWire> for Advisor {
    fn from(wire: AdvisorWire) -> Self {
        Advisor {
            id: wire.id,
            name: wire.name,
            email: wire.email,
            department: wire.department,
            caseload: wire.caseload,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct NotificationWire {
    pub id: EntityId,
    #[serde(alias = "recipientId")]
    pub recipient_id: EntityId,
    pub title: String,
    #[serde(default, alias = "message")]
    pub body: String,
    #[serde(default, alias = "isRead", alias = "is_read")]
    pub read: bool,
    #[serde(alias = "createdAt")]
    pub created_at: DateTime<Utc>,
}

impl From<NotificationWire> for Notification {
    fn from(wire: NotificationWire) -> Self {
        Notification {
            id: wire.id,
            recipient_id: wire.recipient_id,
            title: wire.title,
            body: wire.body,
            read: wire.read,
            created_at: wire.created_at,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct InterventionWire {
    pub id: EntityId,
    #[serde(alias = "studentId")]
    pub student_id: EntityId,
    #[serde(alias = "advisorId")]
    pub advisor_id: EntityId,
    #[serde(default, alias = "interventionType", alias = "intervention_type")]
    pub category: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default, alias = "description")]
    pub summary: String,
    #[serde(alias = "createdAt")]
    pub created_at: DateTime<Utc>,
}

impl From<InterventionWire> for Intervention {
    fn from(wire: InterventionWire) -> Self {
        Intervention {
            id: wire.id,
            student_id: wire.student_id,
            advisor_id: wire.advisor_id,
            category: wire.category,
            status: InterventionStatus::from_wire(wire.status.as_deref().unwrap_or("")),
            summary: wire.summary,
            created_at: wire.created_at,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct MeetingWire {
    pub id: EntityId,
    #[serde(alias = "studentId")]
    pub student_id: EntityId,
    #[serde(alias = "advisorId")]
    pub advisor_id: EntityId,
    #[serde(alias = "scheduledAt", alias = "scheduled_for")]
    pub scheduled_at: DateTime<Utc>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl From<MeetingWire> for Meeting {
    fn from(wire: MeetingWire) -> Self {
        Meeting {
            id: wire.id,
            student_id: wire.student_id,
            advisor_id: wire.advisor_id,
            scheduled_at: wire.scheduled_at,
            location: wire.location,
            status: MeetingStatus::from_wire(wire.status.as_deref().unwrap_or("")),
            notes: wire.notes,
        }
    }
}

/// Error body shapes the backend emits; whichever key is present, the text
/// is surfaced verbatim.
#[derive(Debug, Default, Deserialize)]
pub struct ServerMessage {
    #[serde(default, alias = "error", alias = "detail", alias = "msg")]
    pub message: Option<String>,
}

/// Acted-upon count returned by bulk endpoints.
#[derive(Debug, Deserialize)]
pub struct CountWire {
    #[serde(alias = "updated", alias = "actedOn", alias = "acted_on")]
    pub count: usize,
}
