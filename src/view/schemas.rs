//! View schemas for each dashboard collection.
//!
//! A schema names every field a page can search, filter, or sort on, and
//! carries the view's explicitly configured filter widenings. Widening is a
//! per-view decision threaded in from configuration; list pages and summary
//! cards may legitimately disagree.

use super::{FieldValue, FilterWidening, ViewSchema};
use crate::core::{Advisor, Intervention, Meeting, Notification, Student, User};

pub fn user_schema() -> ViewSchema<User> {
    ViewSchema::new("users")
        .searchable_field("name", |u: &User| FieldValue::text(u.name.clone()))
        .searchable_field("email", |u: &User| FieldValue::text(u.email.clone()))
        .field("role", |u: &User| FieldValue::text(u.role.as_str()))
        .field("department", |u: &User| {
            FieldValue::opt_text(u.department.as_deref())
        })
        .field("active", |u: &User| FieldValue::Bool(u.active))
}

/// Student list schema. `widen_high` is the per-view "high includes
/// critical" choice from configuration.
pub fn student_schema(widen_high: bool) -> ViewSchema<Student> {
    let schema = ViewSchema::new("students")
        .searchable_field("name", |s: &Student| FieldValue::text(s.name.clone()))
        .searchable_field("email", |s: &Student| FieldValue::text(s.email.clone()))
        .field("year", |s: &Student| match s.year {
            Some(year) => FieldValue::Integer(i64::from(year)),
            None => FieldValue::Missing,
        })
        .field("department", |s: &Student| {
            FieldValue::opt_text(s.department.as_deref())
        })
        .field("gpa", |s: &Student| match s.gpa {
            Some(gpa) => FieldValue::Float(gpa),
            None => FieldValue::Missing,
        })
        .field("risk_level", |s: &Student| FieldValue::Risk(s.risk_level));

    if widen_high {
        schema.widen(FilterWidening::high_risk_includes_critical())
    } else {
        schema
    }
}

pub fn advisor_schema() -> ViewSchema<Advisor> {
    ViewSchema::new("advisors")
        .searchable_field("name", |a: &Advisor| FieldValue::text(a.name.clone()))
        .searchable_field("email", |a: &Advisor| FieldValue::text(a.email.clone()))
        .field("department", |a: &Advisor| {
            FieldValue::opt_text(a.department.as_deref())
        })
        .field("caseload", |a: &Advisor| {
            FieldValue::Integer(i64::from(a.caseload))
        })
}

pub fn notification_schema() -> ViewSchema<Notification> {
    ViewSchema::new("notifications")
        .searchable_field("title", |n: &Notification| FieldValue::text(n.title.clone()))
        .searchable_field("body", |n: &Notification| FieldValue::text(n.body.clone()))
        .field("read", |n: &Notification| FieldValue::Bool(n.read))
        .field("created_at", |n: &Notification| {
            FieldValue::Timestamp(n.created_at)
        })
}

pub fn intervention_schema() -> ViewSchema<Intervention> {
    ViewSchema::new("interventions")
        .searchable_field("summary", |i: &Intervention| {
            FieldValue::text(i.summary.clone())
        })
        .searchable_field("category", |i: &Intervention| {
            FieldValue::text(i.category.clone())
        })
        .field("status", |i: &Intervention| FieldValue::text(i.status.as_str()))
        .field("created_at", |i: &Intervention| {
            FieldValue::Timestamp(i.created_at)
        })
}

pub fn meeting_schema() -> ViewSchema<Meeting> {
    ViewSchema::new("meetings")
        .searchable_field("location", |m: &Meeting| {
            FieldValue::opt_text(m.location.as_deref())
        })
        .field("status", |m: &Meeting| FieldValue::text(m.status.as_str()))
        .field("scheduled_at", |m: &Meeting| {
            FieldValue::Timestamp(m.scheduled_at)
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{RiskLevel, Role};
    use crate::view::{compute_view, ViewState};

    fn student(name: &str, risk: RiskLevel) -> Student {
        Student {
            id: 1,
            name: name.to_string(),
            email: format!("{}@example.edu", name.to_lowercase().replace(' ', ".")),
            year: Some(2),
            department: Some("math".to_string()),
            gpa: Some(2.5),
            risk_level: risk,
            advisor_id: None,
        }
    }

    #[test]
    fn test_student_schema_widening_is_config_driven() {
        let records = vec![
            student("a", RiskLevel::High),
            student("b", RiskLevel::Critical),
            student("c", RiskLevel::Low),
        ];
        let mut state = ViewState::new("name", 10);
        state.set_filter("risk_level", "high");

        let narrow = compute_view(&records, &state, &student_schema(false));
        let wide = compute_view(&records, &state, &student_schema(true));

        assert_eq!(narrow.filtered_count, 1);
        assert_eq!(wide.filtered_count, 2);
    }

    #[test]
    fn test_user_schema_covers_role_filter() {
        let users = vec![User {
            id: 7,
            name: "Pat Admin".to_string(),
            email: "pat@example.edu".to_string(),
            role: Role::Admin,
            department: None,
            active: true,
        }];
        let mut state = ViewState::new("name", 10);
        state.set_filter("role", "admin");

        let result = compute_view(&users, &state, &user_schema());

        assert_eq!(result.filtered_count, 1);
    }
}
