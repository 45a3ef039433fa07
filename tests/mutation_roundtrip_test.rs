//! Round-trip tests for the entity mutation contract, run against the
//! in-memory API implementation.
//!
//! The contract under test:
//! - create followed by a full fetch contains every field of the payload
//! - update changes exactly the patched fields and nothing else
//! - delete removes exactly the target id; a missing id errors and removes
//!   nothing
//! - client-side validation failures never reach the client at all
//! - bulk operations are atomic and report the acted-upon count

use pretty_assertions::assert_eq;
use riskboard::api::{ApiClient, CreateUser, UpdateStudent};
use riskboard::core::{RiskLevel, Role};
use riskboard::forms::UserForm;
use riskboard::testkit::MemoryApi;

fn user_payload(name: &str, email: &str) -> CreateUser {
    CreateUser {
        name: name.to_string(),
        email: email.to_string(),
        password: "hunter2".to_string(),
        role: Role::Advisor,
        department: Some("mathematics".to_string()),
    }
}

#[tokio::test]
async fn create_then_fetch_contains_payload() {
    let api = MemoryApi::new();

    let created = api
        .create_user(user_payload("Ada Lovelace", "ada@example.edu"))
        .await
        .unwrap();

    let users = api.fetch_users().await.unwrap();
    let found = users.iter().find(|user| user.id == created.id).unwrap();
    assert_eq!(found.name, "Ada Lovelace");
    assert_eq!(found.email, "ada@example.edu");
    assert_eq!(found.role, Role::Advisor);
    assert_eq!(found.department.as_deref(), Some("mathematics"));
    assert!(found.active);
}

#[tokio::test]
async fn update_changes_exactly_the_patched_fields() {
    let api = MemoryApi::seeded();
    let before = api.fetch_students().await.unwrap();
    let target = before[0].clone();

    api.update_student(
        target.id,
        UpdateStudent {
            name: Some("Renamed Student".to_string()),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    let after = api.fetch_students().await.unwrap();
    assert_eq!(after.len(), before.len());

    for (old, new) in before.iter().zip(after.iter()) {
        if old.id == target.id {
            assert_eq!(new.name, "Renamed Student");
            // Everything else is untouched.
            assert_eq!(new.email, old.email);
            assert_eq!(new.year, old.year);
            assert_eq!(new.department, old.department);
            assert_eq!(new.gpa, old.gpa);
            assert_eq!(new.risk_level, old.risk_level);
            assert_eq!(new.advisor_id, old.advisor_id);
        } else {
            assert_eq!(new, old);
        }
    }
}

#[tokio::test]
async fn delete_removes_exactly_the_target() {
    let api = MemoryApi::new();
    let mut ids = Vec::new();
    for index in 0..5 {
        let created = api
            .create_user(user_payload(
                &format!("User {index}"),
                &format!("user{index}@example.edu"),
            ))
            .await
            .unwrap();
        ids.push(created.id);
    }

    let before = api.fetch_users().await.unwrap();
    let victim = ids[2];
    api.delete_user(victim).await.unwrap();

    let after = api.fetch_users().await.unwrap();
    assert_eq!(after.len(), 4);
    assert!(after.iter().all(|user| user.id != victim));

    // The surviving records are unchanged, field for field.
    for survivor in &after {
        let original = before.iter().find(|user| user.id == survivor.id).unwrap();
        assert_eq!(survivor, original);
    }
}

#[tokio::test]
async fn delete_of_missing_id_errors_and_removes_nothing() {
    let api = MemoryApi::seeded();
    let before = api.fetch_users().await.unwrap();

    let err = api.delete_user(9999).await.unwrap_err();
    assert_eq!(err.to_string(), "user 9999 not found");

    let after = api.fetch_users().await.unwrap();
    assert_eq!(after, before);
}

#[tokio::test]
async fn short_password_never_reaches_the_client() {
    let api = MemoryApi::new();

    let form = UserForm {
        name: "Ada".to_string(),
        email: "ada@example.edu".to_string(),
        password: "ab".to_string(),
        role: Role::Advisor,
        ..Default::default()
    };

    let err = form.into_create().unwrap_err();
    assert_eq!(err.violations()[0].field, "password");

    // The rejected form blocked the call entirely.
    assert_eq!(api.call_count("create_user"), 0);
}

#[tokio::test]
async fn blank_password_on_edit_is_stripped_from_the_patch() {
    let api = MemoryApi::seeded();
    let users = api.fetch_users().await.unwrap();
    let existing = users[0].clone();

    let form = UserForm {
        name: existing.name.clone(),
        email: existing.email.clone(),
        password: String::new(),
        role: existing.role,
        department: existing.department.clone().unwrap_or_default(),
        active: existing.active,
    };
    let patch = form.into_patch(&existing).unwrap();
    assert!(patch.is_empty());

    api.update_user(existing.id, patch).await.unwrap();
    let after = api.fetch_users().await.unwrap();
    assert_eq!(after, users);
}

#[tokio::test]
async fn bulk_mark_read_reports_count() {
    let api = MemoryApi::seeded();
    let notifications = api.fetch_notifications().await.unwrap();
    let ids: Vec<_> = notifications.iter().map(|n| n.id).collect();

    let count = api.mark_notifications_read(&ids).await.unwrap();
    assert_eq!(count, ids.len());

    let after = api.fetch_notifications().await.unwrap();
    assert!(after.iter().all(|notification| notification.read));
}

#[tokio::test]
async fn bulk_with_missing_id_fails_atomically() {
    let api = MemoryApi::seeded();
    let before = api.fetch_notifications().await.unwrap();
    let mut ids: Vec<_> = before.iter().map(|n| n.id).collect();
    ids.push(9999);

    let err = api.mark_notifications_read(&ids).await.unwrap_err();
    assert_eq!(err.to_string(), "notification 9999 not found");

    // Nothing in the batch was applied.
    let after = api.fetch_notifications().await.unwrap();
    assert_eq!(after, before);
}

#[tokio::test]
async fn assign_advisor_moves_caseloads() {
    let api = MemoryApi::seeded();
    let students = api.fetch_students().await.unwrap();
    let advisors = api.fetch_advisors().await.unwrap();
    let target_advisor = advisors[0].id;

    let ids: Vec<_> = students.iter().map(|s| s.id).collect();
    let count = api.assign_advisor(&ids, target_advisor).await.unwrap();
    assert_eq!(count, ids.len());

    let after_students = api.fetch_students().await.unwrap();
    assert!(after_students
        .iter()
        .all(|student| student.advisor_id == Some(target_advisor)));

    let after_advisors = api.fetch_advisors().await.unwrap();
    let advisor = after_advisors
        .iter()
        .find(|advisor| advisor.id == target_advisor)
        .unwrap();
    assert_eq!(advisor.caseload as usize, ids.len());
}

#[tokio::test]
async fn seeded_risk_levels_follow_gpa() {
    let api = MemoryApi::seeded();
    let students = api.fetch_students().await.unwrap();

    let ana = students.iter().find(|s| s.name == "Ana Silva").unwrap();
    assert_eq!(ana.risk_level, RiskLevel::Critical);

    let mei = students.iter().find(|s| s.name == "Mei Chen").unwrap();
    assert_eq!(mei.risk_level, RiskLevel::Unknown);
}
