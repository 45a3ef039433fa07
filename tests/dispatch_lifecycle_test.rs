//! Lifecycle tests for the dispatcher/store pair: busy flags, banners,
//! refetch-after-mutation, and bulk completion notices, end to end over
//! the in-memory API.

use riskboard::api::{ApiClient, CreateUser};
use riskboard::core::Role;
use riskboard::riskboard_error::RiskboardError;
use riskboard::store::{Action, Collection, DashboardStore, Dispatcher, Mutation};
use riskboard::testkit::MemoryApi;
use std::sync::Arc;
use tokio::sync::mpsc::{self, UnboundedReceiver};

fn user_payload(name: &str) -> CreateUser {
    CreateUser {
        name: name.to_string(),
        email: format!("{}@example.edu", name.to_lowercase()),
        password: "hunter2".to_string(),
        role: Role::Advisor,
        department: None,
    }
}

async fn drain(store: &mut DashboardStore, rx: &mut UnboundedReceiver<Action>, count: usize) {
    for _ in 0..count {
        let action = rx.recv().await.expect("action channel closed early");
        store.apply(action);
    }
}

#[tokio::test]
async fn load_sets_busy_then_delivers_records() {
    let api = Arc::new(MemoryApi::seeded());
    let (tx, mut rx) = mpsc::unbounded_channel();
    let dispatcher = Dispatcher::new(api, tx);
    let mut store = DashboardStore::new(Role::Admin, 10);

    dispatcher.load(Collection::Students);

    // First the synchronous start marker.
    let started = rx.recv().await.unwrap();
    store.apply(started);
    assert!(store.meta(Collection::Students).busy);

    // Then the completion.
    drain(&mut store, &mut rx, 1).await;
    assert!(!store.meta(Collection::Students).busy);
    assert!(store.meta(Collection::Students).loaded);
    assert_eq!(store.students.len(), 6);
}

#[tokio::test]
async fn failed_load_raises_banner_and_clears_busy() {
    let api = Arc::new(MemoryApi::seeded());
    api.fail_next_with(RiskboardError::remote(503, "Service unavailable"));

    let (tx, mut rx) = mpsc::unbounded_channel();
    let client: Arc<dyn ApiClient> = api.clone();
    let dispatcher = Dispatcher::new(client, tx);
    let mut store = DashboardStore::new(Role::Admin, 10);

    dispatcher.load(Collection::Users);
    drain(&mut store, &mut rx, 2).await;

    let meta = store.meta(Collection::Users);
    assert!(!meta.busy);
    assert_eq!(meta.banner.as_ref().unwrap().message, "Service unavailable");
    assert!(meta.banner.as_ref().unwrap().retryable);
}

#[tokio::test]
async fn successful_mutation_refetches_the_collection() {
    let api = Arc::new(MemoryApi::new());
    let (tx, mut rx) = mpsc::unbounded_channel();
    let client: Arc<dyn ApiClient> = api.clone();
    let dispatcher = Dispatcher::new(client, tx);
    let mut store = DashboardStore::new(Role::Admin, 10);

    dispatcher.mutate(Mutation::CreateUser(user_payload("Ada")));

    // MutationStarted, MutationSucceeded, LoadStarted, UsersLoaded.
    drain(&mut store, &mut rx, 4).await;

    assert!(!store.meta(Collection::Users).busy);
    assert_eq!(store.users.len(), 1);
    assert_eq!(store.users[0].name, "Ada");
    assert_eq!(api.call_count("fetch_users"), 1);
}

#[tokio::test]
async fn failed_mutation_surfaces_server_message_verbatim() {
    let api = Arc::new(MemoryApi::new());
    api.fail_next_with(RiskboardError::remote(409, "Email already registered"));

    let (tx, mut rx) = mpsc::unbounded_channel();
    let client: Arc<dyn ApiClient> = api.clone();
    let dispatcher = Dispatcher::new(client, tx);
    let mut store = DashboardStore::new(Role::Admin, 10);

    dispatcher.mutate(Mutation::CreateUser(user_payload("Ada")));

    // MutationStarted, MutationFailed. No refetch follows a failure.
    drain(&mut store, &mut rx, 2).await;

    let meta = store.meta(Collection::Users);
    assert!(!meta.busy);
    assert_eq!(
        meta.banner.as_ref().unwrap().message,
        "Email already registered"
    );
    assert!(meta.banner.as_ref().unwrap().user_fixable);
    assert_eq!(api.call_count("fetch_users"), 0);
}

#[tokio::test]
async fn bulk_mutation_reports_count_and_refetches_both_collections() {
    let api = Arc::new(MemoryApi::seeded());
    let (tx, mut rx) = mpsc::unbounded_channel();
    let client: Arc<dyn ApiClient> = api.clone();
    let dispatcher = Dispatcher::new(client, tx);
    let mut store = DashboardStore::new(Role::Admin, 10);

    let students: Vec<_> = api.fetch_students().await.unwrap();
    let advisors: Vec<_> = api.fetch_advisors().await.unwrap();
    let ids: Vec<_> = students.iter().take(3).map(|s| s.id).collect();

    dispatcher.mutate(Mutation::AssignAdvisor {
        student_ids: ids,
        advisor_id: advisors[1].id,
    });

    // MutationStarted, MutationSucceeded, BulkCompleted, then two loads
    // (students and advisors), each a start plus a completion.
    drain(&mut store, &mut rx, 7).await;

    assert_eq!(
        store.meta(Collection::Students).notice.as_deref(),
        Some("Applied to 3 students")
    );
    assert_eq!(store.students.len(), 6);
    assert!(!store.advisors.is_empty());
}

#[tokio::test]
async fn delete_of_missing_id_shows_error_and_keeps_collection() {
    let api = Arc::new(MemoryApi::seeded());
    let (tx, mut rx) = mpsc::unbounded_channel();
    let client: Arc<dyn ApiClient> = api.clone();
    let dispatcher = Dispatcher::new(client, tx);
    let mut store = DashboardStore::new(Role::Admin, 10);

    dispatcher.load(Collection::Users);
    drain(&mut store, &mut rx, 2).await;
    let before = store.users.clone();

    dispatcher.mutate(Mutation::DeleteUser(9999));
    drain(&mut store, &mut rx, 2).await;

    let meta = store.meta(Collection::Users);
    assert_eq!(meta.banner.as_ref().unwrap().message, "user 9999 not found");
    assert_eq!(store.users, before);
}
