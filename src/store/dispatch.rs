//! Async side of the store: fetches and mutations as spawned tasks.
//!
//! The dispatcher owns the API client and a sender for [`Action`]s; the UI
//! loop owns the receiver and feeds everything into the reducer. Each user
//! action issues exactly one outstanding request. Completions carry the
//! sequence number of the fetch they answer, so the reducer can drop a slow
//! response that arrives after a newer fetch was issued.
//!
//! Every mutation path ends by sending a terminal action - success or
//! failure - so the busy flag always clears, and every successful mutation
//! triggers a full refetch of the collections it touched rather than a
//! local patch.

use super::{Action, Collection};
use crate::api::payload::{
    CreateAdvisor, CreateIntervention, CreateMeeting, CreateStudent, CreateUser, UpdateAdvisor,
    UpdateIntervention, UpdateMeeting, UpdateStudent, UpdateUser,
};
use crate::api::{ApiClient, ApiResult};
use crate::core::EntityId;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedSender;

/// A mutation the UI can request.
#[derive(Debug, Clone)]
pub enum Mutation {
    CreateUser(CreateUser),
    UpdateUser(EntityId, UpdateUser),
    DeleteUser(EntityId),
    CreateStudent(CreateStudent),
    UpdateStudent(EntityId, UpdateStudent),
    DeleteStudent(EntityId),
    CreateAdvisor(CreateAdvisor),
    UpdateAdvisor(EntityId, UpdateAdvisor),
    DeleteAdvisor(EntityId),
    DeleteNotification(EntityId),
    MarkNotificationsRead(Vec<EntityId>),
    CreateIntervention(CreateIntervention),
    UpdateIntervention(EntityId, UpdateIntervention),
    DeleteIntervention(EntityId),
    CreateMeeting(CreateMeeting),
    UpdateMeeting(EntityId, UpdateMeeting),
    DeleteMeeting(EntityId),
    AssignAdvisor {
        student_ids: Vec<EntityId>,
        advisor_id: EntityId,
    },
}

impl Mutation {
    /// The collection whose busy flag and banner this mutation drives.
    pub fn collection(&self) -> Collection {
        match self {
            Mutation::CreateUser(_) | Mutation::UpdateUser(..) | Mutation::DeleteUser(_) => {
                Collection::Users
            }
            Mutation::CreateStudent(_)
            | Mutation::UpdateStudent(..)
            | Mutation::DeleteStudent(_)
            | Mutation::AssignAdvisor { .. } => Collection::Students,
            Mutation::CreateAdvisor(_)
            | Mutation::UpdateAdvisor(..)
            | Mutation::DeleteAdvisor(_) => Collection::Advisors,
            Mutation::DeleteNotification(_) | Mutation::MarkNotificationsRead(_) => {
                Collection::Notifications
            }
            Mutation::CreateIntervention(_)
            | Mutation::UpdateIntervention(..)
            | Mutation::DeleteIntervention(_) => Collection::Interventions,
            Mutation::CreateMeeting(_)
            | Mutation::UpdateMeeting(..)
            | Mutation::DeleteMeeting(_) => Collection::Meetings,
        }
    }

    /// Collections to refetch after this mutation succeeds. Advisor
    /// assignment also moves caseload counts, so both collections re-read.
    fn refetches(&self) -> Vec<Collection> {
        match self {
            Mutation::AssignAdvisor { .. } => vec![Collection::Students, Collection::Advisors],
            other => vec![other.collection()],
        }
    }
}

/// Spawns API calls and reports their lifecycle as actions.
#[derive(Clone)]
pub struct Dispatcher {
    client: Arc<dyn ApiClient>,
    tx: UnboundedSender<Action>,
    seq: Arc<AtomicU64>,
}

impl Dispatcher {
    pub fn new(client: Arc<dyn ApiClient>, tx: UnboundedSender<Action>) -> Self {
        Self {
            client,
            tx,
            seq: Arc::new(AtomicU64::new(0)),
        }
    }

    fn send(&self, action: Action) {
        // The receiver only closes on shutdown; a completion arriving after
        // that has nowhere to go and is safely discarded.
        let _ = self.tx.send(action);
    }

    /// Issues a full re-read of one collection.
    pub fn load(&self, collection: Collection) {
        let seq = self.seq.fetch_add(1, Ordering::Relaxed) + 1;
        self.send(Action::LoadStarted(collection, seq));

        let client = Arc::clone(&self.client);
        let dispatcher = self.clone();
        tokio::spawn(async move {
            let action = fetch_collection(&*client, collection, seq).await;
            dispatcher.send(action);
        });
    }

    /// Issues every collection visible to the current role.
    pub fn load_all(&self, collections: &[Collection]) {
        for collection in collections {
            self.load(*collection);
        }
    }

    /// Runs one mutation: busy flag on, one outstanding call, terminal
    /// action in every outcome, refetch on success.
    pub fn mutate(&self, mutation: Mutation) {
        let collection = mutation.collection();
        self.send(Action::MutationStarted(collection));

        let client = Arc::clone(&self.client);
        let dispatcher = self.clone();
        tokio::spawn(async move {
            let refetches = mutation.refetches();
            match run_mutation(&*client, mutation).await {
                Ok(bulk_count) => {
                    dispatcher.send(Action::MutationSucceeded(collection));
                    if let Some(count) = bulk_count {
                        dispatcher.send(Action::BulkCompleted { collection, count });
                    }
                    for refetch in refetches {
                        dispatcher.load(refetch);
                    }
                }
                Err(error) => {
                    dispatcher.send(Action::MutationFailed { collection, error });
                }
            }
        });
    }
}

async fn fetch_collection(client: &dyn ApiClient, collection: Collection, seq: u64) -> Action {
    match collection {
        Collection::Users => match client.fetch_users().await {
            Ok(records) => Action::UsersLoaded { seq, records },
            Err(error) => Action::LoadFailed { collection, seq, error },
        },
        Collection::Students => match client.fetch_students().await {
            Ok(records) => Action::StudentsLoaded { seq, records },
            Err(error) => Action::LoadFailed { collection, seq, error },
        },
        Collection::Advisors => match client.fetch_advisors().await {
            Ok(records) => Action::AdvisorsLoaded { seq, records },
            Err(error) => Action::LoadFailed { collection, seq, error },
        },
        Collection::Notifications => match client.fetch_notifications().await {
            Ok(records) => Action::NotificationsLoaded { seq, records },
            Err(error) => Action::LoadFailed { collection, seq, error },
        },
        Collection::Interventions => match client.fetch_interventions().await {
            Ok(records) => Action::InterventionsLoaded { seq, records },
            Err(error) => Action::LoadFailed { collection, seq, error },
        },
        Collection::Meetings => match client.fetch_meetings().await {
            Ok(records) => Action::MeetingsLoaded { seq, records },
            Err(error) => Action::LoadFailed { collection, seq, error },
        },
    }
}

/// Executes one mutation; `Ok(Some(n))` is a bulk acted-upon count.
async fn run_mutation(client: &dyn ApiClient, mutation: Mutation) -> ApiResult<Option<usize>> {
    match mutation {
        Mutation::CreateUser(payload) => client.create_user(payload).await.map(|_| None),
        Mutation::UpdateUser(id, patch) => client.update_user(id, patch).await.map(|_| None),
        Mutation::DeleteUser(id) => client.delete_user(id).await.map(|_| None),
        Mutation::CreateStudent(payload) => client.create_student(payload).await.map(|_| None),
        Mutation::UpdateStudent(id, patch) => client.update_student(id, patch).await.map(|_| None),
        Mutation::DeleteStudent(id) => client.delete_student(id).await.map(|_| None),
        Mutation::CreateAdvisor(payload) => client.create_advisor(payload).await.map(|_| None),
        Mutation::UpdateAdvisor(id, patch) => client.update_advisor(id, patch).await.map(|_| None),
        Mutation::DeleteAdvisor(id) => client.delete_advisor(id).await.map(|_| None),
        Mutation::DeleteNotification(id) => client.delete_notification(id).await.map(|_| None),
        Mutation::MarkNotificationsRead(ids) => {
            client.mark_notifications_read(&ids).await.map(Some)
        }
        Mutation::CreateIntervention(payload) => {
            client.create_intervention(payload).await.map(|_| None)
        }
        Mutation::UpdateIntervention(id, patch) => {
            client.update_intervention(id, patch).await.map(|_| None)
        }
        Mutation::DeleteIntervention(id) => client.delete_intervention(id).await.map(|_| None),
        Mutation::CreateMeeting(payload) => client.create_meeting(payload).await.map(|_| None),
        Mutation::UpdateMeeting(id, patch) => client.update_meeting(id, patch).await.map(|_| None),
        Mutation::DeleteMeeting(id) => client.delete_meeting(id).await.map(|_| None),
        Mutation::AssignAdvisor { student_ids, advisor_id } => client
            .assign_advisor(&student_ids, advisor_id)
            .await
            .map(Some),
    }
}
