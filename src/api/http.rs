//! JSON-over-HTTP implementation of [`ApiClient`].
//!
//! A deliberately thin wrapper: one outstanding request per call, no
//! retries, no request-level deduplication. Auth is a static bearer token
//! from configuration; token refresh lives behind the backend's gateway.
//! Error mapping follows the dashboard taxonomy - a non-success status
//! becomes `Remote` with the server's message verbatim, a request that never
//! reached the server becomes `Transport` with the generic fallback copy.

use super::payload::{
    CreateAdvisor, CreateIntervention, CreateMeeting, CreateStudent, CreateUser, UpdateAdvisor,
    UpdateIntervention, UpdateMeeting, UpdateStudent, UpdateUser,
};
use super::wire::{
    AdvisorWire, CountWire, InterventionWire, MeetingWire, NotificationWire, ServerMessage,
    StudentWire, UserWire,
};
use super::{ApiClient, ApiResult};
use crate::config::ApiConfig;
use crate::core::{Advisor, EntityId, Intervention, Meeting, Notification, Student, User};
use crate::riskboard_error::RiskboardError;
use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::json;
use std::time::Duration;

pub struct HttpApi {
    base_url: String,
    http: Client,
    token: Option<String>,
}

impl HttpApi {
    pub fn new(config: &ApiConfig) -> Result<Self, RiskboardError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|err| RiskboardError::config(format!("could not build HTTP client: {err}")))?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            http,
            token: config.token.clone(),
        })
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self.http.request(method, format!("{}{path}", self.base_url));
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Sends a request and applies the error taxonomy to the outcome.
    async fn send(&self, builder: RequestBuilder) -> ApiResult<Response> {
        let response = builder.send().await.map_err(|err| {
            log::warn!("transport failure: {err}");
            RiskboardError::transport_fallback()
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let code = status.as_u16();
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ServerMessage>(&body)
            .ok()
            .and_then(|parsed| parsed.message)
            .unwrap_or_else(|| format!("The server rejected the request (status {code})"));
        Err(RiskboardError::remote(code, message))
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> ApiResult<T> {
        response
            .json::<T>()
            .await
            .map_err(|err| RiskboardError::decode(err.to_string()))
    }

    async fn fetch_list<W, T>(&self, path: &str) -> ApiResult<Vec<T>>
    where
        W: DeserializeOwned,
        T: From<W>,
    {
        let response = self.send(self.request(Method::GET, path)).await?;
        let wires: Vec<W> = Self::decode(response).await?;
        Ok(wires.into_iter().map(T::from).collect())
    }

    async fn send_json<W, T, B>(&self, method: Method, path: &str, body: &B) -> ApiResult<T>
    where
        W: DeserializeOwned,
        T: From<W>,
        B: Serialize + Sync,
    {
        let response = self.send(self.request(method, path).json(body)).await?;
        let wire: W = Self::decode(response).await?;
        Ok(wire.into())
    }

    async fn delete(&self, path: &str) -> ApiResult<()> {
        self.send(self.request(Method::DELETE, path)).await?;
        Ok(())
    }

    async fn bulk<B: Serialize + Sync>(&self, path: &str, body: &B) -> ApiResult<usize> {
        let response = self.send(self.request(Method::POST, path).json(body)).await?;
        let wire: CountWire = Self::decode(response).await?;
        Ok(wire.count)
    }
}

#[async_trait]
impl ApiClient for HttpApi {
    async fn fetch_users(&self) -> ApiResult<Vec<User>> {
        self.fetch_list::<UserWire, User>("/users").await
    }

    async fn create_user(&self, payload: CreateUser) -> ApiResult<User> {
        self.send_json::<UserWire, User, _>(Method::POST, "/users", &payload)
            .await
    }

    async fn update_user(&self, id: EntityId, patch: UpdateUser) -> ApiResult<User> {
        self.send_json::<UserWire, User, _>(Method::PATCH, &format!("/users/{id}"), &patch)
            .await
    }

    async fn delete_user(&self, id: EntityId) -> ApiResult<()> {
        self.delete(&format!("/users/{id}")).await
    }

    async fn fetch_students(&self) -> ApiResult<Vec<Student>> {
        self.fetch_list::<StudentWire, Student>("/students").await
    }

    async fn create_student(&self, payload: CreateStudent) -> ApiResult<Student> {
        self.send_json::<StudentWire, Student, _>(Method::POST, "/students", &payload)
            .await
    }

    async fn update_student(&self, id: EntityId, patch: UpdateStudent) -> ApiResult<Student> {
        self.send_json::<StudentWire, Student, _>(Method::PATCH, &format!("/students/{id}"), &patch)
            .await
    }

    async fn delete_student(&self, id: EntityId) -> ApiResult<()> {
        self.delete(&format!("/students/{id}")).await
    }

    async fn fetch_advisors(&self) -> ApiResult<Vec<Advisor>> {
        self.fetch_list::<AdvisorWire, Advisor>("/advisors").await
    }

    async fn create_advisor(&self, payload: CreateAdvisor) -> ApiResult<Advisor> {
        self.send_json::<AdvisorWire, Advisor, _>(Method::POST, "/advisors", &payload)
            .await
    }

    async fn update_advisor(&self, id: EntityId, patch: UpdateAdvisor) -> ApiResult<Advisor> {
        self.send_json::<AdvisorWire, Advisor, _>(Method::PATCH, &format!("/advisors/{id}"), &patch)
            .await
    }

    async fn delete_advisor(&self, id: EntityId) -> ApiResult<()> {
        self.delete(&format!("/advisors/{id}")).await
    }

    async fn fetch_notifications(&self) -> ApiResult<Vec<Notification>> {
        self.fetch_list::<NotificationWire, Notification>("/notifications")
            .await
    }

    async fn delete_notification(&self, id: EntityId) -> ApiResult<()> {
        self.delete(&format!("/notifications/{id}")).await
    }

    async fn mark_notifications_read(&self, ids: &[EntityId]) -> ApiResult<usize> {
        self.bulk("/notifications/mark-read", &json!({ "ids": ids }))
            .await
    }

    async fn fetch_interventions(&self) -> ApiResult<Vec<Intervention>> {
        self.fetch_list::<InterventionWire, Intervention>("/interventions")
            .await
    }

    async fn create_intervention(&self, payload: CreateIntervention) -> ApiResult<Intervention> {
        self.send_json::<InterventionWire, Intervention, _>(Method::POST, "/interventions", &payload)
            .await
    }

    async fn update_intervention(
        &self,
        id: EntityId,
        patch: UpdateIntervention,
    ) -> ApiResult<Intervention> {
        self.send_json::<InterventionWire, Intervention, _>(
            Method::PATCH,
            &format!("/interventions/{id}"),
            &patch,
        )
        .await
    }

    async fn delete_intervention(&self, id: EntityId) -> ApiResult<()> {
        self.delete(&format!("/interventions/{id}")).await
    }

    async fn fetch_meetings(&self) -> ApiResult<Vec<Meeting>> {
        self.fetch_list::<MeetingWire, Meeting>("/meetings").await
    }

    async fn create_meeting(&self, payload: CreateMeeting) -> ApiResult<Meeting> {
        self.send_json::<MeetingWire, Meeting, _>(Method::POST, "/meetings", &payload)
            .await
    }

    async fn update_meeting(&self, id: EntityId, patch: UpdateMeeting) -> ApiResult<Meeting> {
        self.send_json::<MeetingWire, Meeting, _>(Method::PATCH, &format!("/meetings/{id}"), &patch)
            .await
    }

    async fn delete_meeting(&self, id: EntityId) -> ApiResult<()> {
        self.delete(&format!("/meetings/{id}")).await
    }

    async fn assign_advisor(
        &self,
        student_ids: &[EntityId],
        advisor_id: EntityId,
    ) -> ApiResult<usize> {
        self.bulk(
            "/students/assign-advisor",
            &json!({ "student_ids": student_ids, "advisor_id": advisor_id }),
        )
        .await
    }
}
