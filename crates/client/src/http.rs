//! reqwest-backed implementation of [`SchedulingService`].
//!
//! Every request carries the session's bearer token and an `X-Request-Id`.
//! Responses may be bare JSON or wrapped as `{"data": ...}`; error bodies
//! contribute their `message` field. List rows that fail validation are
//! logged and skipped so one bad record cannot hide the rest.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use eyre::{Result, eyre};
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use timetable_core::models::{
    EntryDraft, EntryId, Scope, SlotId, Teacher, TimeSlot, TimetableEntry,
};
use timetable_core::{
    CredentialProvider, ScheduleError, ScheduleResult, SchedulingService, StaticCredentials,
};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::config::ClientConfig;

pub const REQUEST_ID_HEADER: &str = "X-Request-Id";

#[derive(Deserialize)]
#[serde(untagged)]
enum Envelope<T> {
    Wrapped { data: T },
    Bare(T),
}

impl<T> Envelope<T> {
    fn into_inner(self) -> T {
        match self {
            Envelope::Wrapped { data } => data,
            Envelope::Bare(data) => data,
        }
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// Body for slot create/update; the service keys slots by their interval.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SlotBody<'a> {
    start_time: String,
    end_time: String,
    label: &'a str,
}

impl<'a> From<&'a TimeSlot> for SlotBody<'a> {
    fn from(slot: &'a TimeSlot) -> Self {
        Self {
            start_time: slot.start_time.to_string(),
            end_time: slot.end_time.to_string(),
            label: &slot.label,
        }
    }
}

pub struct HttpSchedulingService {
    client: Client,
    base_url: String,
    credentials: Arc<dyn CredentialProvider>,
}

impl HttpSchedulingService {
    pub fn new(
        base_url: impl Into<String>,
        timeout: Duration,
        credentials: Arc<dyn CredentialProvider>,
    ) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            credentials,
        })
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        let credentials = Arc::new(StaticCredentials::new(config.api_token.clone()));
        Self::new(config.api_url.clone(), config.timeout(), credentials)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Builds an authenticated request; fails before any I/O without a token.
    fn request(&self, method: Method, path: &str) -> ScheduleResult<(RequestBuilder, String)> {
        let token = self
            .credentials
            .bearer_token()
            .ok_or(ScheduleError::AuthMissing)?;
        let request_id = Uuid::new_v4().to_string();
        let url = format!("{}{}", self.base_url, path);
        debug!(request_id = %request_id, "{} {}", method, url);

        let builder = self
            .client
            .request(method, url)
            .bearer_auth(token)
            .header(REQUEST_ID_HEADER, &request_id);
        Ok((builder, request_id))
    }

    async fn execute(&self, builder: RequestBuilder, request_id: &str) -> ScheduleResult<Response> {
        let response = builder.send().await.map_err(|err| {
            warn!(request_id = %request_id, "Scheduling service unreachable: {}", err);
            eyre::Report::from(err)
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        if status == StatusCode::UNAUTHORIZED {
            warn!(request_id = %request_id, "Credential rejected by scheduling service");
            return Err(ScheduleError::AuthMissing);
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&body)
            .ok()
            .and_then(|body| body.message)
            .filter(|message| !message.trim().is_empty())
            .unwrap_or_else(|| format!("Request failed with status {}", status.as_u16()));
        warn!(request_id = %request_id, status = status.as_u16(), "Request rejected: {}", message);
        Err(ScheduleError::RemoteRejection {
            status: status.as_u16(),
            message,
        })
    }

    async fn fetch<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
        request_id: &str,
    ) -> ScheduleResult<T> {
        let response = self.execute(builder, request_id).await?;
        let body = response.text().await.map_err(eyre::Report::from)?;
        let envelope: Envelope<T> = serde_json::from_str(&body)
            .map_err(|err| eyre!("Unexpected response from scheduling service: {}", err))?;
        Ok(envelope.into_inner())
    }

    async fn fetch_list<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
        request_id: &str,
    ) -> ScheduleResult<Vec<T>> {
        let rows: Vec<Value> = self.fetch(builder, request_id).await?;
        let total = rows.len();
        let items: Vec<T> = rows
            .into_iter()
            .filter_map(|row| match serde_json::from_value(row) {
                Ok(item) => Some(item),
                Err(err) => {
                    warn!(request_id = %request_id, "Skipping invalid record: {}", err);
                    None
                }
            })
            .collect();
        if items.len() < total {
            warn!(
                request_id = %request_id,
                "Skipped {} of {} records",
                total - items.len(),
                total
            );
        }
        Ok(items)
    }

    async fn fetch_empty(&self, builder: RequestBuilder, request_id: &str) -> ScheduleResult<()> {
        self.execute(builder, request_id).await?;
        Ok(())
    }
}

fn segment(id: &str) -> String {
    urlencoding::encode(id).into_owned()
}

#[async_trait]
impl SchedulingService for HttpSchedulingService {
    async fn time_slots(&self) -> ScheduleResult<Vec<TimeSlot>> {
        let (builder, request_id) = self.request(Method::GET, "/api/time-slots")?;
        self.fetch_list(builder, &request_id).await
    }

    async fn create_time_slot(&self, slot: &TimeSlot) -> ScheduleResult<TimeSlot> {
        let (builder, request_id) = self.request(Method::POST, "/api/time-slots")?;
        self.fetch(builder.json(&SlotBody::from(slot)), &request_id)
            .await
    }

    async fn update_time_slot(&self, id: &SlotId, slot: &TimeSlot) -> ScheduleResult<TimeSlot> {
        let path = format!("/api/time-slots/{}", segment(id.as_str()));
        let (builder, request_id) = self.request(Method::PUT, &path)?;
        self.fetch(builder.json(&SlotBody::from(slot)), &request_id)
            .await
    }

    async fn delete_time_slot(&self, id: &SlotId) -> ScheduleResult<()> {
        let path = format!("/api/time-slots/{}", segment(id.as_str()));
        let (builder, request_id) = self.request(Method::DELETE, &path)?;
        self.fetch_empty(builder, &request_id).await
    }

    async fn timetable(&self, scope: &Scope) -> ScheduleResult<Vec<TimetableEntry>> {
        let (builder, request_id) = self.request(Method::GET, "/api/timetable")?;
        let builder = builder.query(&[
            ("className", scope.class_name.as_str()),
            ("section", scope.section.as_str()),
        ]);
        self.fetch_list(builder, &request_id).await
    }

    async fn teachers_with_subjects(&self) -> ScheduleResult<Vec<Teacher>> {
        let (builder, request_id) = self.request(Method::GET, "/api/teachers/subjects")?;
        self.fetch_list(builder, &request_id).await
    }

    async fn create_entry(&self, draft: &EntryDraft) -> ScheduleResult<TimetableEntry> {
        let (builder, request_id) = self.request(Method::POST, "/api/timetable")?;
        self.fetch(builder.json(draft), &request_id).await
    }

    async fn update_entry(
        &self,
        id: &EntryId,
        draft: &EntryDraft,
    ) -> ScheduleResult<TimetableEntry> {
        let path = format!("/api/timetable/{}", segment(id.as_str()));
        let (builder, request_id) = self.request(Method::PUT, &path)?;
        self.fetch(builder.json(draft), &request_id).await
    }

    async fn delete_entry(&self, id: &EntryId) -> ScheduleResult<()> {
        let path = format!("/api/timetable/{}", segment(id.as_str()));
        let (builder, request_id) = self.request(Method::DELETE, &path)?;
        self.fetch_empty(builder, &request_id).await
    }
}
