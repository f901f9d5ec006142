//! HTTP record store backed by the club's REST API.

use crate::error::{AppError, Result};
use crate::session::Session;
use chrono::{DateTime, Utc};
use reqwest::{Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use swimtime_engine::{RecordStore, Style, Swimmer, TimeRecord, TimeSubmission};

/// Role the backend assigns to swimmer accounts.
const SWIMMER_ROLE: &str = "swimmer";

/// A user row as returned by `GET /api/users`.
#[derive(Debug, Deserialize)]
struct UserRow {
    id: String,
    name: String,
    #[serde(default)]
    role: String,
}

/// Create/update body in the backend's own field names.
#[derive(Debug, Serialize)]
struct WireSubmission<'a> {
    swimmer_id: &'a str,
    distance: u32,
    style: Style,
    time_seconds: f64,
    date: DateTime<Utc>,
    competition: Option<&'a str>,
    oficial: bool,
}

impl<'a> From<&'a TimeSubmission> for WireSubmission<'a> {
    fn from(submission: &'a TimeSubmission) -> Self {
        Self {
            swimmer_id: &submission.swimmer_id,
            distance: submission.distance.meters(),
            style: submission.style,
            time_seconds: submission.time_seconds,
            date: submission.date,
            competition: submission.competition.as_deref(),
            oficial: submission.is_official,
        }
    }
}

/// Error body returned by the backend on failure.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: Option<serde_json::Value>,
}

/// Record store talking to `{base_url}/api`.
#[derive(Debug, Clone)]
pub struct ApiStore {
    http: reqwest::Client,
    base_url: String,
    session: Session,
}

impl ApiStore {
    pub fn new(base_url: impl Into<String>, session: Session, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            session,
        })
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}/api{}", self.base_url, path);
        let builder = self.http.request(method, url);
        match self.session.token() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send_json<T: DeserializeOwned>(builder: RequestBuilder) -> Result<T> {
        let response = Self::check(builder.send().await?).await?;
        Ok(response.json().await?)
    }

    /// Turn a non-2xx response into [`AppError::Api`].
    async fn check(response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let detail = match response.json::<ErrorBody>().await {
            Ok(ErrorBody {
                detail: Some(serde_json::Value::String(text)),
            }) => text,
            Ok(ErrorBody {
                detail: Some(other),
            }) => other.to_string(),
            _ => status
                .canonical_reason()
                .unwrap_or("unknown error")
                .to_string(),
        };

        tracing::warn!(status = status.as_u16(), %detail, "backend rejected request");
        Err(AppError::Api {
            status: status.as_u16(),
            detail,
        })
    }

    /// Swimmer accounts known to the backend.
    pub async fn swimmers(&self) -> Result<Vec<Swimmer>> {
        let users: Vec<UserRow> = Self::send_json(self.request(Method::GET, "/users")).await?;
        Ok(users
            .into_iter()
            .filter(|u| u.role == SWIMMER_ROLE)
            .map(|u| Swimmer::new(u.id, u.name))
            .collect())
    }
}

impl RecordStore for ApiStore {
    type Error = AppError;

    async fn list(&self) -> Result<Vec<TimeRecord>> {
        let records: Vec<TimeRecord> = Self::send_json(self.request(Method::GET, "/times")).await?;
        tracing::debug!(count = records.len(), "fetched time records");
        Ok(records)
    }

    async fn create(&self, submission: TimeSubmission) -> Result<TimeRecord> {
        let body = WireSubmission::from(&submission);
        Self::send_json(self.request(Method::POST, "/times").json(&body)).await
    }

    async fn update(&self, id: &str, submission: TimeSubmission) -> Result<TimeRecord> {
        let path = format!("/times/{id}");
        let body = WireSubmission::from(&submission);
        Self::send_json(self.request(Method::PUT, &path).json(&body)).await
    }

    async fn delete(&self, id: &str) -> Result<()> {
        let path = format!("/times/{id}");
        Self::check(self.request(Method::DELETE, &path).send().await?).await?;
        Ok(())
    }
}
