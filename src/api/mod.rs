//! REST client for the task API.
//!
//! Six endpoints, all JSON: two auth (`/api/auth/login`, `/api/auth/register`)
//! and four task CRUD (`/api/tasks`). Authenticated calls send the stored
//! token in the `x-auth-token` header. Calls are issued one at a time with no
//! retry, no cancellation, and no de-duplication — a failed call surfaces a
//! message and the user retries manually.

pub mod error;

pub use error::{ApiError, ApiResult};

use serde::{Deserialize, Serialize};
use serde_json::json;
use std::fmt;
use std::str::FromStr;

use crate::session::User;

const AUTH_HEADER: &str = "x-auth-token";

// ─── Wire types ───────────────────────────────────────────────────────────────

/// Status column a task lives in.
///
/// The server may hand back values outside the three known ones; those
/// deserialize into `Other` instead of failing the whole list fetch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    Pending,
    InProgress,
    Completed,
    #[serde(untagged)]
    Other(String),
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskStatus::Pending => f.write_str("pending"),
            TaskStatus::InProgress => f.write_str("in-progress"),
            TaskStatus::Completed => f.write_str("completed"),
            TaskStatus::Other(s) => f.write_str(s),
        }
    }
}

impl FromStr for TaskStatus {
    type Err = String;

    /// Only the three recognized values parse — CLI input never produces
    /// an `Other` status.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(TaskStatus::Pending),
            "in-progress" => Ok(TaskStatus::InProgress),
            "completed" => Ok(TaskStatus::Completed),
            other => Err(format!(
                "unknown status '{other}' (expected pending, in-progress or completed)"
            )),
        }
    }
}

/// A unit of work as the server stores it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub status: TaskStatus,
}

/// Response to both login and register.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: User,
    #[serde(default)]
    pub message: String,
}

/// Server error bodies carry a `{message}` field.
#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

// ─── Client ───────────────────────────────────────────────────────────────────

pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: &str) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(10))
            .build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_owned(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    pub async fn login(&self, email: &str, password: &str) -> ApiResult<AuthResponse> {
        let resp = self
            .http
            .post(self.url("/api/auth/login"))
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await?;
        Ok(check(resp).await?.json().await?)
    }

    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> ApiResult<AuthResponse> {
        let resp = self
            .http
            .post(self.url("/api/auth/register"))
            .json(&json!({ "name": name, "email": email, "password": password }))
            .send()
            .await?;
        Ok(check(resp).await?.json().await?)
    }

    pub async fn list_tasks(&self, token: &str) -> ApiResult<Vec<Task>> {
        let resp = self
            .http
            .get(self.url("/api/tasks"))
            .header(AUTH_HEADER, token)
            .send()
            .await?;
        Ok(check(resp).await?.json().await?)
    }

    pub async fn create_task(
        &self,
        token: &str,
        title: &str,
        description: &str,
        status: &TaskStatus,
    ) -> ApiResult<Task> {
        let resp = self
            .http
            .post(self.url("/api/tasks"))
            .header(AUTH_HEADER, token)
            .json(&json!({
                "title": title,
                "description": description,
                "status": status,
            }))
            .send()
            .await?;
        Ok(check(resp).await?.json().await?)
    }

    /// PUT the full record — the server rewrites the task wholesale.
    pub async fn update_task(&self, token: &str, task: &Task) -> ApiResult<Task> {
        let resp = self
            .http
            .put(self.url(&format!("/api/tasks/{}", task.id)))
            .header(AUTH_HEADER, token)
            .json(task)
            .send()
            .await?;
        Ok(check(resp).await?.json().await?)
    }

    pub async fn delete_task(&self, token: &str, id: &str) -> ApiResult<()> {
        let resp = self
            .http
            .delete(self.url(&format!("/api/tasks/{id}")))
            .header(AUTH_HEADER, token)
            .send()
            .await?;
        check(resp).await?;
        Ok(())
    }
}

/// Turn a non-2xx response into `ApiError::Server`, extracting the server's
/// `{message}` body when there is one.
async fn check(resp: reqwest::Response) -> ApiResult<reqwest::Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let message = resp
        .text()
        .await
        .ok()
        .and_then(|body| extract_message(&body));
    Err(ApiError::Server { status, message })
}

fn extract_message(body: &str) -> Option<String> {
    serde_json::from_str::<ErrorBody>(body).ok().map(|b| b.message)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_serializes_to_wire_strings() {
        assert_eq!(
            serde_json::to_string(&TaskStatus::InProgress).unwrap(),
            "\"in-progress\""
        );
        assert_eq!(
            serde_json::to_string(&TaskStatus::Pending).unwrap(),
            "\"pending\""
        );
    }

    #[test]
    fn unknown_status_deserializes_to_other() {
        let status: TaskStatus = serde_json::from_str("\"archived\"").unwrap();
        assert_eq!(status, TaskStatus::Other("archived".to_string()));
    }

    #[test]
    fn task_uses_server_id_field() {
        let task: Task = serde_json::from_str(
            r#"{"_id":"64b1","title":"Buy milk","description":"d","status":"pending"}"#,
        )
        .unwrap();
        assert_eq!(task.id, "64b1");
        assert_eq!(task.status, TaskStatus::Pending);

        // Round-trips back under the server's field name.
        let json = serde_json::to_value(&task).unwrap();
        assert_eq!(json["_id"], "64b1");
    }

    #[test]
    fn missing_description_defaults_to_empty() {
        let task: Task =
            serde_json::from_str(r#"{"_id":"1","title":"t","status":"completed"}"#).unwrap();
        assert_eq!(task.description, "");
    }

    #[test]
    fn cli_status_parsing_rejects_unknown_values() {
        assert_eq!("in-progress".parse::<TaskStatus>(), Ok(TaskStatus::InProgress));
        assert!("urgent".parse::<TaskStatus>().is_err());
    }

    #[test]
    fn error_body_message_is_extracted() {
        assert_eq!(
            extract_message(r#"{"message":"No token, authorization denied"}"#),
            Some("No token, authorization denied".to_string())
        );
        assert_eq!(extract_message("<html>502</html>"), None);
    }
}
