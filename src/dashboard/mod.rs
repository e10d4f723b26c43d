//! Protected dashboard operations.
//!
//! The client never holds an authoritative task list: every mutation goes
//! straight to the API and the full list is re-fetched afterward, so the
//! only invariant is "the displayed board equals the server's list as of
//! the last fetch". No optimistic updates, no local cache.

use thiserror::Error;
use tracing::error;

use crate::api::{ApiClient, ApiError, Task, TaskStatus};
use crate::session::SessionStore;

/// Description stamped on tasks created from the dashboard input.
pub const DEFAULT_DESCRIPTION: &str = "New task created from Dashboard";

pub const CREATED_NOTICE: &str = "Task created successfully!";
pub const DELETED_NOTICE: &str = "Task deleted successfully!";
pub const CONFIRM_DELETE: &str = "Are you sure you want to delete this task?";

const CREATE_FALLBACK: &str = "Error creating task";
const DELETE_FALLBACK: &str = "Error deleting task";
const UPDATE_FALLBACK: &str = "Error updating task";

#[derive(Debug, Error)]
pub enum DashboardError {
    /// Local validation — no network call was made.
    #[error("Please enter a task title")]
    EmptyTitle,

    #[error("no task matches id '{0}'")]
    UnknownTask(String),

    #[error("id '{0}' is ambiguous — use more characters")]
    AmbiguousId(String),

    /// Mutation rejected; the string is the server's message or a generic
    /// fallback, ready for display.
    #[error("{0}")]
    Mutation(String),
}

/// The dashboard screen: a session store to read the token from and the API
/// client mutations go through.
pub struct DashboardScreen<'a> {
    session: &'a SessionStore,
    api: &'a ApiClient,
}

impl<'a> DashboardScreen<'a> {
    pub fn new(session: &'a SessionStore, api: &'a ApiClient) -> Self {
        Self { session, api }
    }

    /// The stored token is read at call time, like every authenticated call
    /// the original client made. The guard has already ensured presence.
    fn token(&self) -> String {
        self.session.token().unwrap_or_default()
    }

    /// Fetch the full task list. Failures are logged and yield an empty
    /// list — the dashboard shows no error for a failed fetch.
    pub async fn fetch_tasks(&self) -> Vec<Task> {
        match self.api.list_tasks(&self.token()).await {
            Ok(tasks) => tasks,
            Err(e) => {
                error!("error fetching tasks: {e}");
                Vec::new()
            }
        }
    }

    /// Create a task in the given column, then re-fetch.
    ///
    /// An empty or whitespace-only title is rejected locally before any
    /// network call.
    pub async fn create(
        &self,
        title: &str,
        status: TaskStatus,
    ) -> Result<Vec<Task>, DashboardError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(DashboardError::EmptyTitle);
        }
        self.api
            .create_task(&self.token(), title, DEFAULT_DESCRIPTION, &status)
            .await
            .map_err(|e| mutation(e, CREATE_FALLBACK))?;
        Ok(self.fetch_tasks().await)
    }

    /// Delete by id (exact or unique prefix), then re-fetch. Confirmation
    /// is the caller's job.
    pub async fn delete(&self, id: &str) -> Result<Vec<Task>, DashboardError> {
        let tasks = self.fetch_tasks().await;
        let task = resolve_task(&tasks, id)?;
        self.api
            .delete_task(&self.token(), &task.id)
            .await
            .map_err(|e| mutation(e, DELETE_FALLBACK))?;
        Ok(self.fetch_tasks().await)
    }

    /// Move a task to another column: PUT the full record with only the
    /// status replaced, then re-fetch.
    pub async fn move_task(
        &self,
        id: &str,
        new_status: TaskStatus,
    ) -> Result<Vec<Task>, DashboardError> {
        let tasks = self.fetch_tasks().await;
        let mut task = resolve_task(&tasks, id)?.clone();
        task.status = new_status;
        self.api
            .update_task(&self.token(), &task)
            .await
            .map_err(|e| mutation(e, UPDATE_FALLBACK))?;
        Ok(self.fetch_tasks().await)
    }
}

fn mutation(e: ApiError, fallback: &str) -> DashboardError {
    DashboardError::Mutation(e.message_or(fallback).to_string())
}

/// Resolve a user-supplied id against the current list: exact match first,
/// then a unique prefix.
fn resolve_task<'t>(tasks: &'t [Task], id: &str) -> Result<&'t Task, DashboardError> {
    if let Some(task) = tasks.iter().find(|t| t.id == id) {
        return Ok(task);
    }
    let mut matches = tasks.iter().filter(|t| t.id.starts_with(id));
    match (matches.next(), matches.next()) {
        (Some(task), None) => Ok(task),
        (Some(_), Some(_)) => Err(DashboardError::AmbiguousId(id.to_string())),
        (None, _) => Err(DashboardError::UnknownTask(id.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn task(id: &str) -> Task {
        Task {
            id: id.to_string(),
            title: "t".to_string(),
            description: String::new(),
            status: TaskStatus::Pending,
        }
    }

    #[test]
    fn exact_id_wins_over_prefix() {
        let tasks = vec![task("abc"), task("abcdef")];
        assert_eq!(resolve_task(&tasks, "abc").unwrap().id, "abc");
    }

    #[test]
    fn unique_prefix_resolves() {
        let tasks = vec![task("64b1f2aa"), task("99c0d3bb")];
        assert_eq!(resolve_task(&tasks, "64b1").unwrap().id, "64b1f2aa");
    }

    #[test]
    fn ambiguous_prefix_is_an_error() {
        let tasks = vec![task("64b1f2aa"), task("64b1f2bb")];
        assert!(matches!(
            resolve_task(&tasks, "64b1"),
            Err(DashboardError::AmbiguousId(_))
        ));
    }

    #[test]
    fn unknown_id_is_an_error() {
        let tasks = vec![task("64b1f2aa")];
        assert!(matches!(
            resolve_task(&tasks, "zzz"),
            Err(DashboardError::UnknownTask(_))
        ));
    }

    #[tokio::test]
    async fn empty_title_fails_before_any_network_call() {
        // The API client points at a closed port; reaching the network
        // would fail differently (and slowly).
        let dir = TempDir::new().unwrap();
        let session = SessionStore::new(dir.path());
        let api = ApiClient::new("http://127.0.0.1:1").unwrap();
        let screen = DashboardScreen::new(&session, &api);

        let err = screen.create("   ", TaskStatus::Pending).await.unwrap_err();
        assert!(matches!(err, DashboardError::EmptyTitle));
        assert_eq!(err.to_string(), "Please enter a task title");
    }
}
