//! Asana task-creation client.
//!
//! One endpoint, one verb: `POST /api/1.0/tasks`. Routing ids are fixed
//! at construction so every created task lands in the same workspace,
//! assigned to the same user, filed under the same project.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use serde::Serialize;
use tracing::debug;

use crate::gateway::TaskSink;
use crate::models::task::TaskDraft;
use crate::{AppError, Result};

const TASKS_URL: &str = "https://app.asana.com/api/1.0/tasks";

/// Fixed task-routing configuration.
#[derive(Debug, Clone)]
pub struct TaskTarget {
    /// Workspace gid every task is created in.
    pub workspace: String,
    /// Assignee gid for every created task.
    pub assignee: String,
    /// Project gid every task is filed under.
    pub project: String,
}

#[derive(Debug, Serialize)]
struct CreateTaskRequest<'a> {
    data: CreateTaskData<'a>,
}

#[derive(Debug, Serialize)]
struct CreateTaskData<'a> {
    name: &'a str,
    html_notes: &'a str,
    workspace: &'a str,
    assignee: &'a str,
    projects: [&'a str; 1],
}

/// Task sink bound to a fixed [`TaskTarget`].
pub struct AsanaClient {
    http: reqwest::Client,
    token: String,
    target: TaskTarget,
}

impl AsanaClient {
    /// Build a client with a bounded per-request timeout.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Transport` if the HTTP client cannot be built.
    pub fn new(token: String, target: TaskTarget, request_timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(request_timeout)
            .build()
            .map_err(|err| AppError::Transport(format!("failed to build http client: {err}")))?;
        Ok(Self {
            http,
            token,
            target,
        })
    }
}

impl TaskSink for AsanaClient {
    fn create_task(&self, task: &TaskDraft) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        let task = task.clone();
        Box::pin(async move {
            let body = CreateTaskRequest {
                data: CreateTaskData {
                    name: &task.title,
                    html_notes: &task.notes,
                    workspace: &self.target.workspace,
                    assignee: &self.target.assignee,
                    projects: [self.target.project.as_str()],
                },
            };

            let response = self
                .http
                .post(TASKS_URL)
                .bearer_auth(&self.token)
                .json(&body)
                .send()
                .await?;

            let status = response.status();
            if status != reqwest::StatusCode::CREATED {
                let detail = response.text().await.unwrap_or_default();
                return Err(AppError::Protocol(format!(
                    "task create rejected: {status}: {detail}"
                )));
            }

            debug!(title = %task.title, "task created in sink");
            Ok(())
        })
    }
}
