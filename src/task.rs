//! Structured background tasks for the GUI.
//!
//! A task runs one blocking job on tokio's blocking pool and always ends in
//! a `TaskReport`: succeeded, failed or timed out. A timed-out job is
//! abandoned, not cancelled; it keeps running until it returns on its own.

use serde::Serialize;
use std::time::{Duration, Instant};

/// How long a task may run before it is reported as timed out.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum TaskKind {
    SaveClipboard,
    RefreshCounter,
}

impl TaskKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::SaveClipboard => "Save clipboard",
            Self::RefreshCounter => "Refresh counter",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum TaskStatus {
    Succeeded,
    Failed,
    TimedOut,
}

/// Result of a finished task, sent to the frontend as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskReport {
    pub kind: TaskKind,
    pub status: TaskStatus,
    /// Human-readable output lines for the log pane.
    pub lines: Vec<String>,
    /// Counter value after the task, when known.
    pub image_id: Option<u64>,
    pub elapsed_ms: u64,
}

/// What a job hands back: its output lines and the counter afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobOutput {
    pub lines: Vec<String>,
    pub image_id: Option<u64>,
}

impl JobOutput {
    pub fn line(line: impl Into<String>, image_id: u64) -> Self {
        Self {
            lines: vec![line.into()],
            image_id: Some(image_id),
        }
    }
}

/// Run `job` on the blocking pool and wait at most `timeout` for it.
///
/// Must be called from inside a tokio runtime.
pub async fn run_blocking<F>(kind: TaskKind, timeout: Duration, job: F) -> TaskReport
where
    F: FnOnce() -> Result<JobOutput, String> + Send + 'static,
{
    let start = Instant::now();
    log::info!("[TASK] {} started", kind.label());

    let handle = tokio::task::spawn_blocking(job);
    let (status, lines, image_id) = match tokio::time::timeout(timeout, handle).await {
        Ok(Ok(Ok(output))) => (TaskStatus::Succeeded, output.lines, output.image_id),
        Ok(Ok(Err(e))) => (TaskStatus::Failed, vec![format!("ERROR: {}", e)], None),
        Ok(Err(join_error)) => (
            TaskStatus::Failed,
            vec![format!("ERROR: task crashed: {}", join_error)],
            None,
        ),
        Err(_) => (
            TaskStatus::TimedOut,
            vec![format!("ERROR: timed out after {}s", timeout.as_secs())],
            None,
        ),
    };

    let elapsed_ms = start.elapsed().as_millis() as u64;
    log::info!("[TASK] {} finished: {:?} in {}ms", kind.label(), status, elapsed_ms);

    TaskReport {
        kind,
        status,
        lines,
        image_id,
        elapsed_ms,
    }
}
