//! Background work-queue interface.
//!
//! Gateway submissions block through the whole retry schedule, so they
//! belong off the request path. When no queue transport is configured the
//! caller runs the submission inline instead; the result contract is
//! identical either way.

use serde::Serialize;
use thiserror::Error;

/// Errors from the queue collaborator.
#[derive(Debug, Error)]
pub enum QueueError {
    /// The queue transport failed.
    #[error("Work queue operation failed: {0}")]
    Backend(String),
}

/// Handle to an enqueued job.
#[derive(Debug, Clone, Serialize)]
pub struct JobHandle {
    /// Transport-assigned job identifier.
    pub id: String,
    /// Queue the job was placed on.
    pub queue: String,
}

/// Work-queue collaborator.
pub trait WorkQueue: Send + Sync {
    /// Enqueues a task by name with JSON arguments.
    fn enqueue(
        &self,
        task_name: &str,
        args: serde_json::Value,
    ) -> impl std::future::Future<Output = Result<JobHandle, QueueError>> + Send;
}
