//! Remote task state, read from `Task/{id}/info`.

use crate::core::domain::model::managed_object::ManagedObjectReference;
use serde::{Deserialize, Serialize};

/// Lifecycle state of a remote task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskState {
    Queued,
    Running,
    Success,
    Error,
}

impl TaskState {
    /// `true` once the task will not change state anymore.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, TaskState::Success | TaskState::Error)
    }
}

/// The subset of `TaskInfo` needed to follow a task to completion.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskInfo {
    /// Task identifier (same as the task reference value).
    pub key: String,
    pub state: TaskState,
    /// Method result; for `CreateVM_Task` the reference of the new VM.
    #[serde(default)]
    pub result: Option<serde_json::Value>,
    /// Fault reported by a failed task.
    #[serde(default)]
    pub error: Option<MethodFault>,
    /// Completion percentage while running.
    #[serde(default)]
    pub progress: Option<u8>,
}

impl TaskInfo {
    /// Interprets the task result as a managed object reference.
    #[must_use]
    pub fn result_reference(&self) -> Option<ManagedObjectReference> {
        self.result
            .clone()
            .and_then(|value| serde_json::from_value(value).ok())
    }

    /// Human-readable reason of a failed task.
    #[must_use]
    pub fn error_message(&self) -> String {
        self.error
            .as_ref()
            .and_then(|fault| fault.localized_message.clone())
            .unwrap_or_else(|| "task failed without a fault message".to_string())
    }
}

/// A fault as carried by `TaskInfo.error`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MethodFault {
    #[serde(default)]
    pub localized_message: Option<String>,
    #[serde(default)]
    pub fault: Option<serde_json::Value>,
}
