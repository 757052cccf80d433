//! Error types for task list operations.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TaskListError {
    /// Task name was empty or whitespace only.
    #[error("Please enter the task name.")]
    Validation,

    #[error("invalid filter '{0}' (expected one of: All, Completed, Not Completed)")]
    InvalidFilter(String),

    #[error("invalid status '{0}' (expected Completed or Not Completed)")]
    InvalidStatus(String),

    /// Index-based operation outside `0..len`.
    #[error("task index {index} out of range (list has {len} tasks)")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("no task is being edited")]
    NoActiveEdit,
}

pub type Result<T> = std::result::Result<T, TaskListError>;
