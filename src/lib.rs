//! In-memory task list: a controller owning tasks, a single edit buffer and
//! a status filter, plus the terminal UI and script runner that drive it.

pub mod cli;
pub mod config;
pub mod controller;
pub mod editor;
pub mod error;
pub mod logging;
pub mod models;
pub mod script;
pub mod ui;

pub use controller::TaskListController;
pub use error::{Result, TaskListError};
pub use models::{Change, StatusFilter, Task, TaskId, TaskStatus};
