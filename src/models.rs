use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Local};

use crate::error::TaskListError;

/// Stable identifier handed out by the controller. Never reused within a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(pub u64);

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Task {
    pub id: TaskId,
    pub name: String,
    pub description: String,
    pub completed: bool,
    pub created_at: DateTime<Local>,
}

impl Task {
    pub fn status(&self) -> TaskStatus {
        if self.completed {
            TaskStatus::Completed
        } else {
            TaskStatus::NotCompleted
        }
    }
}

/// Staging area for the single in-progress edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditBuffer {
    pub target_index: usize,
    pub staged_name: String,
    pub staged_description: String,
}

/// Pending input for a task that has not been added yet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Draft {
    pub name: String,
    pub description: String,
}

impl Draft {
    pub fn clear(&mut self) {
        self.name.clear();
        self.description.clear();
    }
}

// Labels match ignoring case and surrounding whitespace only.
fn normalize(s: &str) -> String {
    s.trim().to_lowercase()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Completed,
    NotCompleted,
}

impl StatusFilter {
    pub const ALL: [StatusFilter; 3] = [
        StatusFilter::All,
        StatusFilter::Completed,
        StatusFilter::NotCompleted,
    ];

    pub fn label(self) -> &'static str {
        match self {
            StatusFilter::All => "All",
            StatusFilter::Completed => "Completed",
            StatusFilter::NotCompleted => "Not Completed",
        }
    }

    pub fn matches(self, task: &Task) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Completed => task.completed,
            StatusFilter::NotCompleted => !task.completed,
        }
    }

    /// Next filter in display order, wrapping around.
    pub fn cycle(self) -> Self {
        match self {
            StatusFilter::All => StatusFilter::Completed,
            StatusFilter::Completed => StatusFilter::NotCompleted,
            StatusFilter::NotCompleted => StatusFilter::All,
        }
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for StatusFilter {
    type Err = TaskListError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "all" => Ok(StatusFilter::All),
            "completed" => Ok(StatusFilter::Completed),
            "not completed" => Ok(StatusFilter::NotCompleted),
            _ => Err(TaskListError::InvalidFilter(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskStatus {
    Completed,
    NotCompleted,
}

impl TaskStatus {
    pub fn label(self) -> &'static str {
        match self {
            TaskStatus::Completed => "Completed",
            TaskStatus::NotCompleted => "Not Completed",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for TaskStatus {
    type Err = TaskListError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "completed" => Ok(TaskStatus::Completed),
            "not completed" => Ok(TaskStatus::NotCompleted),
            _ => Err(TaskListError::InvalidStatus(s.to_string())),
        }
    }
}

/// Emitted to subscribers after every successful mutation.
#[derive(Debug, Clone, PartialEq)]
pub enum Change {
    Added { id: TaskId, index: usize },
    Edited { id: TaskId, index: usize },
    StatusChanged { id: TaskId, completed: bool },
    Deleted { id: TaskId, index: usize },
    EditStarted { index: usize },
    EditCancelled { index: usize },
    FilterChanged(StatusFilter),
}

/// Which text field an input popup is writing to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Name,
    Description,
}

impl Field {
    pub fn other(self) -> Self {
        match self {
            Field::Name => Field::Description,
            Field::Description => Field::Name,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum InputMode {
    Normal,
    Adding(Field),
    Editing(Field),
    FilterSelect,
    /// Blocking message; any key dismisses it.
    Notice(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_parses_labels_ignoring_case() {
        assert_eq!("All".parse::<StatusFilter>(), Ok(StatusFilter::All));
        assert_eq!("Completed".parse::<StatusFilter>(), Ok(StatusFilter::Completed));
        assert_eq!("Not Completed".parse::<StatusFilter>(), Ok(StatusFilter::NotCompleted));
        assert_eq!(" NOT COMPLETED ".parse::<StatusFilter>(), Ok(StatusFilter::NotCompleted));
        assert_eq!("completed".parse::<StatusFilter>(), Ok(StatusFilter::Completed));
    }

    #[test]
    fn test_filter_rejects_near_misses() {
        for text in ["notcompleted", "not-completed", "NOT_COMPLETED", "Com pleted", "Not  Completed"] {
            assert_eq!(
                text.parse::<StatusFilter>(),
                Err(TaskListError::InvalidFilter(text.to_string()))
            );
        }
        assert!("not_completed".parse::<TaskStatus>().is_err());
    }

    #[test]
    fn test_filter_rejects_unknown() {
        assert_eq!(
            "Pending".parse::<StatusFilter>(),
            Err(TaskListError::InvalidFilter("Pending".to_string()))
        );
        assert!("".parse::<StatusFilter>().is_err());
    }

    #[test]
    fn test_filter_label_round_trips() {
        for filter in StatusFilter::ALL {
            assert_eq!(filter.label().parse::<StatusFilter>(), Ok(filter));
        }
    }

    #[test]
    fn test_filter_cycle_visits_all() {
        let mut f = StatusFilter::All;
        f = f.cycle();
        assert_eq!(f, StatusFilter::Completed);
        f = f.cycle();
        assert_eq!(f, StatusFilter::NotCompleted);
        assert_eq!(f.cycle(), StatusFilter::All);
    }

    #[test]
    fn test_status_parse() {
        assert_eq!("completed".parse::<TaskStatus>(), Ok(TaskStatus::Completed));
        assert_eq!("Not Completed".parse::<TaskStatus>(), Ok(TaskStatus::NotCompleted));
        assert_eq!(
            "All".parse::<TaskStatus>(),
            Err(TaskListError::InvalidStatus("All".to_string()))
        );
    }

    #[test]
    fn test_draft_clear() {
        let mut draft = Draft {
            name: "a".into(),
            description: "b".into(),
        };
        draft.clear();
        assert_eq!(draft, Draft::default());
    }
}
