use std::fmt;

use chrono::Local;

use crate::error::{Result, TaskListError};
use crate::models::{Change, Draft, EditBuffer, StatusFilter, Task, TaskId, TaskStatus};

type Listener = Box<dyn FnMut(&Change)>;

/// Owns the task sequence, the single edit buffer and the active filter.
///
/// One instance per session; the presentation layer borrows it mutably and
/// reads back the derived view through [`TaskListController::visible_tasks`].
pub struct TaskListController {
    tasks: Vec<Task>,
    next_id: u64,
    edit: Option<EditBuffer>,
    draft: Draft,
    filter: StatusFilter,
    listeners: Vec<Listener>,
}

impl Default for TaskListController {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for TaskListController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskListController")
            .field("tasks", &self.tasks)
            .field("edit", &self.edit)
            .field("draft", &self.draft)
            .field("filter", &self.filter)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl TaskListController {
    pub fn new() -> Self {
        Self::with_filter(StatusFilter::All)
    }

    pub fn with_filter(filter: StatusFilter) -> Self {
        TaskListController {
            tasks: Vec::new(),
            next_id: 1,
            edit: None,
            draft: Draft::default(),
            filter,
            listeners: Vec::new(),
        }
    }

    /// Register a callback invoked after every successful mutation.
    pub fn subscribe<F>(&mut self, listener: F)
    where
        F: FnMut(&Change) + 'static,
    {
        self.listeners.push(Box::new(listener));
    }

    fn emit(&mut self, change: Change) {
        log::debug!("task list change: {:?}", change);
        for listener in self.listeners.iter_mut() {
            listener(&change);
        }
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index < self.tasks.len() {
            Ok(())
        } else {
            Err(TaskListError::IndexOutOfRange {
                index,
                len: self.tasks.len(),
            })
        }
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Task> {
        self.tasks.get(index)
    }

    pub fn position(&self, id: TaskId) -> Option<usize> {
        self.tasks.iter().position(|t| t.id == id)
    }

    pub fn filter(&self) -> StatusFilter {
        self.filter
    }

    pub fn edit_buffer(&self) -> Option<&EditBuffer> {
        self.edit.as_ref()
    }

    pub fn is_editing(&self, index: usize) -> bool {
        matches!(&self.edit, Some(buf) if buf.target_index == index)
    }

    pub fn draft(&self) -> &Draft {
        &self.draft
    }

    pub fn set_draft_name(&mut self, text: impl Into<String>) {
        self.draft.name = text.into();
    }

    pub fn set_draft_description(&mut self, text: impl Into<String>) {
        self.draft.description = text.into();
    }

    /// Append a new open task. Rejects names that are blank after trimming;
    /// on success the pending draft is cleared.
    pub fn add_task(&mut self, name: &str, description: &str) -> Result<TaskId> {
        if name.trim().is_empty() {
            log::info!("rejected task with empty name");
            return Err(TaskListError::Validation);
        }

        let id = TaskId(self.next_id);
        self.next_id += 1;
        self.tasks.push(Task {
            id,
            name: name.to_string(),
            description: description.to_string(),
            completed: false,
            created_at: Local::now(),
        });
        self.draft.clear();

        let index = self.tasks.len() - 1;
        self.emit(Change::Added { id, index });
        Ok(id)
    }

    /// Add a task from the draft fields. The draft survives a rejected add.
    pub fn submit_draft(&mut self) -> Result<TaskId> {
        let Draft { name, description } = self.draft.clone();
        self.add_task(&name, &description)
    }

    /// Enter edit mode for `index`, replacing any edit already in progress.
    pub fn begin_edit(&mut self, index: usize) -> Result<()> {
        self.check_index(index)?;
        let task = &self.tasks[index];
        if let Some(prev) = &self.edit {
            if prev.target_index != index {
                log::debug!("discarding edit of task {} for task {}", prev.target_index, index);
            }
        }
        self.edit = Some(EditBuffer {
            target_index: index,
            staged_name: task.name.clone(),
            staged_description: task.description.clone(),
        });
        self.emit(Change::EditStarted { index });
        Ok(())
    }

    pub fn update_staged_name(&mut self, text: impl Into<String>) -> Result<()> {
        let buf = self.edit.as_mut().ok_or(TaskListError::NoActiveEdit)?;
        buf.staged_name = text.into();
        Ok(())
    }

    pub fn update_staged_description(&mut self, text: impl Into<String>) -> Result<()> {
        let buf = self.edit.as_mut().ok_or(TaskListError::NoActiveEdit)?;
        buf.staged_description = text.into();
        Ok(())
    }

    /// Commit the staged fields onto the target task. `completed` is left
    /// alone. A blank staged name keeps the edit open and fails validation.
    pub fn save_edit(&mut self) -> Result<TaskId> {
        let buf = self.edit.take().ok_or(TaskListError::NoActiveEdit)?;
        let index = buf.target_index;
        if buf.staged_name.trim().is_empty() {
            self.edit = Some(buf);
            return Err(TaskListError::Validation);
        }
        // Delete keeps target_index in bounds, so a miss here is a bug.
        if let Err(err) = self.check_index(index) {
            self.edit = Some(buf);
            return Err(err);
        }

        let task = &mut self.tasks[index];
        task.name = buf.staged_name;
        task.description = buf.staged_description;
        let id = task.id;

        self.emit(Change::Edited { id, index });
        Ok(id)
    }

    /// Drop the edit buffer without committing. Returns false if idle.
    pub fn cancel_edit(&mut self) -> bool {
        match self.edit.take() {
            Some(buf) => {
                self.emit(Change::EditCancelled {
                    index: buf.target_index,
                });
                true
            }
            None => false,
        }
    }

    /// Set completion for the task with `id`. An id that no longer exists is
    /// ignored and reported as `false`.
    pub fn set_status(&mut self, id: TaskId, status: TaskStatus) -> bool {
        let Some(task) = self.tasks.iter_mut().find(|t| t.id == id) else {
            log::debug!("status change for missing task {}", id);
            return false;
        };
        let completed = status == TaskStatus::Completed;
        task.completed = completed;
        self.emit(Change::StatusChanged { id, completed });
        true
    }

    pub fn set_status_by_name(&mut self, id: TaskId, status: &str) -> Result<bool> {
        let status: TaskStatus = status.parse()?;
        Ok(self.set_status(id, status))
    }

    pub fn toggle_status(&mut self, id: TaskId) -> bool {
        let status = match self.tasks.iter().find(|t| t.id == id) {
            Some(task) if task.completed => TaskStatus::NotCompleted,
            Some(_) => TaskStatus::Completed,
            None => return false,
        };
        self.set_status(id, status)
    }

    pub fn set_filter(&mut self, filter: StatusFilter) {
        self.filter = filter;
        self.emit(Change::FilterChanged(filter));
    }

    /// Parse and apply a filter; an unknown value leaves the current filter.
    pub fn set_filter_str(&mut self, filter: &str) -> Result<()> {
        let filter: StatusFilter = filter.parse()?;
        self.set_filter(filter);
        Ok(())
    }

    /// Remove the task at `index`. Keeps the edit buffer pointing at the same
    /// task, or cancels it when its target is the one removed.
    pub fn delete_task(&mut self, index: usize) -> Result<Task> {
        self.check_index(index)?;
        let removed = self.tasks.remove(index);

        let mut cancelled = None;
        if let Some(buf) = self.edit.as_mut() {
            if buf.target_index == index {
                cancelled = Some(index);
            } else if index < buf.target_index {
                buf.target_index -= 1;
            }
        }
        if cancelled.is_some() {
            self.edit = None;
        }

        self.emit(Change::Deleted {
            id: removed.id,
            index,
        });
        if let Some(index) = cancelled {
            self.emit(Change::EditCancelled { index });
        }
        Ok(removed)
    }

    /// Tasks passing the active filter, in sequence order.
    pub fn visible_tasks(&self) -> Vec<&Task> {
        self.visible_indexed().map(|(_, task)| task).collect()
    }

    /// Visible tasks paired with their index in the full sequence.
    pub fn visible_indexed(&self) -> impl Iterator<Item = (usize, &Task)> + '_ {
        let filter = self.filter;
        self.tasks
            .iter()
            .enumerate()
            .filter(move |(_, task)| filter.matches(task))
    }
}
