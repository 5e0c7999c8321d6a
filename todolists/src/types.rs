//! Domain types for the todolist client.
//!
//! These mirror the records exchanged with the remote todolist service
//! (camelCase JSON, integer status/priority codes) plus the client-only
//! pieces: the per-list [`FilterValue`] and the partial [`TaskPatch`].

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Server-assigned identifier of a todolist
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TodolistId(String);

impl TodolistId {
    /// Wraps an id as issued by the remote service
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the id as a string slice
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TodolistId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Server-assigned identifier of a task
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(String);

impl TaskId {
    /// Wraps an id as issued by the remote service
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the id as a string slice
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Workflow status of a task, sent as an integer code
///
/// The service may add codes; those decode as [`TaskStatus::Other`] and are
/// sent back unchanged, so one unfamiliar task never hides its whole list.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "u8", into = "u8")]
pub enum TaskStatus {
    /// Not started
    #[default]
    New,
    /// Being worked on
    InProgress,
    /// Done
    Completed,
    /// Not yet ready
    Draft,
    /// A code this client has no name for
    Other(u8),
}

impl From<u8> for TaskStatus {
    fn from(code: u8) -> Self {
        match code {
            0 => Self::New,
            1 => Self::InProgress,
            2 => Self::Completed,
            3 => Self::Draft,
            other => Self::Other(other),
        }
    }
}

impl From<TaskStatus> for u8 {
    fn from(status: TaskStatus) -> Self {
        match status {
            TaskStatus::New => 0,
            TaskStatus::InProgress => 1,
            TaskStatus::Completed => 2,
            TaskStatus::Draft => 3,
            TaskStatus::Other(code) => code,
        }
    }
}

/// Priority of a task, sent as an integer code
///
/// Unknown codes are kept as [`TaskPriority::Other`], like [`TaskStatus`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "u8", into = "u8")]
pub enum TaskPriority {
    /// Lowest priority
    #[default]
    Low,
    /// Normal
    Middle,
    /// High
    Hi,
    /// Drop everything
    Urgently,
    /// Deferred
    Later,
    /// A code this client has no name for
    Other(u8),
}

impl From<u8> for TaskPriority {
    fn from(code: u8) -> Self {
        match code {
            0 => Self::Low,
            1 => Self::Middle,
            2 => Self::Hi,
            3 => Self::Urgently,
            4 => Self::Later,
            other => Self::Other(other),
        }
    }
}

impl From<TaskPriority> for u8 {
    fn from(priority: TaskPriority) -> Self {
        match priority {
            TaskPriority::Low => 0,
            TaskPriority::Middle => 1,
            TaskPriority::Hi => 2,
            TaskPriority::Urgently => 3,
            TaskPriority::Later => 4,
            TaskPriority::Other(code) => code,
        }
    }
}

/// Client-only view restriction on a list's tasks
///
/// Never sent to the remote service.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterValue {
    /// Every task
    #[default]
    All,
    /// Tasks with status [`TaskStatus::New`]
    Active,
    /// Tasks with status [`TaskStatus::Completed`]
    Completed,
}

impl FilterValue {
    /// Whether a task with `status` is visible under this filter
    #[must_use]
    pub const fn matches(self, status: TaskStatus) -> bool {
        match self {
            Self::All => true,
            Self::Active => matches!(status, TaskStatus::New),
            Self::Completed => matches!(status, TaskStatus::Completed),
        }
    }
}

impl std::str::FromStr for FilterValue {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "all" => Ok(Self::All),
            "active" => Ok(Self::Active),
            "completed" => Ok(Self::Completed),
            other => Err(format!("unknown filter '{other}', expected all|active|completed")),
        }
    }
}

impl std::fmt::Display for FilterValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::All => "all",
            Self::Active => "active",
            Self::Completed => "completed",
        })
    }
}

/// A todolist as stored by the remote service
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Todolist {
    /// Server-assigned id
    pub id: TodolistId,
    /// Display title
    pub title: String,
    /// When the service created the list
    pub added_date: Option<NaiveDateTime>,
    /// Server-side ordering key
    #[serde(default)]
    pub order: i64,
}

/// A todolist as held in local state
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DomainTodolist {
    /// Server-assigned id
    pub id: TodolistId,
    /// Display title
    pub title: String,
    /// Which of the list's tasks are shown
    pub filter: FilterValue,
}

impl DomainTodolist {
    /// A freshly added list, showing all tasks
    #[must_use]
    pub const fn new(id: TodolistId, title: String) -> Self {
        Self {
            id,
            title,
            filter: FilterValue::All,
        }
    }
}

impl From<Todolist> for DomainTodolist {
    fn from(todolist: Todolist) -> Self {
        Self::new(todolist.id, todolist.title)
    }
}

/// A task as exchanged with the remote service
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Server-assigned id
    pub id: TaskId,
    /// Owning list
    pub todo_list_id: TodolistId,
    /// Display title
    pub title: String,
    /// Free-form notes
    #[serde(default)]
    pub description: Option<String>,
    /// Workflow status
    #[serde(default)]
    pub status: TaskStatus,
    /// Priority
    #[serde(default)]
    pub priority: TaskPriority,
    /// When work is planned to start
    #[serde(default)]
    pub start_date: Option<NaiveDateTime>,
    /// When the task is due
    #[serde(default)]
    pub deadline: Option<NaiveDateTime>,
    /// Server-side ordering key
    #[serde(default)]
    pub order: i64,
    /// When the service created the task
    #[serde(default)]
    pub added_date: Option<NaiveDateTime>,
}

impl Task {
    /// A new task with default status and priority and no scheduling data
    #[must_use]
    pub fn new(id: TaskId, todo_list_id: TodolistId, title: impl Into<String>) -> Self {
        Self {
            id,
            todo_list_id,
            title: title.into(),
            description: None,
            status: TaskStatus::New,
            priority: TaskPriority::Low,
            start_date: None,
            deadline: None,
            order: 0,
            added_date: None,
        }
    }

    /// Overwrite the fields present in `patch`, leaving all others as they are
    pub fn apply_patch(&mut self, patch: &TaskPatch) {
        if let Some(title) = &patch.title {
            self.title.clone_from(title);
        }
        if let Some(description) = &patch.description {
            self.description.clone_from(description);
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(priority) = patch.priority {
            self.priority = priority;
        }
        if let Some(start_date) = patch.start_date {
            self.start_date = start_date;
        }
        if let Some(deadline) = patch.deadline {
            self.deadline = deadline;
        }
    }
}

/// A partial set of task field changes
///
/// `None` means "leave unchanged". For the nullable fields, `Some(None)`
/// clears the value.
///
/// ```
/// use todolists::types::{TaskPatch, TaskStatus};
///
/// let patch = TaskPatch::new().status(TaskStatus::Completed);
/// assert_eq!(patch.status, Some(TaskStatus::Completed));
/// assert!(patch.title.is_none());
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TaskPatch {
    /// New title
    pub title: Option<String>,
    /// New description, `Some(None)` clears it
    pub description: Option<Option<String>>,
    /// New status
    pub status: Option<TaskStatus>,
    /// New priority
    pub priority: Option<TaskPriority>,
    /// New start date, `Some(None)` clears it
    pub start_date: Option<Option<NaiveDateTime>>,
    /// New deadline, `Some(None)` clears it
    pub deadline: Option<Option<NaiveDateTime>>,
}

impl TaskPatch {
    /// An empty patch
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the title
    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set or clear the description
    #[must_use]
    pub fn description(mut self, description: Option<String>) -> Self {
        self.description = Some(description);
        self
    }

    /// Set the status
    #[must_use]
    pub const fn status(mut self, status: TaskStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Set the priority
    #[must_use]
    pub const fn priority(mut self, priority: TaskPriority) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Set or clear the start date
    #[must_use]
    pub const fn start_date(mut self, start_date: Option<NaiveDateTime>) -> Self {
        self.start_date = Some(start_date);
        self
    }

    /// Set or clear the deadline
    #[must_use]
    pub const fn deadline(mut self, deadline: Option<NaiveDateTime>) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Whether the patch changes nothing
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.status.is_none()
            && self.priority.is_none()
            && self.start_date.is_none()
            && self.deadline.is_none()
    }
}

/// The full record the remote service requires on task update
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTaskModel {
    /// Display title
    pub title: String,
    /// Free-form notes, `None` clears them
    pub description: Option<String>,
    /// Workflow status
    pub status: TaskStatus,
    /// Priority
    pub priority: TaskPriority,
    /// Planned start, `None` clears it
    pub start_date: Option<NaiveDateTime>,
    /// Due date, `None` clears it
    pub deadline: Option<NaiveDateTime>,
}

impl UpdateTaskModel {
    /// Overlay `patch` on the current values of `task`; patch fields win
    #[must_use]
    pub fn merge(task: &Task, patch: &TaskPatch) -> Self {
        Self {
            title: patch.title.clone().unwrap_or_else(|| task.title.clone()),
            description: patch
                .description
                .clone()
                .unwrap_or_else(|| task.description.clone()),
            status: patch.status.unwrap_or(task.status),
            priority: patch.priority.unwrap_or(task.priority),
            start_date: patch.start_date.unwrap_or(task.start_date),
            deadline: patch.deadline.unwrap_or(task.deadline),
        }
    }
}

impl From<&Task> for UpdateTaskModel {
    fn from(task: &Task) -> Self {
        Self::merge(task, &TaskPatch::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[allow(clippy::unwrap_used)] // Test helper
    fn date(day: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 3, day)
            .and_then(|d| d.and_hms_opt(9, 30, 0))
            .unwrap()
    }

    fn sample_task() -> Task {
        Task {
            description: Some("two litres".into()),
            priority: TaskPriority::Hi,
            deadline: Some(date(10)),
            ..Task::new(TaskId::new("T1"), TodolistId::new("L1"), "Milk")
        }
    }

    #[test]
    fn filter_partitions_new_and_completed() {
        assert!(FilterValue::All.matches(TaskStatus::Draft));
        assert!(FilterValue::Active.matches(TaskStatus::New));
        assert!(!FilterValue::Active.matches(TaskStatus::InProgress));
        assert!(!FilterValue::Active.matches(TaskStatus::Completed));
        assert!(FilterValue::Completed.matches(TaskStatus::Completed));
        assert!(!FilterValue::Completed.matches(TaskStatus::New));
    }

    #[test]
    fn filter_parses_case_insensitively() {
        assert_eq!("Active".parse::<FilterValue>(), Ok(FilterValue::Active));
        assert!("done".parse::<FilterValue>().is_err());
        assert_eq!(FilterValue::Completed.to_string(), "completed");
    }

    #[test]
    fn merge_prefers_patch_fields() {
        let task = sample_task();
        let patch = TaskPatch::new().status(TaskStatus::Completed).title("Oat milk");

        let model = UpdateTaskModel::merge(&task, &patch);

        assert_eq!(model.title, "Oat milk");
        assert_eq!(model.status, TaskStatus::Completed);
        assert_eq!(model.priority, TaskPriority::Hi);
        assert_eq!(model.description.as_deref(), Some("two litres"));
        assert_eq!(model.deadline, Some(date(10)));
        assert_eq!(model.start_date, None);
    }

    #[test]
    fn merge_can_clear_nullable_fields() {
        let task = sample_task();
        let patch = TaskPatch::new().deadline(None).description(None);

        let model = UpdateTaskModel::merge(&task, &patch);
        assert_eq!(model.deadline, None);
        assert_eq!(model.description, None);
    }

    #[test]
    fn apply_patch_touches_only_patched_fields() {
        let mut task = sample_task();
        let before = task.clone();

        task.apply_patch(&TaskPatch::new().status(TaskStatus::Completed));

        assert_eq!(task.status, TaskStatus::Completed);
        assert_eq!(Task { status: before.status, ..task }, before);
    }

    #[test]
    fn empty_patch_is_empty() {
        assert!(TaskPatch::new().is_empty());
        assert!(!TaskPatch::new().start_date(None).is_empty());
    }

    #[test]
    fn task_deserializes_from_service_json() -> Result<(), serde_json::Error> {
        let json = r#"{
            "id": "T1",
            "todoListId": "L1",
            "title": "Milk",
            "description": null,
            "status": 2,
            "priority": 1,
            "startDate": null,
            "deadline": "2025-03-10T09:30:00",
            "order": -1,
            "addedDate": "2025-03-01T08:00:00.123"
        }"#;

        let task: Task = serde_json::from_str(json)?;
        assert_eq!(task.id, TaskId::new("T1"));
        assert_eq!(task.todo_list_id, TodolistId::new("L1"));
        assert_eq!(task.status, TaskStatus::Completed);
        assert_eq!(task.priority, TaskPriority::Middle);
        assert_eq!(task.deadline, Some(date(10)));
        assert_eq!(task.order, -1);
        Ok(())
    }

    #[test]
    fn unknown_codes_survive_a_round_trip() -> Result<(), serde_json::Error> {
        let status: TaskStatus = serde_json::from_str("9")?;
        let priority: TaskPriority = serde_json::from_str("7")?;

        assert_eq!(status, TaskStatus::Other(9));
        assert_eq!(priority, TaskPriority::Other(7));
        assert_eq!(serde_json::to_string(&status)?, "9");
        assert!(!FilterValue::Active.matches(status));
        assert!(FilterValue::All.matches(status));
        Ok(())
    }

    #[test]
    fn update_model_serializes_camel_case_codes() -> Result<(), serde_json::Error> {
        let model = UpdateTaskModel::from(&sample_task());
        let value = serde_json::to_value(&model)?;

        assert_eq!(value["status"], 0);
        assert_eq!(value["priority"], 2);
        assert_eq!(value["startDate"], serde_json::Value::Null);
        assert_eq!(value["deadline"], "2025-03-10T09:30:00");
        Ok(())
    }
}
