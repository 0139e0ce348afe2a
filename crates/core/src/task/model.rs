//! Task model definitions

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

use crate::{Error, Priority, Result};

/// Task status on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    Todo,
    InProgress,
    Review,
    Completed,
}

impl Default for TaskStatus {
    fn default() -> Self {
        Self::Todo
    }
}

impl TaskStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Todo => "todo",
            Self::InProgress => "in-progress",
            Self::Review => "review",
            Self::Completed => "completed",
        }
    }

    pub fn label(self) -> String {
        self.as_str().replace('-', " ")
    }
}

impl FromStr for TaskStatus {
    type Err = Error;

    fn from_str(value: &str) -> std::result::Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "todo" => Ok(Self::Todo),
            "in-progress" => Ok(Self::InProgress),
            "review" => Ok(Self::Review),
            "completed" => Ok(Self::Completed),
            _ => Err(Error::InvalidInput(format!(
                "Unsupported task status '{}'",
                value
            ))),
        }
    }
}

/// A task inside a project
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub project_id: Uuid,
    pub assignee_id: Uuid,
    pub status: TaskStatus,
    pub priority: Priority,
    pub due_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_hours: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual_hours: Option<f64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Create a new task in the todo column
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        project_id: Uuid,
        assignee_id: Uuid,
        due_date: NaiveDate,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            description: description.into(),
            project_id,
            assignee_id,
            status: TaskStatus::default(),
            priority: Priority::default(),
            due_date,
            estimated_hours: None,
            actual_hours: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_id(mut self, id: Uuid) -> Self {
        self.id = id;
        self
    }

    pub fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_hours(mut self, estimated: f64, actual: f64) -> Self {
        self.estimated_hours = Some(estimated);
        self.actual_hours = Some(actual);
        self
    }

    pub fn with_timestamps(mut self, created_at: DateTime<Utc>, updated_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self.updated_at = updated_at;
        self
    }

    /// Past due and not yet completed
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        self.due_date < today && self.status != TaskStatus::Completed
    }

    /// Logged hours as a percentage of the estimate, capped at 100
    pub fn hours_progress(&self) -> Option<f64> {
        let estimated = self.estimated_hours.filter(|hours| *hours > 0.0)?;
        let actual = self.actual_hours.unwrap_or(0.0);
        Some((actual / estimated * 100.0).min(100.0))
    }

    pub fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(Error::InvalidInput("Title cannot be empty".to_string()));
        }
        if self.description.trim().is_empty() {
            return Err(Error::InvalidInput(
                "Description cannot be empty".to_string(),
            ));
        }
        for hours in [self.estimated_hours, self.actual_hours].into_iter().flatten() {
            if !hours.is_finite() || hours < 0.0 {
                return Err(Error::InvalidInput(
                    "Hours must be a non-negative number".to_string(),
                ));
            }
        }
        Ok(())
    }
}

/// Form data for creating a task
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskDraft {
    pub title: String,
    pub description: String,
    pub project_id: Uuid,
    pub assignee_id: Uuid,
    #[serde(default)]
    pub status: Option<TaskStatus>,
    #[serde(default)]
    pub priority: Option<Priority>,
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub estimated_hours: Option<f64>,
    #[serde(default)]
    pub actual_hours: Option<f64>,
}

impl TaskDraft {
    pub fn into_task(self) -> Result<Task> {
        let due_date = self
            .due_date
            .ok_or_else(|| Error::InvalidInput("Due date is required".to_string()))?;
        let mut task = Task::new(
            self.title.trim(),
            self.description.trim(),
            self.project_id,
            self.assignee_id,
            due_date,
        )
        .with_status(self.status.unwrap_or_default())
        .with_priority(self.priority.unwrap_or_default());
        task.estimated_hours = self.estimated_hours;
        task.actual_hours = self.actual_hours;
        task.validate()?;
        Ok(task)
    }
}

/// Form data for editing a task; absent fields keep their value
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskPatch {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub project_id: Option<Uuid>,
    #[serde(default)]
    pub assignee_id: Option<Uuid>,
    #[serde(default)]
    pub status: Option<TaskStatus>,
    #[serde(default)]
    pub priority: Option<Priority>,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub estimated_hours: Option<f64>,
    #[serde(default)]
    pub actual_hours: Option<f64>,
}

impl TaskPatch {
    pub fn apply_to(&self, task: &Task) -> Result<Task> {
        let mut updated = task.clone();
        if let Some(title) = &self.title {
            updated.title = title.trim().to_string();
        }
        if let Some(description) = &self.description {
            updated.description = description.trim().to_string();
        }
        if let Some(project_id) = self.project_id {
            updated.project_id = project_id;
        }
        if let Some(assignee_id) = self.assignee_id {
            updated.assignee_id = assignee_id;
        }
        if let Some(status) = self.status {
            updated.status = status;
        }
        if let Some(priority) = self.priority {
            updated.priority = priority;
        }
        if let Some(due_date) = self.due_date {
            updated.due_date = due_date;
        }
        if self.estimated_hours.is_some() {
            updated.estimated_hours = self.estimated_hours;
        }
        if self.actual_hours.is_some() {
            updated.actual_hours = self.actual_hours;
        }
        updated.validate()?;
        Ok(updated)
    }

    /// Whether the patch moves the task to another project or assignee
    pub fn reassigns(&self) -> bool {
        self.project_id.is_some() || self.assignee_id.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn task() -> Task {
        Task::new(
            "API Integration",
            "Payment and shipping APIs",
            Uuid::new_v4(),
            Uuid::new_v4(),
            date(2024, 2, 10),
        )
    }

    #[test]
    fn test_create_task() {
        let task = task();
        assert_eq!(task.status, TaskStatus::Todo);
        assert_eq!(task.priority, Priority::Medium);
        assert!(task.estimated_hours.is_none());
    }

    #[test]
    fn test_is_overdue() {
        let task = task();
        assert!(task.is_overdue(date(2024, 2, 11)));
        assert!(!task.is_overdue(date(2024, 2, 10)));

        let done = task.with_status(TaskStatus::Completed);
        assert!(!done.is_overdue(date(2030, 1, 1)));
    }

    #[test]
    fn test_hours_progress() {
        assert_eq!(task().hours_progress(), None);
        assert_eq!(task().with_hours(40.0, 28.0).hours_progress(), Some(70.0));
        assert_eq!(task().with_hours(24.0, 26.0).hours_progress(), Some(100.0));
        assert_eq!(task().with_hours(0.0, 3.0).hours_progress(), None);

        let mut no_actual = task();
        no_actual.estimated_hours = Some(16.0);
        assert_eq!(no_actual.hours_progress(), Some(0.0));
    }

    #[test]
    fn test_draft_requires_due_date() {
        let draft = TaskDraft {
            title: "Setup".to_string(),
            description: "Auth setup".to_string(),
            project_id: Uuid::new_v4(),
            assignee_id: Uuid::new_v4(),
            status: None,
            priority: Some(Priority::High),
            due_date: None,
            estimated_hours: Some(16.0),
            actual_hours: None,
        };
        assert!(draft.clone().into_task().is_err());

        let task = TaskDraft {
            due_date: Some(date(2024, 2, 20)),
            ..draft
        }
        .into_task()
        .unwrap();
        assert_eq!(task.status, TaskStatus::Todo);
        assert_eq!(task.priority, Priority::High);
    }

    #[test]
    fn test_patch_rejects_negative_hours() {
        let patch = TaskPatch {
            actual_hours: Some(-1.0),
            ..Default::default()
        };
        assert!(patch.apply_to(&task()).is_err());
    }

    #[test]
    fn test_patch_merges_fields() {
        let original = task();
        let patch = TaskPatch {
            status: Some(TaskStatus::Review),
            actual_hours: Some(12.5),
            ..Default::default()
        };
        let updated = patch.apply_to(&original).unwrap();
        assert_eq!(updated.status, TaskStatus::Review);
        assert_eq!(updated.actual_hours, Some(12.5));
        assert_eq!(updated.title, original.title);
        assert!(!patch.reassigns());
    }

    #[test]
    fn test_status_wire_format() {
        let json = serde_json::to_string(&TaskStatus::InProgress).unwrap();
        assert_eq!(json, "\"in-progress\"");
        assert_eq!(TaskStatus::InProgress.label(), "in progress");
    }
}
