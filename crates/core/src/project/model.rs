//! Project model definitions

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

use crate::{Error, Priority, Result};

/// Lifecycle status of a project
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProjectStatus {
    Planning,
    InProgress,
    Completed,
    OnHold,
}

impl Default for ProjectStatus {
    fn default() -> Self {
        Self::Planning
    }
}

impl ProjectStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Planning => "planning",
            Self::InProgress => "in-progress",
            Self::Completed => "completed",
            Self::OnHold => "on-hold",
        }
    }

    /// Display label, e.g. "on hold"
    pub fn label(self) -> String {
        self.as_str().replace('-', " ")
    }
}

impl FromStr for ProjectStatus {
    type Err = Error;

    fn from_str(value: &str) -> std::result::Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "planning" => Ok(Self::Planning),
            "in-progress" => Ok(Self::InProgress),
            "completed" => Ok(Self::Completed),
            "on-hold" => Ok(Self::OnHold),
            _ => Err(Error::InvalidInput(format!(
                "Unsupported project status '{}'",
                value
            ))),
        }
    }
}

/// Coarse bucket of a project's completion percentage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProgressBand {
    Low,
    Fair,
    Good,
    High,
}

impl ProgressBand {
    pub fn from_progress(progress: u8) -> Self {
        match progress {
            80.. => Self::High,
            50..=79 => Self::Good,
            25..=49 => Self::Fair,
            _ => Self::Low,
        }
    }
}

/// A project on the dashboard
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub status: ProjectStatus,
    pub priority: Priority,
    pub manager_id: Uuid,
    pub team_members: Vec<Uuid>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Completion percentage, 0..=100
    pub progress: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budget: Option<u64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Project {
    /// Create a new project in the planning stage
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        manager_id: Uuid,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            description: description.into(),
            status: ProjectStatus::default(),
            priority: Priority::default(),
            manager_id,
            team_members: Vec::new(),
            start_date,
            end_date,
            progress: 0,
            budget: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_id(mut self, id: Uuid) -> Self {
        self.id = id;
        self
    }

    pub fn with_status(mut self, status: ProjectStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_team_members(mut self, members: impl IntoIterator<Item = Uuid>) -> Self {
        self.team_members = dedup(members);
        self
    }

    pub fn with_progress(mut self, progress: u8) -> Self {
        self.progress = progress.min(100);
        self
    }

    pub fn with_budget(mut self, budget: u64) -> Self {
        self.budget = normalize_budget(Some(budget));
        self
    }

    pub fn with_timestamps(mut self, created_at: DateTime<Utc>, updated_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self.updated_at = updated_at;
        self
    }

    pub fn has_member(&self, user_id: Uuid) -> bool {
        self.team_members.contains(&user_id)
    }

    pub fn progress_band(&self) -> ProgressBand {
        ProgressBand::from_progress(self.progress)
    }

    /// Add the user to the team, or remove them if already present
    pub fn toggle_member(&mut self, user_id: Uuid) -> bool {
        if let Some(pos) = self.team_members.iter().position(|id| *id == user_id) {
            self.team_members.remove(pos);
            false
        } else {
            self.team_members.push(user_id);
            true
        }
    }

    /// Field-level checks that need no other entity
    pub fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(Error::InvalidInput("Title cannot be empty".to_string()));
        }
        if self.description.trim().is_empty() {
            return Err(Error::InvalidInput(
                "Description cannot be empty".to_string(),
            ));
        }
        if self.end_date < self.start_date {
            return Err(Error::InvalidInput(
                "End date cannot be before start date".to_string(),
            ));
        }
        if self.progress > 100 {
            return Err(Error::InvalidInput(
                "Progress must be between 0 and 100".to_string(),
            ));
        }
        Ok(())
    }
}

/// Form data for creating a project
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectDraft {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub status: Option<ProjectStatus>,
    #[serde(default)]
    pub priority: Option<Priority>,
    pub manager_id: Uuid,
    #[serde(default)]
    pub team_members: Vec<Uuid>,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub budget: Option<u64>,
}

impl ProjectDraft {
    /// Build the project, filling in form defaults. New projects start at 0% progress.
    pub fn into_project(self, today: NaiveDate) -> Result<Project> {
        let end_date = self
            .end_date
            .ok_or_else(|| Error::InvalidInput("End date is required".to_string()))?;
        let mut project = Project::new(
            self.title.trim(),
            self.description.trim(),
            self.manager_id,
            self.start_date.unwrap_or(today),
            end_date,
        )
        .with_status(self.status.unwrap_or_default())
        .with_priority(self.priority.unwrap_or_default())
        .with_team_members(self.team_members);
        project.budget = normalize_budget(self.budget);
        project.validate()?;
        Ok(project)
    }
}

/// Form data for editing a project; absent fields keep their value
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectPatch {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: Option<ProjectStatus>,
    #[serde(default)]
    pub priority: Option<Priority>,
    #[serde(default)]
    pub manager_id: Option<Uuid>,
    #[serde(default)]
    pub team_members: Option<Vec<Uuid>>,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub budget: Option<u64>,
    #[serde(default)]
    pub progress: Option<u8>,
}

impl ProjectPatch {
    /// Merge into a copy of `project` and validate the result
    pub fn apply_to(&self, project: &Project) -> Result<Project> {
        let mut updated = project.clone();
        if let Some(title) = &self.title {
            updated.title = title.trim().to_string();
        }
        if let Some(description) = &self.description {
            updated.description = description.trim().to_string();
        }
        if let Some(status) = self.status {
            updated.status = status;
        }
        if let Some(priority) = self.priority {
            updated.priority = priority;
        }
        if let Some(manager_id) = self.manager_id {
            updated.manager_id = manager_id;
        }
        if let Some(members) = &self.team_members {
            updated.team_members = dedup(members.iter().copied());
        }
        if let Some(start_date) = self.start_date {
            updated.start_date = start_date;
        }
        if let Some(end_date) = self.end_date {
            updated.end_date = end_date;
        }
        if self.budget.is_some() {
            updated.budget = normalize_budget(self.budget);
        }
        if let Some(progress) = self.progress {
            updated.progress = progress;
        }
        updated.validate()?;
        Ok(updated)
    }
}

fn normalize_budget(budget: Option<u64>) -> Option<u64> {
    budget.filter(|amount| *amount > 0)
}

fn dedup(members: impl IntoIterator<Item = Uuid>) -> Vec<Uuid> {
    let mut unique = Vec::new();
    for member in members {
        if !unique.contains(&member) {
            unique.push(member);
        }
    }
    unique
}
