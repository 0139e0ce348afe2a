//! Search and filter criteria for the list pages

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::project::{Project, ProjectStatus};
use crate::task::{Task, TaskStatus};
use crate::user::{Role, User};
use crate::Priority;

const ADJUST_FILTERS_HINT: &str = "Try adjusting your filters";

/// A select box value: `all`, or one specific option
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterChoice<T> {
    All,
    Only(T),
}

impl<T> Default for FilterChoice<T> {
    fn default() -> Self {
        Self::All
    }
}

impl<T: PartialEq> FilterChoice<T> {
    pub fn matches(&self, value: &T) -> bool {
        match self {
            Self::All => true,
            Self::Only(expected) => expected == value,
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, Self::All)
    }
}

impl<T: FromStr> FromStr for FilterChoice<T> {
    type Err = T::Err;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("all") {
            Ok(Self::All)
        } else {
            trimmed.parse().map(Self::Only)
        }
    }
}

impl<'de, T> Deserialize<'de> for FilterChoice<T>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Account status filter on the user list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountStatus {
    Active,
    Inactive,
}

impl FromStr for AccountStatus {
    type Err = crate::Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "active" => Ok(Self::Active),
            "inactive" => Ok(Self::Inactive),
            _ => Err(crate::Error::InvalidInput(format!(
                "Unsupported account status '{}'",
                value
            ))),
        }
    }
}

/// Case-insensitive substring match; a blank needle matches everything
fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}

fn normalized_search(search: &Option<String>) -> Option<String> {
    search
        .as_deref()
        .map(str::trim)
        .filter(|term| !term.is_empty())
        .map(str::to_lowercase)
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectFilter {
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub status: FilterChoice<ProjectStatus>,
    #[serde(default)]
    pub priority: FilterChoice<Priority>,
}

impl ProjectFilter {
    pub fn is_active(&self) -> bool {
        normalized_search(&self.search).is_some() || !self.status.is_all() || !self.priority.is_all()
    }

    pub fn apply(&self, projects: Vec<Project>) -> Vec<Project> {
        let term = normalized_search(&self.search);
        projects
            .into_iter()
            .filter(|p| {
                term.as_deref().map_or(true, |term| {
                    contains_ci(&p.title, term) || contains_ci(&p.description, term)
                })
            })
            .filter(|p| self.status.matches(&p.status))
            .filter(|p| self.priority.matches(&p.priority))
            .collect()
    }

    pub fn empty_hint(&self) -> &'static str {
        if self.is_active() {
            ADJUST_FILTERS_HINT
        } else {
            "Start by creating your first project"
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskFilter {
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub status: FilterChoice<TaskStatus>,
    #[serde(default)]
    pub priority: FilterChoice<Priority>,
}

impl TaskFilter {
    pub fn is_active(&self) -> bool {
        normalized_search(&self.search).is_some() || !self.status.is_all() || !self.priority.is_all()
    }

    pub fn apply(&self, tasks: Vec<Task>) -> Vec<Task> {
        let term = normalized_search(&self.search);
        tasks
            .into_iter()
            .filter(|t| {
                term.as_deref().map_or(true, |term| {
                    contains_ci(&t.title, term) || contains_ci(&t.description, term)
                })
            })
            .filter(|t| self.status.matches(&t.status))
            .filter(|t| self.priority.matches(&t.priority))
            .collect()
    }

    pub fn empty_hint(&self) -> &'static str {
        if self.is_active() {
            ADJUST_FILTERS_HINT
        } else {
            "Start by creating your first task"
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserFilter {
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub role: FilterChoice<Role>,
    #[serde(default)]
    pub status: FilterChoice<AccountStatus>,
}

impl UserFilter {
    pub fn is_active(&self) -> bool {
        normalized_search(&self.search).is_some() || !self.role.is_all() || !self.status.is_all()
    }

    pub fn apply(&self, users: Vec<User>) -> Vec<User> {
        let term = normalized_search(&self.search);
        users
            .into_iter()
            .filter(|u| {
                term.as_deref().map_or(true, |term| {
                    contains_ci(&u.name, term)
                        || contains_ci(&u.email, term)
                        || u.department.as_deref().is_some_and(|d| contains_ci(d, term))
                })
            })
            .filter(|u| self.role.matches(&u.role))
            .filter(|u| {
                let status = if u.is_active {
                    AccountStatus::Active
                } else {
                    AccountStatus::Inactive
                };
                self.status.matches(&status)
            })
            .collect()
    }

    pub fn empty_hint(&self) -> &'static str {
        if self.is_active() {
            ADJUST_FILTERS_HINT
        } else {
            "Start by adding your first user"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use uuid::Uuid;

    fn project(title: &str, description: &str, status: ProjectStatus, priority: Priority) -> Project {
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        Project::new(title, description, Uuid::new_v4(), date, date)
            .with_status(status)
            .with_priority(priority)
    }

    #[test]
    fn test_filter_choice_parsing() {
        assert_eq!("all".parse::<FilterChoice<Priority>>().unwrap(), FilterChoice::All);
        assert_eq!("".parse::<FilterChoice<Priority>>().unwrap(), FilterChoice::All);
        assert_eq!(
            "high".parse::<FilterChoice<Priority>>().unwrap(),
            FilterChoice::Only(Priority::High)
        );
        assert!("bogus".parse::<FilterChoice<Priority>>().is_err());
    }

    #[test]
    fn test_filter_choice_deserializes_from_query_values() {
        let filter: ProjectFilter = serde_json::from_value(serde_json::json!({
            "search": "app",
            "status": "on-hold",
            "priority": "all"
        }))
        .unwrap();
        assert_eq!(filter.status, FilterChoice::Only(ProjectStatus::OnHold));
        assert!(filter.priority.is_all());
        assert!(filter.is_active());
    }

    #[test]
    fn test_project_search_is_case_insensitive_over_title_and_description() {
        let projects = vec![
            project("E-commerce Platform", "Redesign", ProjectStatus::InProgress, Priority::High),
            project("Mobile App", "Companion MOBILE app", ProjectStatus::Planning, Priority::Medium),
            project("Database Migration", "Cloud move", ProjectStatus::Completed, Priority::Urgent),
        ];

        let filter = ProjectFilter {
            search: Some("  CLOUD ".to_string()),
            ..Default::default()
        };
        let found = filter.apply(projects.clone());
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].title, "Database Migration");

        let combined = ProjectFilter {
            search: Some("a".to_string()),
            status: FilterChoice::Only(ProjectStatus::Planning),
            priority: FilterChoice::Only(Priority::Medium),
        };
        assert_eq!(combined.apply(projects.clone()).len(), 1);

        assert_eq!(ProjectFilter::default().apply(projects).len(), 3);
    }

    #[test]
    fn test_task_filters() {
        let date = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();
        let tasks = vec![
            Task::new("Design", "System", Uuid::new_v4(), Uuid::new_v4(), date)
                .with_status(TaskStatus::InProgress),
            Task::new("API", "Payments", Uuid::new_v4(), Uuid::new_v4(), date)
                .with_status(TaskStatus::Completed)
                .with_priority(Priority::Low),
        ];
        let filter = TaskFilter {
            status: FilterChoice::Only(TaskStatus::Completed),
            ..Default::default()
        };
        let found = filter.apply(tasks);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].title, "API");
    }

    #[test]
    fn test_user_filters() {
        let mut inactive = User::new("designer@company.com", "UI Designer", Role::TeamMember)
            .with_department("Design");
        inactive.is_active = false;
        let users = vec![
            User::new("admin@company.com", "Admin User", Role::Admin).with_department("IT"),
            User::new("pm@company.com", "Project Manager", Role::ProjectManager),
            inactive,
        ];

        let by_department = UserFilter {
            search: Some("design".to_string()),
            ..Default::default()
        };
        assert_eq!(by_department.apply(users.clone()).len(), 1);

        let by_email = UserFilter {
            search: Some("PM@".to_string()),
            ..Default::default()
        };
        assert_eq!(by_email.apply(users.clone()).len(), 1);

        let inactive_only = UserFilter {
            status: FilterChoice::Only(AccountStatus::Inactive),
            ..Default::default()
        };
        assert_eq!(inactive_only.apply(users.clone())[0].name, "UI Designer");

        let admins = UserFilter {
            role: FilterChoice::Only(Role::Admin),
            ..Default::default()
        };
        assert_eq!(admins.apply(users).len(), 1);
    }

    #[test]
    fn test_empty_hints() {
        assert_eq!(
            ProjectFilter::default().empty_hint(),
            "Start by creating your first project"
        );
        let searching = TaskFilter {
            search: Some("x".to_string()),
            ..Default::default()
        };
        assert_eq!(searching.empty_hint(), "Try adjusting your filters");
        assert_eq!(UserFilter::default().empty_hint(), "Start by adding your first user");
    }
}
