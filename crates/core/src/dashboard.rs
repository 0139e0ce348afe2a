//! Dashboard statistics and greeting

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use crate::project::{Project, ProjectStatus};
use crate::task::{Task, TaskStatus};
use crate::user::{Role, User};

const RECENT_PROJECTS: usize = 3;
const RECENT_TASKS: usize = 4;

/// Counters shown on the dashboard
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_projects: usize,
    pub active_projects: usize,
    pub completed_projects: usize,
    pub total_tasks: usize,
    pub completed_tasks: usize,
    pub in_progress_tasks: usize,
    pub overdue_tasks: usize,
    pub team_members: usize,
}

impl DashboardStats {
    pub fn compute(projects: &[Project], tasks: &[Task], users: &[User], today: NaiveDate) -> Self {
        Self {
            total_projects: projects.len(),
            active_projects: count(projects, |p| p.status == ProjectStatus::InProgress),
            completed_projects: count(projects, |p| p.status == ProjectStatus::Completed),
            total_tasks: tasks.len(),
            completed_tasks: count(tasks, |t| t.status == TaskStatus::Completed),
            in_progress_tasks: count(tasks, |t| t.status == TaskStatus::InProgress),
            overdue_tasks: count(tasks, |t| t.is_overdue(today)),
            team_members: users.len(),
        }
    }

    pub fn progress_overview(&self) -> ProgressOverview {
        ProgressOverview {
            task_completion: ratio(self.completed_tasks, self.total_tasks),
            active_projects: ratio(self.active_projects, self.total_projects),
            project_completion: ratio(self.completed_projects, self.total_projects),
        }
    }
}

fn count<T>(items: &[T], predicate: impl Fn(&T) -> bool) -> usize {
    items.iter().filter(|item| predicate(item)).count()
}

fn ratio(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64
    }
}

/// Fractions (0.0..=1.0) drawn as the three progress rings
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressOverview {
    pub task_completion: f64,
    pub active_projects: f64,
    pub project_completion: f64,
}

/// A task in the "recent tasks" panel
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentTask {
    #[serde(flatten)]
    pub task: Task,
    pub overdue: bool,
}

/// Everything the dashboard page shows
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardView {
    pub greeting: String,
    pub tagline: &'static str,
    pub stats: DashboardStats,
    pub progress: ProgressOverview,
    pub recent_projects: Vec<Project>,
    pub recent_tasks: Vec<RecentTask>,
}

impl DashboardView {
    /// Build the view from data already narrowed to the viewer's scope
    pub fn build(
        viewer: &User,
        projects: Vec<Project>,
        tasks: Vec<Task>,
        users: &[User],
        today: NaiveDate,
        hour: u32,
    ) -> Self {
        let stats = DashboardStats::compute(&projects, &tasks, users, today);
        let progress = stats.progress_overview();
        Self {
            greeting: format!("{}, {}!", greeting(hour), viewer.name),
            tagline: tagline(viewer.role),
            stats,
            progress,
            recent_projects: projects.into_iter().take(RECENT_PROJECTS).collect(),
            recent_tasks: tasks
                .into_iter()
                .take(RECENT_TASKS)
                .map(|task| RecentTask {
                    overdue: task.is_overdue(today),
                    task,
                })
                .collect(),
        }
    }
}

/// Greeting for the viewer's local hour of day
pub fn greeting(hour: u32) -> &'static str {
    match hour {
        0..=11 => "Good morning",
        12..=17 => "Good afternoon",
        _ => "Good evening",
    }
}

pub fn tagline(role: Role) -> &'static str {
    match role {
        Role::Admin => "Manage your organization and oversee all projects",
        Role::ProjectManager => "Track your projects and manage your team",
        Role::TeamMember => "Stay on top of your tasks and collaborate with your team",
    }
}

/// Relative "last active" text for the user list
pub fn last_active_text(now: DateTime<Utc>, last_active: DateTime<Utc>) -> String {
    let minutes = (now - last_active).num_minutes().max(0);
    if minutes < 60 {
        format!("{} minutes ago", minutes)
    } else if minutes < 1440 {
        format!("{} hours ago", minutes / 60)
    } else {
        format!("{} days ago", minutes / 1440)
    }
}
