//! Role-based visibility and permissions
//!
//! Every list is narrowed to what the viewer's role may see before any
//! search or filter runs, and every write checks the viewer's role.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::str::FromStr;
use uuid::Uuid;

use crate::project::Project;
use crate::task::Task;
use crate::user::{Role, User};

/// The signed-in user as seen by access checks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewer {
    pub id: Uuid,
    pub role: Role,
}

impl Viewer {
    pub fn new(id: Uuid, role: Role) -> Self {
        Self { id, role }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Admins see every project, managers the ones they lead, members the ones they staff
    pub fn can_see_project(&self, project: &Project) -> bool {
        match self.role {
            Role::Admin => true,
            Role::ProjectManager => project.manager_id == self.id,
            Role::TeamMember => project.has_member(self.id),
        }
    }

    /// `project` is the task's parent, if it still exists
    pub fn can_see_task(&self, task: &Task, project: Option<&Project>) -> bool {
        match self.role {
            Role::Admin => true,
            Role::ProjectManager => project.is_some_and(|p| p.manager_id == self.id),
            Role::TeamMember => task.assignee_id == self.id,
        }
    }

    /// Admins see everyone, managers every non-admin, members nobody
    pub fn can_see_user(&self, user: &User) -> bool {
        match self.role {
            Role::Admin => true,
            Role::ProjectManager => user.role != Role::Admin,
            Role::TeamMember => false,
        }
    }

    pub fn visible_projects(&self, projects: Vec<Project>) -> Vec<Project> {
        projects
            .into_iter()
            .filter(|p| self.can_see_project(p))
            .collect()
    }

    pub fn visible_tasks(&self, tasks: Vec<Task>, projects: &[Project]) -> Vec<Task> {
        let managed: HashSet<Uuid> = projects
            .iter()
            .filter(|p| p.manager_id == self.id)
            .map(|p| p.id)
            .collect();
        tasks
            .into_iter()
            .filter(|t| match self.role {
                Role::Admin => true,
                Role::ProjectManager => managed.contains(&t.project_id),
                Role::TeamMember => t.assignee_id == self.id,
            })
            .collect()
    }

    pub fn visible_users(&self, users: Vec<User>) -> Vec<User> {
        users.into_iter().filter(|u| self.can_see_user(u)).collect()
    }

    pub fn can_create_project(&self) -> bool {
        self.role.can_manage_work()
    }

    pub fn can_edit_project(&self, project: &Project) -> bool {
        self.role.can_manage_work() && self.can_see_project(project)
    }

    pub fn can_delete_project(&self) -> bool {
        self.is_admin()
    }

    pub fn can_create_task(&self) -> bool {
        self.role.can_manage_work()
    }

    /// Managers may only add tasks to projects they lead
    pub fn can_create_task_in(&self, project: &Project) -> bool {
        match self.role {
            Role::Admin => true,
            Role::ProjectManager => project.manager_id == self.id,
            Role::TeamMember => false,
        }
    }

    /// Admins, managers and the task's own assignee may edit it
    pub fn can_edit_task(&self, task: &Task, project: Option<&Project>) -> bool {
        self.can_see_task(task, project)
            && (self.role.can_manage_work() || task.assignee_id == self.id)
    }

    pub fn can_delete_task(&self, task: &Task, project: Option<&Project>) -> bool {
        self.role.can_manage_work() && self.can_see_task(task, project)
    }

    /// Admins manage the user list; managers see it as their team page
    pub fn can_list_users(&self) -> bool {
        matches!(self.role, Role::Admin | Role::ProjectManager)
    }

    pub fn can_manage_users(&self) -> bool {
        self.role.can_manage_users()
    }

    pub fn capabilities(&self) -> Capabilities {
        Capabilities {
            create_projects: self.can_create_project(),
            create_tasks: self.can_create_task(),
            list_users: self.can_list_users(),
            manage_users: self.can_manage_users(),
        }
    }
}

impl From<&User> for Viewer {
    fn from(user: &User) -> Self {
        Self::new(user.id, user.role)
    }
}

/// What the viewer may do, for toggling buttons on the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Capabilities {
    pub create_projects: bool,
    pub create_tasks: bool,
    pub list_users: bool,
    pub manage_users: bool,
}

/// Pages of the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Page {
    Dashboard,
    Projects,
    Tasks,
    Users,
    Team,
    Settings,
}

impl Page {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Dashboard => "dashboard",
            Self::Projects => "projects",
            Self::Tasks => "tasks",
            Self::Users => "users",
            Self::Team => "team",
            Self::Settings => "settings",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Dashboard => "Dashboard",
            Self::Projects => "Projects",
            Self::Tasks => "Tasks",
            Self::Users => "Users",
            Self::Team => "Team",
            Self::Settings => "Settings",
        }
    }

    /// Whether a role may open this page
    pub fn is_open_to(self, role: Role) -> bool {
        match self {
            Self::Users => role == Role::Admin,
            Self::Team => role == Role::ProjectManager,
            _ => true,
        }
    }

    /// The page actually shown: unknown or closed pages fall back to the dashboard
    pub fn resolve(requested: &str, role: Role) -> Self {
        requested
            .parse::<Self>()
            .ok()
            .filter(|page| page.is_open_to(role))
            .unwrap_or(Self::Dashboard)
    }
}

impl FromStr for Page {
    type Err = crate::Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "dashboard" => Ok(Self::Dashboard),
            "projects" => Ok(Self::Projects),
            "tasks" => Ok(Self::Tasks),
            "users" => Ok(Self::Users),
            "team" => Ok(Self::Team),
            "settings" => Ok(Self::Settings),
            _ => Err(crate::Error::NotFound(format!("Page '{}'", value))),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NavItem {
    pub id: Page,
    pub label: &'static str,
}

/// Sidebar entries for a role, in display order
pub fn navigation(role: Role) -> Vec<NavItem> {
    [
        Page::Dashboard,
        Page::Projects,
        Page::Tasks,
        Page::Users,
        Page::Team,
        Page::Settings,
    ]
    .into_iter()
    .filter(|page| page.is_open_to(role))
    .map(|page| NavItem {
        id: page,
        label: page.label(),
    })
    .collect()
}
