//! The dashboard's operations over users, projects and tasks
//!
//! `Board` ties the three stores together and enforces role-based access and
//! cross-entity validation on every operation.

use chrono::NaiveDate;
use std::sync::Arc;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::access::Viewer;
use crate::dashboard::DashboardView;
use crate::filter::{ProjectFilter, TaskFilter, UserFilter};
use crate::project::{Project, ProjectDraft, ProjectPatch, ProjectStore};
use crate::task::{MemoryTaskStore, Task, TaskDraft, TaskPatch, TaskRepository};
use crate::user::{CreateUserRequest, User, UserStore};
use crate::{Error, Result};

#[derive(Clone)]
pub struct Board {
    users: UserStore,
    projects: ProjectStore,
    tasks: Arc<dyn TaskRepository>,
    /// Held by project mutations and task placement so a task never lands in a deleted project
    writes: Arc<Mutex<()>>,
}

impl Board {
    pub fn new(users: UserStore, projects: ProjectStore, tasks: Arc<dyn TaskRepository>) -> Self {
        Self {
            users,
            projects,
            tasks,
            writes: Arc::new(Mutex::new(())),
        }
    }

    /// An empty board backed by in-memory stores
    pub fn in_memory() -> Self {
        Self::new(
            UserStore::new(),
            ProjectStore::new(),
            Arc::new(MemoryTaskStore::new()),
        )
    }

    pub fn users(&self) -> &UserStore {
        &self.users
    }

    pub fn projects(&self) -> &ProjectStore {
        &self.projects
    }

    pub fn tasks(&self) -> &dyn TaskRepository {
        self.tasks.as_ref()
    }

    // ------------------------------------------------------------------
    // Projects
    // ------------------------------------------------------------------

    pub async fn list_projects(&self, viewer: &Viewer, filter: &ProjectFilter) -> Vec<Project> {
        let visible = viewer.visible_projects(self.projects.list().await);
        filter.apply(visible)
    }

    /// A project the viewer may see; hidden projects read as missing
    pub async fn get_project(&self, viewer: &Viewer, id: Uuid) -> Result<Project> {
        self.projects
            .get(id)
            .await
            .filter(|p| viewer.can_see_project(p))
            .ok_or_else(|| Error::ProjectNotFound(id.to_string()))
    }

    pub async fn create_project(
        &self,
        viewer: &Viewer,
        draft: ProjectDraft,
        today: NaiveDate,
    ) -> Result<Project> {
        if !viewer.can_create_project() {
            return Err(Error::Forbidden(
                "Only admins and project managers can create projects".to_string(),
            ));
        }
        let project = draft.into_project(today)?;
        self.check_project_people(&project).await?;

        let created = self.projects.insert(project).await?;
        tracing::info!(project_id = %created.id, actor = %viewer.id, "project created");
        Ok(created)
    }

    pub async fn update_project(
        &self,
        viewer: &Viewer,
        id: Uuid,
        patch: &ProjectPatch,
    ) -> Result<Project> {
        let _writes = self.writes.lock().await;
        let existing = self.get_project(viewer, id).await?;
        if !viewer.can_edit_project(&existing) {
            return Err(Error::Forbidden(
                "Insufficient role to edit projects".to_string(),
            ));
        }
        self.check_project_people(&patch.apply_to(&existing)?).await?;

        let updated = self
            .projects
            .modify(id, |current| patch.apply_to(current))
            .await?;
        tracing::info!(project_id = %updated.id, actor = %viewer.id, "project updated");
        Ok(updated)
    }

    /// Delete a project and its tasks, returning the project and the number of tasks removed
    pub async fn delete_project(&self, viewer: &Viewer, id: Uuid) -> Result<(Project, usize)> {
        if !viewer.can_delete_project() {
            return Err(Error::Forbidden(
                "Only admins can delete projects".to_string(),
            ));
        }
        let _writes = self.writes.lock().await;
        let project = self
            .projects
            .delete(id)
            .await
            .ok_or_else(|| Error::ProjectNotFound(id.to_string()))?;
        let removed_tasks = self.tasks.delete_by_project(id).await?;
        tracing::info!(project_id = %id, removed_tasks, "project deleted");
        Ok((project, removed_tasks))
    }

    pub async fn toggle_project_member(
        &self,
        viewer: &Viewer,
        project_id: Uuid,
        user_id: Uuid,
    ) -> Result<Project> {
        let _writes = self.writes.lock().await;
        let project = self.get_project(viewer, project_id).await?;
        if !viewer.can_edit_project(&project) {
            return Err(Error::Forbidden(
                "Insufficient role to edit projects".to_string(),
            ));
        }
        let user = self
            .users
            .get(user_id)
            .await
            .ok_or_else(|| Error::UserNotFound(user_id.to_string()))?;
        if !project.has_member(user_id) {
            check_team_role(&user)?;
        }
        self.projects.toggle_team_member(project_id, user_id).await
    }

    async fn check_project_people(&self, project: &Project) -> Result<()> {
        let manager = self
            .users
            .get(project.manager_id)
            .await
            .ok_or_else(|| Error::InvalidInput("Project manager does not exist".to_string()))?;
        if !manager.role.can_lead_projects() {
            return Err(Error::InvalidInput(format!(
                "{} cannot manage projects",
                manager.name
            )));
        }
        for member in &project.team_members {
            let user = self.users.get(*member).await.ok_or_else(|| {
                Error::InvalidInput(format!("Team member {} does not exist", member))
            })?;
            check_team_role(&user)?;
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Tasks
    // ------------------------------------------------------------------

    pub async fn list_tasks(&self, viewer: &Viewer, filter: &TaskFilter) -> Result<Vec<Task>> {
        let projects = self.projects.list().await;
        let visible = viewer.visible_tasks(self.tasks.list().await?, &projects);
        Ok(filter.apply(visible))
    }

    /// A task the viewer may see, with its parent project
    pub async fn get_task(&self, viewer: &Viewer, id: Uuid) -> Result<(Task, Option<Project>)> {
        let task = self
            .tasks
            .get(id)
            .await?
            .ok_or_else(|| Error::TaskNotFound(id.to_string()))?;
        let project = self.projects.get(task.project_id).await;
        if !viewer.can_see_task(&task, project.as_ref()) {
            return Err(Error::TaskNotFound(id.to_string()));
        }
        Ok((task, project))
    }

    pub async fn create_task(&self, viewer: &Viewer, draft: TaskDraft) -> Result<Task> {
        if !viewer.can_create_task() {
            return Err(Error::Forbidden(
                "Only admins and project managers can create tasks".to_string(),
            ));
        }
        let task = draft.into_task()?;
        let _writes = self.writes.lock().await;
        self.check_task_placement(viewer, &task).await?;

        let created = self.tasks.create(task).await?;
        tracing::info!(task_id = %created.id, project_id = %created.project_id, "task created");
        Ok(created)
    }

    pub async fn update_task(&self, viewer: &Viewer, id: Uuid, patch: &TaskPatch) -> Result<Task> {
        let _writes = if patch.reassigns() {
            Some(self.writes.lock().await)
        } else {
            None
        };
        let (existing, project) = self.get_task(viewer, id).await?;
        if !viewer.can_edit_task(&existing, project.as_ref()) {
            return Err(Error::Forbidden("Cannot edit this task".to_string()));
        }
        if patch.reassigns() && !viewer.role.can_manage_work() {
            return Err(Error::Forbidden(
                "Only admins and project managers can reassign tasks".to_string(),
            ));
        }
        let task = patch.apply_to(&existing)?;
        if patch.reassigns() {
            self.check_task_placement(viewer, &task).await?;
        }

        let updated = self.tasks.update(task).await?;
        tracing::info!(task_id = %updated.id, status = updated.status.as_str(), "task updated");
        Ok(updated)
    }

    pub async fn delete_task(&self, viewer: &Viewer, id: Uuid) -> Result<Task> {
        let (task, project) = self.get_task(viewer, id).await?;
        if !viewer.can_delete_task(&task, project.as_ref()) {
            return Err(Error::Forbidden("Cannot delete this task".to_string()));
        }
        self.tasks.delete(id).await?;
        tracing::info!(task_id = %id, "task deleted");
        Ok(task)
    }

    async fn check_task_placement(&self, viewer: &Viewer, task: &Task) -> Result<()> {
        let project = self
            .projects
            .get(task.project_id)
            .await
            .ok_or_else(|| Error::InvalidInput("Project does not exist".to_string()))?;
        if !viewer.can_create_task_in(&project) {
            return Err(Error::Forbidden(
                "Tasks can only be added to projects you manage".to_string(),
            ));
        }
        let assignee = self
            .users
            .get(task.assignee_id)
            .await
            .ok_or_else(|| Error::InvalidInput("Assignee does not exist".to_string()))?;
        if !assignee.role.can_take_tasks() {
            return Err(Error::InvalidInput(format!(
                "{} cannot be assigned tasks",
                assignee.name
            )));
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Users
    // ------------------------------------------------------------------

    pub async fn list_users(&self, viewer: &Viewer, filter: &UserFilter) -> Result<Vec<User>> {
        if !viewer.can_list_users() {
            return Err(Error::Forbidden("Cannot view the user list".to_string()));
        }
        let visible = viewer.visible_users(self.users.list().await);
        Ok(filter.apply(visible))
    }

    pub async fn create_user(&self, viewer: &Viewer, request: CreateUserRequest) -> Result<User> {
        if !viewer.can_manage_users() {
            return Err(Error::Forbidden("Only admins can add users".to_string()));
        }
        self.users.create(request).await
    }

    pub async fn toggle_user_status(&self, viewer: &Viewer, id: Uuid) -> Result<User> {
        if !viewer.can_manage_users() {
            return Err(Error::Forbidden(
                "Only admins can change user status".to_string(),
            ));
        }
        if viewer.id == id {
            return Err(Error::InvalidInput(
                "You cannot deactivate your own account".to_string(),
            ));
        }
        let user = self.users.toggle_active(id).await?;
        tracing::info!(user_id = %id, active = user.is_active, "user status toggled");
        Ok(user)
    }

    // ------------------------------------------------------------------
    // Dashboard
    // ------------------------------------------------------------------

    pub async fn dashboard(&self, viewer: &User, today: NaiveDate, hour: u32) -> Result<DashboardView> {
        let scope = Viewer::from(viewer);
        let projects = self.projects.list().await;
        let tasks = scope.visible_tasks(self.tasks.list().await?, &projects);
        let projects = scope.visible_projects(projects);
        let users = scope.visible_users(self.users.list().await);
        Ok(DashboardView::build(viewer, projects, tasks, &users, today, hour))
    }
}

fn check_team_role(user: &User) -> Result<()> {
    if user.role.can_take_tasks() {
        Ok(())
    } else {
        Err(Error::InvalidInput(format!(
            "{} cannot join a project team",
            user.name
        )))
    }
}
