//! In-memory project store

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::Error;
use crate::Result;

use super::model::Project;

/// Thread-safe project store
#[derive(Clone, Default)]
pub struct ProjectStore {
    projects: Arc<RwLock<HashMap<Uuid, Project>>>,
}

impl ProjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a new project
    pub async fn insert(&self, project: Project) -> Result<Project> {
        let mut projects = self.projects.write().await;
        if projects.contains_key(&project.id) {
            return Err(Error::Conflict(format!(
                "Project with ID {} already exists",
                project.id
            )));
        }
        projects.insert(project.id, project.clone());
        Ok(project)
    }

    /// Get a project by ID
    pub async fn get(&self, id: Uuid) -> Option<Project> {
        let projects = self.projects.read().await;
        projects.get(&id).cloned()
    }

    /// List all projects, oldest first
    pub async fn list(&self) -> Vec<Project> {
        let projects = self.projects.read().await;
        let mut list: Vec<Project> = projects.values().cloned().collect();
        list.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.title.cmp(&b.title)));
        list
    }

    /// Rebuild a project from its current record under the write lock, refreshing `updated_at`
    pub async fn modify<F>(&self, id: Uuid, change: F) -> Result<Project>
    where
        F: FnOnce(&Project) -> Result<Project>,
    {
        let mut projects = self.projects.write().await;
        let current = projects
            .get_mut(&id)
            .ok_or_else(|| Error::ProjectNotFound(id.to_string()))?;

        let mut updated = change(current)?;
        updated.id = id;
        updated.updated_at = chrono::Utc::now();
        *current = updated.clone();
        Ok(updated)
    }

    /// Add or remove a team member
    pub async fn toggle_team_member(&self, project_id: Uuid, user_id: Uuid) -> Result<Project> {
        let mut projects = self.projects.write().await;
        let project = projects
            .get_mut(&project_id)
            .ok_or_else(|| Error::ProjectNotFound(project_id.to_string()))?;
        project.toggle_member(user_id);
        project.updated_at = chrono::Utc::now();
        Ok(project.clone())
    }

    /// Delete a project
    pub async fn delete(&self, id: Uuid) -> Option<Project> {
        let mut projects = self.projects.write().await;
        projects.remove(&id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn project(title: &str) -> Project {
        Project::new(
            title,
            "description",
            Uuid::new_v4(),
            NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            NaiveDate::from_ymd_opt(2024, 4, 30).unwrap(),
        )
    }

    #[tokio::test]
    async fn test_create_project_store() {
        let store = ProjectStore::new();
        assert!(store.list().await.is_empty());
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        let store = ProjectStore::new();
        let created = store.insert(project("Redesign")).await.unwrap();

        let fetched = store.get(created.id).await.unwrap();
        assert_eq!(fetched.title, "Redesign");
        assert!(store.get(Uuid::new_v4()).await.is_none());

        let duplicate = store.insert(created).await;
        assert!(matches!(duplicate, Err(Error::Conflict(_))));
    }

    #[tokio::test]
    async fn test_modify_starts_from_current_record() {
        let store = ProjectStore::new();
        let created = store.insert(project("Redesign")).await.unwrap();
        let member = Uuid::new_v4();
        store.toggle_team_member(created.id, member).await.unwrap();

        let updated = store
            .modify(created.id, |current| {
                let mut changed = current.clone();
                changed.progress = 65;
                Ok(changed)
            })
            .await
            .unwrap();
        assert_eq!(updated.progress, 65);
        assert!(updated.has_member(member));
        assert!(updated.updated_at >= created.updated_at);

        let rejected = store
            .modify(created.id, |_| Err(Error::InvalidInput("no".to_string())))
            .await;
        assert!(matches!(rejected, Err(Error::InvalidInput(_))));
        assert_eq!(store.get(created.id).await.unwrap().progress, 65);

        let missing = store.modify(Uuid::new_v4(), |p| Ok(p.clone())).await;
        assert!(matches!(missing, Err(Error::ProjectNotFound(_))));
    }

    #[tokio::test]
    async fn test_toggle_team_member() {
        let store = ProjectStore::new();
        let created = store.insert(project("A")).await.unwrap();
        let member = Uuid::new_v4();

        let added = store.toggle_team_member(created.id, member).await.unwrap();
        assert!(added.has_member(member));
        let removed = store.toggle_team_member(created.id, member).await.unwrap();
        assert!(!removed.has_member(member));
    }

    #[tokio::test]
    async fn test_delete_project() {
        let store = ProjectStore::new();
        let created = store.insert(project("A")).await.unwrap();

        assert!(store.delete(created.id).await.is_some());
        assert!(store.delete(created.id).await.is_none());
        assert!(store.get(created.id).await.is_none());
    }
}
