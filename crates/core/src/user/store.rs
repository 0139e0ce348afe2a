//! In-memory user store

use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::model::{CreateUserRequest, ProfileUpdate, User};
use super::password::{hash_password, verify_password};
use crate::{Error, Result};

const MIN_PASSWORD_LEN: usize = 8;

/// Thread-safe user store
#[derive(Clone, Default)]
pub struct UserStore {
    users: Arc<RwLock<HashMap<Uuid, User>>>,
}

impl UserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a fully built user record
    pub async fn insert(&self, user: User) -> Result<User> {
        let email = normalize_email(&user.email)?;
        let mut users = self.users.write().await;
        if users.contains_key(&user.id) {
            return Err(Error::Conflict(format!("User {} already exists", user.id)));
        }
        if users.values().any(|existing| existing.email == email) {
            return Err(Error::Conflict(format!("User '{}' already exists", email)));
        }

        let mut user = user;
        user.email = email;
        users.insert(user.id, user.clone());
        Ok(user)
    }

    /// Validate a creation request and store the resulting user
    pub async fn create(&self, request: CreateUserRequest) -> Result<User> {
        let name = request.name.trim();
        if name.is_empty() {
            return Err(Error::InvalidInput("Name cannot be empty".to_string()));
        }
        if request.password.len() < MIN_PASSWORD_LEN {
            return Err(Error::InvalidInput(format!(
                "Password must be at least {} characters",
                MIN_PASSWORD_LEN
            )));
        }

        let mut user = User::new(request.email, name, request.role);
        user.password_hash = hash_password(&request.password);
        if let Some(department) = request.department.filter(|d| !d.trim().is_empty()) {
            user = user.with_department(department.trim());
        }
        if let Some(avatar) = request.avatar.filter(|a| !a.trim().is_empty()) {
            user = user.with_avatar(avatar.trim());
        }

        let created = self.insert(user).await?;
        tracing::info!(user_id = %created.id, role = created.role.as_str(), "user created");
        Ok(created)
    }

    pub async fn get(&self, id: Uuid) -> Option<User> {
        let users = self.users.read().await;
        users.get(&id).cloned()
    }

    /// All users, oldest first
    pub async fn list(&self) -> Vec<User> {
        let users = self.users.read().await;
        let mut list: Vec<User> = users.values().cloned().collect();
        list.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.email.cmp(&b.email)));
        list
    }

    /// Check credentials and refresh `last_active` on success
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<User> {
        let email = email.trim().to_lowercase();
        let mut users = self.users.write().await;
        let user = users
            .values_mut()
            .find(|user| user.email == email)
            .filter(|user| verify_password(&user.password_hash, password))
            .ok_or_else(|| Error::Unauthorized("Invalid email or password".to_string()))?;

        if !user.is_active {
            return Err(Error::Forbidden("Account is inactive".to_string()));
        }

        user.last_active = Utc::now();
        Ok(user.clone())
    }

    /// Flip a user between active and inactive
    pub async fn toggle_active(&self, id: Uuid) -> Result<User> {
        self.modify(id, |user| {
            user.is_active = !user.is_active;
            Ok(())
        })
        .await
    }

    pub async fn update_profile(&self, id: Uuid, update: &ProfileUpdate) -> Result<User> {
        self.modify(id, |user| update.apply(user)).await
    }

    #[cfg(test)]
    pub(crate) async fn write_guard(
        &self,
    ) -> tokio::sync::RwLockWriteGuard<'_, HashMap<Uuid, User>> {
        self.users.write().await
    }

    async fn modify<F>(&self, id: Uuid, change: F) -> Result<User>
    where
        F: FnOnce(&mut User) -> Result<()>,
    {
        let mut users = self.users.write().await;
        let user = users
            .get_mut(&id)
            .ok_or_else(|| Error::UserNotFound(id.to_string()))?;
        let mut updated = user.clone();
        change(&mut updated)?;
        *user = updated.clone();
        Ok(updated)
    }
}

fn normalize_email(email: &str) -> Result<String> {
    let normalized = email.trim().to_lowercase();
    if normalized.is_empty() || !normalized.contains('@') {
        return Err(Error::InvalidInput("Invalid email".to_string()));
    }
    Ok(normalized)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::user::Role;

    fn request(email: &str) -> CreateUserRequest {
        CreateUserRequest {
            email: email.to_string(),
            name: "New Hire".to_string(),
            role: Role::TeamMember,
            password: "password123".to_string(),
            department: Some("Design".to_string()),
            avatar: None,
        }
    }

    #[tokio::test]
    async fn test_create_and_authenticate() {
        let store = UserStore::new();
        let user = store.create(request("Hire@Company.com")).await.unwrap();
        assert_eq!(user.email, "hire@company.com");
        assert_eq!(user.department.as_deref(), Some("Design"));

        let authed = store
            .authenticate(" HIRE@company.com", "password123")
            .await
            .unwrap();
        assert_eq!(authed.id, user.id);
        assert!(authed.last_active >= user.last_active);
    }

    #[tokio::test]
    async fn test_authenticate_rejects_bad_password() {
        let store = UserStore::new();
        store.create(request("hire@company.com")).await.unwrap();

        let result = store.authenticate("hire@company.com", "wrong-pass").await;
        assert!(matches!(result, Err(Error::Unauthorized(_))));

        let unknown = store.authenticate("nobody@company.com", "password123").await;
        assert!(matches!(unknown, Err(Error::Unauthorized(_))));
    }

    #[tokio::test]
    async fn test_inactive_user_cannot_authenticate() {
        let store = UserStore::new();
        let user = store.create(request("hire@company.com")).await.unwrap();
        let toggled = store.toggle_active(user.id).await.unwrap();
        assert!(!toggled.is_active);

        let result = store.authenticate("hire@company.com", "password123").await;
        assert!(matches!(result, Err(Error::Forbidden(_))));

        let toggled_back = store.toggle_active(user.id).await.unwrap();
        assert!(toggled_back.is_active);
    }

    #[tokio::test]
    async fn test_duplicate_email_conflicts() {
        let store = UserStore::new();
        store.create(request("hire@company.com")).await.unwrap();
        let result = store.create(request("HIRE@company.com")).await;
        assert!(matches!(result, Err(Error::Conflict(_))));
    }

    #[tokio::test]
    async fn test_create_validates_input() {
        let store = UserStore::new();

        let mut short = request("a@company.com");
        short.password = "short".to_string();
        assert!(matches!(store.create(short).await, Err(Error::InvalidInput(_))));

        let bad_email = request("not-an-email");
        assert!(matches!(
            store.create(bad_email).await,
            Err(Error::InvalidInput(_))
        ));

        let mut blank = request("b@company.com");
        blank.name = "  ".to_string();
        assert!(matches!(store.create(blank).await, Err(Error::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_toggle_unknown_user() {
        let store = UserStore::new();
        let result = store.toggle_active(Uuid::new_v4()).await;
        assert!(matches!(result, Err(Error::UserNotFound(_))));
    }

    #[tokio::test]
    async fn test_failed_profile_update_leaves_record_untouched() {
        let store = UserStore::new();
        let user = store.create(request("hire@company.com")).await.unwrap();
        let update = ProfileUpdate {
            name: Some(String::new()),
            department: Some("Ops".to_string()),
            avatar: None,
        };
        assert!(store.update_profile(user.id, &update).await.is_err());
        let stored = store.get(user.id).await.unwrap();
        assert_eq!(stored.name, "New Hire");
    }
}
