//! User model definitions

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

use super::password::hash_password;
use crate::Error;

/// Role of a user in the organization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Role {
    Admin,
    ProjectManager,
    TeamMember,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::ProjectManager => "project-manager",
            Self::TeamMember => "team-member",
        }
    }

    /// Human-readable role name ("project manager")
    pub fn label(self) -> String {
        self.as_str().replace('-', " ")
    }

    /// Roles allowed to create and edit projects and tasks
    pub fn can_manage_work(self) -> bool {
        matches!(self, Self::Admin | Self::ProjectManager)
    }

    /// Roles allowed to create users and change their status
    pub fn can_manage_users(self) -> bool {
        matches!(self, Self::Admin)
    }

    /// Roles that may be selected as a project manager
    pub fn can_lead_projects(self) -> bool {
        matches!(self, Self::Admin | Self::ProjectManager)
    }

    /// Roles that may be assigned tasks
    pub fn can_take_tasks(self) -> bool {
        matches!(self, Self::ProjectManager | Self::TeamMember)
    }
}

impl FromStr for Role {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "admin" => Ok(Self::Admin),
            "project-manager" => Ok(Self::ProjectManager),
            "team-member" => Ok(Self::TeamMember),
            _ => Err(Error::InvalidInput(format!("Unsupported role '{}'", value))),
        }
    }
}

/// A user of the dashboard
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    pub created_at: DateTime<Utc>,
    pub last_active: DateTime<Utc>,
    pub is_active: bool,
    /// Salted password digest, never part of a response or the session cache
    #[serde(skip)]
    pub(crate) password_hash: String,
}

impl User {
    /// Create a new active user without a password
    pub fn new(email: impl Into<String>, name: impl Into<String>, role: Role) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            email: email.into(),
            name: name.into(),
            role,
            avatar: None,
            department: None,
            created_at: now,
            last_active: now,
            is_active: true,
            password_hash: String::new(),
        }
    }

    pub fn with_id(mut self, id: Uuid) -> Self {
        self.id = id;
        self
    }

    pub fn with_avatar(mut self, avatar: impl Into<String>) -> Self {
        self.avatar = Some(avatar.into());
        self
    }

    pub fn with_department(mut self, department: impl Into<String>) -> Self {
        self.department = Some(department.into());
        self
    }

    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }

    pub fn with_last_active(mut self, last_active: DateTime<Utc>) -> Self {
        self.last_active = last_active;
        self
    }

    pub fn with_password(mut self, password: &str) -> Self {
        self.password_hash = hash_password(password);
        self
    }
}

/// Request to create a user from the user management page
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    pub email: String,
    pub name: String,
    pub role: Role,
    pub password: String,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub avatar: Option<String>,
}

/// Profile fields a signed-in user may change on their own record
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub department: Option<String>,
}

impl ProfileUpdate {
    /// Merge the provided fields into a user record
    pub fn apply(&self, user: &mut User) -> crate::Result<()> {
        if let Some(name) = &self.name {
            let name = name.trim();
            if name.is_empty() {
                return Err(Error::InvalidInput("Name cannot be empty".to_string()));
            }
            user.name = name.to_string();
        }
        if let Some(avatar) = &self.avatar {
            user.avatar = non_empty(avatar);
        }
        if let Some(department) = &self.department {
            user.department = non_empty(department);
        }
        Ok(())
    }
}

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Counters shown above the user list
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStats {
    pub total: usize,
    pub active: usize,
    pub admins: usize,
    pub managers: usize,
}

impl UserStats {
    pub fn from_users<'a>(users: impl IntoIterator<Item = &'a User>) -> Self {
        users.into_iter().fold(Self::default(), |mut stats, user| {
            stats.total += 1;
            if user.is_active {
                stats.active += 1;
            }
            match user.role {
                Role::Admin => stats.admins += 1,
                Role::ProjectManager => stats.managers += 1,
                Role::TeamMember => {}
            }
            stats
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_user() {
        let user = User::new("dev@company.com", "Dev", Role::TeamMember);
        assert_eq!(user.email, "dev@company.com");
        assert!(user.is_active);
        assert!(user.avatar.is_none());
        assert!(user.department.is_none());
    }

    #[test]
    fn test_role_wire_format_and_label() {
        let json = serde_json::to_string(&Role::ProjectManager).unwrap();
        assert_eq!(json, "\"project-manager\"");
        assert_eq!(Role::ProjectManager.label(), "project manager");
        assert_eq!("team-member".parse::<Role>().unwrap(), Role::TeamMember);
        assert!("owner".parse::<Role>().is_err());
    }

    #[test]
    fn test_password_hash_is_not_serialized() {
        let user = User::new("a@b.c", "A", Role::Admin).with_password("password123");
        let value = serde_json::to_value(&user).unwrap();
        assert!(value.get("passwordHash").is_none());
        assert!(value.get("password_hash").is_none());
        assert_eq!(value["isActive"], true);
    }

    #[test]
    fn test_profile_update_merges_fields() {
        let mut user = User::new("a@b.c", "A", Role::TeamMember).with_department("Design");
        let update = ProfileUpdate {
            name: Some("  Alice ".to_string()),
            avatar: None,
            department: Some(String::new()),
        };
        update.apply(&mut user).unwrap();
        assert_eq!(user.name, "Alice");
        assert!(user.department.is_none());

        let blank = ProfileUpdate {
            name: Some(" ".to_string()),
            ..Default::default()
        };
        assert!(blank.apply(&mut user).is_err());
    }

    #[test]
    fn test_user_stats() {
        let mut inactive = User::new("c@x.io", "C", Role::TeamMember);
        inactive.is_active = false;
        let users = vec![
            User::new("a@x.io", "A", Role::Admin),
            User::new("b@x.io", "B", Role::ProjectManager),
            inactive,
        ];
        let stats = UserStats::from_users(&users);
        assert_eq!(
            stats,
            UserStats {
                total: 3,
                active: 2,
                admins: 1,
                managers: 1
            }
        );
    }
}
