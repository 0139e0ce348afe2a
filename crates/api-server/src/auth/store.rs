use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use uuid::Uuid;

use taskdash_core::user::{ProfileUpdate, User, UserStore};

use super::{AuthError, SessionClaims, TokenSigner};

/// A signed-in viewer resolved from a bearer token
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub session_id: Uuid,
    pub claims: SessionClaims,
    pub user: User,
}

#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub session: AuthSession,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CachedSession {
    id: Uuid,
    user: User,
    created_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct StoredSessions {
    sessions: Vec<CachedSession>,
}

/// Session cache holding the signed-in user records, persisted to `sessions.json`
#[derive(Clone)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<Uuid, CachedSession>>>,
    file_path: PathBuf,
    signer: TokenSigner,
}

impl SessionStore {
    pub async fn new(base_dir: PathBuf, signer: TokenSigner) -> Result<Self, AuthError> {
        tokio::fs::create_dir_all(&base_dir).await.map_err(|err| {
            AuthError::Storage(format!("Failed to create session directory: {}", err))
        })?;

        let file_path = base_dir.join("sessions.json");
        let sessions = load_sessions(&file_path).await?;
        tracing::debug!(count = sessions.len(), "loaded cached sessions");

        Ok(Self {
            sessions: Arc::new(RwLock::new(sessions)),
            file_path,
            signer,
        })
    }

    /// Check credentials, cache the user record and issue a token for it
    pub async fn login(
        &self,
        users: &UserStore,
        email: &str,
        password: &str,
    ) -> Result<LoginOutcome, AuthError> {
        let user = users.authenticate(email, password).await?;

        let session_id = Uuid::new_v4();
        let claims = self.signer.issue_claims(user.id, session_id, user.role)?;
        let token = self.signer.encode_claims(&claims)?;
        let now = Utc::now();
        let expires_at = DateTime::<Utc>::from_timestamp(claims.exp as i64, 0).unwrap_or(now);

        let mut sessions = self.sessions.write().await;
        let mut next: HashMap<Uuid, CachedSession> = sessions
            .iter()
            .filter(|(_, session)| session.expires_at > now)
            .map(|(id, session)| (*id, session.clone()))
            .collect();
        next.insert(
            session_id,
            CachedSession {
                id: session_id,
                user: user.clone(),
                created_at: now,
                expires_at,
            },
        );
        // The session only goes live once it is on disk
        persist_sessions(&self.file_path, &next).await?;
        *sessions = next;
        drop(sessions);

        tracing::info!(user_id = %user.id, session_id = %session_id, "user signed in");
        Ok(LoginOutcome {
            token,
            expires_at,
            session: AuthSession {
                session_id,
                claims,
                user,
            },
        })
    }

    /// Drop a cached session; its token stops authorizing
    pub async fn logout(&self, session_id: Uuid) -> Result<bool, AuthError> {
        let mut sessions = self.sessions.write().await;
        let removed = sessions.remove(&session_id).is_some();
        if removed {
            persist_sessions(&self.file_path, &sessions).await?;
        }
        Ok(removed)
    }

    pub async fn authorize_bearer(&self, token: &str) -> Result<AuthSession, AuthError> {
        let claims = self.signer.decode_claims(token)?;
        let user_id = claims.user_id()?;
        let session_id = claims.session_id()?;

        let sessions = self.sessions.read().await;
        let cached = sessions
            .get(&session_id)
            .ok_or_else(|| AuthError::Unauthorized("Session has ended".to_string()))?;
        if cached.user.id != user_id {
            return Err(AuthError::Unauthorized(
                "Token subject does not match session".to_string(),
            ));
        }

        Ok(AuthSession {
            session_id,
            claims,
            user: cached.user.clone(),
        })
    }

    /// Merge profile changes into the user store and every cached copy of the record
    pub async fn update_profile(
        &self,
        users: &UserStore,
        user_id: Uuid,
        update: &ProfileUpdate,
    ) -> Result<User, AuthError> {
        let updated = users.update_profile(user_id, update).await?;
        self.refresh_user(&updated).await?;
        Ok(updated)
    }

    /// Replace the cached record of a user in all of their sessions
    pub async fn refresh_user(&self, user: &User) -> Result<(), AuthError> {
        let mut sessions = self.sessions.write().await;
        let mut changed = false;
        for session in sessions.values_mut().filter(|s| s.user.id == user.id) {
            session.user = user.clone();
            changed = true;
        }
        if changed {
            persist_sessions(&self.file_path, &sessions).await?;
        }
        Ok(())
    }

    /// End every session of a user, returning how many were dropped
    pub async fn revoke_user(&self, user_id: Uuid) -> Result<usize, AuthError> {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, session| session.user.id != user_id);
        let revoked = before - sessions.len();
        if revoked > 0 {
            persist_sessions(&self.file_path, &sessions).await?;
            tracing::info!(user_id = %user_id, revoked, "revoked sessions");
        }
        Ok(revoked)
    }

    pub async fn active_count(&self) -> usize {
        self.sessions.read().await.len()
    }
}

async fn load_sessions(path: &Path) -> Result<HashMap<Uuid, CachedSession>, AuthError> {
    if !path.exists() {
        return Ok(HashMap::new());
    }
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|err| AuthError::Storage(format!("Failed to read sessions: {}", err)))?;
    if content.trim().is_empty() {
        return Ok(HashMap::new());
    }
    let stored: StoredSessions = serde_json::from_str(&content)
        .map_err(|err| AuthError::Storage(format!("Failed to parse sessions: {}", err)))?;

    let now = Utc::now();
    Ok(stored
        .sessions
        .into_iter()
        .filter(|session| session.expires_at > now)
        .map(|session| (session.id, session))
        .collect())
}

async fn persist_sessions(
    path: &Path,
    sessions: &HashMap<Uuid, CachedSession>,
) -> Result<(), AuthError> {
    let stored = StoredSessions {
        sessions: sessions.values().cloned().collect(),
    };
    let content = serde_json::to_string_pretty(&stored)
        .map_err(|err| AuthError::Storage(format!("Failed to serialize sessions: {}", err)))?;
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await.map_err(|err| {
            AuthError::Storage(format!("Failed to create session parent dir: {}", err))
        })?;
    }
    tokio::fs::write(path, content)
        .await
        .map_err(|err| AuthError::Storage(format!("Failed to write sessions: {}", err)))?;
    Ok(())
}
