//! Application state

use std::sync::Arc;

use anyhow::Context;
use serde_json::Value;
use uuid::Uuid;

use taskdash_core::{seed, Board};

use crate::activity::{ActivityEvent, ActivityLog};
use crate::auth::{AuthSession, SessionStore, TokenSigner};
use crate::config::ServerConfig;
use crate::settings::SettingsStore;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ServerConfig,
    board: Board,
    sessions: SessionStore,
    settings: SettingsStore,
    activity: Option<ActivityLog>,
}

impl AppState {
    /// Create the state for `config`, seeding the demo organization when enabled
    pub async fn new(config: ServerConfig) -> anyhow::Result<Self> {
        let board = Board::in_memory();
        if config.seed_demo {
            seed::seed_demo(&board)
                .await
                .context("Failed to seed demo data")?;
        }
        Self::with_board(config, board).await
    }

    pub async fn with_board(config: ServerConfig, board: Board) -> anyhow::Result<Self> {
        let signer = TokenSigner::new(config.jwt_secret.clone(), config.token_ttl_seconds);
        let sessions = SessionStore::new(config.data_dir.clone(), signer)
            .await
            .context("Failed to initialize session cache")?;

        let activity = if config.activity_log {
            let log = ActivityLog::new(config.data_dir.join("activity"))
                .await
                .context("Failed to initialize activity log")?;
            Some(log)
        } else {
            None
        };

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                board,
                sessions,
                settings: SettingsStore::new(),
                activity,
            }),
        })
    }

    pub fn config(&self) -> &ServerConfig {
        &self.inner.config
    }

    pub fn board(&self) -> &Board {
        &self.inner.board
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.inner.sessions
    }

    pub fn settings(&self) -> &SettingsStore {
        &self.inner.settings
    }

    pub fn activity(&self) -> Option<&ActivityLog> {
        self.inner.activity.as_ref()
    }

    /// Append to the activity log; failures are logged and otherwise ignored
    pub async fn record(
        &self,
        session: &AuthSession,
        action: &str,
        target_id: Option<Uuid>,
        detail: Value,
    ) {
        let Some(log) = self.activity() else {
            return;
        };
        let event = ActivityEvent::new(
            session.user.id,
            session.user.name.clone(),
            action,
            target_id,
            detail,
        );
        if let Err(err) = log.append(event).await {
            tracing::warn!(action, "Failed to record activity: {}", err);
        }
    }
}
