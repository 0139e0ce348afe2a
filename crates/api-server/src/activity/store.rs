use std::path::{Path, PathBuf};

use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::RwLock;

use taskdash_core::Result;

use super::{ActivityEvent, ActivityListQuery};

const DEFAULT_LIMIT: usize = 100;
const MAX_LIMIT: usize = 1000;

/// Append-only log of mutations, stored as JSON lines
pub struct ActivityLog {
    events_path: PathBuf,
    events: RwLock<Vec<ActivityEvent>>,
}

impl ActivityLog {
    /// Open (or create) `events.jsonl` under `root_dir` and load what it holds
    pub async fn new(root_dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&root_dir).await?;
        let events_path = root_dir.join("events.jsonl");
        let events = read_events(&events_path).await?;
        tracing::debug!(count = events.len(), "loaded activity log");

        Ok(Self {
            events_path,
            events: RwLock::new(events),
        })
    }

    pub async fn append(&self, event: ActivityEvent) -> Result<()> {
        let mut line = serde_json::to_string(&event)?;
        line.push('\n');

        // Hold the lock across the write so lines land in memory order
        let mut events = self.events.write().await;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.events_path)
            .await?;
        file.write_all(line.as_bytes()).await?;
        file.flush().await?;

        events.push(event);
        Ok(())
    }

    /// Newest events first, with whether more remain past this page
    pub async fn list_paginated(&self, query: &ActivityListQuery) -> (Vec<ActivityEvent>, bool) {
        let offset = query.offset.unwrap_or(0);
        let limit = query.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
        let action = query
            .action
            .as_deref()
            .map(|raw| raw.trim().to_lowercase())
            .filter(|raw| !raw.is_empty());

        let events = self.events.read().await;
        let mut matching = events
            .iter()
            .rev()
            .filter(|event| {
                action
                    .as_deref()
                    .map_or(true, |action| event.action.to_lowercase().contains(action))
            })
            .filter(|event| query.actor_id.map_or(true, |actor| event.actor_id == actor))
            .skip(offset);

        let page: Vec<ActivityEvent> = matching.by_ref().take(limit).cloned().collect();
        let has_more = matching.next().is_some();
        (page, has_more)
    }
}

async fn read_events(path: &Path) -> Result<Vec<ActivityEvent>> {
    let content = match fs::read_to_string(path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(err) => return Err(err.into()),
    };

    let mut events = Vec::new();
    for (index, line) in content.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<ActivityEvent>(line) {
            Ok(event) => events.push(event),
            Err(err) => tracing::warn!(
                line = index + 1,
                "Skipping malformed activity event in {}: {}",
                path.display(),
                err
            ),
        }
    }
    Ok(events)
}
