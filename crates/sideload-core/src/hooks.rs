//! Save hooks: run the content pipeline when a post or comment is saved and
//! write the rewritten body back.

use anyhow::{Context, Result};
use serde::Serialize;
use std::sync::Arc;

use crate::allow_list::AllowListPolicy;
use crate::asset_store::LocalAssetStore;
use crate::config::SideloadConfig;
use crate::content::ContentId;
use crate::content_db::ContentDb;
use crate::pipeline::ContentPipeline;
use crate::sideload::SideloadEngine;

/// Content events that trigger a sideload pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveEvent {
    PostSaved(i64),
    CommentInserted(i64),
    CommentEdited(i64),
}

impl SaveEvent {
    pub fn content_id(self) -> ContentId {
        match self {
            SaveEvent::PostSaved(id) => ContentId::Post(id),
            SaveEvent::CommentInserted(id) | SaveEvent::CommentEdited(id) => ContentId::Comment(id),
        }
    }
}

/// What one hook run did. Ineligible references count as neither sideloaded nor failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HookSummary {
    #[serde(skip)]
    pub id: ContentId,
    pub changed: bool,
    pub sideloaded: usize,
    pub failed: usize,
    /// Persisted files whose attachment row could not be written.
    pub unrecorded: usize,
}

/// Owns the collaborators a hook run needs. Cheap to clone.
#[derive(Clone)]
pub struct SaveHandler {
    db: ContentDb,
    store: Arc<LocalAssetStore>,
    policy: Arc<AllowListPolicy>,
    local_prefixes: Arc<[String]>,
}

impl SaveHandler {
    pub fn new(
        db: ContentDb,
        store: LocalAssetStore,
        policy: AllowListPolicy,
        local_prefixes: Vec<String>,
    ) -> Self {
        Self {
            db,
            store: Arc::new(store),
            policy: Arc::new(policy),
            local_prefixes: local_prefixes.into(),
        }
    }

    pub fn from_config(db: ContentDb, cfg: &SideloadConfig) -> Result<Self> {
        let store = LocalAssetStore::from_config(cfg)?;
        Ok(Self::new(db, store, cfg.allow_list_policy(), cfg.local_prefixes()))
    }

    pub fn db(&self) -> &ContentDb {
        &self.db
    }

    pub fn policy(&self) -> &AllowListPolicy {
        &self.policy
    }

    pub fn local_prefixes(&self) -> &[String] {
        &self.local_prefixes
    }

    pub async fn dispatch(&self, event: SaveEvent) -> Result<Option<HookSummary>> {
        tracing::debug!(?event, "save event");
        self.on_content_saved(event.content_id()).await
    }

    /// Sideloads every eligible image in the unit and saves it if it changed.
    ///
    /// Returns `None` when the content does not exist. Per-reference failures
    /// are counted, not returned; only loading or saving the body fails the
    /// call. The body is saved before attachment rows are written, so a failed
    /// row never discards rewrites that point at files already on disk.
    pub async fn on_content_saved(&self, id: ContentId) -> Result<Option<HookSummary>> {
        let Some(unit) = self.db.load_content(id).await? else {
            tracing::debug!(%id, "content not found, nothing to sideload");
            return Ok(None);
        };

        let store = Arc::clone(&self.store);
        let policy = Arc::clone(&self.policy);
        let local_prefixes = Arc::clone(&self.local_prefixes);
        let (content, changed, sideloaded, failed, assets) = tokio::task::spawn_blocking(move || {
            let engine = SideloadEngine::new(store.as_ref(), policy.as_ref(), &local_prefixes);
            let outcome = ContentPipeline::new(engine).run(&unit.body, unit.owner);
            let (sideloaded, failed) = (outcome.sideloaded(), outcome.failed());
            (outcome.content, outcome.changed, sideloaded, failed, store.take_persisted())
        })
        .await
        .context("sideload task failed")?;

        if changed {
            self.db.save_content(id, &content).await?;
            self.db.invalidate_cache(id);
        }

        let mut unrecorded = 0;
        for asset in &assets {
            if let Err(e) = self.db.record_attachment(asset).await {
                tracing::warn!(%id, path = %asset.relative_path, error = %e, "failed to record attachment");
                unrecorded += 1;
            }
        }

        let summary = HookSummary {
            id,
            changed,
            sideloaded,
            failed,
            unrecorded,
        };
        tracing::info!(%id, changed, sideloaded, failed, unrecorded, "sideload pass finished");
        Ok(Some(summary))
    }
}
