//! Attachment rows for sideloaded images.

use anyhow::Result;
use serde::Serialize;
use sqlx::Row;

use super::db::{unix_timestamp, ContentDb};
use crate::asset_store::StoredAsset;
use crate::content::OwnerId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Attachment {
    pub id: i64,
    pub owner: OwnerId,
    pub relative_path: String,
    pub filename: String,
    pub width: u32,
    pub height: u32,
    pub created_at: i64,
}

impl ContentDb {
    /// Records a persisted asset under its owning post; returns the attachment id.
    pub async fn record_attachment(&self, asset: &StoredAsset) -> Result<i64> {
        let id = sqlx::query(
            r#"
            INSERT INTO attachments (owner_id, relative_path, filename, width, height, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(asset.owner.0)
        .bind(&asset.relative_path)
        .bind(&asset.filename)
        .bind(asset.width as i64)
        .bind(asset.height as i64)
        .bind(unix_timestamp())
        .execute(&self.pool)
        .await?
        .last_insert_rowid();

        Ok(id)
    }

    /// Attachments of one post, oldest first.
    pub async fn list_attachments(&self, owner: OwnerId) -> Result<Vec<Attachment>> {
        let rows = sqlx::query(
            r#"
            SELECT id, owner_id, relative_path, filename, width, height, created_at
            FROM attachments
            WHERE owner_id = ?1
            ORDER BY id
            "#,
        )
        .bind(owner.0)
        .fetch_all(&self.pool)
        .await?;

        let mut out = Vec::with_capacity(rows.len());
        for row in rows {
            let width: i64 = row.get("width");
            let height: i64 = row.get("height");
            out.push(Attachment {
                id: row.get("id"),
                owner: OwnerId(row.get("owner_id")),
                relative_path: row.get("relative_path"),
                filename: row.get("filename"),
                width: u32::try_from(width).unwrap_or_default(),
                height: u32::try_from(height).unwrap_or_default(),
                created_at: row.get("created_at"),
            });
        }
        Ok(out)
    }
}
