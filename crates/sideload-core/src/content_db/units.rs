//! Posts and comments: create, load through the cache, save, list.

use anyhow::{bail, Result};
use sqlx::Row;

use super::db::{unix_timestamp, ContentDb};
use crate::content::{ContentId, ContentUnit, OwnerId};

impl ContentDb {
    /// Insert a new post; returns its id.
    pub async fn add_post(&self, body: &str) -> Result<i64> {
        let now = unix_timestamp();
        let id = sqlx::query(
            r#"
            INSERT INTO posts (body, created_at, updated_at)
            VALUES (?1, ?2, ?3)
            "#,
        )
        .bind(body)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await?
        .last_insert_rowid();

        Ok(id)
    }

    /// Insert a new comment on an existing post; returns its id.
    pub async fn add_comment(&self, post_id: i64, body: &str) -> Result<i64> {
        let exists = sqlx::query("SELECT 1 FROM posts WHERE id = ?1")
            .bind(post_id)
            .fetch_optional(&self.pool)
            .await?
            .is_some();
        if !exists {
            bail!("post {} not found", post_id);
        }

        let now = unix_timestamp();
        let id = sqlx::query(
            r#"
            INSERT INTO comments (post_id, body, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4)
            "#,
        )
        .bind(post_id)
        .bind(body)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await?
        .last_insert_rowid();

        Ok(id)
    }

    /// Loads a content unit, from the cache if present. `None` if it does not exist.
    ///
    /// A post owns itself; a comment is owned by its parent post.
    pub async fn load_content(&self, id: ContentId) -> Result<Option<ContentUnit>> {
        if let Some(unit) = self.cached(id) {
            return Ok(Some(unit));
        }

        let unit = match id {
            ContentId::Post(post_id) => sqlx::query("SELECT body FROM posts WHERE id = ?1")
                .bind(post_id)
                .fetch_optional(&self.pool)
                .await?
                .map(|row| ContentUnit {
                    id,
                    owner: OwnerId(post_id),
                    body: row.get("body"),
                }),
            ContentId::Comment(comment_id) => {
                sqlx::query("SELECT post_id, body FROM comments WHERE id = ?1")
                    .bind(comment_id)
                    .fetch_optional(&self.pool)
                    .await?
                    .map(|row| ContentUnit {
                        id,
                        owner: OwnerId(row.get("post_id")),
                        body: row.get("body"),
                    })
            }
        };

        if let Some(unit) = &unit {
            self.cache_insert(unit.clone());
        }
        Ok(unit)
    }

    /// Replaces the stored body. Leaves the cache alone; see [`ContentDb::invalidate_cache`].
    pub async fn save_content(&self, id: ContentId, body: &str) -> Result<()> {
        let now = unix_timestamp();
        let sql = match id {
            ContentId::Post(_) => "UPDATE posts SET body = ?1, updated_at = ?2 WHERE id = ?3",
            ContentId::Comment(_) => "UPDATE comments SET body = ?1, updated_at = ?2 WHERE id = ?3",
        };
        let raw_id = match id {
            ContentId::Post(n) | ContentId::Comment(n) => n,
        };
        let affected = sqlx::query(sql)
            .bind(body)
            .bind(now)
            .bind(raw_id)
            .execute(&self.pool)
            .await?
            .rows_affected();
        if affected == 0 {
            bail!("{} not found", id);
        }
        Ok(())
    }

    /// Every post then every comment, each in id order.
    pub async fn list_content_ids(&self) -> Result<Vec<ContentId>> {
        let posts = sqlx::query("SELECT id FROM posts ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        let comments = sqlx::query("SELECT id FROM comments ORDER BY id")
            .fetch_all(&self.pool)
            .await?;

        let mut out = Vec::with_capacity(posts.len() + comments.len());
        out.extend(posts.iter().map(|row| ContentId::Post(row.get("id"))));
        out.extend(comments.iter().map(|row| ContentId::Comment(row.get("id"))));
        Ok(out)
    }
}
