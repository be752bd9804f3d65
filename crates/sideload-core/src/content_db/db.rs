//! Connection, migrations, and the content cache.

use anyhow::Result;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::{Pool, Sqlite};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::content::{ContentId, ContentUnit};

/// Percent-encode a path for use in a sqlite:// URI so spaces and special chars don't break parsing.
fn path_to_sqlite_uri(path: &Path) -> String {
    let s = path.to_string_lossy();
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '%' => out.push_str("%25"),
            ' ' => out.push_str("%20"),
            '#' => out.push_str("%23"),
            '?' => out.push_str("%3F"),
            '&' => out.push_str("%26"),
            c => out.push(c),
        }
    }
    format!("sqlite://{}", out)
}

/// Path of the default database: `~/.local/state/sideload/sideload.db`.
pub fn default_db_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("sideload")?;
    Ok(xdg_dirs.get_state_home().join("sideload.db"))
}

/// Handle to the SQLite-backed content repository. Clones share the pool and cache.
#[derive(Clone)]
pub struct ContentDb {
    pub(crate) pool: Pool<Sqlite>,
    cache: Arc<Mutex<HashMap<ContentId, ContentUnit>>>,
}

impl ContentDb {
    /// Open (or create) the database under the XDG state directory.
    pub async fn open_default() -> Result<Self> {
        Self::open_at(default_db_path()?).await
    }

    /// Open (or create) the database at a specific path. Creates parent dirs if needed.
    pub async fn open_at(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let uri = path_to_sqlite_uri(path) + "?mode=rwc";
        let pool = SqlitePoolOptions::new()
            .max_connections(8)
            .connect(&uri)
            .await?;
        Self::with_pool(pool).await
    }

    /// Private in-memory database (single connection so every query sees the same DB).
    pub async fn open_memory() -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await?;
        Self::with_pool(pool).await
    }

    async fn with_pool(pool: Pool<Sqlite>) -> Result<Self> {
        let db = ContentDb {
            pool,
            cache: Arc::new(Mutex::new(HashMap::new())),
        };
        db.migrate().await?;
        Ok(db)
    }

    async fn migrate(&self) -> Result<()> {
        // Comments hang off posts; attachments hang off the post that owns them.
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS posts (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                body TEXT NOT NULL,
                created_at INTEGER NOT NULL,
                updated_at INTEGER NOT NULL
            );
            CREATE TABLE IF NOT EXISTS comments (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                post_id INTEGER NOT NULL REFERENCES posts(id) ON DELETE CASCADE,
                body TEXT NOT NULL,
                created_at INTEGER NOT NULL,
                updated_at INTEGER NOT NULL
            );
            CREATE TABLE IF NOT EXISTS attachments (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                owner_id INTEGER NOT NULL REFERENCES posts(id) ON DELETE CASCADE,
                relative_path TEXT NOT NULL UNIQUE,
                filename TEXT NOT NULL,
                width INTEGER NOT NULL,
                height INTEGER NOT NULL,
                created_at INTEGER NOT NULL
            );
            CREATE INDEX IF NOT EXISTS comments_post_id ON comments(post_id);
            CREATE INDEX IF NOT EXISTS attachments_owner_id ON attachments(owner_id);
            "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub(crate) fn cached(&self, id: ContentId) -> Option<ContentUnit> {
        self.cache.lock().ok()?.get(&id).cloned()
    }

    pub(crate) fn cache_insert(&self, unit: ContentUnit) {
        if let Ok(mut cache) = self.cache.lock() {
            cache.insert(unit.id, unit);
        }
    }

    /// Evicts a content unit from the cache so the next load reads the database.
    pub fn invalidate_cache(&self, id: ContentId) {
        if let Ok(mut cache) = self.cache.lock() {
            if cache.remove(&id).is_some() {
                tracing::debug!(%id, "content cache invalidated");
            }
        }
    }
}

/// Current time as Unix seconds (for DB timestamps).
pub(crate) fn unix_timestamp() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs() as i64
}
