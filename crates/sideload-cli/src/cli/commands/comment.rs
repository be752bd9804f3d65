//! `sideload comment add --post <id> <file>` – store a comment and sideload its images.

use anyhow::{Context, Result};
use sideload_core::hooks::{SaveEvent, SaveHandler};
use std::path::Path;

use super::check::print_summary;

pub async fn run_comment_add(handler: &SaveHandler, post_id: i64, path: &Path) -> Result<()> {
    let body = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("failed to read {}", path.display()))?;
    let id = handler.db().add_comment(post_id, &body).await?;
    println!("Added comment {id} on post {post_id}");
    if let Some(summary) = handler.dispatch(SaveEvent::CommentInserted(id)).await? {
        print_summary(&summary);
    }
    Ok(())
}
