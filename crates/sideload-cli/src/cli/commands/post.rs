//! `sideload post add <file>` – store a post and sideload its images.

use anyhow::{Context, Result};
use sideload_core::hooks::{SaveEvent, SaveHandler};
use std::path::Path;

use super::check::print_summary;

pub async fn run_post_add(handler: &SaveHandler, path: &Path) -> Result<()> {
    let body = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("failed to read {}", path.display()))?;
    let id = handler.db().add_post(&body).await?;
    println!("Added post {id}");
    if let Some(summary) = handler.dispatch(SaveEvent::PostSaved(id)).await? {
        print_summary(&summary);
    }
    Ok(())
}
