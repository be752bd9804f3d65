//! `sideload check post|comment <id>` and `sideload check-all` – re-run the sideload pass.

use anyhow::{bail, Result};
use sideload_core::content::ContentId;
use sideload_core::hooks::{HookSummary, SaveHandler};

pub(super) fn print_summary(summary: &HookSummary) {
    println!(
        "{}: {} sideloaded, {} failed, {}",
        summary.id,
        summary.sideloaded,
        summary.failed,
        if summary.changed { "updated" } else { "unchanged" }
    );
    if summary.unrecorded > 0 {
        eprintln!(
            "{}: {} attachment record(s) could not be written; see log",
            summary.id, summary.unrecorded
        );
    }
}

pub async fn run_check(handler: &SaveHandler, id: ContentId) -> Result<()> {
    match handler.on_content_saved(id).await? {
        Some(summary) => print_summary(&summary),
        None => bail!("{} not found", id),
    }
    Ok(())
}

pub async fn run_check_all(handler: &SaveHandler) -> Result<()> {
    let ids = handler.db().list_content_ids().await?;
    if ids.is_empty() {
        println!("No content in database.");
        return Ok(());
    }

    let (mut updated, mut sideloaded, mut failed) = (0usize, 0usize, 0usize);
    for id in ids {
        let Some(summary) = handler.on_content_saved(id).await? else {
            continue;
        };
        if summary.changed || summary.failed > 0 || summary.unrecorded > 0 {
            print_summary(&summary);
        }
        updated += usize::from(summary.changed);
        sideloaded += summary.sideloaded;
        failed += summary.failed;
    }
    println!("Done: {updated} updated, {sideloaded} sideloaded, {failed} failed");
    Ok(())
}
