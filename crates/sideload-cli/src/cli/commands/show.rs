//! `sideload show post|comment <id>` – print a stored body.

use anyhow::{bail, Result};
use sideload_core::content::ContentId;
use sideload_core::content_db::ContentDb;

pub async fn run_show(db: &ContentDb, id: ContentId) -> Result<()> {
    let Some(unit) = db.load_content(id).await? else {
        bail!("{} not found", id);
    };
    println!("{}", unit.body);
    Ok(())
}
