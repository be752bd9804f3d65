//! `sideload scan <file> [--json]` – dry run over a file: references and their eligibility.

use anyhow::{Context, Result};
use serde::Serialize;
use sideload_core::config::SideloadConfig;
use sideload_core::html;
use sideload_core::markdown;
use sideload_core::pipeline::Pass;
use sideload_core::reference::{ExplicitSize, ImageReference};
use sideload_core::sideload::{Eligibility, IneligibleReason};
use std::path::Path;

#[derive(Debug, Serialize)]
struct ScanEntry {
    pass: Pass,
    source_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    size: Option<ExplicitSize>,
    eligible: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<IneligibleReason>,
    #[serde(skip_serializing_if = "Option::is_none")]
    filename: Option<String>,
}

fn entry(pass: Pass, reference: ImageReference, eligibility: &Eligibility<'_>) -> ScanEntry {
    let checked = eligibility.check(&reference.source_url);
    ScanEntry {
        pass,
        size: reference.size,
        eligible: checked.is_ok(),
        reason: checked.as_ref().err().copied(),
        filename: checked.ok().map(|s| s.filename),
        source_url: reference.source_url,
    }
}

pub fn run_scan(cfg: &SideloadConfig, path: &Path, json: bool) -> Result<()> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let policy = cfg.allow_list_policy();
    let local_prefixes = cfg.local_prefixes();
    let eligibility = Eligibility::new(&policy, &local_prefixes);

    let mut entries: Vec<ScanEntry> = markdown::scan(&content)
        .into_iter()
        .map(|r| entry(Pass::Markdown, r, &eligibility))
        .collect();
    let doc = html::parse(&content);
    entries.extend(
        html::extract_images(&doc)
            .into_iter()
            .map(|r| entry(Pass::Html, r, &eligibility)),
    );

    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }
    if entries.is_empty() {
        println!("No image references found.");
        return Ok(());
    }
    println!("{:<9} {:<22} {}", "PASS", "STATUS", "URL");
    for e in &entries {
        let status = match (e.eligible, e.reason) {
            (true, _) => "eligible".to_string(),
            (false, Some(reason)) => reason.as_str().to_string(),
            (false, None) => "-".to_string(),
        };
        let pass = match e.pass {
            Pass::Markdown => "markdown",
            Pass::Html => "html",
        };
        println!("{:<9} {:<22} {}", pass, status, e.source_url);
    }
    Ok(())
}
