//! `sideload allow-list` – print the effective allow-list.

use anyhow::Result;
use sideload_core::config::SideloadConfig;

pub fn run_allow_list(cfg: &SideloadConfig) -> Result<()> {
    let effective = cfg.allow_list_policy().effective();
    if effective.is_empty() {
        println!("Allow-list is empty; nothing will be sideloaded.");
    }
    for prefix in effective.entries() {
        println!("{prefix}");
    }
    Ok(())
}
