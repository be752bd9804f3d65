use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::allow_list::{AllowList, AllowListPolicy};

/// Prefixes allowed as sideload sources when the config file does not override them.
pub const DEFAULT_ALLOW_LIST: &[&str] = &[
    "https://dl.dropboxusercontent.com", // Dropbox
    "http://cl.ly/image/463Y120M3O1R",   // CloudApp
    "http://www.evernote.com",           // Evernote / Skitch
    "https://www.evernote.com",          // Evernote / Skitch
    "https://skydrive.live.com",         // SkyDrive
    "http://sdrv.ms",                    // SkyDrive
    "http://i.imgur.com",                // Imgur
    "https://raw.github.com/",
];

/// HTTP fetch parameters for the local asset store (optional section in config.toml).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchConfig {
    pub connect_timeout_secs: u64,
    /// Whole-transfer timeout.
    pub timeout_secs: u64,
    pub max_redirects: u32,
    /// Responses larger than this are aborted and treated as fetch failures.
    pub max_bytes: u64,
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            connect_timeout_secs: 30,
            timeout_secs: 60,
            max_redirects: 10,
            max_bytes: 20 * 1024 * 1024,
            user_agent: concat!("sideload/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// Site-local adjustments applied on top of `allow_list` through the allow-list filter hook.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllowListOverrides {
    /// Prefixes appended to the effective list.
    #[serde(default)]
    pub extra: Vec<String>,
    /// Prefixes removed from the effective list (exact entry match).
    #[serde(default)]
    pub blocked: Vec<String>,
}

/// Global configuration loaded from `~/.config/sideload/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SideloadConfig {
    /// The site's own base URL. References under it are never sideloaded.
    pub site_url: String,
    /// Public base URL of persisted media. Defaults to `<site_url>/media/`.
    #[serde(default)]
    pub media_url: Option<String>,
    /// Directory holding persisted media. Defaults to the XDG data dir.
    #[serde(default)]
    pub media_dir: Option<PathBuf>,
    /// Default allow-list, before overrides.
    pub allow_list: Vec<String>,
    #[serde(default)]
    pub allow_list_overrides: AllowListOverrides,
    #[serde(default)]
    pub fetch: FetchConfig,
}

impl Default for SideloadConfig {
    fn default() -> Self {
        Self {
            site_url: "http://localhost:8080".to_string(),
            media_url: None,
            media_dir: None,
            allow_list: DEFAULT_ALLOW_LIST.iter().map(|s| s.to_string()).collect(),
            allow_list_overrides: AllowListOverrides::default(),
            fetch: FetchConfig::default(),
        }
    }
}

impl SideloadConfig {
    /// Public base URL for persisted media, always ending in `/`.
    pub fn media_base_url(&self) -> String {
        let base = match &self.media_url {
            Some(u) => u.clone(),
            None => format!("{}/media/", self.site_url.trim_end_matches('/')),
        };
        if base.ends_with('/') {
            base
        } else {
            format!("{}/", base)
        }
    }

    /// Prefixes treated as locally hosted by the cycle guard.
    pub fn local_prefixes(&self) -> Vec<String> {
        let mut prefixes = vec![self.site_url.clone()];
        let media = self.media_base_url();
        if !media.starts_with(&self.site_url) {
            prefixes.push(media);
        }
        prefixes
    }

    /// Media directory, falling back to `~/.local/share/sideload/media`.
    pub fn resolve_media_dir(&self) -> Result<PathBuf> {
        if let Some(dir) = &self.media_dir {
            return Ok(dir.clone());
        }
        let xdg_dirs = xdg::BaseDirectories::with_prefix("sideload")?;
        xdg_dirs
            .create_data_directory("media")
            .context("failed to create media directory")
    }

    /// Builds the allow-list policy: `allow_list` as defaults, with overrides
    /// registered as filters (extras first, then blocks).
    pub fn allow_list_policy(&self) -> AllowListPolicy {
        let mut policy = AllowListPolicy::new(AllowList::new(self.allow_list.clone()));
        let extra = self.allow_list_overrides.extra.clone();
        if !extra.is_empty() {
            policy.register(move |mut list: AllowList| {
                for prefix in &extra {
                    list.push(prefix.clone());
                }
                list
            });
        }
        let blocked = self.allow_list_overrides.blocked.clone();
        if !blocked.is_empty() {
            policy.register(move |mut list: AllowList| {
                list.retain(|p| !blocked.iter().any(|b| b == p));
                list
            });
        }
        policy
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("sideload")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<SideloadConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = SideloadConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path)?;
    let cfg: SideloadConfig =
        toml::from_str(&data).with_context(|| format!("invalid config {}", path.display()))?;
    Ok(cfg)
}
