//! Scans post and comment content for images hosted on allow-listed external
//! sites, sideloads them into local media storage, and rewrites the content
//! to point at the local copies.

pub mod config;
pub mod logging;

pub mod allow_list;
pub mod asset_store;
pub mod content;
pub mod content_db;
pub mod hooks;
pub mod html;
pub mod markdown;
pub mod pipeline;
pub mod reference;
pub mod sideload;
pub mod url_model;

pub use allow_list::{AllowList, AllowListPolicy};
pub use content::{ContentId, ContentUnit, OwnerId};
pub use pipeline::{ContentPipeline, PipelineOutcome};
pub use sideload::SideloadEngine;
