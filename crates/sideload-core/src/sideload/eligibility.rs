//! Which references may be sideloaded, decided without touching the network.

use serde::Serialize;

use super::error::IneligibleReason;
use crate::allow_list::AllowListPolicy;
use crate::url_model::{has_local_prefix, image_filename, percent_decode};

/// A reference that passed every check: the decoded URL to fetch and the name to store it under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EligibleSource {
    pub url: String,
    pub filename: String,
}

#[derive(Debug, Clone, Copy)]
pub struct Eligibility<'a> {
    allow_list: &'a AllowListPolicy,
    local_prefixes: &'a [String],
}

impl<'a> Eligibility<'a> {
    pub fn new(allow_list: &'a AllowListPolicy, local_prefixes: &'a [String]) -> Self {
        Self {
            allow_list,
            local_prefixes,
        }
    }

    /// Checks, in order: non-empty, not locally hosted, allow-listed (on the raw
    /// URL), then an accepted image extension on the percent-decoded URL.
    pub fn check(&self, source_url: &str) -> Result<EligibleSource, IneligibleReason> {
        if source_url.is_empty() {
            return Err(IneligibleReason::EmptySource);
        }
        if has_local_prefix(source_url, self.local_prefixes) {
            return Err(IneligibleReason::LocalSource);
        }
        if !self.allow_list.is_allowed(source_url) {
            return Err(IneligibleReason::NotAllowed);
        }
        let url = percent_decode(source_url);
        let filename = image_filename(&url).ok_or(IneligibleReason::UnsupportedExtension)?;
        Ok(EligibleSource { url, filename })
    }
}
