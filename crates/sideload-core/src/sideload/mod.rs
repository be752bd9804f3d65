//! Sideload engine: for each image reference, fetch, persist and resolve a local copy.
//!
//! References are handled strictly in order, one at a time. A failed reference
//! never stops its siblings, is never retried within a run, and its temp
//! resource is released before the next reference starts.

mod eligibility;
mod error;

pub use eligibility::{Eligibility, EligibleSource};
pub use error::{IneligibleReason, SideloadError, SideloadResult};

use crate::allow_list::AllowListPolicy;
use crate::asset_store::{AssetStore, SizeSpec};
use crate::content::OwnerId;
use crate::reference::ImageReference;

pub struct SideloadEngine<'a, S> {
    store: &'a S,
    eligibility: Eligibility<'a>,
}

impl<'a, S: AssetStore> SideloadEngine<'a, S> {
    /// `local_prefixes` are the site's own URLs; references under them are never sideloaded.
    pub fn new(store: &'a S, allow_list: &'a AllowListPolicy, local_prefixes: &'a [String]) -> Self {
        Self {
            store,
            eligibility: Eligibility::new(allow_list, local_prefixes),
        }
    }

    pub fn eligibility(&self) -> Eligibility<'a> {
        self.eligibility
    }

    /// Sideloads every reference in order and pairs each with its result.
    pub fn process(
        &self,
        refs: Vec<ImageReference>,
        owner: OwnerId,
    ) -> Vec<(ImageReference, SideloadResult)> {
        refs.into_iter()
            .map(|reference| {
                let result = self.sideload(&reference, owner);
                match &result {
                    Ok(image) => tracing::info!(
                        source = %reference.source_url,
                        url = %image.url,
                        %owner,
                        "sideloaded image"
                    ),
                    Err(e) if e.is_ineligible() => {}
                    Err(e) => tracing::warn!(
                        source = %reference.source_url,
                        %owner,
                        "sideload failed, reference left unchanged: {}",
                        e
                    ),
                }
                (reference, result)
            })
            .collect()
    }

    /// Sideloads one reference.
    pub fn sideload(&self, reference: &ImageReference, owner: OwnerId) -> SideloadResult {
        let source = self
            .eligibility
            .check(&reference.source_url)
            .map_err(SideloadError::Ineligible)?;

        let temp = self.store.fetch_to_temp(&source.url)?;
        let handle = self.store.persist(temp, &source.filename, owner)?;

        let size = match reference.size {
            Some(explicit) => SizeSpec::Box {
                width: explicit.width,
                height: explicit.height,
                crop: self.store.supports_crop(),
            },
            None => SizeSpec::Full,
        };
        self.store
            .resolve(&handle, size)
            .filter(|image| !image.url.is_empty())
            .ok_or(SideloadError::Resolution)
    }
}
