//! Allow-list of URL prefixes permitted as sideload sources.
//!
//! The effective list is recomputed on every check: the default list is passed
//! through each registered filter in registration order, so external policy can
//! extend, trim, or replace it between calls.

use std::fmt;

/// Ordered set of URL prefixes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AllowList {
    prefixes: Vec<String>,
}

impl AllowList {
    pub fn new<I, S>(prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            prefixes: prefixes.into_iter().map(Into::into).collect(),
        }
    }

    pub fn entries(&self) -> &[String] {
        &self.prefixes
    }

    pub fn push(&mut self, prefix: impl Into<String>) {
        self.prefixes.push(prefix.into());
    }

    pub fn retain<F>(&mut self, keep: F)
    where
        F: FnMut(&String) -> bool,
    {
        self.prefixes.retain(keep);
    }

    pub fn is_empty(&self) -> bool {
        self.prefixes.is_empty()
    }

    /// True iff `url` starts with at least one entry (case-sensitive, exact prefix).
    /// Empty entries never match.
    pub fn matches(&self, url: &str) -> bool {
        self.prefixes
            .iter()
            .any(|prefix| !prefix.is_empty() && url.starts_with(prefix.as_str()))
    }
}

/// Free-function form of [`AllowList::matches`].
pub fn is_allowed(url: &str, allow_list: &AllowList) -> bool {
    allow_list.matches(url)
}

/// A registered allow-list transform.
pub type AllowListFilter = Box<dyn Fn(AllowList) -> AllowList + Send + Sync>;

/// Default allow-list plus the ordered filters that produce the effective list.
pub struct AllowListPolicy {
    defaults: AllowList,
    filters: Vec<AllowListFilter>,
}

impl AllowListPolicy {
    pub fn new(defaults: AllowList) -> Self {
        Self {
            defaults,
            filters: Vec::new(),
        }
    }

    /// Registers a filter; filters run in registration order.
    pub fn register<F>(&mut self, filter: F)
    where
        F: Fn(AllowList) -> AllowList + Send + Sync + 'static,
    {
        self.filters.push(Box::new(filter));
    }

    pub fn defaults(&self) -> &AllowList {
        &self.defaults
    }

    /// The effective allow-list, recomputed on every call.
    pub fn effective(&self) -> AllowList {
        self.filters
            .iter()
            .fold(self.defaults.clone(), |list, filter| filter(list))
    }

    pub fn is_allowed(&self, url: &str) -> bool {
        is_allowed(url, &self.effective())
    }
}

impl fmt::Debug for AllowListPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AllowListPolicy")
            .field("defaults", &self.defaults)
            .field("filters", &self.filters.len())
            .finish()
    }
}
