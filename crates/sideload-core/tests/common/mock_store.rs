//! Scripted in-memory asset store.
//!
//! Resolves every persisted asset to `http://local/<filename>`. Failures are
//! scripted by URL or filename substring.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use sideload_core::asset_store::{AssetStore, FetchError, PersistError, ResolvedImage, SizeSpec};
use sideload_core::content::OwnerId;

pub struct MockTemp {
    url: String,
    released: Rc<Cell<usize>>,
}

impl Drop for MockTemp {
    fn drop(&mut self) {
        self.released.set(self.released.get() + 1);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockHandle {
    pub filename: String,
    pub owner: OwnerId,
}

#[derive(Default)]
pub struct MockStore {
    pub fetched: RefCell<Vec<String>>,
    pub persisted: RefCell<Vec<MockHandle>>,
    pub resolved: RefCell<Vec<SizeSpec>>,
    released: Rc<Cell<usize>>,
    /// Persisted temps stay alive here so they are not counted as released.
    kept: RefCell<Vec<MockTemp>>,
    pub fail_fetch: Vec<String>,
    pub fail_persist: Vec<String>,
    pub fail_resolve: Vec<String>,
    pub crop: bool,
    /// Size reported for `SizeSpec::Full`.
    pub full_size: (u32, u32),
}

impl MockStore {
    pub fn new() -> Self {
        Self {
            full_size: (800, 600),
            ..Self::default()
        }
    }

    pub fn failing_fetch(mut self, needle: &str) -> Self {
        self.fail_fetch.push(needle.to_string());
        self
    }

    pub fn failing_persist(mut self, needle: &str) -> Self {
        self.fail_persist.push(needle.to_string());
        self
    }

    pub fn failing_resolve(mut self, needle: &str) -> Self {
        self.fail_resolve.push(needle.to_string());
        self
    }

    pub fn with_crop(mut self) -> Self {
        self.crop = true;
        self
    }

    pub fn fetch_count(&self) -> usize {
        self.fetched.borrow().len()
    }

    /// Temp resources dropped without being persisted.
    pub fn released(&self) -> usize {
        self.released.get()
    }
}

impl AssetStore for MockStore {
    type Temp = MockTemp;
    type Handle = MockHandle;

    fn fetch_to_temp(&self, url: &str) -> Result<MockTemp, FetchError> {
        self.fetched.borrow_mut().push(url.to_string());
        if self.fail_fetch.iter().any(|n| url.contains(n.as_str())) {
            return Err(FetchError::Http(500));
        }
        Ok(MockTemp {
            url: url.to_string(),
            released: Rc::clone(&self.released),
        })
    }

    fn persist(&self, temp: MockTemp, filename: &str, owner: OwnerId) -> Result<MockHandle, PersistError> {
        if self.fail_persist.iter().any(|n| temp.url.contains(n.as_str())) {
            return Err(PersistError::Other(format!("cannot store {}", filename)));
        }
        self.kept.borrow_mut().push(temp);
        let handle = MockHandle {
            filename: filename.to_string(),
            owner,
        };
        self.persisted.borrow_mut().push(handle.clone());
        Ok(handle)
    }

    fn resolve(&self, handle: &MockHandle, size: SizeSpec) -> Option<ResolvedImage> {
        self.resolved.borrow_mut().push(size);
        if self.fail_resolve.iter().any(|n| handle.filename.contains(n.as_str())) {
            return None;
        }
        let (width, height) = match size {
            SizeSpec::Full => self.full_size,
            SizeSpec::Box { width, height, .. } => (width, height),
        };
        Some(ResolvedImage {
            url: format!("http://local/{}", handle.filename),
            width,
            height,
        })
    }

    fn supports_crop(&self) -> bool {
        self.crop
    }
}
