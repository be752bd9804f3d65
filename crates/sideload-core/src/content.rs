//! Content units under inspection and the identifiers that tie them to storage.

use serde::Serialize;
use std::fmt;

/// Parent that sideloaded assets are attached to (a post id).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct OwnerId(pub i64);

impl fmt::Display for OwnerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A post or a comment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentId {
    Post(i64),
    Comment(i64),
}

impl fmt::Display for ContentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContentId::Post(id) => write!(f, "post {}", id),
            ContentId::Comment(id) => write!(f, "comment {}", id),
        }
    }
}

/// Body text plus the owner its sideloaded images attach to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentUnit {
    pub id: ContentId,
    pub owner: OwnerId,
    pub body: String,
}

impl ContentUnit {
    /// Same unit with a new body.
    pub fn with_body(&self, body: String) -> Self {
        Self {
            id: self.id,
            owner: self.owner,
            body,
        }
    }
}
