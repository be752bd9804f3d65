//! Content repository (SQLite via sqlx): posts, comments, and the image
//! attachments sideloaded into them.
//!
//! Loaded content units go through a small read-through cache. Saving does
//! not touch the cache; callers invalidate explicitly once a save succeeded.

pub mod attachments;
pub mod db;
pub mod units;

pub use attachments::Attachment;
pub use db::ContentDb;
