//! CLI command handlers, one file per command.

mod allow_list;
mod check;
mod comment;
mod post;
mod scan;
mod show;

pub use allow_list::run_allow_list;
pub use check::{run_check, run_check_all};
pub use comment::run_comment_add;
pub use post::run_post_add;
pub use scan::run_scan;
pub use show::run_show;
