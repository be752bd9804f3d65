//! CLI for the sideload image pipeline.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use sideload_core::config;
use sideload_core::content::ContentId;
use sideload_core::content_db::ContentDb;
use sideload_core::hooks::SaveHandler;
use std::path::PathBuf;

use commands::{
    run_allow_list, run_check, run_check_all, run_comment_add, run_post_add, run_scan, run_show,
};

/// Top-level CLI for the sideload image pipeline.
#[derive(Debug, Parser)]
#[command(name = "sideload")]
#[command(about = "Sideload allow-listed external images in posts and comments", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Manage posts.
    Post {
        #[command(subcommand)]
        action: PostAction,
    },

    /// Manage comments.
    Comment {
        #[command(subcommand)]
        action: CommentAction,
    },

    /// Re-run the sideload pass over one existing post or comment.
    Check {
        #[command(subcommand)]
        target: Target,
    },

    /// Re-run the sideload pass over every post and comment.
    CheckAll,

    /// Print the stored body of a post or comment.
    Show {
        #[command(subcommand)]
        target: Target,
    },

    /// List image references in a file and whether each would be sideloaded (no fetching).
    Scan {
        /// File with markdown and/or HTML content.
        path: PathBuf,

        /// Print JSON instead of a table.
        #[arg(long)]
        json: bool,
    },

    /// Print the effective allow-list.
    AllowList,
}

#[derive(Debug, Subcommand)]
pub enum PostAction {
    /// Store a new post from a file and sideload its images.
    Add {
        /// File holding the post body.
        path: PathBuf,
    },
}

#[derive(Debug, Subcommand)]
pub enum CommentAction {
    /// Store a new comment from a file and sideload its images.
    Add {
        /// Parent post ID.
        #[arg(long, value_name = "ID")]
        post: i64,

        /// File holding the comment body.
        path: PathBuf,
    },
}

#[derive(Debug, Clone, Copy, Subcommand)]
pub enum Target {
    /// A post by ID.
    Post { id: i64 },
    /// A comment by ID.
    Comment { id: i64 },
}

impl Target {
    pub fn content_id(self) -> ContentId {
        match self {
            Target::Post { id } => ContentId::Post(id),
            Target::Comment { id } => ContentId::Comment(id),
        }
    }
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);

        // Commands that need neither the database nor the media store.
        match &cli.command {
            CliCommand::Scan { path, json } => return run_scan(&cfg, path, *json),
            CliCommand::AllowList => return run_allow_list(&cfg),
            _ => {}
        }

        let db = ContentDb::open_default().await?;
        if let CliCommand::Show { target } = cli.command {
            return run_show(&db, target.content_id()).await;
        }

        let handler = SaveHandler::from_config(db, &cfg)?;
        match cli.command {
            CliCommand::Post {
                action: PostAction::Add { path },
            } => run_post_add(&handler, &path).await?,
            CliCommand::Comment {
                action: CommentAction::Add { post, path },
            } => run_comment_add(&handler, post, &path).await?,
            CliCommand::Check { target } => run_check(&handler, target.content_id()).await?,
            CliCommand::CheckAll => run_check_all(&handler).await?,
            CliCommand::Show { .. } | CliCommand::Scan { .. } | CliCommand::AllowList => {}
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
