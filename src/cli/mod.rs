//! CLI module for the Campus Coffee user service
//!
//! Provides subcommands:
//! - `serve`: run the HTTP server
//! - `migrate`: apply PostgreSQL schema migrations and exit

pub mod migrate;
pub mod serve;

use clap::{Parser, Subcommand};

/// Campus Coffee user management service
#[derive(Parser)]
#[command(name = "campus-coffee-users")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the HTTP server
    Serve,

    /// Apply pending database migrations
    Migrate,
}
