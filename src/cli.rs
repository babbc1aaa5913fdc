// SPDX-License-Identifier: MIT OR Apache-2.0

//! CLI argument parsing using clap

use clap::{Parser, Subcommand};

/// codenav - Client for a remote code search and browsing service
///
/// Runs typeahead completion queries and browses project directory trees
/// against a codenav server.
#[derive(Parser, Debug)]
#[command(name = "codenav")]
#[command(
    author,
    version,
    about,
    long_about = None,
    after_help = "Quickstart:\n  codenav complete \"QueryCoal\"\n  codenav tree myproject src/main/java/"
)]
pub struct Cli {
    /// Output format (text or json)
    #[arg(long, global = true)]
    pub format: Option<OutputFormat>,

    /// Base URL of the code search server
    #[arg(long, global = true)]
    pub server: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Output format for results
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run one typeahead completion query and print the choices
    Complete {
        /// Query text, as typed into the search box
        query: String,

        /// Maximum number of hits to request
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Populate and print a project's directory tree along a path
    Tree {
        /// Project to browse
        project: String,

        /// Target path; every directory prefixing it is expanded
        path: String,
    },
}
