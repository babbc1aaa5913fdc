// SPDX-License-Identifier: MIT OR Apache-2.0

//! codenav - Client for a remote code search and browsing service
//!
//! Thin command-line front end over the search box and tree populator
//! controllers in the codenav library.

mod cli;

use std::sync::Arc;

use anyhow::{bail, Result};
use clap::Parser;
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands, OutputFormat};
use codenav::client::http::HttpListingClient;
use codenav::config::{Config, ConfigOutputFormat};
use codenav::search::SearchBox;
use codenav::tree::{ExpandStatus, TreeNode, TreePopulator};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = Config::load();
    let format = resolve_format(cli.format, &config);
    let server = config.merge_server_url(cli.server);
    let client = Arc::new(HttpListingClient::new(server)?);

    match cli.command {
        Commands::Complete { query, limit } => {
            run_complete(client, &query, config.merge_complete_limit(limit), format).await?;
        }
        Commands::Tree { project, path } => {
            run_tree(client, project, path, format).await?;
        }
    }

    Ok(())
}

fn resolve_format(cli_format: Option<OutputFormat>, config: &Config) -> OutputFormat {
    cli_format.unwrap_or_else(|| match config.output_format() {
        Some(ConfigOutputFormat::Json) => OutputFormat::Json,
        _ => OutputFormat::Text,
    })
}

async fn run_complete(
    client: Arc<HttpListingClient>,
    query: &str,
    limit: usize,
    format: OutputFormat,
) -> Result<()> {
    let mut search = SearchBox::new(client).with_limit(limit);
    search.on_query_changed(query);
    search.resolve().await;

    if let Some(error) = search.last_error() {
        bail!("completion failed: {error}");
    }

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(search.choices())?);
        }
        OutputFormat::Text => {
            if search.choices().is_empty() {
                println!("{} No completions for '{}'", "✗".yellow(), query);
                println!("  Full-text search: {}", search.activation_url());
                return Ok(());
            }
            for choice in search.choices() {
                println!(
                    "{} {} {}",
                    choice.display.cyan(),
                    choice.path,
                    choice.url.dimmed()
                );
            }
        }
    }
    Ok(())
}

async fn run_tree(
    client: Arc<HttpListingClient>,
    project: String,
    path: String,
    format: OutputFormat,
) -> Result<()> {
    let mut tree = TreePopulator::new(client);
    tree.set_project(project);
    tree.set_path(path);
    tree.wait().await;

    if let Some(error) = tree.error() {
        bail!("tree expansion failed: {error}");
    }

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(tree.roots())?);
        }
        OutputFormat::Text => {
            print_nodes(tree.roots(), 0);
        }
    }
    Ok(())
}

fn print_nodes(nodes: &[TreeNode], depth: usize) {
    let indent = "  ".repeat(depth);
    for node in nodes {
        match node {
            TreeNode::Directory(dir) => {
                match &dir.status {
                    ExpandStatus::Failed(message) => {
                        println!(
                            "{indent}{}/ {} {}",
                            dir.name.blue(),
                            "✗".red(),
                            message.dimmed()
                        );
                    }
                    _ => println!("{indent}{}/", dir.name.blue()),
                }
                print_nodes(&dir.children, depth + 1);
            }
            TreeNode::File(file) => {
                println!("{indent}{} {}", file.name, file.url.dimmed());
            }
        }
    }
}
