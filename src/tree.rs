// SPDX-License-Identifier: MIT OR Apache-2.0

//! Lazy directory tree population over the listing API.
//!
//! The populator fetches one path level at a time and only descends into
//! directories that lie on the route to the target path. Sibling directories
//! on the route expand concurrently (fan-out); a level completes only after
//! every launched branch resolves (fan-in), so the populator signals exactly
//! one completion per expansion.
//!
//! The tree is plain data, built in task-local memory and installed only when
//! the whole expansion resolves. A superseding `project`/`path` change aborts
//! the in-flight expansion, so stale branches never touch the installed tree
//! and repeated updates never duplicate nodes.

use std::sync::Arc;

use futures::future::{join_all, BoxFuture};
use futures::FutureExt;
use serde::Serialize;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::client::ListingClient;
use crate::links;

/// Expansion outcome for a directory node.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpandStatus {
    /// Not on the target route; children were never fetched.
    #[default]
    Collapsed,
    /// Children fetched and attached.
    Expanded,
    /// The listing call for this directory failed; retry re-runs the
    /// whole expansion.
    Failed(String),
}

/// A node in the populated tree. Directories own their children outright;
/// there is no sharing between subtrees.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TreeNode {
    Directory(DirNode),
    File(FileNode),
}

/// A directory and the children fetched for it so far. Children keep the
/// listing order: directories first, then files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DirNode {
    /// Absolute path, trailing slash included, as returned by the listing.
    pub path: String,
    pub name: String,
    pub status: ExpandStatus,
    pub children: Vec<TreeNode>,
}

/// A file leaf.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileNode {
    /// Stable file identifier used for link construction.
    pub id: String,
    pub path: String,
    pub name: String,
    pub url: String,
}

/// Result of expanding one level: the status of the node whose children were
/// fetched, plus those children.
#[derive(Debug)]
struct Expanded {
    status: ExpandStatus,
    children: Vec<TreeNode>,
}

/// One expansion run, pinned to the `(project, path)` pair it was started
/// with. Lives inside a single spawned task; aborting the task cancels every
/// branch, including in-flight listing calls.
struct Expansion<C> {
    client: Arc<C>,
    project: String,
    path: String,
}

impl<C: ListingClient> Expansion<C> {
    /// Populate one level starting at `offset` and recurse along the target
    /// route. Resolves only after every launched child branch resolves; a
    /// failed branch resolves as `Failed` instead of stalling its ancestors.
    fn expand(&self, offset: usize) -> BoxFuture<'_, Expanded> {
        async move {
            let Some(slash) = self.path[offset..].find('/').map(|at| offset + at) else {
                // Path consumed: this branch is complete.
                return Expanded {
                    status: ExpandStatus::Expanded,
                    children: Vec::new(),
                };
            };
            let prefix = &self.path[..slash + 1];
            let resp = match self.client.list_files(&self.project, prefix).await {
                Ok(resp) => resp,
                Err(err) => {
                    warn!(prefix, error = %err, "listing failed");
                    return Expanded {
                        status: ExpandStatus::Failed(err.to_string()),
                        children: Vec::new(),
                    };
                }
            };

            let mut dirs: Vec<DirNode> = Vec::with_capacity(resp.directories.len());
            let mut slots = Vec::new();
            let mut branches = Vec::new();
            for dir in &resp.directories {
                if links::is_prefix_of(&self.path, dir) {
                    // On the target route: fan out.
                    slots.push(dirs.len());
                    branches.push(self.expand(slash + 1));
                }
                dirs.push(DirNode {
                    path: dir.clone(),
                    name: links::base_name(dir).to_string(),
                    status: ExpandStatus::Collapsed,
                    children: Vec::new(),
                });
            }

            // Fan-in: wait for all sibling branches, in any completion order.
            for (slot, expanded) in slots.into_iter().zip(join_all(branches).await) {
                let node = &mut dirs[slot];
                node.status = expanded.status;
                node.children = expanded.children;
            }

            let mut children: Vec<TreeNode> = dirs.into_iter().map(TreeNode::Directory).collect();
            children.extend(resp.files.into_iter().map(|file| {
                TreeNode::File(FileNode {
                    url: links::source(&file.id),
                    name: links::base_name(&file.path).to_string(),
                    id: file.id,
                    path: file.path,
                })
            }));
            Expanded {
                status: ExpandStatus::Expanded,
                children,
            }
        }
        .boxed()
    }
}

/// Controller for the lazily expanded project tree.
///
/// Expansion starts once both `project` and `path` are known and re-runs on
/// every change of either. Must run inside a tokio runtime.
pub struct TreePopulator<C> {
    client: Arc<C>,
    project: Option<String>,
    path: Option<String>,
    roots: Vec<TreeNode>,
    error: Option<String>,
    in_flight: Option<JoinHandle<Expanded>>,
}

impl<C: ListingClient + 'static> TreePopulator<C> {
    pub fn new(client: Arc<C>) -> Self {
        Self {
            client,
            project: None,
            path: None,
            roots: Vec::new(),
            error: None,
            in_flight: None,
        }
    }

    pub fn set_project(&mut self, project: impl Into<String>) {
        self.project = Some(project.into());
        self.update();
    }

    pub fn set_path(&mut self, path: impl Into<String>) {
        self.path = Some(path.into());
        self.update();
    }

    /// Start (or restart) the expansion. No-op until both `project` and
    /// `path` are known. A superseded expansion is aborted so its branches
    /// never outlive the change that made them stale.
    pub fn update(&mut self) {
        let (Some(project), Some(path)) = (self.project.clone(), self.path.clone()) else {
            return;
        };
        if let Some(stale) = self.in_flight.take() {
            debug!("superseding in-flight expansion");
            stale.abort();
        }
        self.error = None;
        debug!(project = %project, path = %path, "starting expansion");
        let expansion = Expansion {
            client: Arc::clone(&self.client),
            project,
            path,
        };
        self.in_flight = Some(tokio::spawn(async move { expansion.expand(0).await }));
    }

    /// Re-run the expansion after a failure.
    pub fn retry(&mut self) {
        self.update();
    }

    /// Await the newest expansion, if any, and install its tree. The
    /// installed tree is replaced wholesale, never appended to.
    pub async fn wait(&mut self) {
        let Some(handle) = self.in_flight.take() else {
            return;
        };
        match handle.await {
            Ok(expanded) => {
                self.roots = expanded.children;
                if let ExpandStatus::Failed(message) = expanded.status {
                    self.error = Some(message);
                }
            }
            Err(join_err) if join_err.is_cancelled() => {}
            Err(join_err) => {
                warn!(error = %join_err, "expansion task failed");
                self.error = Some(join_err.to_string());
            }
        }
    }

    /// True while an expansion is outstanding; cleared by [`Self::wait`].
    pub fn loading(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn roots(&self) -> &[TreeNode] {
        &self.roots
    }

    /// Error from the top-level listing call, if the last expansion failed.
    /// Branch failures land on the affected [`DirNode`] instead.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}
