// SPDX-License-Identifier: MIT OR Apache-2.0

//! Fan-out/fan-in behavior of the tree populator under controlled latency.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use codenav::client::{CompleteResponse, FileEntry, ListFilesResponse, ListingClient};
use codenav::errors::ClientError;
use codenav::tree::{ExpandStatus, TreeNode, TreePopulator};

/// Listing client with a controllable per-prefix response latency.
struct DelayClient {
    listings: HashMap<String, ListFilesResponse>,
    delays: HashMap<String, Duration>,
    calls: Mutex<Vec<String>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl DelayClient {
    fn new(listings: Vec<(&str, ListFilesResponse)>, delays: Vec<(&str, u64)>) -> Self {
        Self {
            listings: listings
                .into_iter()
                .map(|(prefix, resp)| (prefix.to_string(), resp))
                .collect(),
            delays: delays
                .into_iter()
                .map(|(prefix, millis)| (prefix.to_string(), Duration::from_millis(millis)))
                .collect(),
            calls: Mutex::new(Vec::new()),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        }
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().expect("calls lock").clone()
    }

    fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl ListingClient for DelayClient {
    async fn complete(&self, _query: &str, _limit: usize) -> Result<CompleteResponse, ClientError> {
        Ok(CompleteResponse::default())
    }

    async fn list_files(
        &self,
        _project: &str,
        path_prefix: &str,
    ) -> Result<ListFilesResponse, ClientError> {
        self.calls
            .lock()
            .expect("calls lock")
            .push(path_prefix.to_string());
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        if let Some(delay) = self.delays.get(path_prefix) {
            tokio::time::sleep(*delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        self.listings
            .get(path_prefix)
            .cloned()
            .ok_or_else(|| ClientError::Status {
                code: 404,
                message: format!("no listing for {path_prefix}"),
            })
    }
}

fn listing(directories: &[&str], files: &[(&str, &str)]) -> ListFilesResponse {
    ListFilesResponse {
        directories: directories.iter().map(|dir| dir.to_string()).collect(),
        files: files
            .iter()
            .map(|(id, path)| FileEntry {
                id: id.to_string(),
                path: path.to_string(),
            })
            .collect(),
    }
}

/// Deep chain fixture: every level has one on-route directory, one off-route
/// sibling, and one file.
fn chain_listings() -> Vec<(&'static str, ListFilesResponse)> {
    vec![
        ("a/", listing(&["a/b/", "a/zz/"], &[("1", "a/top.txt")])),
        ("a/b/", listing(&["a/b/c/", "a/b/zz/"], &[("2", "a/b/mid.txt")])),
        ("a/b/c/", listing(&["a/b/c/leaf/"], &[("3", "a/b/c/deep.txt")])),
    ]
}

async fn populate_chain(delays: Vec<(&'static str, u64)>) -> (Arc<DelayClient>, Vec<TreeNode>) {
    let client = Arc::new(DelayClient::new(chain_listings(), delays));
    let mut tree = TreePopulator::new(Arc::clone(&client));
    tree.set_project("proj");
    tree.set_path("a/b/c/deep.txt");
    assert!(tree.loading());
    tree.wait().await;
    assert!(!tree.loading());
    assert!(tree.error().is_none());
    (client, tree.roots().to_vec())
}

#[tokio::test(start_paused = true)]
async fn completion_is_invariant_under_response_ordering() {
    // Same fixture, opposite latency orderings: the deepest listing answers
    // last, then first. The final tree must be identical either way, and
    // each run must resolve exactly once.
    let (slow_deep_client, slow_deep) =
        populate_chain(vec![("a/", 5), ("a/b/", 20), ("a/b/c/", 80)]).await;
    let (fast_deep_client, fast_deep) =
        populate_chain(vec![("a/", 80), ("a/b/", 20), ("a/b/c/", 5)]).await;

    assert_eq!(slow_deep, fast_deep);
    assert_eq!(slow_deep_client.calls().len(), 3);
    assert_eq!(fast_deep_client.calls().len(), 3);

    // Every level of the chain landed: directories, statuses, files.
    let TreeNode::Directory(level_b) = &slow_deep[0] else {
        panic!("expected directory");
    };
    assert_eq!(level_b.name, "b");
    assert_eq!(level_b.status, ExpandStatus::Expanded);
    let TreeNode::Directory(level_c) = &level_b.children[0] else {
        panic!("expected directory");
    };
    assert_eq!(level_c.status, ExpandStatus::Expanded);
    let TreeNode::Directory(leaf) = &level_c.children[0] else {
        panic!("expected directory");
    };
    assert_eq!(leaf.name, "leaf");
    assert_eq!(leaf.status, ExpandStatus::Collapsed);
}

#[tokio::test(start_paused = true)]
async fn sibling_route_branches_run_concurrently() {
    // Both "x/" and "x/y/" literally prefix the target, so the first level
    // fans out into two concurrent branches.
    let client = Arc::new(DelayClient::new(
        vec![
            ("x/", listing(&["x/", "x/y/"], &[])),
            ("x/y/", listing(&[], &[("7", "x/y/z")])),
        ],
        vec![("x/y/", 30)],
    ));
    let mut tree = TreePopulator::new(Arc::clone(&client));
    tree.set_project("proj");
    tree.set_path("x/y/z");
    tree.wait().await;

    assert!(client.max_in_flight() >= 2);
    // One call for the root level, one per fanned-out branch.
    assert_eq!(client.calls().len(), 3);
}

#[tokio::test(start_paused = true)]
async fn slow_errored_branch_still_resolves_ancestors() {
    // "a/b/c/" has no canned listing; its failure must count as done so the
    // top level still completes, with the failure pinned on the node.
    let mut listings = chain_listings();
    listings.retain(|(prefix, _)| *prefix != "a/b/c/");
    let client = Arc::new(DelayClient::new(listings, vec![("a/b/", 40)]));
    let mut tree = TreePopulator::new(client);
    tree.set_project("proj");
    tree.set_path("a/b/c/deep.txt");
    tree.wait().await;

    assert!(!tree.loading());
    assert!(tree.error().is_none());
    let TreeNode::Directory(level_b) = &tree.roots()[0] else {
        panic!("expected directory");
    };
    let TreeNode::Directory(level_c) = &level_b.children[0] else {
        panic!("expected directory");
    };
    assert!(matches!(level_c.status, ExpandStatus::Failed(_)));
    assert!(level_c.children.is_empty());
    // Siblings and files around the failed branch are intact.
    assert_eq!(level_b.children.len(), 3);
}

#[tokio::test(start_paused = true)]
async fn superseding_update_replaces_the_tree_without_duplicates() {
    let client = Arc::new(DelayClient::new(
        vec![
            ("a/", listing(&["a/b/", "a/c/"], &[])),
            ("a/b/", listing(&[], &[("1", "a/b/one.txt")])),
            ("a/c/", listing(&[], &[("2", "a/c/two.txt")])),
        ],
        vec![("a/b/", 50)],
    ));
    let mut tree = TreePopulator::new(Arc::clone(&client));
    tree.set_project("proj");

    // First expansion is superseded mid-flight by a new target path.
    tree.set_path("a/b/one.txt");
    assert!(tree.loading());
    tree.set_path("a/c/two.txt");
    assert!(tree.loading());
    tree.wait().await;

    // The installed tree reflects only the newest target: exactly one node
    // per listed entry, nothing appended twice.
    let roots = tree.roots();
    assert_eq!(roots.len(), 2);
    let TreeNode::Directory(dir_b) = &roots[0] else {
        panic!("expected directory");
    };
    assert_eq!(dir_b.status, ExpandStatus::Collapsed);
    assert!(dir_b.children.is_empty());
    let TreeNode::Directory(dir_c) = &roots[1] else {
        panic!("expected directory");
    };
    assert_eq!(dir_c.status, ExpandStatus::Expanded);
    assert_eq!(dir_c.children.len(), 1);

    // Re-running the same expansion rebuilds the same tree, not a longer one.
    tree.update();
    tree.wait().await;
    assert_eq!(tree.roots().len(), 2);
}

#[tokio::test]
async fn no_entry_is_lost_or_reordered() {
    let client = Arc::new(DelayClient::new(
        vec![(
            "src/",
            ListFilesResponse {
                files: vec![FileEntry {
                    id: "1".to_string(),
                    path: "src/x/y".to_string(),
                }],
                directories: vec!["src/a/".to_string(), "src/b/".to_string()],
            },
        )],
        vec![],
    ));
    let mut tree = TreePopulator::new(client);
    tree.set_project("proj");
    tree.set_path("src/");
    tree.wait().await;

    let names: Vec<&str> = tree
        .roots()
        .iter()
        .map(|node| match node {
            TreeNode::Directory(dir) => dir.name.as_str(),
            TreeNode::File(file) => file.name.as_str(),
        })
        .collect();
    assert_eq!(names, vec!["a", "b", "y"]);
}
