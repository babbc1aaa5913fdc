// SPDX-License-Identifier: MIT OR Apache-2.0

//! Remote listing API: wire types and the client trait.
//!
//! The server owns completion and directory listing; this module only
//! describes the wire shapes and the calls the controllers make. Missing
//! collections in a response decode as empty, matching a server that omits
//! fields with no entries.

pub mod http;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::errors::ClientError;

/// One typeahead completion hit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hit {
    /// Text to show in the choice list.
    pub query_hint: String,
    pub project: String,
    /// Path within the project, leading slash included.
    pub path: String,
    pub jump_target: JumpTarget,
}

/// Reference to a position in an indexed file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JumpTarget {
    pub file_id: u64,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    pub from: Position,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub line: u32,
}

/// Response to a completion query.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompleteResponse {
    pub hits: Vec<Hit>,
}

/// One file entry in a directory listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileEntry {
    /// Stable file identifier used for link construction.
    pub id: String,
    pub path: String,
}

/// Response to a directory listing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListFilesResponse {
    /// Absolute directory paths, trailing slash included.
    pub directories: Vec<String>,
    pub files: Vec<FileEntry>,
}

/// Remote search/listing service consumed by the controllers.
#[async_trait]
pub trait ListingClient: Send + Sync {
    /// Typeahead completion for `query`, returning at most `limit` hits.
    async fn complete(&self, query: &str, limit: usize) -> Result<CompleteResponse, ClientError>;

    /// List the immediate children of `path_prefix` within `project`.
    async fn list_files(
        &self,
        project: &str,
        path_prefix: &str,
    ) -> Result<ListFilesResponse, ClientError>;
}
