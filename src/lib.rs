// SPDX-License-Identifier: MIT OR Apache-2.0

//! codenav - Client-side coordination for a remote code search service
//!
//! Controllers for a typeahead search box with request coalescing and a
//! lazily expanding directory tree, both driving a remote listing API.

pub mod client;
pub mod config;
pub mod errors;
pub mod links;
pub mod search;
pub mod tree;
