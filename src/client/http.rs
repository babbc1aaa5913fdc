// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP implementation of the listing client.

use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::client::{CompleteResponse, ListFilesResponse, ListingClient};
use crate::errors::ClientError;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Listing client backed by a remote HTTP server.
///
/// Every request carries a timeout, so no call stays in flight forever and
/// the controllers always see a terminal outcome.
#[derive(Clone)]
pub struct HttpListingClient {
    http: reqwest::Client,
    base_url: String,
}

#[derive(Serialize)]
struct CompleteRequest<'a> {
    query: &'a str,
    limit: usize,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ListFilesRequest<'a> {
    project: &'a str,
    path_prefix: &'a str,
}

impl HttpListingClient {
    /// Build a client for `base_url` with the default request timeout.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    /// Build a client with an explicit request timeout.
    pub fn with_timeout(
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn post_json<B, T>(&self, endpoint: &str, body: &B) -> Result<T, ClientError>
    where
        B: Serialize,
        T: DeserializeOwned,
    {
        let url = format!("{}/{endpoint}", self.base_url);
        debug!(%url, "listing request");
        let resp = self.http.post(url).json(body).send().await?;
        if !resp.status().is_success() {
            let code = resp.status().as_u16();
            let message = resp.text().await.unwrap_or_default();
            return Err(ClientError::Status { code, message });
        }
        Ok(resp.json().await?)
    }
}

#[async_trait]
impl ListingClient for HttpListingClient {
    async fn complete(&self, query: &str, limit: usize) -> Result<CompleteResponse, ClientError> {
        self.post_json("v1/complete", &CompleteRequest { query, limit })
            .await
    }

    async fn list_files(
        &self,
        project: &str,
        path_prefix: &str,
    ) -> Result<ListFilesResponse, ClientError> {
        self.post_json(
            "v1/list-files",
            &ListFilesRequest {
                project,
                path_prefix,
            },
        )
        .await
    }
}
