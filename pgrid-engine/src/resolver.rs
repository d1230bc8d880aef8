//! Remote filter resolution
//!
//! The engine never filters locally; it asks the catalog service which
//! items match the active terms and lays out whatever comes back. The
//! [`FilterResolver`] trait is the seam: sessions take any implementation,
//! tests supply in-process fakes, production uses [`HttpResolver`].

use async_trait::async_trait;
use pgrid_common::api::GridQuery;
use pgrid_common::ItemId;
use std::time::Duration;
use thiserror::Error;

/// Filter resolution endpoint path on the catalog service
const DYNAMIC_GRID_PATH: &str = "/v1/dynamic-grid";

const USER_AGENT: &str = concat!("pgrid/", env!("CARGO_PKG_VERSION"));
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Filter resolution errors
#[derive(Debug, Error)]
pub enum ResolverError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("API error {0}: {1}")]
    Api(u16, String),

    #[error("Parse error: {0}")]
    Parse(String),
}

/// Resolves a filter query to the matching item ids
///
/// A resolve failure is terminal for that interaction: the session logs it
/// and keeps the current subset. Nothing here retries.
#[async_trait]
pub trait FilterResolver: Send + Sync + 'static {
    /// Return the ordered item ids matching the query
    async fn resolve(&self, query: &GridQuery) -> Result<Vec<ItemId>, ResolverError>;
}

/// HTTP resolver against the catalog service
pub struct HttpResolver {
    http_client: reqwest::Client,
    base_url: String,
}

impl HttpResolver {
    /// Create a resolver for a catalog base URL such as
    /// `http://127.0.0.1:5780`
    pub fn new(base_url: impl Into<String>) -> Result<Self, ResolverError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| ResolverError::Network(e.to_string()))?;

        Ok(Self {
            http_client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Catalog base URL this resolver talks to
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl FilterResolver for HttpResolver {
    async fn resolve(&self, query: &GridQuery) -> Result<Vec<ItemId>, ResolverError> {
        let url = format!("{}{}", self.base_url, DYNAMIC_GRID_PATH);

        tracing::debug!(
            url = %url,
            terms = query.terms.len(),
            cond = %query.cond,
            "resolving filter query"
        );

        let response = self
            .http_client
            .get(&url)
            .query(&query.query_pairs())
            .send()
            .await
            .map_err(|e| ResolverError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(ResolverError::Api(status.as_u16(), error_text));
        }

        let ids: Vec<ItemId> = response
            .json()
            .await
            .map_err(|e| ResolverError::Parse(e.to_string()))?;

        tracing::debug!(count = ids.len(), "filter query resolved");
        Ok(ids)
    }
}
