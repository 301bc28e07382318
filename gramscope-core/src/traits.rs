//! Seams to the collaborators the dispatcher depends on.
//!
//! Network fetches, persistence and request scheduling live outside this
//! crate; the dispatcher only sees them through these traits.

use crate::config::ScrapeConfig;
use crate::details::{PageRequest, PageType};
use crate::error::BoxError;
use crate::model::OutputRecord;
use async_trait::async_trait;
use serde_json::Value;

/// Paginated connection lists used to enrich profile and post records.
#[async_trait]
pub trait ConnectionSource: Send + Sync {
    /// Usernames the profile `owner_id` follows.
    async fn following(
        &self,
        page: &PageRequest,
        owner_id: &str,
        config: &ScrapeConfig,
    ) -> Result<Vec<String>, BoxError>;

    /// Usernames following the profile `owner_id`.
    async fn followed_by(
        &self,
        page: &PageRequest,
        owner_id: &str,
        config: &ScrapeConfig,
    ) -> Result<Vec<String>, BoxError>;

    /// Usernames that liked the post `shortcode`.
    async fn post_likers(
        &self,
        page: &PageRequest,
        shortcode: &str,
        config: &ScrapeConfig,
    ) -> Result<Vec<String>, BoxError>;
}

/// Authenticated secondary graphql fetch. Returns the response's `data` object.
#[async_trait]
pub trait AuxiliaryQuery: Send + Sync {
    async fn run_query(
        &self,
        query_id: &str,
        variables: &Value,
        page: &PageRequest,
        label: &str,
    ) -> Result<Value, BoxError>;
}

/// Run `query_id` and project the result through `selector`.
pub async fn single_query<T, F>(
    client: &dyn AuxiliaryQuery,
    query_id: &str,
    variables: &Value,
    selector: F,
    page: &PageRequest,
    label: &str,
) -> Result<T, BoxError>
where
    F: FnOnce(&Value) -> T,
{
    let data = client.run_query(query_id, variables, page, label).await?;
    Ok(selector(&data))
}

/// Extra information handed to a sink alongside each record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmitMeta {
    pub label: String,
}

/// Persistence for finished records.
#[async_trait]
pub trait OutputSink: Send + Sync {
    async fn emit(&self, record: &OutputRecord, meta: &EmitMeta) -> Result<(), BoxError>;
}

/// A page scheduled for a future scrape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueuedRequest {
    pub url: String,
    pub page_type: PageType,
}

/// Scheduling of newly discovered entities.
#[async_trait]
pub trait RequestQueue: Send + Sync {
    /// Returns `false` when the URL was already queued.
    async fn add_request(&self, request: QueuedRequest) -> Result<bool, BoxError>;
}

/// Connection source that never fetches anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoConnections;

#[async_trait]
impl ConnectionSource for NoConnections {
    async fn following(
        &self,
        _page: &PageRequest,
        _owner_id: &str,
        _config: &ScrapeConfig,
    ) -> Result<Vec<String>, BoxError> {
        Ok(Vec::new())
    }

    async fn followed_by(
        &self,
        _page: &PageRequest,
        _owner_id: &str,
        _config: &ScrapeConfig,
    ) -> Result<Vec<String>, BoxError> {
        Ok(Vec::new())
    }

    async fn post_likers(
        &self,
        _page: &PageRequest,
        _shortcode: &str,
        _config: &ScrapeConfig,
    ) -> Result<Vec<String>, BoxError> {
        Ok(Vec::new())
    }
}
