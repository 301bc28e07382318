use crate::details::PageType;
use crate::error::{BoxError, DetailsError, Result};
use crate::traits::{QueuedRequest, RequestQueue};
use async_trait::async_trait;
use std::collections::{HashSet, VecDeque};
use tokio::sync::Mutex;
use tracing::debug;
use url::Url;

pub const SITE_BASE_URL: &str = "https://www.instagram.com";

/// Resolve a profile handle (`natgeo`, `/natgeo/` or a full URL) against the site.
pub fn profile_url(username: &str) -> Result<Url> {
    let base = Url::parse(SITE_BASE_URL)?;
    Ok(base.join(username.trim())?)
}

/// Schedules profiles discovered while scraping for a later PROFILE scrape.
pub struct ProfileEnqueuer<'a> {
    queue: &'a dyn RequestQueue,
}

impl<'a> ProfileEnqueuer<'a> {
    pub fn new(queue: &'a dyn RequestQueue) -> Self {
        Self { queue }
    }

    /// Returns `false` when the queue already held this profile.
    pub async fn add_profile(&self, username: &str) -> Result<bool> {
        let url = profile_url(username)?;
        debug!("Enqueuing profile {}", url);
        self.queue
            .add_request(QueuedRequest {
                url: url.to_string(),
                page_type: PageType::Profile,
            })
            .await
            .map_err(DetailsError::Queue)
    }
}

/// In-process FIFO request queue. Re-adding a known URL is a no-op.
#[derive(Default)]
pub struct MemoryQueue {
    pending: Mutex<VecDeque<QueuedRequest>>,
    seen: Mutex<HashSet<String>>,
}

impl MemoryQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn pop(&self) -> Option<QueuedRequest> {
        self.pending.lock().await.pop_front()
    }

    pub async fn len(&self) -> usize {
        self.pending.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.pending.lock().await.is_empty()
    }
}

#[async_trait]
impl RequestQueue for MemoryQueue {
    async fn add_request(&self, request: QueuedRequest) -> std::result::Result<bool, BoxError> {
        // Check and mark as seen
        let is_new = self.seen.lock().await.insert(request.url.clone());
        if is_new {
            self.pending.lock().await.push_back(request);
        }
        Ok(is_new)
    }
}
