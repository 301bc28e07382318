// Page-type dispatch: pick the container for a classified page, gather any
// enrichment it needs, then hand the node to the matching formatter.

use crate::config::ScrapeConfig;
use crate::error::{DetailsError, Result};
use crate::format::{
    PostEnrichment, ProfileEnrichment, format_hashtag, format_place, format_post_detail,
    format_profile,
};
use crate::model::{OutputRecord, RequestDebugInfo};
use crate::raw::RawNode;
use crate::traits::{AuxiliaryQuery, ConnectionSource, EmitMeta, OutputSink, single_query};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::fmt;
use std::str::FromStr;
use tracing::{debug, info, warn};

pub const DETAILS_LABEL: &str = "details";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PageType {
    Place,
    Profile,
    Hashtag,
    Post,
}

impl PageType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PageType::Place => "PLACE",
            PageType::Profile => "PROFILE",
            PageType::Hashtag => "HASHTAG",
            PageType::Post => "POST",
        }
    }

    /// `entry_data` key and the `graphql` child holding the entity.
    pub fn container(&self) -> (&'static str, &'static str) {
        match self {
            PageType::Place => ("LocationsPage", "location"),
            PageType::Profile => ("ProfilePage", "user"),
            PageType::Hashtag => ("TagPage", "hashtag"),
            PageType::Post => ("PostPage", "shortcode_media"),
        }
    }
}

impl FromStr for PageType {
    type Err = DetailsError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "place" | "location" => Ok(PageType::Place),
            "profile" | "user" => Ok(PageType::Profile),
            "hashtag" | "tag" => Ok(PageType::Hashtag),
            "post" => Ok(PageType::Post),
            _ => Err(DetailsError::UnsupportedPageType(s.to_string())),
        }
    }
}

impl fmt::Display for PageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A page the caller has already loaded and classified.
#[derive(Debug, Clone, PartialEq)]
pub struct PageRequest {
    pub url: String,
    /// Classification tag as supplied by the caller, e.g. `"PROFILE"`.
    pub page_type: String,
    pub debug: RequestDebugInfo,
}

impl PageRequest {
    pub fn new(url: &str, page_type: &str) -> Self {
        Self {
            url: url.to_string(),
            page_type: page_type.to_string(),
            debug: RequestDebugInfo::for_url(url),
        }
    }

    pub fn with_debug(mut self, debug: RequestDebugInfo) -> Self {
        self.debug = debug;
        self
    }
}

/// Locate the entity node for `page_type` inside the page's shared data.
pub fn entry_container<'a>(data: &'a Value, page_type: PageType) -> Result<RawNode<'a>> {
    let (entry, key) = page_type.container();
    RawNode::new(data)
        .path(&["entry_data", entry])
        .and_then(|pages| pages.at(0))
        .and_then(|page| page.path(&["graphql", key]))
        .ok_or(DetailsError::MissingContainer {
            page_type: page_type.as_str(),
            container: entry,
        })
}

pub struct DetailsScraper<'a> {
    connections: &'a dyn ConnectionSource,
    query: &'a dyn AuxiliaryQuery,
    config: ScrapeConfig,
}

impl<'a> DetailsScraper<'a> {
    pub fn new(connections: &'a dyn ConnectionSource, query: &'a dyn AuxiliaryQuery) -> Self {
        Self {
            connections,
            query,
            config: ScrapeConfig::default(),
        }
    }

    pub fn with_config(mut self, config: ScrapeConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &ScrapeConfig {
        &self.config
    }

    /// Scrape one classified page and emit the resulting record to `sink`.
    ///
    /// The public-story lookup (when enabled) runs before any other
    /// enrichment. A failure at any step abandons the page; nothing is emitted.
    pub async fn scrape_details(
        &self,
        page: &PageRequest,
        data: &Value,
        sink: &dyn OutputSink,
    ) -> Result<OutputRecord> {
        let page_type: PageType = page.page_type.parse()?;

        let has_public_story = if self.config.include_has_stories {
            let stories = self.load_public_stories(page, data).await?;
            Some(
                RawNode::new(&stories)
                    .get(&["user", "has_public_story"])
                    .unwrap_or(false),
            )
        } else {
            None
        };

        let mut output = self.output_for_page(page, page_type, data).await?;

        if let (Some(has_story), OutputRecord::Profile(profile)) = (has_public_story, &mut output) {
            profile.has_public_story = Some(has_story);
        }

        if let Err(e) = sink
            .emit(
                &output,
                &EmitMeta {
                    label: DETAILS_LABEL.to_string(),
                },
            )
            .await
        {
            warn!("Failed to emit record for {}: {}", page.url, e);
        }

        info!(url = %page.url, page_type = %page_type, "Page details saved, task finished");
        Ok(output)
    }

    /// Dispatch on the page's classification and build its record.
    pub async fn output_from_entry_data(
        &self,
        page: &PageRequest,
        data: &Value,
    ) -> Result<OutputRecord> {
        let page_type: PageType = page.page_type.parse()?;
        self.output_for_page(page, page_type, data).await
    }

    async fn output_for_page(
        &self,
        page: &PageRequest,
        page_type: PageType,
        data: &Value,
    ) -> Result<OutputRecord> {
        let node = entry_container(data, page_type)?;
        let debug = page.debug.clone();

        let output = match page_type {
            PageType::Place => OutputRecord::Place(Box::new(format_place(&node, debug))),
            PageType::Hashtag => OutputRecord::Hashtag(Box::new(format_hashtag(&node, debug))),
            PageType::Profile => {
                let enrichment = self.profile_enrichment(page, &node).await?;
                OutputRecord::Profile(Box::new(format_profile(&node, enrichment, debug)))
            }
            PageType::Post => {
                let enrichment = self.post_enrichment(page, &node).await?;
                OutputRecord::Post(Box::new(format_post_detail(&node, enrichment, debug)))
            }
        };

        Ok(output)
    }

    async fn profile_enrichment(
        &self,
        page: &PageRequest,
        node: &RawNode<'_>,
    ) -> Result<ProfileEnrichment> {
        let Some(owner_id) = node.get::<String>(&["id"]) else {
            debug!("Profile at {} has no id, skipping connections", page.url);
            return Ok(ProfileEnrichment::default());
        };

        let following = self
            .connections
            .following(page, &owner_id, &self.config)
            .await
            .map_err(|source| DetailsError::Enrichment {
                what: "following",
                source,
            })?;
        debug!("Loaded {} following for {}", following.len(), owner_id);

        let followed_by = self
            .connections
            .followed_by(page, &owner_id, &self.config)
            .await
            .map_err(|source| DetailsError::Enrichment {
                what: "followed by",
                source,
            })?;
        debug!("Loaded {} followers for {}", followed_by.len(), owner_id);

        Ok(ProfileEnrichment {
            following,
            followed_by,
        })
    }

    async fn post_enrichment(&self, page: &PageRequest, node: &RawNode<'_>) -> Result<PostEnrichment> {
        let Some(shortcode) = node.get::<String>(&["shortcode"]) else {
            debug!("Post at {} has no shortcode, skipping likers", page.url);
            return Ok(PostEnrichment::default());
        };

        let liked_by = self
            .connections
            .post_likers(page, &shortcode, &self.config)
            .await
            .map_err(|source| DetailsError::Enrichment {
                what: "post likers",
                source,
            })?;
        debug!("Loaded {} likers for {}", liked_by.len(), shortcode);

        Ok(PostEnrichment { liked_by })
    }

    /// Secondary lookup for `has_public_story`, keyed by the profile id.
    pub async fn load_public_stories(&self, page: &PageRequest, data: &Value) -> Result<Value> {
        let user_id: String = RawNode::new(data)
            .path(&["entry_data", "ProfilePage"])
            .and_then(|pages| pages.at(0))
            .and_then(|profile| profile.get(&["graphql", "user", "id"]))
            .ok_or(DetailsError::NotAProfilePage)?;

        let variables = json!({
            "user_id": user_id,
            "include_chaining": false,
            "include_reel": false,
            "include_suggested_users": false,
            "include_logged_out_extras": true,
            "include_highlight_reels": true,
            "include_live_status": true,
        });

        single_query(
            self.query,
            &self.config.query_ids.profile_public_stories,
            &variables,
            |data| data.clone(),
            page,
            "Stories",
        )
        .await
        .map_err(DetailsError::PublicStoryLookupFailed)
    }
}
