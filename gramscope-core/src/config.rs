use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Graphql query hashes used by the auxiliary fetches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct QueryIds {
    pub following: String,
    pub followed_by: String,
    pub post_likers: String,
    pub profile_public_stories: String,
}

impl Default for QueryIds {
    fn default() -> Self {
        Self {
            following: "d04b0a864b4b54837c0d870b0e77e076".to_string(),
            followed_by: "c76146de99bb02f6415203be841dd25a".to_string(),
            post_likers: "d5d763b1e2acf209d62d22d184488e57".to_string(),
            profile_public_stories: "d4d88dc1500312af6f937f7b804c68c3".to_string(),
        }
    }
}

/// Options for one scrape run. Every field has a default, so an empty JSON
/// object is a valid configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ScrapeConfig {
    /// Run the secondary public-story lookup for profile pages.
    pub include_has_stories: bool,
    /// Upper bound on followed accounts to collect. 0 skips the fetch.
    pub following_max: usize,
    pub followed_by_max: usize,
    pub likers_max: usize,
    /// Items requested per paginated connection query.
    pub page_size: usize,
    pub query_ids: QueryIds,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            include_has_stories: false,
            following_max: 0,
            followed_by_max: 0,
            likers_max: 0,
            page_size: 50,
            query_ids: QueryIds::default(),
        }
    }
}

impl ScrapeConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json(&contents)
    }
}
