// Paginated connection lists (following, followers, likers) fetched through
// the graphql query endpoint.

use crate::error::{Result, ScanError};
use crate::query::QueryClient;
use async_trait::async_trait;
use gramscope_core::error::BoxError;
use gramscope_core::raw::RawNode;
use gramscope_core::traits::ConnectionSource;
use gramscope_core::{PageRequest, ScrapeConfig};
use serde_json::{Value, json};
use tracing::{debug, info};

/// Where one connection list lives inside a query response.
struct Connection<'a> {
    query_id: &'a str,
    variables: Value,
    root: &'static str,
    edge: &'static str,
}

pub struct ConnectionFetcher {
    client: QueryClient,
}

impl ConnectionFetcher {
    pub fn new(client: QueryClient) -> Self {
        Self { client }
    }

    /// Follow `end_cursor` until `max` usernames are collected or the list ends.
    async fn collect(&self, connection: Connection<'_>, max: usize, page_size: usize) -> Result<Vec<String>> {
        let mut usernames = Vec::new();
        if max == 0 {
            return Ok(usernames);
        }

        let mut after: Option<String> = None;
        loop {
            let mut variables = connection.variables.clone();
            variables["first"] = json!(page_size.max(1).min(max - usernames.len()));
            if let Some(ref cursor) = after {
                variables["after"] = json!(cursor);
            }

            let data = self.client.query(connection.query_id, &variables).await?;
            let root = RawNode::new(&data);
            let list = root
                .path(&[connection.root])
                .and_then(|parent| parent.edges(connection.edge))
                .ok_or_else(|| {
                    ScanError::Graphql(format!(
                        "response has no {}.{}",
                        connection.root, connection.edge
                    ))
                })?;

            let before = usernames.len();
            usernames.extend(
                list.nodes
                    .iter()
                    .filter_map(|node| node.get::<String>(&["username"]))
                    .take(max - before),
            );
            debug!(
                "Fetched {} {} entries ({} total)",
                usernames.len() - before,
                connection.edge,
                usernames.len()
            );

            let has_next: bool = root.get_or(
                &[connection.root, connection.edge, "page_info", "has_next_page"],
                false,
            );
            after = root.get(&[connection.root, connection.edge, "page_info", "end_cursor"]);

            // a page without new entries would loop forever on the same cursor
            if usernames.len() >= max || !has_next || after.is_none() || usernames.len() == before {
                break;
            }
        }

        Ok(usernames)
    }
}

#[async_trait]
impl ConnectionSource for ConnectionFetcher {
    async fn following(
        &self,
        page: &PageRequest,
        owner_id: &str,
        config: &ScrapeConfig,
    ) -> std::result::Result<Vec<String>, BoxError> {
        let connection = Connection {
            query_id: &config.query_ids.following,
            variables: json!({ "id": owner_id, "include_reel": false, "fetch_mutual": false }),
            root: "user",
            edge: "edge_follow",
        };
        let following = self
            .collect(connection, config.following_max, config.page_size)
            .await?;
        info!("Loaded {} following for {}", following.len(), page.url);
        Ok(following)
    }

    async fn followed_by(
        &self,
        page: &PageRequest,
        owner_id: &str,
        config: &ScrapeConfig,
    ) -> std::result::Result<Vec<String>, BoxError> {
        let connection = Connection {
            query_id: &config.query_ids.followed_by,
            variables: json!({ "id": owner_id, "include_reel": false, "fetch_mutual": false }),
            root: "user",
            edge: "edge_followed_by",
        };
        let followed_by = self
            .collect(connection, config.followed_by_max, config.page_size)
            .await?;
        info!("Loaded {} followers for {}", followed_by.len(), page.url);
        Ok(followed_by)
    }

    async fn post_likers(
        &self,
        page: &PageRequest,
        shortcode: &str,
        config: &ScrapeConfig,
    ) -> std::result::Result<Vec<String>, BoxError> {
        let connection = Connection {
            query_id: &config.query_ids.post_likers,
            variables: json!({ "shortcode": shortcode, "include_reel": false }),
            root: "shortcode_media",
            edge: "edge_liked_by",
        };
        let likers = self
            .collect(connection, config.likers_max, config.page_size)
            .await?;
        info!("Loaded {} likers for {}", likers.len(), page.url);
        Ok(likers)
    }
}
