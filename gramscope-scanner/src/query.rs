use crate::error::{Result, ScanError};
use async_trait::async_trait;
use gramscope_core::error::BoxError;
use gramscope_core::queue::SITE_BASE_URL;
use gramscope_core::traits::AuxiliaryQuery;
use gramscope_core::PageRequest;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;
use url::Url;

const GRAPHQL_PATH: &str = "graphql/query/";

/// Client for the site's `graphql/query` endpoint.
#[derive(Clone)]
pub struct QueryClient {
    client: Client,
    base_url: Url,
    session_id: Option<String>,
}

impl QueryClient {
    pub fn new() -> Result<Self> {
        Self::with_timeout(10)
    }

    pub fn with_timeout(timeout_secs: u64) -> Result<Self> {
        let client = Client::builder()
            .user_agent("gramscope/0.1 (https://github.com/trapdoorsec/gramscope)")
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs((timeout_secs / 2).max(1)))
            .pool_idle_timeout(Duration::from_secs(90))
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()?;

        Ok(Self {
            client,
            base_url: Url::parse(SITE_BASE_URL)?,
            session_id: None,
        })
    }

    pub fn with_base_url(mut self, base_url: &str) -> Result<Self> {
        self.base_url = Url::parse(base_url)?;
        Ok(self)
    }

    /// Authenticate queries with a logged-in `sessionid` cookie.
    pub fn with_session_id(mut self, session_id: String) -> Self {
        self.session_id = Some(session_id);
        self
    }

    pub fn query_url(&self, query_id: &str, variables: &Value) -> Result<Url> {
        let mut url = self.base_url.join(GRAPHQL_PATH)?;
        url.query_pairs_mut()
            .append_pair("query_hash", query_id)
            .append_pair("variables", &serde_json::to_string(variables)?);
        Ok(url)
    }

    /// Run one query and return its `data` object.
    pub async fn query(&self, query_id: &str, variables: &Value) -> Result<Value> {
        let url = self.query_url(query_id, variables)?;
        debug!("Querying {}", url);

        let mut request = self.client.get(url);
        if let Some(ref session_id) = self.session_id {
            request = request.header("Cookie", format!("sessionid={}", session_id));
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ScanError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let mut body: Value = serde_json::from_str(&response.text().await?)?;

        if let Some(status) = body.get("status").and_then(Value::as_str)
            && status != "ok"
        {
            let message = body
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or(status)
                .to_string();
            return Err(ScanError::Graphql(message));
        }

        match body.get_mut("data").map(Value::take) {
            Some(data) if data.is_object() => Ok(data),
            _ => Err(ScanError::Graphql("response has no data object".to_string())),
        }
    }
}

#[async_trait]
impl AuxiliaryQuery for QueryClient {
    async fn run_query(
        &self,
        query_id: &str,
        variables: &Value,
        page: &PageRequest,
        label: &str,
    ) -> std::result::Result<Value, BoxError> {
        debug!("[{}] running query {} for {}", label, query_id, page.url);
        Ok(self.query(query_id, variables).await?)
    }
}
