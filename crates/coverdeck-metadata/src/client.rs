//! Metadata service client.
//!
//! Two lookups, each a single blocking GET: search by name and fetch by
//! id. Both responses are XML and are normalized with
//! [`crate::xml::parse_document`].

use std::time::Duration;

use serde::Deserialize;

use coverdeck_types::error::{CoverdeckError, Result};

use crate::record::Node;
use crate::transport::{HttpTransport, UreqTransport};
use crate::xml;

const SEARCH_ENDPOINT: &str = "GetGamesList.php";
const DETAIL_ENDPOINT: &str = "GetGame.php";

/// Where and how to query the metadata service (`[metadata]` in the config file).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct MetadataConfig {
    /// API root, without a trailing slash.
    pub base_url: String,
    /// Platform filter sent with every request.
    pub platform: String,
    /// Per-request timeout.
    pub timeout_secs: u64,
}

impl Default for MetadataConfig {
    fn default() -> Self {
        Self {
            base_url: "http://thegamesdb.net/api".to_string(),
            platform: "PC".to_string(),
            timeout_secs: 10,
        }
    }
}

impl MetadataConfig {
    fn endpoint(&self, name: &str) -> String {
        format!("{}/{name}", self.base_url.trim_end_matches('/'))
    }
}

/// Client for the search and detail endpoints.
pub struct MetadataClient {
    config: MetadataConfig,
    transport: Box<dyn HttpTransport>,
}

impl MetadataClient {
    /// Client using a `ureq` transport with the configured timeout.
    pub fn new(config: MetadataConfig) -> Self {
        let transport = UreqTransport::new(Duration::from_secs(config.timeout_secs));
        Self::with_transport(config, Box::new(transport))
    }

    pub fn with_transport(config: MetadataConfig, transport: Box<dyn HttpTransport>) -> Self {
        Self { config, transport }
    }

    pub fn config(&self) -> &MetadataConfig {
        &self.config
    }

    /// Search game summaries by name.
    ///
    /// An empty result set is an error, as is any transport or parse failure.
    pub fn search_by_name(&self, name: &str) -> Result<Vec<Node>> {
        let url = self.config.endpoint(SEARCH_ENDPOINT);
        let body = self
            .transport
            .get(&url, &[("name", name), ("platform", self.config.platform.as_str())])?;
        let document = parse_body(&body)?;
        let games: Vec<Node> = document
            .get("Game")
            .map(|g| g.items().to_vec())
            .unwrap_or_default();
        if games.is_empty() {
            return Err(CoverdeckError::NoResults(name.to_string()));
        }
        log::debug!("search {name:?}: {} result(s)", games.len());
        Ok(games)
    }

    /// Fetch the full detail document for one game id.
    ///
    /// The returned node is the document root, so both `baseImgUrl` and the
    /// `Game` record are reachable from it.
    pub fn get_by_id(&self, id: i64) -> Result<Node> {
        let url = self.config.endpoint(DETAIL_ENDPOINT);
        let id = id.to_string();
        let body = self
            .transport
            .get(&url, &[("id", id.as_str()), ("platform", self.config.platform.as_str())])?;
        let document = parse_body(&body)?;
        if document.get("Game").and_then(Node::as_map).is_none() {
            return Err(CoverdeckError::MissingField("Game"));
        }
        Ok(document)
    }

    /// Download raw bytes from an absolute URL (cover art).
    pub fn download(&self, url: &str) -> Result<Vec<u8>> {
        self.transport.get(url, &[])
    }
}

fn parse_body(body: &[u8]) -> Result<Node> {
    let text = std::str::from_utf8(body)
        .map_err(|e| CoverdeckError::Xml(format!("response is not UTF-8: {e}")))?;
    xml::parse_document(text)
}
