//! Endpoint catalog loading and category filtering

use crate::{
    error::{AppError, Result},
    models::EndpointDescriptor,
};
use reqwest::Client;
use std::{fmt, path::PathBuf, time::Duration};

/// Where the endpoint list comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogSource {
    /// JSON file on disk
    File(PathBuf),
    /// JSON document served over http(s)
    Remote(url::Url),
    /// JSON text already in memory
    Inline(String),
}

impl CatalogSource {
    /// Interpret a configured location: anything with a scheme is a URL,
    /// everything else a path
    pub fn from_location(location: &str) -> Result<Self> {
        if location.contains("://") {
            let url = url::Url::parse(location)
                .map_err(|e| AppError::config(format!("Invalid catalog URL '{}': {}", location, e)))?;
            Ok(CatalogSource::Remote(url))
        } else {
            Ok(CatalogSource::File(PathBuf::from(location)))
        }
    }
}

impl fmt::Display for CatalogSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogSource::File(path) => write!(f, "{}", path.display()),
            CatalogSource::Remote(url) => write!(f, "{}", url),
            CatalogSource::Inline(_) => f.write_str("<inline>"),
        }
    }
}

/// Loads endpoint descriptors and filters them by category tag
pub struct EndpointCatalog {
    source: CatalogSource,
    client: Client,
}

impl EndpointCatalog {
    /// Create a catalog reading from the given source
    pub fn new(source: CatalogSource) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(concat!("rpc-latency-bench/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| AppError::internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { source, client })
    }

    /// Create a catalog from a configured location string
    pub fn from_location(location: &str) -> Result<Self> {
        Self::new(CatalogSource::from_location(location)?)
    }

    /// Create a catalog over in-memory JSON
    pub fn from_json(json: impl Into<String>) -> Result<Self> {
        Self::new(CatalogSource::Inline(json.into()))
    }

    pub fn source(&self) -> &CatalogSource {
        &self.source
    }

    /// Load every descriptor, in source order
    pub async fn load_all(&self) -> Result<Vec<EndpointDescriptor>> {
        let raw = self.read_source().await?;
        parse_descriptors(&raw).map_err(|e| {
            AppError::catalog_load(format!("Malformed endpoint list from {}: {}", self.source, e))
        })
    }

    /// Load the descriptors whose category tag field contains `category_tag`
    pub async fn load(&self, category_tag: &str) -> Result<Vec<EndpointDescriptor>> {
        let all = self.load_all().await?;
        Ok(filter_by_tag(all, category_tag))
    }

    async fn read_source(&self) -> Result<String> {
        match &self.source {
            CatalogSource::File(path) => tokio::fs::read_to_string(path).await.map_err(|e| {
                AppError::catalog_load(format!("Cannot read endpoint list {}: {}", path.display(), e))
            }),
            CatalogSource::Remote(url) => {
                let response = self
                    .client
                    .get(url.clone())
                    .header("Accept", "application/json")
                    .send()
                    .await
                    .map_err(|e| AppError::catalog_load(format!("Cannot fetch endpoint list {}: {}", url, e)))?;

                let status = response.status();
                if !status.is_success() {
                    return Err(AppError::catalog_load(format!(
                        "Endpoint list {} returned HTTP {}",
                        url, status
                    )));
                }

                response
                    .text()
                    .await
                    .map_err(|e| AppError::catalog_load(format!("Cannot read endpoint list {}: {}", url, e)))
            }
            CatalogSource::Inline(json) => Ok(json.clone()),
        }
    }
}

fn parse_descriptors(raw: &str) -> std::result::Result<Vec<EndpointDescriptor>, serde_json::Error> {
    serde_json::from_str(raw)
}

/// Keep descriptors carrying the tag, preserving order
pub fn filter_by_tag(endpoints: Vec<EndpointDescriptor>, category_tag: &str) -> Vec<EndpointDescriptor> {
    endpoints
        .into_iter()
        .filter(|endpoint| endpoint.has_tag(category_tag))
        .collect()
}
