use crate::error::ClientError;
use crate::models::config::ServerConfig;
use crate::models::ocr_result::ImageSearchResponse;
use crate::services::ocr::http_ocr::ensure_success;
use std::time::Duration;
use tracing::debug;

/// Looks up a picture for a recognized word
#[derive(Clone)]
pub struct ImageSearchClient {
    client: reqwest::Client,
    search_url: String,
}

impl ImageSearchClient {
    pub fn new(server: &ServerConfig) -> Result<Self, ClientError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(server.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            search_url: server.endpoint(&server.image_search_path),
        })
    }

    pub fn search_url(&self) -> &str {
        &self.search_url
    }

    /// Link of the first image the search returns for `query`
    pub async fn first_image(&self, query: &str) -> Result<String, ClientError> {
        debug!(url = %self.search_url, query, "image search request");

        let response = self
            .client
            .get(&self.search_url)
            .query(&[("q", query)])
            .send()
            .await?;

        let data: ImageSearchResponse = ensure_success(response).await?.json().await?;
        first_link(data, query)
    }
}

fn first_link(data: ImageSearchResponse, query: &str) -> Result<String, ClientError> {
    data.images
        .into_iter()
        .next()
        .map(|image| image.link)
        .ok_or_else(|| ClientError::NoResults(query.to_string()))
}
