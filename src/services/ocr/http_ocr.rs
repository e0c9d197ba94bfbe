use crate::error::ClientError;
use crate::models::config::ServerConfig;
use crate::models::ocr_result::{AnalyzeResponse, RawRegion};
use reqwest::multipart::{Form, Part};
use std::time::Duration;
use tracing::debug;

/// Multipart field the analyze endpoint reads the upload from
const IMAGE_FIELD: &str = "image";

/// HTTP client for the hosted OCR endpoint
#[derive(Clone)]
pub struct HttpOcrClient {
    client: reqwest::Client,
    base_url: String,
    analyze_url: String,
}

impl HttpOcrClient {
    /// Create a new HTTP OCR client
    pub fn new(server: &ServerConfig) -> Result<Self, ClientError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(server.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: server.base_url.trim_end_matches('/').to_string(),
            analyze_url: server.endpoint(&server.analyze_path),
        })
    }

    pub fn analyze_url(&self) -> &str {
        &self.analyze_url
    }

    /// Check if server is reachable
    pub async fn health_check(&self) -> Result<(), ClientError> {
        let url = format!("{}/health", self.base_url);
        let response = self.client.get(&url).send().await?;
        ensure_success(response).await?;
        Ok(())
    }

    /// Upload an image and return every recognized word as a region
    pub async fn analyze_image(
        &self,
        bytes: Vec<u8>,
        file_name: &str,
    ) -> Result<Vec<RawRegion>, ClientError> {
        debug!(url = %self.analyze_url, size = bytes.len(), "analyze request");

        let part = Part::bytes(bytes).file_name(file_name.to_string());
        let form = Form::new().part(IMAGE_FIELD, part);

        let response = self
            .client
            .post(&self.analyze_url)
            .multipart(form)
            .send()
            .await?;

        let data: AnalyzeResponse = ensure_success(response).await?.json().await?;
        let regions = data.into_regions();

        debug!(count = regions.len(), "analyze response");
        Ok(regions)
    }
}

/// Turn a non-2xx response into `ClientError::Status` carrying the body
pub(crate) async fn ensure_success(
    response: reqwest::Response,
) -> Result<reqwest::Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "Unknown error".to_string());
    Err(ClientError::Status { status, body })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::geometry::Point;
    use crate::test_support::{StubResponse, StubServer};

    const ANALYZE_JSON: &str = r#"{
        "textBlocks": [[
            { "words": [
                { "text": "red", "boundingPolygon": [
                    {"x": 10, "y": 40}, {"x": 50, "y": 40}, {"x": 50, "y": 20}, {"x": 10, "y": 20}
                ] },
                { "text": "apple", "boundingPolygon": [
                    {"x": 60, "y": 40}, {"x": 120, "y": 40}, {"x": 120, "y": 20}, {"x": 60, "y": 20}
                ] }
            ] }
        ]]
    }"#;

    #[test]
    fn test_client_urls() {
        let mut server = ServerConfig::default();
        server.base_url = "http://127.0.0.1:4000/".to_string();

        let client = HttpOcrClient::new(&server).unwrap();
        assert_eq!(client.analyze_url(), "http://127.0.0.1:4000/azure/analyze-image");
        assert_eq!(client.base_url, "http://127.0.0.1:4000");
    }

    #[test]
    fn test_analyze_unreachable_server_is_transport_error() {
        let mut server = ServerConfig::default();
        // Port 9 (discard) on localhost is not expected to be listening
        server.base_url = "http://127.0.0.1:9".to_string();
        server.timeout_secs = 2;

        let client = HttpOcrClient::new(&server).unwrap();
        let result = tokio_test::block_on(client.analyze_image(vec![0u8; 16], "page.png"));
        assert!(matches!(result, Err(ClientError::Transport(_))));
    }

    #[tokio::test]
    async fn test_analyze_uploads_image_field() {
        let mut server = StubServer::start(|_| StubResponse::json(ANALYZE_JSON)).await;
        let client = HttpOcrClient::new(&server.server_config()).unwrap();

        let regions = client.analyze_image(b"image-bytes".to_vec(), "page.png").await.unwrap();
        let texts: Vec<&str> = regions.iter().map(|r| r.text.as_str()).collect();
        assert_eq!(texts, vec!["red", "apple"]);
        assert_eq!(regions[1].polygon[0], Point::new(60.0, 40.0));

        let request = server.next_request().await;
        assert!(request.starts_with("POST /azure/analyze-image "));
        assert!(request.contains(r#"name="image""#));
        assert!(request.contains(r#"filename="page.png""#));
        assert!(request.contains("image-bytes"));
    }

    #[tokio::test]
    async fn test_analyze_non_success_keeps_body() {
        let server = StubServer::start(|_| StubResponse::status(500, r#"{"error":"model offline"}"#)).await;
        let client = HttpOcrClient::new(&server.server_config()).unwrap();

        match client.analyze_image(vec![1, 2, 3], "page.png").await {
            Err(ClientError::Status { status, body }) => {
                assert_eq!(status.as_u16(), 500);
                assert!(body.contains("model offline"));
            }
            other => panic!("expected Status, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_analyze_malformed_body_is_transport_error() {
        let server = StubServer::start(|_| StubResponse::json("not json")).await;
        let client = HttpOcrClient::new(&server.server_config()).unwrap();

        let result = client.analyze_image(vec![1, 2, 3], "page.png").await;
        assert!(matches!(result, Err(ClientError::Transport(_))));
    }

    #[tokio::test]
    async fn test_health_check() {
        let mut server = StubServer::start(|_| StubResponse::json("{}")).await;
        let client = HttpOcrClient::new(&server.server_config()).unwrap();

        client.health_check().await.unwrap();
        assert!(server.next_request().await.starts_with("GET /health "));
    }
}
