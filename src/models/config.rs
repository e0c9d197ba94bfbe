use serde::{Deserialize, Serialize};

/// Endpoints of the OCR / image search backend
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ServerConfig {
    pub base_url: String,
    pub analyze_path: String,
    pub image_search_path: String,
    pub timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000".to_string(),
            analyze_path: "/azure/analyze-image".to_string(),
            image_search_path: "/google/get-images".to_string(),
            timeout_secs: 10,
        }
    }
}

impl ServerConfig {
    /// Join the base URL and an endpoint path
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.base_url.trim().is_empty() {
            return Err("Server base URL must not be empty".to_string());
        }

        for path in [&self.analyze_path, &self.image_search_path] {
            if !path.starts_with('/') {
                return Err(format!("Endpoint path must start with '/': {}", path));
            }
        }

        if self.timeout_secs == 0 {
            return Err("Request timeout must be at least 1 second".to_string());
        }

        Ok(())
    }
}

/// Word overlay behaviour
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct OverlayConfig {
    /// Skip malformed regions instead of failing the whole overlay
    pub skip_invalid_regions: bool,
    /// Drop regions whose text is empty or whitespace
    pub ignore_blank_text: bool,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            skip_invalid_regions: true,
            ignore_blank_text: false,
        }
    }
}

/// Log output settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter directive; `RUST_LOG` wins when set
    pub level: String,
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

/// Complete application configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub overlay: OverlayConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    pub fn validate(&self) -> Result<(), String> {
        self.server.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_config_default() {
        let config = AppConfig::default();

        // Server config
        assert_eq!(config.server.base_url, "http://localhost:3000");
        assert_eq!(config.server.analyze_path, "/azure/analyze-image");
        assert_eq!(config.server.image_search_path, "/google/get-images");
        assert_eq!(config.server.timeout_secs, 10);

        // Overlay config
        assert!(config.overlay.skip_invalid_regions);
        assert!(!config.overlay.ignore_blank_text);

        // Logging config
        assert_eq!(config.logging.level, "info");
        assert!(!config.logging.json);

        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_app_config_serialization() {
        let config = AppConfig::default();
        let json = serde_json::to_string_pretty(&config).unwrap();

        let deserialized: AppConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, deserialized);
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let json = r#"{"server": {"base_url": "http://10.0.0.2:8080"}}"#;
        let config: AppConfig = serde_json::from_str(json).unwrap();

        assert_eq!(config.server.base_url, "http://10.0.0.2:8080");
        assert_eq!(config.server.timeout_secs, 10);
        assert_eq!(config.overlay, OverlayConfig::default());
        assert_eq!(config.logging, LoggingConfig::default());
    }

    #[test]
    fn test_endpoint_join() {
        let mut server = ServerConfig::default();
        assert_eq!(
            server.endpoint(&server.analyze_path),
            "http://localhost:3000/azure/analyze-image"
        );

        server.base_url = "http://localhost:3000/".to_string();
        assert_eq!(
            server.endpoint("/health"),
            "http://localhost:3000/health"
        );
    }

    #[test]
    fn test_server_validation() {
        let mut server = ServerConfig::default();
        server.base_url = "  ".to_string();
        assert_eq!(
            server.validate().unwrap_err(),
            "Server base URL must not be empty"
        );

        let mut server = ServerConfig::default();
        server.image_search_path = "google/get-images".to_string();
        assert!(server.validate().is_err());

        let mut server = ServerConfig::default();
        server.timeout_secs = 0;
        assert_eq!(
            server.validate().unwrap_err(),
            "Request timeout must be at least 1 second"
        );
    }
}
