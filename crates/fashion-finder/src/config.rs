//! Configuration for the fashion finder
//!
//! Tunables come from an optional TOML file; the three remote-service
//! secrets always come from the environment and are required at startup.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{Error, Result};

/// Environment variable naming an optional TOML config file
pub const CONFIG_ENV: &str = "FASHION_FINDER_CONFIG";

/// Main finder configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FinderConfig {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Catalog search configuration
    #[serde(default)]
    pub search: SearchConfig,
    /// Result display configuration
    #[serde(default)]
    pub display: DisplayConfig,
    /// Reference image upload configuration
    #[serde(default)]
    pub uploads: UploadConfig,
    /// Service account credential configuration
    #[serde(default)]
    pub credentials: CredentialConfig,
    /// Weaviate cluster configuration (secrets overlaid from env)
    #[serde(default)]
    pub weaviate: WeaviateConfig,
}

impl FinderConfig {
    /// Load configuration: optional TOML file, then the required env overlay
    ///
    /// Fails fast when any of `WCS_URL`, `WCS_API_KEY` or `STUDIO_APIKEY`
    /// is missing and not provided by the file.
    pub fn load() -> Result<Self> {
        let mut config = match std::env::var(CONFIG_ENV) {
            Ok(path) => Self::from_file(&path)?,
            Err(_) => Self::default(),
        };
        config.weaviate.overlay_env()?;
        Ok(config)
    }

    /// Parse configuration from a TOML file
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Failed to read config {}: {}", path.display(), e))
        })?;
        toml::from_str(&content)
            .map_err(|e| Error::Config(format!("Invalid config {}: {}", path.display(), e)))
    }
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host address
    #[serde(default = "default_host")]
    pub host: String,
    /// Port number
    #[serde(default = "default_port")]
    pub port: u16,
    /// Enable CORS
    #[serde(default = "default_enable_cors")]
    pub enable_cors: bool,
    /// Maximum upload size in bytes (default: 25MB)
    #[serde(default = "default_max_upload_size")]
    pub max_upload_size: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            enable_cors: default_enable_cors(),
            max_upload_size: default_max_upload_size(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    8080
}
fn default_enable_cors() -> bool {
    true
}
fn default_max_upload_size() -> usize {
    25 * 1024 * 1024 // 25MB
}

/// Catalog search configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Collection name in the Weaviate cluster
    #[serde(default = "default_collection")]
    pub collection: String,
    /// Maximum number of results per query
    #[serde(default = "default_result_limit")]
    pub result_limit: u32,
    /// Blend weight between keyword and vector score for hybrid queries
    #[serde(default = "default_hybrid_alpha")]
    pub hybrid_alpha: f32,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            collection: default_collection(),
            result_limit: default_result_limit(),
            hybrid_alpha: default_hybrid_alpha(),
        }
    }
}

fn default_collection() -> String {
    "FashionCollection".to_string()
}
fn default_result_limit() -> u32 {
    3
}
fn default_hybrid_alpha() -> f32 {
    0.75
}

/// Result display configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Display width in pixels
    #[serde(default = "default_display_edge")]
    pub width: u32,
    /// Display height in pixels
    #[serde(default = "default_display_edge")]
    pub height: u32,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            width: default_display_edge(),
            height: default_display_edge(),
        }
    }
}

fn default_display_edge() -> u32 {
    500
}

/// Reference image upload configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadConfig {
    /// Directory where uploaded reference images are saved
    #[serde(default = "default_upload_dir")]
    pub dir: PathBuf,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            dir: default_upload_dir(),
        }
    }
}

fn default_upload_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("fashion-finder")
        .join("uploads")
}

/// Service account credential configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CredentialConfig {
    /// Path to the service account JSON key file
    #[serde(default = "default_key_path")]
    pub key_path: PathBuf,
}

impl Default for CredentialConfig {
    fn default() -> Self {
        Self {
            key_path: default_key_path(),
        }
    }
}

fn default_key_path() -> PathBuf {
    PathBuf::from("mm-rag-recommender-key.json")
}

/// Weaviate cluster connection configuration
///
/// The API keys are secrets and never serialized back out.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WeaviateConfig {
    /// Cluster URL (`WCS_URL`)
    #[serde(default)]
    pub cluster_url: String,
    /// Cluster API key (`WCS_API_KEY`)
    #[serde(default, skip_serializing)]
    pub api_key: String,
    /// Google AI Studio API key (`STUDIO_APIKEY`)
    #[serde(default, skip_serializing)]
    pub studio_api_key: String,
}

impl WeaviateConfig {
    /// Overlay the environment variables and validate completeness
    pub fn overlay_env(&mut self) -> Result<()> {
        if let Ok(url) = std::env::var("WCS_URL") {
            self.cluster_url = url;
        }
        if let Ok(key) = std::env::var("WCS_API_KEY") {
            self.api_key = key;
        }
        if let Ok(key) = std::env::var("STUDIO_APIKEY") {
            self.studio_api_key = key;
        }
        self.validate()
    }

    /// Validate that all required values are present
    pub fn validate(&self) -> Result<()> {
        if self.cluster_url.is_empty() {
            return Err(Error::Config("WCS_URL is not set".to_string()));
        }
        if self.api_key.is_empty() {
            return Err(Error::Config("WCS_API_KEY is not set".to_string()));
        }
        if self.studio_api_key.is_empty() {
            return Err(Error::Config("STUDIO_APIKEY is not set".to_string()));
        }
        Ok(())
    }

    /// GraphQL endpoint for the cluster
    pub fn graphql_endpoint(&self) -> String {
        format!("{}/v1/graphql", self.cluster_url.trim_end_matches('/'))
    }

    /// Readiness endpoint for the cluster
    pub fn ready_endpoint(&self) -> String {
        format!(
            "{}/v1/.well-known/ready",
            self.cluster_url.trim_end_matches('/')
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_defaults_match_observed_behavior() {
        let search = SearchConfig::default();
        assert_eq!(search.collection, "FashionCollection");
        assert_eq!(search.result_limit, 3);
        assert_eq!(search.hybrid_alpha, 0.75);
    }

    #[test]
    fn test_display_defaults() {
        let display = DisplayConfig::default();
        assert_eq!((display.width, display.height), (500, 500));
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: FinderConfig = toml::from_str(
            r#"
            [server]
            port = 9090

            [search]
            result_limit = 5
            "#,
        )
        .unwrap();

        assert_eq!(config.server.port, 9090);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.search.result_limit, 5);
        assert_eq!(config.search.hybrid_alpha, 0.75);
    }

    #[test]
    fn test_weaviate_validation_requires_all_values() {
        let mut weaviate = WeaviateConfig::default();
        assert!(weaviate.validate().is_err());

        weaviate.cluster_url = "https://cluster.weaviate.network".to_string();
        assert!(weaviate.validate().is_err());

        weaviate.api_key = "wcs-key".to_string();
        weaviate.studio_api_key = "studio-key".to_string();
        assert!(weaviate.validate().is_ok());
    }

    #[test]
    fn test_graphql_endpoint_strips_trailing_slash() {
        let weaviate = WeaviateConfig {
            cluster_url: "https://cluster.weaviate.network/".to_string(),
            ..Default::default()
        };
        assert_eq!(
            weaviate.graphql_endpoint(),
            "https://cluster.weaviate.network/v1/graphql"
        );
    }
}
