//! Client for the hosted Weaviate product collection
//!
//! A thin wrapper over the cluster's GraphQL endpoint: one near-image
//! similarity query and one hybrid keyword+vector query, both filtered and
//! capped. Failures propagate as typed errors; there is no retry layer.

pub mod filter;
pub mod query;
pub mod types;

pub use filter::{GenderChoice, ProductFilter, CATEGORIES};
pub use query::FusionMode;
pub use types::Product;

use std::collections::HashMap;
use std::sync::Arc;

use crate::auth::GcpAuth;
use crate::config::FinderConfig;
use crate::error::{Error, Result};

/// Header carrying the refreshed Google bearer token
const VERTEX_KEY_HEADER: &str = "X-Google-Vertex-Api-Key";
/// Header carrying the AI Studio API key
const STUDIO_KEY_HEADER: &str = "X-Google-Studio-Api-Key";

/// Client for the product collection
pub struct CatalogClient {
    http: reqwest::Client,
    graphql_endpoint: String,
    ready_endpoint: String,
    collection: String,
    result_limit: u32,
    hybrid_alpha: f32,
    fusion: FusionMode,
    auth: Arc<GcpAuth>,
}

impl CatalogClient {
    /// Connect to the cluster described by the configuration
    ///
    /// The cluster API key and Studio key become default headers; the
    /// Google bearer token is attached per request since it expires.
    pub fn connect(config: &FinderConfig, auth: Arc<GcpAuth>) -> Result<Self> {
        config.weaviate.validate()?;

        let mut headers = reqwest::header::HeaderMap::new();
        let mut auth_value = reqwest::header::HeaderValue::from_str(&format!(
            "Bearer {}",
            config.weaviate.api_key
        ))
        .map_err(|e| Error::Config(format!("Invalid WCS_API_KEY: {}", e)))?;
        auth_value.set_sensitive(true);
        headers.insert(reqwest::header::AUTHORIZATION, auth_value);

        let mut studio_value =
            reqwest::header::HeaderValue::from_str(&config.weaviate.studio_api_key)
                .map_err(|e| Error::Config(format!("Invalid STUDIO_APIKEY: {}", e)))?;
        studio_value.set_sensitive(true);
        headers.insert(STUDIO_KEY_HEADER, studio_value);

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| Error::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            graphql_endpoint: config.weaviate.graphql_endpoint(),
            ready_endpoint: config.weaviate.ready_endpoint(),
            collection: config.search.collection.clone(),
            result_limit: config.search.result_limit,
            hybrid_alpha: config.search.hybrid_alpha,
            fusion: FusionMode::Ranked,
            auth,
        })
    }

    /// Collection name this client queries
    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Image-similarity top-k lookup
    ///
    /// `image_b64` is the base64 encoding of the saved reference image.
    pub async fn near_image(
        &self,
        image_b64: &str,
        filter: &ProductFilter,
    ) -> Result<Vec<Product>> {
        let gql = query::near_image_query(&self.collection, image_b64, filter, self.result_limit);
        self.execute(gql).await
    }

    /// Hybrid keyword+vector top-k lookup
    pub async fn hybrid(&self, text: &str, filter: &ProductFilter) -> Result<Vec<Product>> {
        let gql = query::hybrid_query(
            &self.collection,
            text,
            self.hybrid_alpha,
            self.fusion,
            filter,
            self.result_limit,
        );
        self.execute(gql).await
    }

    /// Probe the cluster's readiness endpoint
    pub async fn ready(&self) -> bool {
        match self.http.get(&self.ready_endpoint).send().await {
            Ok(resp) => resp.status().is_success(),
            Err(_) => false,
        }
    }

    /// Execute a GraphQL query and extract the result objects
    async fn execute(&self, gql: String) -> Result<Vec<Product>> {
        let token = self.auth.token().await?;

        let response = self
            .http
            .post(&self.graphql_endpoint)
            .header(VERTEX_KEY_HEADER, token)
            .json(&serde_json::json!({ "query": gql }))
            .send()
            .await
            .map_err(|e| Error::Search(format!("Collection query failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Search(format!(
                "Collection query failed ({}): {}",
                status, body
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| Error::Search(format!("Failed to read collection response: {}", e)))?;

        parse_response(&body, &self.collection)
    }
}

#[derive(serde::Deserialize)]
struct GraphQlResponse {
    data: Option<GetData>,
    errors: Option<Vec<GraphQlError>>,
}

#[derive(serde::Deserialize)]
struct GetData {
    #[serde(rename = "Get")]
    get: HashMap<String, Vec<Product>>,
}

#[derive(serde::Deserialize)]
struct GraphQlError {
    message: String,
}

/// Parse a GraphQL response envelope into products
fn parse_response(body: &str, collection: &str) -> Result<Vec<Product>> {
    let response: GraphQlResponse = serde_json::from_str(body)
        .map_err(|e| Error::Search(format!("Failed to parse collection response: {}", e)))?;

    if let Some(errors) = response.errors {
        let messages: Vec<String> = errors.into_iter().map(|e| e.message).collect();
        return Err(Error::Search(messages.join("; ")));
    }

    let mut data = response
        .data
        .ok_or_else(|| Error::Search("Collection response carried no data".to_string()))?;

    Ok(data.get.remove(collection).unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_response_extracts_products() {
        let body = r#"{
            "data": {
                "Get": {
                    "FashionCollection": [
                        {
                            "productDisplayName": "Puma Men Black Sneakers",
                            "link": "https://img.example.com/1.jpg",
                            "gender": "Men",
                            "subCategory": "Shoes"
                        },
                        {
                            "productDisplayName": "Titan Women Silver Watch",
                            "link": "https://img.example.com/2.jpg",
                            "gender": "Women",
                            "subCategory": "Watches"
                        }
                    ]
                }
            }
        }"#;

        let products = parse_response(body, "FashionCollection").unwrap();
        assert_eq!(products.len(), 2);
        assert_eq!(products[0].sub_category, "Shoes");
        assert_eq!(products[1].gender, "Women");
    }

    #[test]
    fn test_parse_response_surfaces_graphql_errors() {
        let body = r#"{
            "data": null,
            "errors": [{"message": "explorer: vectorize params: no module"}]
        }"#;

        let result = parse_response(body, "FashionCollection");
        match result {
            Err(Error::Search(msg)) => assert!(msg.contains("vectorize params")),
            other => panic!("expected search error, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_response_missing_collection_is_empty() {
        let body = r#"{"data": {"Get": {}}}"#;
        let products = parse_response(body, "FashionCollection").unwrap();
        assert!(products.is_empty());
    }

    #[test]
    fn test_parse_response_rejects_malformed_body() {
        assert!(matches!(
            parse_response("not json", "FashionCollection"),
            Err(Error::Search(_))
        ));
    }
}
