//! Search endpoints for text and image queries

use axum::{
    extract::{Multipart, State},
    Json,
};
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::catalog::{GenderChoice, Product, ProductFilter};
use crate::error::{Error, Result};
use crate::server::state::AppState;
use crate::uploads::UploadStore;

/// Request for POST /api/search/text
#[derive(Debug, Clone, Deserialize)]
pub struct TextSearchRequest {
    /// Free-text product query
    pub query: String,
    /// Gender filter selection
    pub gender: GenderChoice,
    /// Apparel category selection
    #[serde(default)]
    pub categories: Vec<String>,
}

/// Filter selections accompanying an image upload
#[derive(Debug, Clone, Deserialize)]
pub struct SearchFilters {
    /// Gender filter selection
    pub gender: GenderChoice,
    /// Apparel category selection
    #[serde(default)]
    pub categories: Vec<String>,
}

/// Response for both search endpoints
#[derive(Debug, Serialize)]
pub struct SearchResponse {
    /// Matched products, best first
    pub results: Vec<Product>,
    /// Processing time in milliseconds
    pub took_ms: u64,
}

/// POST /api/search/text - hybrid keyword+vector search
pub async fn search_text(
    State(state): State<AppState>,
    Json(request): Json<TextSearchRequest>,
) -> Result<Json<SearchResponse>> {
    let start = Instant::now();

    let query = validate_query_text(&request.query)?;
    let filter = ProductFilter::new(request.gender, &request.categories)?;

    tracing::info!("Text search: \"{}\"", query);

    let results = state.catalog().hybrid(query, &filter).await?;

    let took_ms = start.elapsed().as_millis() as u64;
    tracing::info!("Text search completed in {}ms, {} results", took_ms, results.len());

    Ok(Json(SearchResponse { results, took_ms }))
}

/// POST /api/search/image - near-image similarity search
///
/// Multipart body: a `filters` JSON field and an `image` file field
/// (jpg/jpeg/png). All validation happens before the upload is saved and
/// before any remote call.
pub async fn search_image(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<SearchResponse>> {
    let start = Instant::now();

    let mut filters: Option<SearchFilters> = None;
    let mut upload: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| Error::invalid_input(format!("Failed to read multipart field: {}", e)))?
    {
        let name = field.name().unwrap_or("").to_string();

        match name.as_str() {
            "filters" => {
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| Error::invalid_input(format!("Failed to read filters: {}", e)))?;
                filters = Some(serde_json::from_slice(&data).map_err(|e| {
                    Error::invalid_input(format!("Invalid filters payload: {}", e))
                })?);
            }
            "image" => {
                let filename = field
                    .file_name()
                    .map(|s| s.to_string())
                    .ok_or_else(|| Error::invalid_input("Image upload has no filename"))?;

                if !UploadStore::is_supported(&filename) {
                    return Err(Error::invalid_input(
                        "Unsupported image type; upload a jpg, jpeg or png file.",
                    ));
                }

                let data = field
                    .bytes()
                    .await
                    .map_err(|e| Error::invalid_input(format!("Failed to read upload: {}", e)))?;
                upload = Some((filename, data.to_vec()));
            }
            other => {
                tracing::debug!("Ignoring unexpected multipart field: {}", other);
            }
        }
    }

    let filters =
        filters.ok_or_else(|| Error::invalid_input("Missing filters for image search"))?;
    let (filename, data) =
        upload.ok_or_else(|| Error::invalid_input("Please upload an image to search with."))?;

    let filter = ProductFilter::new(filters.gender, &filters.categories)?;

    tracing::info!("Image search: {} ({} bytes)", filename, data.len());

    // Save first, then encode the saved bytes for the wire
    let saved_path = state.uploads().save(&filename, &data).await?;
    let image_b64 = state.uploads().read_base64(&saved_path).await?;

    let results = state.catalog().near_image(&image_b64, &filter).await?;

    let took_ms = start.elapsed().as_millis() as u64;
    tracing::info!("Image search completed in {}ms, {} results", took_ms, results.len());

    Ok(Json(SearchResponse { results, took_ms }))
}

/// Reject empty or whitespace-only query text before any remote call
fn validate_query_text(query: &str) -> Result<&str> {
    let trimmed = query.trim();
    if trimmed.is_empty() {
        return Err(Error::invalid_input(
            "Please enter a query to get recommendations.",
        ));
    }
    Ok(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_query_rejected_before_search() {
        assert!(matches!(
            validate_query_text(""),
            Err(Error::InvalidInput(_))
        ));
        assert!(matches!(
            validate_query_text("   \t"),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn test_query_text_is_trimmed() {
        assert_eq!(validate_query_text("  red dress ").unwrap(), "red dress");
    }

    #[test]
    fn test_text_request_deserializes_ui_payload() {
        let request: TextSearchRequest = serde_json::from_str(
            r#"{"query": "linen shirt", "gender": "both", "categories": ["Topwear"]}"#,
        )
        .unwrap();

        assert_eq!(request.query, "linen shirt");
        assert_eq!(request.gender, GenderChoice::Both);
        assert_eq!(request.categories, vec!["Topwear".to_string()]);
    }

    #[test]
    fn test_missing_categories_default_to_empty_and_fail_filter() {
        let request: TextSearchRequest =
            serde_json::from_str(r#"{"query": "boots", "gender": "women"}"#).unwrap();

        assert!(request.categories.is_empty());
        assert!(ProductFilter::new(request.gender, &request.categories).is_err());
    }
}
