//! API routes for the finder server

pub mod image;
pub mod search;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::server::state::AppState;

/// Build all API routes
pub fn api_routes(max_upload_size: usize) -> Router<AppState> {
    Router::new()
        // Search - image upload gets a larger body limit
        .route("/search/text", post(search::search_text))
        .route(
            "/search/image",
            post(search::search_image).layer(DefaultBodyLimit::max(max_upload_size)),
        )
        // Result image proxy
        .route("/image", get(image::display_image))
        // Info
        .route("/info", get(info))
}

/// API info endpoint
async fn info() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "name": "fashion-finder",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Fashion product search over a hosted multimodal vector collection",
        "endpoints": {
            "POST /api/search/text": "Hybrid keyword+vector search",
            "POST /api/search/image": "Near-image similarity search (multipart upload)",
            "GET /api/image": "Fetch and resize a product image for display",
        }
    }))
}
