//! Display image proxy
//!
//! The page cannot resize remote catalog images itself, so it points its
//! `<img>` tags here; the server fetches the original, resizes it to the
//! display size and returns JPEG bytes. No caching: repeat queries re-fetch.

use axum::{
    extract::{Query, State},
    http::header,
    response::IntoResponse,
};
use bytes::Bytes;
use serde::Deserialize;

use crate::error::{Error, Result};
use crate::server::state::AppState;

/// Query parameters for GET /api/image
#[derive(Debug, Deserialize)]
pub struct ImageParams {
    /// Source URL of the product image
    pub url: String,
}

/// GET /api/image?url= - fetch, resize and serve a product image
pub async fn display_image(
    State(state): State<AppState>,
    Query(params): Query<ImageParams>,
) -> Result<impl IntoResponse> {
    validate_image_url(&params.url)?;

    let jpeg = state.renderer().render(&params.url).await?;

    Ok((
        [(header::CONTENT_TYPE, "image/jpeg")],
        Bytes::from(jpeg),
    ))
}

/// Only proxy plain http(s) URLs
fn validate_image_url(url: &str) -> Result<()> {
    if url.starts_with("http://") || url.starts_with("https://") {
        Ok(())
    } else {
        Err(Error::invalid_input("Image URL must be http or https"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_http_schemes_proxied() {
        assert!(validate_image_url("https://img.example.com/1.jpg").is_ok());
        assert!(validate_image_url("http://img.example.com/1.jpg").is_ok());
        assert!(validate_image_url("file:///etc/passwd").is_err());
        assert!(validate_image_url("ftp://img.example.com/1.jpg").is_err());
        assert!(validate_image_url("img.example.com/1.jpg").is_err());
    }
}
