//! Product image fetching and display preparation
//!
//! Result images are fetched from their catalog URL on every query (no
//! cache), decoded, resized to the fixed display size, and re-encoded as
//! JPEG for the page.

use image::DynamicImage;
use std::io::Cursor;

use crate::config::DisplayConfig;
use crate::error::{Error, Result};

/// Fetches and resizes product images for display
pub struct ImageRenderer {
    http: reqwest::Client,
    width: u32,
    height: u32,
}

impl ImageRenderer {
    /// Create a renderer for the configured display size
    pub fn new(display: &DisplayConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            width: display.width,
            height: display.height,
        }
    }

    /// Fetch and decode a product image by URL
    pub async fn fetch(&self, url: &str) -> Result<DynamicImage> {
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| Error::Image(format!("Failed to fetch image {}: {}", url, e)))?;

        if !response.status().is_success() {
            return Err(Error::Image(format!(
                "Image fetch failed ({}): {}",
                response.status(),
                url
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| Error::Image(format!("Failed to read image body: {}", e)))?;

        image::load_from_memory(&bytes)
            .map_err(|e| Error::Image(format!("Failed to decode image {}: {}", url, e)))
    }

    /// Resize to the exact display dimensions
    ///
    /// A fixed square, not aspect-preserving.
    pub fn resize_for_display(&self, img: &DynamicImage) -> DynamicImage {
        img.resize_exact(self.width, self.height, image::imageops::FilterType::Triangle)
    }

    /// Re-encode as JPEG for the page
    pub fn encode_jpeg(img: &DynamicImage) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        // JPEG has no alpha channel
        let rgb = DynamicImage::ImageRgb8(img.to_rgb8());
        rgb.write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Jpeg)
            .map_err(|e| Error::Image(format!("Failed to encode image: {}", e)))?;
        Ok(buf)
    }

    /// Fetch, resize and re-encode an image for display
    pub async fn render(&self, url: &str) -> Result<Vec<u8>> {
        let img = self.fetch(url).await?;
        let resized = self.resize_for_display(&img);
        Self::encode_jpeg(&resized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn renderer() -> ImageRenderer {
        ImageRenderer::new(&DisplayConfig::default())
    }

    #[test]
    fn test_resize_is_exact_regardless_of_input_shape() {
        let wide = DynamicImage::new_rgb8(1200, 300);
        let tall = DynamicImage::new_rgb8(64, 640);

        let r = renderer();
        for img in [wide, tall] {
            let resized = r.resize_for_display(&img);
            assert_eq!((resized.width(), resized.height()), (500, 500));
        }
    }

    #[test]
    fn test_encode_jpeg_produces_jpeg_bytes() {
        let img = DynamicImage::new_rgb8(10, 10);
        let bytes = ImageRenderer::encode_jpeg(&img).unwrap();

        // JPEG start-of-image marker
        assert_eq!(&bytes[..2], &[0xFF, 0xD8]);
    }

    #[test]
    fn test_encode_jpeg_handles_alpha_input() {
        let img = DynamicImage::new_rgba8(10, 10);
        assert!(ImageRenderer::encode_jpeg(&img).is_ok());
    }
}
