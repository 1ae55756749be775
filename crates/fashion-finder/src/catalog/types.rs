//! Product records returned by the catalog

use serde::{Deserialize, Serialize};

/// A product as stored in the hosted collection
///
/// The embedding vector backing similarity search never leaves the service;
/// only the display attributes are fetched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Display name shown next to the image
    pub product_display_name: String,
    /// URL of the product image
    pub link: String,
    /// Gender attribute ("Men" or "Women")
    pub gender: String,
    /// Apparel category attribute
    pub sub_category: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_deserializes_from_collection_attributes() {
        let product: Product = serde_json::from_str(
            r#"{
                "productDisplayName": "Nike Women Running Shoes",
                "link": "https://img.example.com/123.jpg",
                "gender": "Women",
                "subCategory": "Shoes"
            }"#,
        )
        .unwrap();

        assert_eq!(product.product_display_name, "Nike Women Running Shoes");
        assert_eq!(product.gender, "Women");
        assert_eq!(product.sub_category, "Shoes");
    }
}
