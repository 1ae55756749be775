//! GraphQL query construction for the collection endpoint
//!
//! The hosted collection exposes near-image and hybrid operators on its
//! `Get` root. Queries are rendered to GraphQL text; string arguments use
//! JSON string syntax for correct escaping.

use super::filter::ProductFilter;

/// Fusion method for combining keyword and vector rankings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FusionMode {
    /// Rank-based fusion of the two result lists
    #[default]
    Ranked,
    /// Score-based fusion (unused by the UI, kept for API completeness)
    RelativeScore,
}

impl FusionMode {
    /// GraphQL enum token for this fusion mode
    pub fn as_graphql(&self) -> &'static str {
        match self {
            FusionMode::Ranked => "rankedFusion",
            FusionMode::RelativeScore => "relativeScoreFusion",
        }
    }
}

/// Attributes requested for every result
const RESULT_FIELDS: &str = "productDisplayName link gender subCategory";

/// Render a near-image similarity query
pub(crate) fn near_image_query(
    collection: &str,
    image_b64: &str,
    filter: &ProductFilter,
    limit: u32,
) -> String {
    format!(
        "{{ Get {{ {}(nearImage: {{image: {}}}, where: {}, limit: {}) {{ {} }} }} }}",
        collection,
        quote(image_b64),
        filter.to_where_clause(),
        limit,
        RESULT_FIELDS
    )
}

/// Render a hybrid keyword+vector query
pub(crate) fn hybrid_query(
    collection: &str,
    text: &str,
    alpha: f32,
    fusion: FusionMode,
    filter: &ProductFilter,
    limit: u32,
) -> String {
    format!(
        "{{ Get {{ {}(hybrid: {{query: {}, alpha: {}, fusionType: {}}}, where: {}, limit: {}) {{ {} }} }} }}",
        collection,
        quote(text),
        alpha,
        fusion.as_graphql(),
        filter.to_where_clause(),
        limit,
        RESULT_FIELDS
    )
}

/// Render a GraphQL string literal
fn quote(value: &str) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| "\"\"".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::GenderChoice;

    fn shoes_filter() -> ProductFilter {
        ProductFilter::new(GenderChoice::Women, &["Shoes".to_string()]).unwrap()
    }

    #[test]
    fn test_hybrid_query_fixes_fusion_and_alpha() {
        let gql = hybrid_query(
            "FashionCollection",
            "red summer dress",
            0.75,
            FusionMode::Ranked,
            &shoes_filter(),
            3,
        );

        assert!(gql.contains("hybrid: {query: \"red summer dress\", alpha: 0.75, fusionType: rankedFusion}"));
        assert!(gql.contains("limit: 3"));
        assert!(gql.contains("productDisplayName link gender subCategory"));
    }

    #[test]
    fn test_near_image_query_carries_base64_payload() {
        let gql = near_image_query("FashionCollection", "aGVsbG8=", &shoes_filter(), 3);

        assert!(gql.contains("nearImage: {image: \"aGVsbG8=\"}"));
        assert!(gql.contains("limit: 3"));
    }

    #[test]
    fn test_both_query_kinds_share_filter_semantics() {
        let filter = shoes_filter();
        let image = near_image_query("FashionCollection", "cGF5bG9hZA==", &filter, 3);
        let text = hybrid_query(
            "FashionCollection",
            "query",
            0.75,
            FusionMode::Ranked,
            &filter,
            3,
        );

        let clause = filter.to_where_clause();
        assert!(image.contains(&clause));
        assert!(text.contains(&clause));
    }

    #[test]
    fn test_query_text_is_escaped() {
        let gql = hybrid_query(
            "FashionCollection",
            "jeans with \"distressed\" look",
            0.75,
            FusionMode::Ranked,
            &shoes_filter(),
            3,
        );

        assert!(gql.contains(r#"query: "jeans with \"distressed\" look""#));
    }

    #[test]
    fn test_fusion_mode_tokens() {
        assert_eq!(FusionMode::Ranked.as_graphql(), "rankedFusion");
        assert_eq!(FusionMode::RelativeScore.as_graphql(), "relativeScoreFusion");
    }
}
