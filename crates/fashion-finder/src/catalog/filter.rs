//! Attribute filters for catalog queries
//!
//! Both search modes constrain results to a gender candidate set and an
//! apparel category candidate set, each matched with a contains-any
//! predicate on the collection side.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Apparel categories available in the collection's `subCategory` attribute
pub const CATEGORIES: [&str; 5] = ["Topwear", "Bottomwear", "Shoes", "Watches", "Bags"];

/// Gender selection from the UI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GenderChoice {
    Women,
    Men,
    /// Gender agnostic / non-conforming: matches both attribute values
    Both,
}

impl GenderChoice {
    /// Candidate values for the collection's `gender` attribute
    pub fn candidates(&self) -> &'static [&'static str] {
        match self {
            GenderChoice::Women => &["Women"],
            GenderChoice::Men => &["Men"],
            GenderChoice::Both => &["Men", "Women"],
        }
    }
}

/// Validated attribute filter shared by image and text search
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductFilter {
    genders: Vec<String>,
    categories: Vec<String>,
}

impl ProductFilter {
    /// Build a filter from the UI selections
    ///
    /// Rejects an empty category selection and unknown category names before
    /// any remote call is made.
    pub fn new(gender: GenderChoice, categories: &[String]) -> Result<Self> {
        if categories.is_empty() {
            return Err(Error::invalid_input(
                "Please select at least one apparel category.",
            ));
        }
        for category in categories {
            if !CATEGORIES.contains(&category.as_str()) {
                return Err(Error::invalid_input(format!(
                    "Unknown apparel category: {}",
                    category
                )));
            }
        }

        Ok(Self {
            genders: gender.candidates().iter().map(|g| g.to_string()).collect(),
            categories: categories.to_vec(),
        })
    }

    /// Gender candidate values
    pub fn genders(&self) -> &[String] {
        &self.genders
    }

    /// Category candidate values
    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    /// Render the GraphQL `where` clause for this filter
    ///
    /// Both predicates are combined with `And`; each is a `ContainsAny`
    /// over the candidate set.
    pub fn to_where_clause(&self) -> String {
        format!(
            "{{operator: And, operands: [\
             {{path: [\"gender\"], operator: ContainsAny, valueText: {}}}, \
             {{path: [\"subCategory\"], operator: ContainsAny, valueText: {}}}\
             ]}}",
            string_list(&self.genders),
            string_list(&self.categories)
        )
    }
}

/// Render a GraphQL list of strings
///
/// JSON array syntax is valid GraphQL list syntax and handles escaping.
fn string_list(values: &[String]) -> String {
    serde_json::to_string(values).unwrap_or_else(|_| "[]".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn categories(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn test_both_expands_to_men_and_women() {
        assert_eq!(GenderChoice::Both.candidates(), &["Men", "Women"]);
        assert_eq!(GenderChoice::Women.candidates(), &["Women"]);
        assert_eq!(GenderChoice::Men.candidates(), &["Men"]);
    }

    #[test]
    fn test_empty_categories_rejected() {
        let result = ProductFilter::new(GenderChoice::Women, &[]);
        assert!(matches!(result, Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_unknown_category_rejected() {
        let result = ProductFilter::new(GenderChoice::Women, &categories(&["Hats"]));
        assert!(matches!(result, Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_where_clause_contains_both_predicates() {
        let filter = ProductFilter::new(GenderChoice::Women, &categories(&["Shoes"])).unwrap();
        let clause = filter.to_where_clause();

        assert!(clause.contains("operator: And"));
        assert!(clause.contains("path: [\"gender\"], operator: ContainsAny, valueText: [\"Women\"]"));
        assert!(clause
            .contains("path: [\"subCategory\"], operator: ContainsAny, valueText: [\"Shoes\"]"));
    }

    #[test]
    fn test_where_clause_expands_both_genders() {
        let filter =
            ProductFilter::new(GenderChoice::Both, &categories(&["Watches", "Bags"])).unwrap();
        let clause = filter.to_where_clause();

        assert!(clause.contains("valueText: [\"Men\",\"Women\"]"));
        assert!(clause.contains("valueText: [\"Watches\",\"Bags\"]"));
    }

    #[test]
    fn test_gender_choice_deserializes_from_ui_values() {
        assert_eq!(
            serde_json::from_str::<GenderChoice>("\"both\"").unwrap(),
            GenderChoice::Both
        );
        assert_eq!(
            serde_json::from_str::<GenderChoice>("\"women\"").unwrap(),
            GenderChoice::Women
        );
    }
}
