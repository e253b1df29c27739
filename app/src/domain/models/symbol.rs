//! Domain models for user-created symbols and categories.

use serde::{Deserialize, Serialize};

/// A custom symbol on the communication board.
///
/// Persisted as part of the `customSymbols` JSON array with camelCase
/// field names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SymbolItem {
    /// Unique token in the form `custom_<epoch_millis>_<rand>`; uniqueness
    /// comes from the generation scheme and is not re-validated afterward
    pub id: String,
    pub name: String,
    /// Local file URI or remote URL of the symbol image
    pub image_uri: Option<String>,
    /// Reference into the category list; `None` means uncategorized
    pub category_id: Option<String>,
}

impl SymbolItem {
    /// Generate a symbol id from a timestamp and a random suffix.
    pub fn generate_id(epoch_millis: i64) -> String {
        format!("custom_{}_{}", epoch_millis, random_suffix())
    }
}

/// A user-created category grouping symbols.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryItem {
    /// Unique token in the form `cat_<epoch_millis>_<rand>`
    pub id: String,
    /// Unique case-insensitively among existing categories
    pub name: String,
}

impl CategoryItem {
    /// Generate a category id from a timestamp and a random suffix.
    pub fn generate_id(epoch_millis: i64) -> String {
        format!("cat_{}_{}", epoch_millis, random_suffix())
    }
}

fn random_suffix() -> String {
    let simple = uuid::Uuid::new_v4().simple().to_string();
    simple[..8].to_string()
}

/// Validation errors for the add/edit symbol form.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SymbolValidationError {
    #[error("Symbol name cannot be empty")]
    EmptyName,
}

/// Validation errors for the inline add-category flow.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CategoryValidationError {
    #[error("Category name cannot be empty")]
    EmptyName,
    #[error("A category with that name already exists")]
    DuplicateName,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbol_id_shape() {
        let id = SymbolItem::generate_id(1_700_000_000_000);
        let parts: Vec<&str> = id.splitn(3, '_').collect();
        assert_eq!(parts[0], "custom");
        assert_eq!(parts[1], "1700000000000");
        assert_eq!(parts[2].len(), 8);
    }

    #[test]
    fn test_category_id_shape() {
        let id = CategoryItem::generate_id(42);
        assert!(id.starts_with("cat_42_"));
    }

    #[test]
    fn test_generated_ids_differ() {
        // Same millisecond, different random suffix
        let a = SymbolItem::generate_id(1000);
        let b = SymbolItem::generate_id(1000);
        assert_ne!(a, b);
    }

    #[test]
    fn test_symbol_serializes_with_camel_case_keys() {
        let symbol = SymbolItem {
            id: "custom_1_abcd1234".to_string(),
            name: "Water".to_string(),
            image_uri: Some("file:///water.png".to_string()),
            category_id: None,
        };

        let json = serde_json::to_value(&symbol).unwrap();
        assert!(json.get("imageUri").is_some());
        assert!(json.get("categoryId").is_some());
    }
}
