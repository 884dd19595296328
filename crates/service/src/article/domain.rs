use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::errors::ValidationError;

pub use models::article::TITLE_MAX_CHARS;

pub type ArticleId = i32;

/// Stored article as seen by callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub id: ArticleId,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Create/update payload. Both fields are optional on the wire so that a missing
/// or `null` field is reported as a validation error rather than a parse failure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ArticleInput {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
}

impl ArticleInput {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self { title: Some(title.into()), content: Some(content.into()) }
    }

    /// Checks run in a fixed order: title present, content present, title length.
    pub fn validate(&self) -> Result<ValidArticle, ValidationError> {
        let title = non_blank(self.title.as_deref()).ok_or(ValidationError::TitleRequired)?;
        let content = non_blank(self.content.as_deref()).ok_or(ValidationError::ContentRequired)?;
        if title.chars().count() > TITLE_MAX_CHARS {
            return Err(ValidationError::TitleTooLong { max: TITLE_MAX_CHARS });
        }
        Ok(ValidArticle { title: title.to_string(), content: content.to_string() })
    }
}

/// Trimmed title and content that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidArticle {
    pub title: String,
    pub content: String,
}

/// What the service hands to `ArticleRepository::save`.
/// `id == None` inserts a new row, `Some(id)` overwrites that row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleDraft {
    pub id: Option<ArticleId>,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Trimmed value, or `None` when missing or whitespace-only.
pub fn non_blank(s: Option<&str>) -> Option<&str> {
    s.map(str::trim).filter(|t| !t.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_trims_both_fields() {
        let v = ArticleInput::new("  Hello \n", "\tWorld  ").validate().unwrap();
        assert_eq!(v.title, "Hello");
        assert_eq!(v.content, "World");
    }

    #[test]
    fn title_is_checked_before_content() {
        let input = ArticleInput { title: None, content: None };
        assert_eq!(input.validate().unwrap_err(), ValidationError::TitleRequired);
    }

    #[test]
    fn blank_values_are_missing() {
        for t in [None, Some(""), Some("   "), Some("\n\t")] {
            let input = ArticleInput { title: t.map(String::from), content: Some("x".into()) };
            assert_eq!(input.validate().unwrap_err(), ValidationError::TitleRequired);
            let input = ArticleInput { title: Some("x".into()), content: t.map(String::from) };
            assert_eq!(input.validate().unwrap_err(), ValidationError::ContentRequired);
        }
    }

    #[test]
    fn missing_content_wins_over_long_title() {
        let input = ArticleInput { title: Some("a".repeat(500)), content: Some(" ".into()) };
        assert_eq!(input.validate().unwrap_err(), ValidationError::ContentRequired);
    }

    #[test]
    fn title_length_counts_chars_after_trim() {
        assert!(ArticleInput::new("a".repeat(200), "x").validate().is_ok());
        assert!(ArticleInput::new(format!("  {}  ", "a".repeat(200)), "x").validate().is_ok());
        assert_eq!(
            ArticleInput::new("a".repeat(201), "x").validate().unwrap_err(),
            ValidationError::TitleTooLong { max: 200 }
        );
        // 200 three-byte characters is 600 bytes but still within the limit
        assert!(ArticleInput::new("記".repeat(200), "x").validate().is_ok());
        assert!(ArticleInput::new("記".repeat(201), "x").validate().is_err());
    }

    #[test]
    fn input_deserializes_null_and_missing_fields() {
        let input: ArticleInput = serde_json::from_str(r#"{"title": null}"#).unwrap();
        assert!(input.title.is_none());
        assert!(input.content.is_none());
    }

    #[test]
    fn article_serializes_camel_case() {
        let now = Utc::now();
        let a = Article { id: 1, title: "t".into(), content: "c".into(), created_at: now, updated_at: now };
        let v = serde_json::to_value(&a).unwrap();
        assert!(v.get("createdAt").is_some());
        assert!(v.get("updatedAt").is_some());
    }
}
