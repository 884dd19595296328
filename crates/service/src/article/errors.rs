use thiserror::Error;

use super::domain::ArticleId;

/// Rejected caller input; nothing has been written when one of these is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("title is required")]
    TitleRequired,
    #[error("content is required")]
    ContentRequired,
    #[error("title must be at most {max} characters")]
    TitleTooLong { max: usize },
}

/// Business errors for article workflows
#[derive(Debug, Error)]
pub enum ArticleError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("article not found")]
    NotFound(ArticleId),
    #[error("storage error: {0}")]
    Storage(String),
}

impl ArticleError {
    /// Stable numeric code for external mapping/logging
    pub fn code(&self) -> u16 {
        match self {
            ArticleError::Validation(ValidationError::TitleRequired) => 1001,
            ArticleError::Validation(ValidationError::ContentRequired) => 1002,
            ArticleError::Validation(ValidationError::TitleTooLong { .. }) => 1003,
            ArticleError::NotFound(_) => 1004,
            ArticleError::Storage(_) => 1200,
        }
    }

    /// Short label used for metrics and log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            ArticleError::Validation(_) => "validation",
            ArticleError::NotFound(_) => "not_found",
            ArticleError::Storage(_) => "error",
        }
    }
}

impl From<models::errors::ModelError> for ArticleError {
    fn from(e: models::errors::ModelError) -> Self {
        ArticleError::Storage(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_are_user_facing() {
        assert_eq!(ArticleError::from(ValidationError::TitleRequired).to_string(), "title is required");
        assert_eq!(ArticleError::from(ValidationError::ContentRequired).to_string(), "content is required");
        assert_eq!(
            ArticleError::from(ValidationError::TitleTooLong { max: 200 }).to_string(),
            "title must be at most 200 characters"
        );
        assert_eq!(ArticleError::NotFound(3).to_string(), "article not found");
    }

    #[test]
    fn codes_are_distinct() {
        let errs = [
            ArticleError::from(ValidationError::TitleRequired),
            ArticleError::from(ValidationError::ContentRequired),
            ArticleError::from(ValidationError::TitleTooLong { max: 200 }),
            ArticleError::NotFound(1),
            ArticleError::Storage("down".into()),
        ];
        let mut codes: Vec<u16> = errs.iter().map(|e| e.code()).collect();
        codes.dedup();
        assert_eq!(codes.len(), errs.len());
    }
}
