//! Service layer holding the article business rules.
//! - Separates validation and orchestration from data access.
//! - Storage is reached only through the `ArticleRepository` trait.
//! - Provides clear error types and documented interfaces.

pub mod article;
