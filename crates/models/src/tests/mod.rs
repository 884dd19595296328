/// Article entity helpers against a migrated in-memory SQLite database
pub mod article_tests;
