use std::sync::Arc;

use sea_orm::DatabaseConnection;
use service::article::{repo::seaorm::SeaOrmArticleRepository, ArticleRepository, ArticleService};

/// Shared handler state; cloning is cheap.
#[derive(Clone)]
pub struct ServerState {
    pub articles: Arc<ArticleService<dyn ArticleRepository>>,
}

impl ServerState {
    pub fn new(repo: Arc<dyn ArticleRepository>) -> Self {
        Self { articles: Arc::new(ArticleService::new(repo)) }
    }

    /// State backed by the SeaORM repository.
    pub fn from_db(db: DatabaseConnection) -> Self {
        Self::new(Arc::new(SeaOrmArticleRepository::new(db)))
    }
}
