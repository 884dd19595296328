use chrono::Utc;
use sea_orm::DatabaseConnection;

use crate::article::domain::{Article, ArticleDraft, ArticleId};
use crate::article::errors::ArticleError;
use crate::article::repository::ArticleRepository;
use models::{article, errors::ModelError};

/// SeaORM-backed repository implementation.
#[derive(Clone)]
pub struct SeaOrmArticleRepository {
    pub db: DatabaseConnection,
}

impl SeaOrmArticleRepository {
    pub fn new(db: DatabaseConnection) -> Self { Self { db } }
}

fn to_domain(m: article::Model) -> Article {
    Article {
        id: m.id,
        title: m.title,
        content: m.content,
        created_at: m.created_at.with_timezone(&Utc),
        updated_at: m.updated_at.with_timezone(&Utc),
    }
}

#[async_trait::async_trait]
impl ArticleRepository for SeaOrmArticleRepository {
    async fn list_ordered_by_created_at_desc(&self) -> Result<Vec<Article>, ArticleError> {
        let rows = article::list_newest_first(&self.db).await?;
        Ok(rows.into_iter().map(to_domain).collect())
    }

    async fn find_latest(&self, limit: u64) -> Result<Vec<Article>, ArticleError> {
        let rows = article::latest(&self.db, limit).await?;
        Ok(rows.into_iter().map(to_domain).collect())
    }

    async fn find_by_id(&self, id: ArticleId) -> Result<Option<Article>, ArticleError> {
        Ok(article::find(&self.db, id).await?.map(to_domain))
    }

    async fn find_by_title_contains(&self, needle: &str) -> Result<Vec<Article>, ArticleError> {
        let rows = article::find_title_containing(&self.db, needle).await?;
        Ok(rows.into_iter().map(to_domain).collect())
    }

    async fn exists_by_id(&self, id: ArticleId) -> Result<bool, ArticleError> {
        Ok(article::exists(&self.db, id).await?)
    }

    async fn save(&self, draft: ArticleDraft) -> Result<Article, ArticleError> {
        let saved = match draft.id {
            None => {
                article::insert(&self.db, &draft.title, &draft.content, draft.created_at.into(), draft.updated_at.into())
                    .await?
            }
            Some(id) => match article::update(&self.db, id, &draft.title, &draft.content, draft.updated_at.into()).await {
                Ok(m) => m,
                // 并发删除后再更新：按不存在处理
                Err(ModelError::NotFound(_)) => return Err(ArticleError::NotFound(id)),
                Err(e) => return Err(e.into()),
            },
        };
        Ok(to_domain(saved))
    }

    async fn delete_by_id(&self, id: ArticleId) -> Result<(), ArticleError> {
        article::delete(&self.db, id).await?;
        Ok(())
    }
}
