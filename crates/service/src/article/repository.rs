use async_trait::async_trait;

use super::domain::{Article, ArticleDraft, ArticleId};
use super::errors::ArticleError;

/// Storage abstraction for articles. Implementations hold no business rules.
#[async_trait]
pub trait ArticleRepository: Send + Sync {
    /// Every article, newest `created_at` first (ties: higher id first).
    async fn list_ordered_by_created_at_desc(&self) -> Result<Vec<Article>, ArticleError>;
    /// Same order as the full listing, truncated to `limit` rows.
    async fn find_latest(&self, limit: u64) -> Result<Vec<Article>, ArticleError>;
    async fn find_by_id(&self, id: ArticleId) -> Result<Option<Article>, ArticleError>;
    /// Articles whose title contains `needle` (case-sensitive), in id order.
    async fn find_by_title_contains(&self, needle: &str) -> Result<Vec<Article>, ArticleError>;
    async fn exists_by_id(&self, id: ArticleId) -> Result<bool, ArticleError>;
    /// Insert when `draft.id` is `None`, otherwise overwrite title, content and `updated_at`.
    async fn save(&self, draft: ArticleDraft) -> Result<Article, ArticleError>;
    async fn delete_by_id(&self, id: ArticleId) -> Result<(), ArticleError>;
}

/// Simple in-memory repository for tests and doc examples
pub mod mock {
    use super::*;
    use std::collections::BTreeMap;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Mutex;

    #[derive(Default)]
    struct Rows {
        next_id: ArticleId,
        by_id: BTreeMap<ArticleId, Article>,
    }

    #[derive(Default)]
    pub struct InMemoryArticleRepository {
        rows: Mutex<Rows>,
        unavailable: AtomicBool,
    }

    impl InMemoryArticleRepository {
        pub fn new() -> Self { Self::default() }

        /// Make every call fail with `ArticleError::Storage`, simulating a backend outage.
        pub fn set_unavailable(&self, down: bool) {
            self.unavailable.store(down, Ordering::SeqCst);
        }

        pub fn len(&self) -> usize {
            self.lock().map(|r| r.by_id.len()).unwrap_or_default()
        }

        pub fn is_empty(&self) -> bool { self.len() == 0 }

        fn lock(&self) -> Result<std::sync::MutexGuard<'_, Rows>, ArticleError> {
            if self.unavailable.load(Ordering::SeqCst) {
                return Err(ArticleError::Storage("in-memory store unavailable".into()));
            }
            self.rows.lock().map_err(|e| ArticleError::Storage(e.to_string()))
        }

        fn newest_first(rows: &Rows) -> Vec<Article> {
            let mut all: Vec<Article> = rows.by_id.values().cloned().collect();
            all.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
            all
        }
    }

    #[async_trait]
    impl ArticleRepository for InMemoryArticleRepository {
        async fn list_ordered_by_created_at_desc(&self) -> Result<Vec<Article>, ArticleError> {
            let rows = self.lock()?;
            Ok(Self::newest_first(&rows))
        }

        async fn find_latest(&self, limit: u64) -> Result<Vec<Article>, ArticleError> {
            let rows = self.lock()?;
            let limit = usize::try_from(limit).unwrap_or(usize::MAX);
            Ok(Self::newest_first(&rows).into_iter().take(limit).collect())
        }

        async fn find_by_id(&self, id: ArticleId) -> Result<Option<Article>, ArticleError> {
            let rows = self.lock()?;
            Ok(rows.by_id.get(&id).cloned())
        }

        async fn find_by_title_contains(&self, needle: &str) -> Result<Vec<Article>, ArticleError> {
            let rows = self.lock()?;
            Ok(rows.by_id.values().filter(|a| a.title.contains(needle)).cloned().collect())
        }

        async fn exists_by_id(&self, id: ArticleId) -> Result<bool, ArticleError> {
            let rows = self.lock()?;
            Ok(rows.by_id.contains_key(&id))
        }

        async fn save(&self, draft: ArticleDraft) -> Result<Article, ArticleError> {
            let mut rows = self.lock()?;
            match draft.id {
                None => {
                    rows.next_id += 1;
                    let a = Article {
                        id: rows.next_id,
                        title: draft.title,
                        content: draft.content,
                        created_at: draft.created_at,
                        updated_at: draft.updated_at,
                    };
                    rows.by_id.insert(a.id, a.clone());
                    Ok(a)
                }
                Some(id) => {
                    let existing = rows.by_id.get_mut(&id).ok_or(ArticleError::NotFound(id))?;
                    existing.title = draft.title;
                    existing.content = draft.content;
                    existing.updated_at = draft.updated_at;
                    Ok(existing.clone())
                }
            }
        }

        async fn delete_by_id(&self, id: ArticleId) -> Result<(), ArticleError> {
            let mut rows = self.lock()?;
            rows.by_id.remove(&id);
            Ok(())
        }
    }
}
