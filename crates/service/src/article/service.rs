use std::sync::Arc;

use chrono::{DateTime, SubsecRound, Utc};
use tracing::{debug, info, instrument};

use super::domain::{non_blank, Article, ArticleDraft, ArticleId, ArticleInput};
use super::errors::ArticleError;
use super::repository::ArticleRepository;

/// Default and upper bound for `ArticleService::latest`.
pub const LATEST_DEFAULT_LIMIT: u64 = 10;
pub const LATEST_MAX_LIMIT: u64 = 100;

/// Article business service independent of web framework.
///
/// Stateless apart from the repository handle, so one instance is shared by all requests.
pub struct ArticleService<R: ArticleRepository + ?Sized> {
    repo: Arc<R>,
}

impl<R: ArticleRepository + ?Sized> ArticleService<R> {
    pub fn new(repo: Arc<R>) -> Self { Self { repo } }

    /// All articles, newest first.
    pub async fn list(&self) -> Result<Vec<Article>, ArticleError> {
        self.repo.list_ordered_by_created_at_desc().await
    }

    /// Up to `limit` newest articles; `None` means the default, values are clamped to `1..=100`.
    pub async fn latest(&self, limit: Option<u64>) -> Result<Vec<Article>, ArticleError> {
        let limit = limit.unwrap_or(LATEST_DEFAULT_LIMIT).clamp(1, LATEST_MAX_LIMIT);
        self.repo.find_latest(limit).await
    }

    /// A missing id is `Ok(None)`, not an error.
    pub async fn get(&self, id: ArticleId) -> Result<Option<Article>, ArticleError> {
        self.repo.find_by_id(id).await
    }

    /// Validate, trim and store a new article.
    ///
    /// # Examples
    /// ```
    /// use service::article::{ArticleService, ArticleInput, repository::mock::InMemoryArticleRepository};
    /// use std::sync::Arc;
    /// let svc = ArticleService::new(Arc::new(InMemoryArticleRepository::new()));
    /// let a = tokio_test::block_on(svc.create(ArticleInput::new("  Hello ", "World"))).unwrap();
    /// assert_eq!(a.id, 1);
    /// assert_eq!(a.title, "Hello");
    /// assert_eq!(a.created_at, a.updated_at);
    /// ```
    #[instrument(skip(self, input))]
    pub async fn create(&self, input: ArticleInput) -> Result<Article, ArticleError> {
        let valid = input.validate()?;
        let now = now();
        let saved = self
            .repo
            .save(ArticleDraft { id: None, title: valid.title, content: valid.content, created_at: now, updated_at: now })
            .await?;
        info!(id = saved.id, title_chars = saved.title.chars().count(), "article_created");
        Ok(saved)
    }

    /// Replace title and content of an existing article.
    ///
    /// Existence is checked before validation, so an unknown id is `NotFound`
    /// whatever the payload.
    ///
    /// # Examples
    /// ```
    /// use service::article::{ArticleService, ArticleInput, ArticleError, repository::mock::InMemoryArticleRepository};
    /// use std::sync::Arc;
    /// let svc = ArticleService::new(Arc::new(InMemoryArticleRepository::new()));
    /// let err = tokio_test::block_on(svc.update(7, ArticleInput::default())).unwrap_err();
    /// assert!(matches!(err, ArticleError::NotFound(7)));
    /// ```
    #[instrument(skip(self, input))]
    pub async fn update(&self, id: ArticleId, input: ArticleInput) -> Result<Article, ArticleError> {
        let existing = self.repo.find_by_id(id).await?.ok_or(ArticleError::NotFound(id))?;
        let valid = input.validate()?;
        // 时钟回拨时也保证 updated_at 单调不减
        let updated_at = now().max(existing.updated_at);
        let saved = self
            .repo
            .save(ArticleDraft {
                id: Some(existing.id),
                title: valid.title,
                content: valid.content,
                created_at: existing.created_at,
                updated_at,
            })
            .await?;
        info!(id = saved.id, "article_updated");
        Ok(saved)
    }

    /// Hard delete.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: ArticleId) -> Result<(), ArticleError> {
        if !self.repo.exists_by_id(id).await? {
            return Err(ArticleError::NotFound(id));
        }
        self.repo.delete_by_id(id).await?;
        info!(id, "article_deleted");
        Ok(())
    }

    /// Title substring search; a blank or missing keyword returns the full listing.
    pub async fn search(&self, keyword: Option<&str>) -> Result<Vec<Article>, ArticleError> {
        match non_blank(keyword) {
            None => self.list().await,
            Some(kw) => {
                let hits = self.repo.find_by_title_contains(kw).await?;
                debug!(keyword = kw, hits = hits.len(), "article_search");
                Ok(hits)
            }
        }
    }
}

/// Timestamps are kept at microsecond precision, the finest Postgres stores.
fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::article::errors::ValidationError;
    use crate::article::repository::mock::InMemoryArticleRepository;

    fn svc() -> (Arc<InMemoryArticleRepository>, ArticleService<InMemoryArticleRepository>) {
        let repo = Arc::new(InMemoryArticleRepository::new());
        (repo.clone(), ArticleService::new(repo))
    }

    fn input(t: &str, c: &str) -> ArticleInput { ArticleInput::new(t, c) }

    #[tokio::test]
    async fn create_stores_trimmed_values() {
        let (_, svc) = svc();
        let a = svc.create(input("  Hello  ", "\n World \n")).await.unwrap();
        assert_eq!(a.title, "Hello");
        assert_eq!(a.content, "World");
        assert_eq!(a.created_at, a.updated_at);
        assert_eq!(svc.get(a.id).await.unwrap(), Some(a));
    }

    #[tokio::test]
    async fn create_rejects_blank_fields_without_writing() {
        let (repo, svc) = svc();
        for bad in [ArticleInput { title: None, content: Some("x".into()) }, input("", "x"), input("  ", "x")] {
            let err = svc.create(bad).await.unwrap_err();
            assert!(matches!(err, ArticleError::Validation(ValidationError::TitleRequired)));
        }
        for bad in [ArticleInput { title: Some("x".into()), content: None }, input("x", ""), input("x", " \t")] {
            let err = svc.create(bad).await.unwrap_err();
            assert!(matches!(err, ArticleError::Validation(ValidationError::ContentRequired)));
        }
        assert!(repo.is_empty());
    }

    #[tokio::test]
    async fn create_enforces_title_limit() {
        let (_, svc) = svc();
        let err = svc.create(input(&"a".repeat(201), "x")).await.unwrap_err();
        assert!(matches!(err, ArticleError::Validation(ValidationError::TitleTooLong { max: 200 })));
        assert!(svc.create(input(&"a".repeat(200), "x")).await.is_ok());
    }

    #[tokio::test]
    async fn update_unknown_id_is_not_found_even_with_bad_payload() {
        let (_, svc) = svc();
        let err = svc.update(5, input("ok", "ok")).await.unwrap_err();
        assert!(matches!(err, ArticleError::NotFound(5)));
        let err = svc.update(5, ArticleInput::default()).await.unwrap_err();
        assert!(matches!(err, ArticleError::NotFound(5)));
    }

    #[tokio::test]
    async fn update_preserves_identity_and_creation_time() {
        let (_, svc) = svc();
        let a = svc.create(input("Hello", "World")).await.unwrap();
        let u = svc.update(a.id, input(" Hi ", "World!")).await.unwrap();
        assert_eq!(u.id, a.id);
        assert_eq!(u.created_at, a.created_at);
        assert_eq!(u.title, "Hi");
        assert_eq!(u.content, "World!");
        assert!(u.updated_at >= a.updated_at);
        assert!(u.created_at <= u.updated_at);
    }

    #[tokio::test]
    async fn update_validates_new_values() {
        let (_, svc) = svc();
        let a = svc.create(input("Hello", "World")).await.unwrap();
        let cases = [
            (input("  ", "  "), ValidationError::TitleRequired),
            (ArticleInput { title: None, content: Some("World".into()) }, ValidationError::TitleRequired),
            (input(&"a".repeat(201), "  "), ValidationError::ContentRequired),
            (input(&"a".repeat(201), "World"), ValidationError::TitleTooLong { max: 200 }),
            (input("Hello", "  "), ValidationError::ContentRequired),
        ];
        for (payload, expected) in cases {
            let err = svc.update(a.id, payload).await.unwrap_err();
            assert!(matches!(&err, ArticleError::Validation(v) if *v == expected), "{err:?}");
        }
        // stored row untouched
        assert_eq!(svc.get(a.id).await.unwrap(), Some(a));
    }

    #[tokio::test]
    async fn delete_removes_row_and_second_delete_is_not_found() {
        let (repo, svc) = svc();
        let a = svc.create(input("Hello", "World")).await.unwrap();
        let b = svc.create(input("Other", "World")).await.unwrap();
        svc.delete(a.id).await.unwrap();
        assert!(svc.get(a.id).await.unwrap().is_none());

        let err = svc.delete(a.id).await.unwrap_err();
        assert!(matches!(err, ArticleError::NotFound(id) if id == a.id));
        assert_eq!(repo.len(), 1);
        assert!(svc.get(b.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn list_is_newest_first() {
        let (_, svc) = svc();
        let first = svc.create(input("first", "x")).await.unwrap();
        let second = svc.create(input("second", "x")).await.unwrap();
        let ids: Vec<_> = svc.list().await.unwrap().into_iter().map(|a| a.id).collect();
        assert_eq!(ids, vec![second.id, first.id]);
    }

    #[tokio::test]
    async fn search_blank_keyword_equals_list() {
        let (_, svc) = svc();
        svc.create(input("one", "x")).await.unwrap();
        svc.create(input("two", "x")).await.unwrap();
        let all = svc.list().await.unwrap();
        assert_eq!(svc.search(None).await.unwrap(), all);
        assert_eq!(svc.search(Some("")).await.unwrap(), all);
        assert_eq!(svc.search(Some("   ")).await.unwrap(), all);
    }

    #[tokio::test]
    async fn search_matches_trimmed_case_sensitive_substring() {
        let (_, svc) = svc();
        let rust = svc.create(input("Learning Rust", "x")).await.unwrap();
        svc.create(input("learning rust", "x")).await.unwrap();
        let go = svc.create(input("Go for Rustaceans", "x")).await.unwrap();

        let hits: Vec<_> = svc.search(Some(" Rust ")).await.unwrap().into_iter().map(|a| a.id).collect();
        assert_eq!(hits, vec![rust.id, go.id]);
        assert!(svc.search(Some("RUST")).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn latest_clamps_limit() {
        let (_, svc) = svc();
        for i in 0..12 {
            svc.create(input(&format!("post {i}"), "x")).await.unwrap();
        }
        assert_eq!(svc.latest(None).await.unwrap().len(), 10);
        assert_eq!(svc.latest(Some(0)).await.unwrap().len(), 1);
        assert_eq!(svc.latest(Some(3)).await.unwrap().len(), 3);
        assert_eq!(svc.latest(Some(1000)).await.unwrap().len(), 12);
        let newest = svc.latest(Some(1)).await.unwrap();
        assert_eq!(newest[0].title, "post 11");
    }

    #[tokio::test]
    async fn storage_failure_propagates() {
        let (repo, svc) = svc();
        repo.set_unavailable(true);
        assert!(matches!(svc.list().await.unwrap_err(), ArticleError::Storage(_)));
        assert!(matches!(svc.create(input("a", "b")).await.unwrap_err(), ArticleError::Storage(_)));
        // validation still runs first
        assert!(matches!(svc.create(input("", "b")).await.unwrap_err(), ArticleError::Validation(_)));
    }

    #[tokio::test]
    async fn works_behind_trait_object() {
        let repo: Arc<dyn ArticleRepository> = Arc::new(InMemoryArticleRepository::new());
        let svc: ArticleService<dyn ArticleRepository> = ArticleService::new(repo);
        let a = svc.create(input("dyn", "dispatch")).await.unwrap();
        assert_eq!(svc.get(a.id).await.unwrap().map(|x| x.title), Some("dyn".to_string()));
    }
}
