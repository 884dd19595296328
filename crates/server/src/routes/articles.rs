use std::time::Instant;

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Json,
};
use common::types::MessageBody;
use serde::Deserialize;
use service::article::{Article, ArticleInput};
use tracing::info;

use crate::{errors::JsonApiError, metrics, state::ServerState};

#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchQuery {
    /// Substring to look for in titles; blank returns every article
    pub keyword: Option<String>,
}

#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct LatestQuery {
    /// Number of articles, clamped to 1..=100 (default 10)
    pub limit: Option<u64>,
}

#[utoipa::path(
    get, path = "/api/articles", tag = "articles",
    responses(
        (status = 200, description = "All articles, newest first", body = [crate::openapi::ArticleDoc]),
        (status = 500, description = "List Failed", body = crate::openapi::ErrorBodyDoc)
    )
)]
pub async fn list(State(state): State<ServerState>) -> Result<Json<Vec<Article>>, JsonApiError> {
    let started = Instant::now();
    let res = state.articles.list().await;
    metrics::observe("list", started, &res);
    match res {
        Ok(list) => { info!(count = list.len(), "list articles"); Ok(Json(list)) }
        Err(e) => Err(JsonApiError::internal("failed to load articles", &e)),
    }
}

#[utoipa::path(
    get, path = "/api/articles/latest", tag = "articles",
    params(LatestQuery),
    responses(
        (status = 200, description = "Newest articles", body = [crate::openapi::ArticleDoc]),
        (status = 500, description = "List Failed", body = crate::openapi::ErrorBodyDoc)
    )
)]
pub async fn latest(
    State(state): State<ServerState>,
    query: Result<Query<LatestQuery>, QueryRejection>,
) -> Result<Json<Vec<Article>>, JsonApiError> {
    let Query(q) = query?;
    let started = Instant::now();
    let res = state.articles.latest(q.limit).await;
    metrics::observe("latest", started, &res);
    res.map(Json).map_err(|e| JsonApiError::internal("failed to load articles", &e))
}

#[utoipa::path(
    get, path = "/api/articles/{id}", tag = "articles",
    params(("id" = i32, Path, description = "Article ID")),
    responses(
        (status = 200, description = "OK", body = crate::openapi::ArticleDoc),
        (status = 404, description = "Not Found", body = crate::openapi::ErrorBodyDoc),
        (status = 500, description = "Lookup Failed", body = crate::openapi::ErrorBodyDoc)
    )
)]
pub async fn get(State(state): State<ServerState>, id: Result<Path<i32>, PathRejection>) -> Result<Json<Article>, JsonApiError> {
    let Path(id) = id?;
    let started = Instant::now();
    let res = state.articles.get(id).await;
    metrics::observe("get", started, &res);
    match res {
        Ok(Some(a)) => Ok(Json(a)),
        Ok(None) => Err(JsonApiError::new(StatusCode::NOT_FOUND, "article not found")),
        Err(e) => Err(JsonApiError::internal("failed to load article", &e)),
    }
}

#[utoipa::path(
    post, path = "/api/articles", tag = "articles",
    request_body = crate::openapi::ArticleInputDoc,
    responses(
        (status = 201, description = "Created", body = crate::openapi::ArticleDoc),
        (status = 400, description = "Validation Error", body = crate::openapi::ErrorBodyDoc),
        (status = 500, description = "Create Failed", body = crate::openapi::ErrorBodyDoc)
    )
)]
pub async fn create(
    State(state): State<ServerState>,
    body: Result<Json<ArticleInput>, JsonRejection>,
) -> Result<(StatusCode, Json<Article>), JsonApiError> {
    let Json(input) = body?;
    let started = Instant::now();
    let res = state.articles.create(input).await;
    metrics::observe("create", started, &res);
    match res {
        Ok(a) => { info!(id = a.id, "created article"); Ok((StatusCode::CREATED, Json(a))) }
        Err(e) => Err(JsonApiError::from_article(e, "failed to create article")),
    }
}

#[utoipa::path(
    put, path = "/api/articles/{id}", tag = "articles",
    params(("id" = i32, Path, description = "Article ID")),
    request_body = crate::openapi::ArticleInputDoc,
    responses(
        (status = 200, description = "Updated", body = crate::openapi::ArticleDoc),
        (status = 400, description = "Validation Error or Not Found", body = crate::openapi::ErrorBodyDoc),
        (status = 500, description = "Update Failed", body = crate::openapi::ErrorBodyDoc)
    )
)]
pub async fn update(
    State(state): State<ServerState>,
    id: Result<Path<i32>, PathRejection>,
    body: Result<Json<ArticleInput>, JsonRejection>,
) -> Result<Json<Article>, JsonApiError> {
    let Path(id) = id?;
    let Json(input) = body?;
    let started = Instant::now();
    let res = state.articles.update(id, input).await;
    metrics::observe("update", started, &res);
    match res {
        Ok(a) => { info!(id = a.id, "updated article"); Ok(Json(a)) }
        Err(e) => Err(JsonApiError::from_article(e, "failed to update article")),
    }
}

#[utoipa::path(
    delete, path = "/api/articles/{id}", tag = "articles",
    params(("id" = i32, Path, description = "Article ID")),
    responses(
        (status = 200, description = "Deleted", body = crate::openapi::MessageBodyDoc),
        (status = 400, description = "Not Found", body = crate::openapi::ErrorBodyDoc),
        (status = 500, description = "Delete Failed", body = crate::openapi::ErrorBodyDoc)
    )
)]
pub async fn delete(State(state): State<ServerState>, id: Result<Path<i32>, PathRejection>) -> Result<Json<MessageBody>, JsonApiError> {
    let Path(id) = id?;
    let started = Instant::now();
    let res = state.articles.delete(id).await;
    metrics::observe("delete", started, &res);
    match res {
        Ok(()) => { info!(id, "deleted article"); Ok(Json(MessageBody::new("article deleted"))) }
        Err(e) => Err(JsonApiError::from_article(e, "failed to delete article")),
    }
}

#[utoipa::path(
    get, path = "/api/articles/search", tag = "articles",
    params(SearchQuery),
    responses(
        (status = 200, description = "Matching articles", body = [crate::openapi::ArticleDoc]),
        (status = 500, description = "Search Failed", body = crate::openapi::ErrorBodyDoc)
    )
)]
pub async fn search(
    State(state): State<ServerState>,
    query: Result<Query<SearchQuery>, QueryRejection>,
) -> Result<Json<Vec<Article>>, JsonApiError> {
    let Query(q) = query?;
    let started = Instant::now();
    let res = state.articles.search(q.keyword.as_deref()).await;
    metrics::observe("search", started, &res);
    res.map(Json).map_err(|e| JsonApiError::internal("failed to search articles", &e))
}
