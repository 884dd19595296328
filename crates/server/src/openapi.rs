use serde::Serialize;
use utoipa::OpenApi;
use utoipa::ToSchema;

#[derive(Serialize, ToSchema)]
pub struct HealthResponse { pub status: String }

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ArticleDoc {
    pub id: i32,
    pub title: String,
    pub content: String,
    /// RFC 3339 timestamp
    pub created_at: String,
    /// RFC 3339 timestamp
    pub updated_at: String,
}

#[derive(Serialize, ToSchema)]
pub struct ArticleInputDoc {
    /// Required, at most 200 characters after trimming
    pub title: Option<String>,
    /// Required
    pub content: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct ErrorBodyDoc { pub error: String }

#[derive(Serialize, ToSchema)]
pub struct MessageBodyDoc { pub message: String }

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::articles::list,
        crate::routes::articles::latest,
        crate::routes::articles::get,
        crate::routes::articles::create,
        crate::routes::articles::update,
        crate::routes::articles::delete,
        crate::routes::articles::search,
    ),
    components(
        schemas(
            HealthResponse,
            ArticleDoc,
            ArticleInputDoc,
            ErrorBodyDoc,
            MessageBodyDoc,
        )
    ),
    tags(
        (name = "health"),
        (name = "articles")
    )
)]
pub struct ApiDoc;

pub async fn openapi_json() -> axum::Json<utoipa::openapi::OpenApi> {
    axum::Json(ApiDoc::openapi())
}
