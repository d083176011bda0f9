//! Post field handlers.

use actix_web::{HttpResponse, web};

use posts_core::{Document, FieldValue};
use posts_shared::ApiResponse;
use posts_shared::dto::{FieldResponse, PostsQuery};

use crate::middleware::error::{AppError, AppResult};
use crate::observability::RequestId;
use crate::state::AppState;

/// GET /api/posts?pids=1,2&fields=uid,content
///
/// Missing posts come back as `null` entries.
pub async fn get_posts(
    state: web::Data<AppState>,
    query: web::Query<PostsQuery>,
) -> AppResult<HttpResponse> {
    let pids = query.parse_pids().map_err(AppError::BadRequest)?;
    let fields = query.field_list();
    let fields: Vec<&str> = fields.iter().map(String::as_str).collect();

    let posts = state.posts.get_posts_fields(&pids, &fields).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(posts)))
}

/// GET /api/posts/{pid}
pub async fn get_post(state: web::Data<AppState>, path: web::Path<i64>) -> AppResult<HttpResponse> {
    let pid = path.into_inner();

    let post = state
        .posts
        .get_post_data(pid)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("post {}", pid)))?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(post)))
}

/// GET /api/posts/{pid}/fields/{field}
pub async fn get_post_field(
    state: web::Data<AppState>,
    path: web::Path<(i64, String)>,
) -> AppResult<HttpResponse> {
    let (pid, field) = path.into_inner();

    let value = state
        .posts
        .get_post_field(pid, &field)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("field {} of post {}", field, pid)))?;
    let value = serde_json::to_value(&value).map_err(|e| AppError::Internal(e.to_string()))?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(FieldResponse { pid, field, value })))
}

/// PUT /api/posts/{pid}
pub async fn set_post_fields(
    state: web::Data<AppState>,
    request_id: RequestId,
    path: web::Path<i64>,
    body: web::Json<Document>,
) -> AppResult<HttpResponse> {
    let pid = path.into_inner();
    let data = body.into_inner();
    tracing::debug!(request_id = %request_id.as_str(), pid, fields = data.len(), "Writing post fields");

    state.posts.set_post_fields(pid, data).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// PUT /api/posts/{pid}/fields/{field}
pub async fn set_post_field(
    state: web::Data<AppState>,
    request_id: RequestId,
    path: web::Path<(i64, String)>,
    body: web::Json<FieldValue>,
) -> AppResult<HttpResponse> {
    let (pid, field) = path.into_inner();
    tracing::debug!(request_id = %request_id.as_str(), pid, field = %field, "Writing post field");

    state
        .posts
        .set_post_field(pid, &field, body.into_inner())
        .await?;
    Ok(HttpResponse::NoContent().finish())
}
