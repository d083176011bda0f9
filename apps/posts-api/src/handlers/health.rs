//! Health check endpoint.

use actix_web::{HttpResponse, web};
use posts_core::ports::{ACTION_POST_SET_FIELDS, FILTER_POST_GET_FIELDS};
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub timestamp: String,
    pub hooks: HookCounts,
}

#[derive(Serialize)]
pub struct HookCounts {
    pub get_fields: usize,
    pub set_fields: usize,
}

/// GET /api/health
pub async fn health_check(state: web::Data<AppState>) -> HttpResponse {
    let response = HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        timestamp: chrono::Utc::now().to_rfc3339(),
        hooks: HookCounts {
            get_fields: state.hooks.hook_count(FILTER_POST_GET_FIELDS).await,
            set_fields: state.hooks.hook_count(ACTION_POST_SET_FIELDS).await,
        },
    };

    HttpResponse::Ok().json(response)
}
