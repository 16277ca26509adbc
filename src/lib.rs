pub mod config;
pub mod error;
pub mod handlers;
pub mod services;
pub mod utils;

use crate::config::AppConfig;
use crate::services::classifier::RoleClassifier;
use crate::services::storage::UploadStore;
use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::pages::index,
        handlers::upload::upload_resume,
        handlers::health::health_check,
    ),
    components(
        schemas(
            handlers::upload::UploadForm,
            handlers::health::HealthResponse,
        )
    ),
    tags(
        (name = "pages", description = "Server-rendered views"),
        (name = "upload", description = "Résumé upload and classification"),
        (name = "system", description = "Health and diagnostics")
    )
)]
pub struct ApiDoc;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<UploadStore>,
    pub classifier: Arc<dyn RoleClassifier>,
    pub config: AppConfig,
}

pub fn create_app(state: AppState) -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/", get(handlers::pages::index))
        .route("/upload", post(handlers::upload::upload_resume))
        .route("/health", get(handlers::health::health_check))
        .with_state(state)
}
