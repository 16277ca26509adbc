use askama::Template;
use axum::response::Html;

use crate::error::AppError;

#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexPage;

/// Result view rendered after a successful classification
#[derive(Template)]
#[template(path = "result.html")]
pub struct ResultPage {
    pub filename: String,
    pub predicted_role: String,
    pub confidence: f32,
}

#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Résumé upload form")
    ),
    tag = "pages"
)]
pub async fn index() -> Result<Html<String>, AppError> {
    Ok(Html(IndexPage.render()?))
}
