use std::sync::Arc;

use askama::Template;
use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};
use chrono::Local;
use tower_http::trace::TraceLayer;

use crate::dashboard::Dashboard;

/// Height of the frame the dashboard is shown in.
pub const FRAME_HEIGHT: u32 = 9000;

pub struct AppState {
    pub dashboard: Arc<Dashboard>,
}

// Template structs
#[derive(Template)]
#[template(path = "host.html")]
pub struct HostTemplate {
    pub title: String,
    pub src: &'static str,
    pub height: u32,
}

// Wrapper for HTML responses
struct HtmlTemplate<T>(T);

impl<T: Template> IntoResponse for HtmlTemplate<T> {
    fn into_response(self) -> Response {
        match self.0.render() {
            Ok(html) => Html(html).into_response(),
            Err(err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to render template: {}", err),
            )
                .into_response(),
        }
    }
}

// Custom error type
pub struct AppError(anyhow::Error);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Error: {}", self.0),
        )
            .into_response()
    }
}

impl<E: Into<anyhow::Error>> From<E> for AppError {
    fn from(err: E) -> Self {
        AppError(err.into())
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/dashboard", get(dashboard))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// Route handlers

/// Host page framing the dashboard document.
pub async fn index(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let owner = state.dashboard.owner();
    HtmlTemplate(HostTemplate {
        title: format!("{} Daily Dashboard", owner),
        src: "/dashboard",
        height: FRAME_HEIGHT,
    })
}

/// One fresh fetch-and-render pass per request.
pub async fn dashboard(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse, AppError> {
    let now = Local::now().naive_local();
    let html = state.dashboard.assemble(now).await?;
    Ok(Html(html))
}

pub async fn health() -> impl IntoResponse {
    Html("OK")
}
