//! Handler for short code redirects.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, State},
    response::IntoResponse,
};

use crate::error::AppError;
use crate::state::AppState;

/// Redirect page rendered from `templates/redirect.html`.
///
/// The page forwards the browser with a meta refresh after `delay_seconds`.
#[derive(Template, WebTemplate)]
#[template(path = "redirect.html")]
pub struct RedirectTemplate {
    pub url: String,
    /// `url` as it appears inside the quoted refresh value.
    pub refresh_url: String,
    pub delay_seconds: u64,
}

impl RedirectTemplate {
    pub fn new(url: String, delay_seconds: u64) -> Self {
        Self {
            refresh_url: refresh_target(&url),
            url,
            delay_seconds,
        }
    }
}

/// Percent-encodes `'` so it cannot close the quoted `url='...'` of a refresh.
fn refresh_target(url: &str) -> String {
    url.replace('\'', "%27")
}

/// Resolves a short code and renders the redirect page.
///
/// # Endpoint
///
/// `GET /api/redirect/{code}`
///
/// # Errors
///
/// Returns 400 Bad Request if the code is malformed or unknown.
pub async fn redirect_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let url = state.redirect_service.resolve(&code).await?;

    Ok(RedirectTemplate::new(url, state.redirect_delay_seconds))
}
