/// HTTP route handlers
///
/// Page routes mirror the server-rendered surface: mutations are form posts
/// and failures come back as redirects carrying a short `notice` code. The
/// `/api` routes speak JSON and report failures with HTTP status codes.
use axum::response::{IntoResponse, Redirect, Response};

pub mod admin;
pub mod api;
pub mod auth;
pub mod health;
pub mod tasks;

/// Redirects to `path` with a `notice` query parameter describing the outcome
///
/// Notice codes are short kebab-case tokens so they survive a query string
/// without escaping.
pub(crate) fn redirect_with_notice(path: &str, notice: &str) -> Response {
    Redirect::to(&format!("{}?notice={}", path, notice)).into_response()
}
