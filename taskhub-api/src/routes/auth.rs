/// Authentication routes: login, registration, logout
///
/// These are form-post endpoints backing the server-rendered pages, so
/// outcomes are communicated with redirects. A successful login sets the
/// session cookie and lands on the task list; every registration failure
/// redirects back to the registration page with a notice naming the first
/// rule that was violated.
use axum::extract::State;
use axum::http::{header, HeaderMap, HeaderValue};
use axum::response::{IntoResponse, Redirect, Response};
use axum::Form;
use serde::Deserialize;
use tracing::info;

use taskhub_shared::auth::session::{self, Claims, SessionTtl};
use taskhub_shared::models::user::User;

use crate::app::{resolve_session, AppState};
use crate::error::ApiError;
use crate::routes::redirect_with_notice;

/// Login form fields
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
    /// Checkbox; present means a 30-day session
    pub remember: Option<String>,
}

/// Registration form fields
#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    pub username: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

/// Minimum password length for new accounts
const MIN_PASSWORD_LEN: usize = 6;

/// GET /
///
/// Bounces to the task list when a session exists, to the login page
/// otherwise.
pub async fn index(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Redirect, ApiError> {
    match resolve_session(&state, &headers).await? {
        Some(_) => Ok(Redirect::to("/tasks")),
        None => Ok(Redirect::to("/login")),
    }
}

/// POST /login
///
/// Verifies the credentials and establishes a session. An unknown username
/// and a wrong password get the same refusal; a deactivated account gets its
/// own notice.
pub async fn login(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(form): Form<LoginForm>,
) -> Result<Response, ApiError> {
    if resolve_session(&state, &headers).await?.is_some() {
        return Ok(Redirect::to("/tasks").into_response());
    }

    let user = User::find_by_username(&state.store, &form.username).await?;
    let user = match user {
        Some(user) if user.verify_password(&form.password) => user,
        _ => return Ok(redirect_with_notice("/login", "invalid-credentials")),
    };

    if !user.is_active() {
        return Ok(redirect_with_notice("/login", "account-disabled"));
    }

    let ttl = if form.remember.is_some() {
        SessionTtl::Remember
    } else {
        SessionTtl::Standard
    };
    let token = session::create_token(&Claims::new(user.id, ttl), state.session_secret())
        .map_err(|e| ApiError::Internal(e.into()))?;
    let cookie = session::session_cookie(&token, ttl);

    info!(user_id = user.id, username = %user.username, "User logged in");

    let mut response = Redirect::to("/tasks").into_response();
    response.headers_mut().insert(
        header::SET_COOKIE,
        HeaderValue::from_str(&cookie).map_err(|e| ApiError::Internal(e.into()))?,
    );
    Ok(response)
}

/// POST /register
///
/// Creates a new account after running the registration rules in order:
/// all fields present, passwords match, password long enough, username
/// free, email free. The first violated rule decides the notice.
pub async fn register(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(form): Form<RegisterForm>,
) -> Result<Response, ApiError> {
    if resolve_session(&state, &headers).await?.is_some() {
        return Ok(Redirect::to("/tasks").into_response());
    }

    let username = form.username.trim();
    let email = form.email.trim();

    if username.is_empty() || email.is_empty() || form.password.is_empty() {
        return Ok(redirect_with_notice("/register", "all-fields-required"));
    }
    if form.password != form.confirm_password {
        return Ok(redirect_with_notice("/register", "passwords-do-not-match"));
    }
    if form.password.chars().count() < MIN_PASSWORD_LEN {
        return Ok(redirect_with_notice("/register", "password-too-short"));
    }
    if User::find_by_username(&state.store, username).await?.is_some() {
        return Ok(redirect_with_notice("/register", "username-taken"));
    }
    if User::find_by_email(&state.store, email).await?.is_some() {
        return Ok(redirect_with_notice("/register", "email-taken"));
    }

    let user = User::create(&state.store, username, email, &form.password).await?;
    info!(user_id = user.id, username = %user.username, "User registered");

    Ok(redirect_with_notice("/login", "registered"))
}

/// GET /logout
///
/// Clears the session cookie and returns to the login page.
pub async fn logout() -> Response {
    let mut response = Redirect::to("/login").into_response();
    if let Ok(value) = HeaderValue::from_str(&session::clear_session_cookie()) {
        response.headers_mut().insert(header::SET_COOKIE, value);
    }
    response
}
