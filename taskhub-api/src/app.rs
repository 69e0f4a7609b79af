/// Application state and router assembly
///
/// Two session layers guard the authenticated surface: page routes answer a
/// missing or invalid session with a redirect to the login page, API routes
/// with a 401 JSON body. Both resolve the session cookie to a live [`User`]
/// and stash it in request extensions for the handlers.
use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::{header, HeaderMap};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Redirect, Response};
use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use taskhub_shared::auth::session;
use taskhub_shared::db::store::Store;
use taskhub_shared::models::user::User;

use crate::config::Config;
use crate::error::ApiError;
use crate::routes;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub store: Store,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(store: Store, config: Config) -> Self {
        Self {
            store,
            config: Arc::new(config),
        }
    }

    /// Secret used to sign and validate session cookies
    pub fn session_secret(&self) -> &str {
        &self.config.session.secret
    }
}

/// Resolves the session cookie in `headers` to a live user
///
/// Returns `None` for a missing cookie, an invalid or expired token, an
/// unknown user id, or a deactivated account. Database failures propagate.
pub(crate) async fn resolve_session(
    state: &AppState,
    headers: &HeaderMap,
) -> Result<Option<User>, sqlx::Error> {
    let Some(cookie_header) = headers.get(header::COOKIE).and_then(|v| v.to_str().ok()) else {
        return Ok(None);
    };
    let Some(token) = session::token_from_cookie_header(cookie_header) else {
        return Ok(None);
    };
    let Ok(claims) = session::validate_token(token, state.session_secret()) else {
        return Ok(None);
    };

    let user = User::find_by_id(&state.store, claims.sub).await?;
    Ok(user.filter(|u| u.is_active()))
}

/// Session layer for server-rendered pages: failures redirect to the login page
async fn page_session_layer(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    match resolve_session(&state, req.headers()).await? {
        Some(user) => {
            req.extensions_mut().insert(user);
            Ok(next.run(req).await)
        }
        None => Ok(Redirect::to("/login").into_response()),
    }
}

/// Session layer for the JSON API: failures are 401 responses
async fn api_session_layer(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    match resolve_session(&state, req.headers()).await? {
        Some(user) => {
            req.extensions_mut().insert(user);
            Ok(next.run(req).await)
        }
        None => Err(ApiError::Unauthorized),
    }
}

/// Builds the full application router
pub fn build_router(state: AppState) -> Router {
    let public = Router::new()
        .route("/health", get(routes::health::health_check))
        .route("/", get(routes::auth::index))
        .route("/login", post(routes::auth::login))
        .route("/register", post(routes::auth::register));

    let pages = Router::new()
        .route("/logout", get(routes::auth::logout))
        .route("/tasks", get(routes::tasks::list_tasks))
        .route("/task/new", post(routes::tasks::create_task))
        .route("/task/:id", get(routes::tasks::view_task))
        .route("/task/:id/edit", post(routes::tasks::edit_task))
        .route("/task/:id/delete", post(routes::tasks::delete_task))
        .route("/profile", get(routes::tasks::profile))
        .route("/admin/users", get(routes::admin::list_users))
        .route("/admin/tasks", get(routes::admin::list_all_tasks))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            page_session_layer,
        ));

    let api = Router::new()
        .route("/api/tasks", get(routes::api::list_tasks))
        .route(
            "/api/task/:id",
            get(routes::api::get_task)
                .put(routes::api::update_task)
                .delete(routes::api::delete_task),
        )
        .layer(middleware::from_fn_with_state(
            state.clone(),
            api_session_layer,
        ));

    Router::new()
        .merge(public)
        .merge(pages)
        .merge(api)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
