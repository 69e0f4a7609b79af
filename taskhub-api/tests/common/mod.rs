/// Shared test harness for API integration tests
///
/// Each test gets its own in-memory SQLite database with the real schema
/// and bootstrap admin, wrapped in the full application router. Requests go
/// through `tower::ServiceExt::oneshot`, so the session layers and routing
/// are exercised exactly as in production.
use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use serde_json::Value;
use tower::ServiceExt;

use taskhub_api::app::{build_router, AppState};
use taskhub_api::config::Config;
use taskhub_shared::db::pool::{create_pool, DatabaseConfig};
use taskhub_shared::db::schema;
use taskhub_shared::db::store::Store;

pub struct TestContext {
    pub store: Store,
    pub app: Router,
}

impl TestContext {
    pub async fn new() -> Self {
        let config = Config::default();

        let pool = create_pool(DatabaseConfig {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
            create_if_missing: false,
        })
        .await
        .expect("pool should connect");

        let store = Store::new(pool);
        schema::init(&store, &config.bootstrap_admin())
            .await
            .expect("schema init should succeed");

        let app = build_router(AppState::new(store.clone(), config));
        Self { store, app }
    }

    async fn send(&self, request: Request<Body>) -> Response {
        self.app
            .clone()
            .oneshot(request)
            .await
            .expect("request should not fail at the transport level")
    }

    /// GET with an optional session cookie
    pub async fn get(&self, path: &str, cookie: Option<&str>) -> Response {
        let mut builder = Request::builder().method("GET").uri(path);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        self.send(builder.body(Body::empty()).unwrap()).await
    }

    /// POST an urlencoded form with an optional session cookie
    pub async fn post_form(&self, path: &str, body: &str, cookie: Option<&str>) -> Response {
        let mut builder = Request::builder()
            .method("POST")
            .uri(path)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        self.send(builder.body(Body::from(body.to_string())).unwrap())
            .await
    }

    /// Sends a JSON request with the given method
    pub async fn send_json(
        &self,
        method: &str,
        path: &str,
        body: Option<&Value>,
        cookie: Option<&str>,
    ) -> Response {
        let mut builder = Request::builder().method(method).uri(path);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        let body = match body {
            Some(value) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(value.to_string())
            }
            None => Body::empty(),
        };
        self.send(builder.body(body).unwrap()).await
    }

    /// Registers an account through the real endpoint
    pub async fn register(&self, username: &str, email: &str, password: &str) -> Response {
        let body = format!(
            "username={}&email={}&password={}&confirm_password={}",
            username, email, password, password
        );
        self.post_form("/register", &body, None).await
    }

    /// Logs in and returns the session cookie pair (`session=...`)
    pub async fn login(&self, username: &str, password: &str) -> String {
        let body = format!("username={}&password={}", username, password);
        let response = self.post_form("/login", &body, None).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER, "login should succeed");

        let set_cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .expect("login should set the session cookie")
            .to_str()
            .unwrap();
        // Keep only the name=value pair for replay
        set_cookie
            .split(';')
            .next()
            .unwrap()
            .trim()
            .to_string()
    }

    /// Registers and logs in, returning the session cookie
    pub async fn signup_and_login(&self, username: &str, email: &str, password: &str) -> String {
        let response = self.register(username, email, password).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        self.login(username, password).await
    }
}

/// Reads a response body as JSON
pub async fn body_json(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body should be readable");
    serde_json::from_slice(&bytes).expect("body should be JSON")
}

/// The Location header of a redirect response
pub fn location(response: &Response) -> &str {
    response
        .headers()
        .get(header::LOCATION)
        .expect("response should be a redirect")
        .to_str()
        .unwrap()
}
