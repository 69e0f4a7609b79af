/// Session tokens and the session cookie
///
/// Authentication is session-based: logging in issues an HS256-signed token
/// carried in an `HttpOnly` cookie named `session`. The token claims hold
/// the user id and expiry; the authenticated user itself is re-resolved from
/// the database on every request, so deactivating an account takes effect
/// immediately.
///
/// # Token Lifetimes
///
/// - **Standard session**: 24 hours
/// - **Remember-me session**: 30 days (the login form's `remember` flag)
///
/// # Example
///
/// ```
/// use taskhub_shared::auth::session::{create_token, validate_token, Claims, SessionTtl};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let claims = Claims::new(42, SessionTtl::Standard);
/// let token = create_token(&claims, "secret-key")?;
///
/// let validated = validate_token(&token, "secret-key")?;
/// assert_eq!(validated.sub, 42);
/// # Ok(())
/// # }
/// ```
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// Name of the session cookie
pub const SESSION_COOKIE: &str = "session";

/// Error type for session token operations
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// Failed to create token
    #[error("Failed to create session token: {0}")]
    CreateError(String),

    /// Token failed validation (bad signature, malformed, wrong algorithm)
    #[error("Invalid session token: {0}")]
    ValidationError(String),

    /// Token has expired
    #[error("Session has expired")]
    Expired,
}

/// Session lifetime
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionTtl {
    /// Standard session (24 hours)
    Standard,

    /// Remember-me session (30 days)
    Remember,
}

impl SessionTtl {
    /// Duration for this lifetime
    pub fn duration(&self) -> Duration {
        match self {
            SessionTtl::Standard => Duration::hours(24),
            SessionTtl::Remember => Duration::days(30),
        }
    }

    /// Cookie Max-Age in seconds
    pub fn max_age_seconds(&self) -> i64 {
        self.duration().num_seconds()
    }
}

/// Session token claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject - user id
    pub sub: i64,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl Claims {
    /// Creates claims for a user with the given session lifetime
    pub fn new(user_id: i64, ttl: SessionTtl) -> Self {
        Self::with_duration(user_id, ttl.duration())
    }

    /// Creates claims expiring after an arbitrary duration
    pub fn with_duration(user_id: i64, duration: Duration) -> Self {
        let now = Utc::now();
        Self {
            sub: user_id,
            iat: now.timestamp(),
            exp: (now + duration).timestamp(),
        }
    }
}

/// Signs claims into a session token
pub fn create_token(claims: &Claims, secret: &str) -> Result<String, SessionError> {
    encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| SessionError::CreateError(e.to_string()))
}

/// Validates a session token and returns its claims
///
/// Checks the signature and expiration.
pub fn validate_token(token: &str, secret: &str) -> Result<Claims, SessionError> {
    let validation = Validation::new(Algorithm::HS256);

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => SessionError::Expired,
        _ => SessionError::ValidationError(e.to_string()),
    })
}

/// Builds the `Set-Cookie` value establishing a session
pub fn session_cookie(token: &str, ttl: SessionTtl) -> String {
    format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
        SESSION_COOKIE,
        token,
        ttl.max_age_seconds()
    )
}

/// Builds the `Set-Cookie` value clearing the session
pub fn clear_session_cookie() -> String {
    format!("{}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0", SESSION_COOKIE)
}

/// Extracts the session token from a `Cookie` header value
///
/// Returns `None` when the header carries no session cookie.
pub fn token_from_cookie_header(header: &str) -> Option<&str> {
    header.split(';').find_map(|pair| {
        let (name, value) = pair.trim().split_once('=')?;
        if name == SESSION_COOKIE && !value.is_empty() {
            Some(value)
        } else {
            None
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret-key-for-sessions";

    #[test]
    fn test_token_roundtrip() {
        let claims = Claims::new(7, SessionTtl::Standard);
        let token = create_token(&claims, SECRET).expect("token should be created");

        let validated = validate_token(&token, SECRET).expect("token should validate");
        assert_eq!(validated.sub, 7);
        assert_eq!(validated.exp, claims.exp);
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let claims = Claims::new(7, SessionTtl::Standard);
        let token = create_token(&claims, SECRET).unwrap();

        let result = validate_token(&token, "different-secret");
        assert!(matches!(result, Err(SessionError::ValidationError(_))));
    }

    #[test]
    fn test_expired_token_rejected() {
        // Beyond the default validation leeway
        let claims = Claims::with_duration(7, Duration::seconds(-120));
        let token = create_token(&claims, SECRET).unwrap();

        let result = validate_token(&token, SECRET);
        assert!(matches!(result, Err(SessionError::Expired)));
    }

    #[test]
    fn test_tampered_token_rejected() {
        let claims = Claims::new(7, SessionTtl::Standard);
        let mut token = create_token(&claims, SECRET).unwrap();
        token.push('x');

        assert!(validate_token(&token, SECRET).is_err());
    }

    #[test]
    fn test_session_ttl_durations() {
        assert_eq!(SessionTtl::Standard.max_age_seconds(), 24 * 3600);
        assert_eq!(SessionTtl::Remember.max_age_seconds(), 30 * 24 * 3600);
    }

    #[test]
    fn test_session_cookie_format() {
        let cookie = session_cookie("abc", SessionTtl::Standard);
        assert!(cookie.starts_with("session=abc;"));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("Max-Age=86400"));

        let cleared = clear_session_cookie();
        assert!(cleared.contains("Max-Age=0"));
    }

    #[test]
    fn test_token_from_cookie_header() {
        assert_eq!(token_from_cookie_header("session=tok"), Some("tok"));
        assert_eq!(
            token_from_cookie_header("theme=dark; session=tok; lang=en"),
            Some("tok")
        );
        assert_eq!(token_from_cookie_header("theme=dark"), None);
        assert_eq!(token_from_cookie_header("session="), None);
        assert_eq!(token_from_cookie_header(""), None);
    }
}
