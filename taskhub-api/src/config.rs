/// Configuration for the API server
///
/// Everything is read from environment variables with development-friendly
/// defaults, so `cargo run` works out of the box against a local SQLite
/// file. A `.env` file is honored when present.
use anyhow::{Context, Result};
use std::env;

use taskhub_shared::db::pool;
use taskhub_shared::db::schema::BootstrapAdmin;

/// Top-level configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub session: SessionConfig,
    pub pagination: PaginationConfig,
    pub admin: AdminConfig,
}

/// HTTP server bind address
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Database connection settings
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

/// Session signing settings
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Secret used to sign session cookies
    pub secret: String,
}

/// Page sizes for the various listings
#[derive(Debug, Clone)]
pub struct PaginationConfig {
    /// Tasks per page on the task list
    pub per_page: usize,

    /// Tasks per page on the admin task overview
    pub admin_per_page: usize,

    /// Upper bound on items returned by the JSON API
    pub api_max_items: usize,
}

/// Credentials for the administrator seeded on first start
#[derive(Debug, Clone)]
pub struct AdminConfig {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite:task_manager.db".to_string(),
            max_connections: 5,
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            secret: "dev-secret-key-change-in-production".to_string(),
        }
    }
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            per_page: 9,
            admin_per_page: 12,
            api_max_items: 100,
        }
    }
}

impl Default for AdminConfig {
    fn default() -> Self {
        let defaults = BootstrapAdmin::default();
        Self {
            username: defaults.username,
            email: defaults.email,
            password: defaults.password,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            database: DatabaseConfig::default(),
            session: SessionConfig::default(),
            pagination: PaginationConfig::default(),
            admin: AdminConfig::default(),
        }
    }
}

impl Config {
    /// Loads configuration from the environment
    ///
    /// # Errors
    ///
    /// Returns an error when a numeric variable is set but not parseable.
    pub fn from_env() -> Result<Self> {
        let defaults = Config::default();

        let server = ServerConfig {
            host: env::var("HOST").unwrap_or(defaults.server.host),
            port: match env::var("PORT") {
                Ok(raw) => raw.parse().context("PORT must be a valid port number")?,
                Err(_) => defaults.server.port,
            },
        };

        let database = DatabaseConfig {
            url: env::var("DATABASE_URL").unwrap_or(defaults.database.url),
            max_connections: match env::var("DATABASE_MAX_CONNECTIONS") {
                Ok(raw) => raw
                    .parse()
                    .context("DATABASE_MAX_CONNECTIONS must be a number")?,
                Err(_) => defaults.database.max_connections,
            },
        };

        let session = SessionConfig {
            secret: env::var("SESSION_SECRET").unwrap_or(defaults.session.secret),
        };

        let pagination = PaginationConfig {
            per_page: match env::var("ITEMS_PER_PAGE") {
                Ok(raw) => raw.parse().context("ITEMS_PER_PAGE must be a number")?,
                Err(_) => defaults.pagination.per_page,
            },
            admin_per_page: match env::var("ADMIN_ITEMS_PER_PAGE") {
                Ok(raw) => raw
                    .parse()
                    .context("ADMIN_ITEMS_PER_PAGE must be a number")?,
                Err(_) => defaults.pagination.admin_per_page,
            },
            api_max_items: match env::var("API_MAX_ITEMS") {
                Ok(raw) => raw.parse().context("API_MAX_ITEMS must be a number")?,
                Err(_) => defaults.pagination.api_max_items,
            },
        };

        let admin = AdminConfig {
            username: env::var("ADMIN_USERNAME").unwrap_or(defaults.admin.username),
            email: env::var("ADMIN_EMAIL").unwrap_or(defaults.admin.email),
            password: env::var("ADMIN_PASSWORD").unwrap_or(defaults.admin.password),
        };

        Ok(Self {
            server,
            database,
            session,
            pagination,
            admin,
        })
    }

    /// Bind address string for the listener
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Pool settings for the shared connection layer
    pub fn pool_config(&self) -> pool::DatabaseConfig {
        pool::DatabaseConfig {
            url: self.database.url.clone(),
            max_connections: self.database.max_connections,
            create_if_missing: true,
        }
    }

    /// Administrator credentials for first-start seeding
    pub fn bootstrap_admin(&self) -> BootstrapAdmin {
        BootstrapAdmin {
            username: self.admin.username.clone(),
            email: self.admin.email.clone(),
            password: self.admin.password.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.database.url, "sqlite:task_manager.db");
        assert_eq!(config.pagination.per_page, 9);
        assert_eq!(config.pagination.admin_per_page, 12);
        assert_eq!(config.pagination.api_max_items, 100);
        assert_eq!(config.admin.username, "admin");
    }

    #[test]
    fn test_bind_address() {
        let config = Config::default();
        assert_eq!(config.bind_address(), "0.0.0.0:8080");
    }

    #[test]
    fn test_pool_config_creates_missing_databases() {
        let config = Config::default();
        assert!(config.pool_config().create_if_missing);
    }
}
