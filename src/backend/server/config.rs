/**
 * Server Configuration
 *
 * `AppConfig` is read from environment variables once, in `main`, and then
 * handed to every collaborator that needs it. Business logic never reads
 * the environment itself.
 *
 * All settings have defaults so the server starts with zero configuration
 * for local development: no `DATABASE_URL` means the in-memory store, no
 * SMTP settings mean emails are logged, no geocoder key means only a static
 * (empty) address table.
 *
 * Malformed values are logged and replaced by their default.
 */

use std::net::SocketAddr;
use std::sync::Arc;

use crate::backend::db::{Database, MemoryDatabase, PgDatabase};

/// Development fallback for `JWT_SECRET`
const DEV_JWT_SECRET: &str = "estatehub-dev-secret-change-me";

/// SMTP settings; present only when host, username and password are all set
#[derive(Debug, Clone, PartialEq)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub from_email: String,
    pub from_name: String,
}

/// MapQuest settings
#[derive(Debug, Clone, PartialEq)]
pub struct GeocoderConfig {
    pub api_key: String,
    /// Overrides the public endpoint (tests, proxies)
    pub base_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RateLimitConfig {
    /// Requests allowed per window and per client IP
    pub max_requests: u32,
    pub window_ms: u64,
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Env: `HTTP_ADDR`, default `0.0.0.0:5000`
    pub http_addr: SocketAddr,

    /// Env: `DATABASE_URL`; `None` selects the in-memory store
    pub database_url: Option<String>,

    /// Env: `JWT_SECRET`
    pub jwt_secret: String,

    /// Env: `JWT_EXPIRES_DAYS`, default 30
    pub jwt_expires_days: i64,

    /// Env: `BCRYPT_COST`, default `bcrypt::DEFAULT_COST`
    pub bcrypt_cost: u32,

    /// Env: `ALLOW_AGENT_SIGNUP`, default true
    pub allow_agent_signup: bool,

    /// Env: `SMTP_HOST`, `SMTP_PORT`, `SMTP_USERNAME`, `SMTP_PASSWORD`,
    /// `FROM_EMAIL`, `FROM_NAME`
    pub smtp: Option<SmtpConfig>,

    /// Env: `GEOCODER_API_KEY`, `GEOCODER_BASE_URL`
    pub geocoder: Option<GeocoderConfig>,

    /// Env: `ADMIN_EMAIL`; receives a copy of every listing enquiry
    pub admin_email: Option<String>,

    /// Env: `FRONTEND_URL`; used for reset links and CORS
    pub frontend_url: Option<String>,

    /// Env: `RATE_LIMIT_MAX`, `RATE_LIMIT_WINDOW_MS`
    pub rate_limit: RateLimitConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            http_addr: ([0, 0, 0, 0], 5000).into(),
            database_url: None,
            jwt_secret: DEV_JWT_SECRET.to_string(),
            jwt_expires_days: 30,
            bcrypt_cost: bcrypt::DEFAULT_COST,
            allow_agent_signup: true,
            smtp: None,
            geocoder: None,
            admin_email: None,
            frontend_url: None,
            rate_limit: RateLimitConfig {
                max_requests: 100,
                window_ms: 15 * 60 * 1000,
            },
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables, falling back to defaults
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let mut config = Self::default();

        if let Some(addr) = get("HTTP_ADDR") {
            config.http_addr = parse_or(&addr, "HTTP_ADDR", config.http_addr);
        }

        config.database_url = get("DATABASE_URL");

        match get("JWT_SECRET") {
            Some(secret) => config.jwt_secret = secret,
            None => tracing::warn!("JWT_SECRET not set, using development secret"),
        }

        if let Some(days) = get("JWT_EXPIRES_DAYS") {
            config.jwt_expires_days = parse_or(&days, "JWT_EXPIRES_DAYS", config.jwt_expires_days);
        }

        if let Some(cost) = get("BCRYPT_COST") {
            config.bcrypt_cost = parse_or(&cost, "BCRYPT_COST", config.bcrypt_cost);
        }

        if let Some(val) = get("ALLOW_AGENT_SIGNUP") {
            config.allow_agent_signup = val != "false" && val != "0";
        }

        config.smtp = match (get("SMTP_HOST"), get("SMTP_USERNAME"), get("SMTP_PASSWORD")) {
            (Some(host), Some(username), Some(password)) => {
                let port = get("SMTP_PORT")
                    .map(|p| parse_or(&p, "SMTP_PORT", 587))
                    .unwrap_or(587);
                Some(SmtpConfig {
                    host,
                    port,
                    from_email: get("FROM_EMAIL").unwrap_or_else(|| username.clone()),
                    from_name: get("FROM_NAME").unwrap_or_else(|| "No-Reply".to_string()),
                    username,
                    password,
                })
            }
            (None, None, None) => None,
            _ => {
                tracing::warn!("Incomplete SMTP configuration, emails will be logged only");
                None
            }
        };

        config.geocoder = get("GEOCODER_API_KEY").map(|api_key| GeocoderConfig {
            api_key,
            base_url: get("GEOCODER_BASE_URL"),
        });

        config.admin_email = get("ADMIN_EMAIL");
        config.frontend_url = get("FRONTEND_URL").map(|url| url.trim_end_matches('/').to_string());

        if let Some(max) = get("RATE_LIMIT_MAX") {
            config.rate_limit.max_requests = parse_or(&max, "RATE_LIMIT_MAX", config.rate_limit.max_requests);
        }
        if let Some(window) = get("RATE_LIMIT_WINDOW_MS") {
            config.rate_limit.window_ms = parse_or(&window, "RATE_LIMIT_WINDOW_MS", config.rate_limit.window_ms);
        }

        config
    }

    /// Base URL used to build password-reset links
    pub fn frontend_base(&self) -> &str {
        self.frontend_url.as_deref().unwrap_or("http://localhost:3000")
    }
}

fn parse_or<T>(value: &str, key: &str, default: T) -> T
where
    T: std::str::FromStr + std::fmt::Debug,
{
    match value.parse::<T>() {
        Ok(parsed) => parsed,
        Err(_) => {
            tracing::warn!(key, value, default = ?default, "Invalid configuration value, using default");
            default
        }
    }
}

/// Open the configured store
///
/// With `DATABASE_URL` set, connects to Postgres and runs migrations. If the
/// variable is missing or the connection fails, the server continues with
/// the in-memory store so it stays usable for local development.
pub async fn load_database(config: &AppConfig) -> Arc<dyn Database> {
    let database_url = match &config.database_url {
        Some(url) => url,
        None => {
            tracing::warn!("DATABASE_URL not set. Using in-memory store; data is lost on restart.");
            return Arc::new(MemoryDatabase::new());
        }
    };

    tracing::info!("Connecting to database...");

    let db = match PgDatabase::connect(database_url).await {
        Ok(db) => db,
        Err(e) => {
            tracing::error!("Failed to create database connection pool: {:?}", e);
            tracing::warn!("Falling back to in-memory store.");
            return Arc::new(MemoryDatabase::new());
        }
    };

    tracing::info!("Running database migrations...");
    match db.migrate().await {
        Ok(()) => tracing::info!("Database migrations completed successfully"),
        Err(e) => {
            tracing::error!("Failed to run database migrations: {}", e);
            tracing::warn!("Continuing without migrations - database might not be up to date");
        }
    }

    Arc::new(db)
}
