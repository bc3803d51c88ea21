//! Site configuration - read once from the environment at startup.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_CONTENT_DIR: &str = "content/blog";

/// Local dev server origins allowed when nothing else is configured.
pub const DEFAULT_ORIGINS: [&str; 2] = ["http://localhost:5173", "http://127.0.0.1:5173"];

/// Runtime settings for the server.
#[derive(Debug, Clone)]
pub struct SiteConfig {
    pub host: String,
    pub port: u16,
    pub environment: String,
    pub log_level: Option<String>,
    pub log_dir: PathBuf,
    pub content_dir: PathBuf,
    pub allowed_origins: Vec<String>,
    pub chat: ChatUpstreamConfig,
}

/// Optional upstream chat service. Disabled unless `url` is set.
#[derive(Debug, Clone, Default)]
pub struct ChatUpstreamConfig {
    pub url: Option<String>,
    pub api_key: Option<String>,
    pub timeout: Duration,
}

fn env_nonempty(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(default)
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            host: env_nonempty("HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            port: env_parse("PORT", 3001),
            environment: env_nonempty("ENVIRONMENT")
                .unwrap_or_else(|| "development".to_string()),
            log_level: env_nonempty("LOG_LEVEL"),
            log_dir: env_nonempty("LOG_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("logs")),
            content_dir: content_dir_from_env(),
            allowed_origins: allowed_origins(
                env_nonempty("ALLOWED_ORIGINS").as_deref(),
                env_nonempty("FRONTEND_ORIGIN").as_deref(),
            ),
            chat: ChatUpstreamConfig {
                url: env_nonempty("CHAT_UPSTREAM_URL"),
                api_key: env_nonempty("CHAT_UPSTREAM_API_KEY"),
                timeout: Duration::from_secs(env_parse("CHAT_UPSTREAM_TIMEOUT_SECS", 30)),
            },
        }
    }
}

impl SiteConfig {
    /// Load `.env` (if present) and build the config from the environment.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::default()
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// Crate log level, falling back to the environment's default.
    pub fn effective_log_level(&self) -> &str {
        match &self.log_level {
            Some(level) => level.as_str(),
            None if self.is_production() => "info",
            None => "debug",
        }
    }

    pub fn bind_addr(&self) -> Result<SocketAddr, std::net::AddrParseError> {
        format!("{}:{}", self.host, self.port).parse()
    }
}

/// CORS origins: the comma-separated `ALLOWED_ORIGINS` list, else the
/// single `FRONTEND_ORIGIN`, else [`DEFAULT_ORIGINS`].
fn allowed_origins(allowed: Option<&str>, frontend: Option<&str>) -> Vec<String> {
    let listed: Vec<String> = allowed
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(str::to_string)
        .collect();
    if !listed.is_empty() {
        return listed;
    }
    match frontend {
        Some(origin) => vec![origin.to_string()],
        None => DEFAULT_ORIGINS.iter().map(|o| o.to_string()).collect(),
    }
}

/// `BLOG_CONTENT_DIR`, or `content/blog` when unset.
pub fn content_dir_from_env() -> PathBuf {
    env_nonempty("BLOG_CONTENT_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONTENT_DIR))
}
