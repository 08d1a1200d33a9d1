use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub console: ConsoleConfig,
    pub client: ClientConfig,
    pub server: ServerConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

/// How the initial page load walks the three collections
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoadStrategy {
    /// Students, then courses, then attendance, each awaited in turn
    Sequential,
    /// All three in flight at once behind a join barrier
    Concurrent,
}

impl FromStr for LoadStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sequential" => Ok(LoadStrategy::Sequential),
            "concurrent" => Ok(LoadStrategy::Concurrent),
            other => Err(format!("unknown load strategy '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsoleConfig {
    pub initial_load: LoadStrategy,
    pub notification_auto_close_ms: u64,
}

impl ConsoleConfig {
    pub fn notification_auto_close(&self) -> Duration {
        Duration::from_millis(self.notification_auto_close_ms)
    }
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            initial_load: LoadStrategy::Sequential,
            notification_auto_close_ms: 3000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    pub server_url: String,
    pub request_timeout_secs: u64,
}

impl ClientConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
    pub jwt_secret: String,
    pub jwt_expiry_hours: u64,
    pub seed_courses: bool,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific env vars
        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        // Console overrides
        if let Ok(v) = env::var("VAULT_INITIAL_LOAD") {
            self.console.initial_load = v.parse().unwrap_or(self.console.initial_load);
        }
        if let Ok(v) = env::var("VAULT_NOTIFICATION_AUTO_CLOSE_MS") {
            self.console.notification_auto_close_ms = v.parse().unwrap_or(self.console.notification_auto_close_ms);
        }

        // Client overrides
        if let Ok(v) = env::var("VAULT_SERVER_URL") {
            self.client.server_url = v;
        }
        if let Ok(v) = env::var("VAULT_REQUEST_TIMEOUT_SECS") {
            self.client.request_timeout_secs = v.parse().unwrap_or(self.client.request_timeout_secs);
        }

        // Server overrides
        if let Some(v) = env::var("VAULT_PORT").ok().or_else(|| env::var("PORT").ok()) {
            self.server.port = v.parse().unwrap_or(self.server.port);
        }
        if let Ok(v) = env::var("JWT_SECRET") {
            self.server.jwt_secret = v;
        }
        if let Ok(v) = env::var("JWT_EXPIRY_HOURS") {
            self.server.jwt_expiry_hours = v.parse().unwrap_or(self.server.jwt_expiry_hours);
        }
        if let Ok(v) = env::var("VAULT_SEED_COURSES") {
            self.server.seed_courses = v.parse().unwrap_or(self.server.seed_courses);
        }

        self
    }

    fn development() -> Self {
        Self {
            environment: Environment::Development,
            console: ConsoleConfig::default(),
            client: ClientConfig {
                server_url: "http://127.0.0.1:3000".to_string(),
                request_timeout_secs: 30,
            },
            server: ServerConfig {
                port: 3000,
                jwt_secret: "student-vault-development-secret".to_string(),
                jwt_expiry_hours: 24 * 7, // 1 week
                seed_courses: true,
            },
        }
    }

    fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            console: ConsoleConfig::default(),
            client: ClientConfig {
                server_url: "https://staging.example.com".to_string(),
                request_timeout_secs: 15,
            },
            server: ServerConfig {
                port: 8080,
                // Must come from JWT_SECRET
                jwt_secret: String::new(),
                jwt_expiry_hours: 24,
                seed_courses: true,
            },
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            console: ConsoleConfig::default(),
            client: ClientConfig {
                server_url: "https://app.example.com".to_string(),
                request_timeout_secs: 10,
            },
            server: ServerConfig {
                port: 8080,
                jwt_secret: String::new(),
                jwt_expiry_hours: 4,
                seed_courses: false,
            },
        }
    }
}

// Global singleton config for the binaries - library types take config by reference
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

// Convenience function for accessing config
pub fn config() -> &'static AppConfig {
    &CONFIG
}
