// Persisted CLI session: which server we talk to and the bearer token it issued
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

const SESSION_FILE: &str = "session.json";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredSession {
    pub server_url: String,
    pub token: String,
    pub uid: String,
    pub email: Option<String>,
    pub saved_at: DateTime<Utc>,
}

impl StoredSession {
    pub fn new(server_url: impl Into<String>, token: impl Into<String>, uid: impl Into<String>, email: Option<String>) -> Self {
        Self {
            server_url: server_url.into(),
            token: token.into(),
            uid: uid.into(),
            email,
            saved_at: Utc::now(),
        }
    }
}

pub fn get_config_dir() -> anyhow::Result<PathBuf> {
    let config_dir = if let Ok(custom_dir) = std::env::var("VAULT_CLI_CONFIG_DIR") {
        PathBuf::from(custom_dir)
    } else {
        let home = std::env::var("HOME").map_err(|_| anyhow::anyhow!("HOME environment variable not set"))?;
        PathBuf::from(home).join(".config").join("student-vault").join("cli")
    };

    if !config_dir.exists() {
        fs::create_dir_all(&config_dir)?;
    }

    Ok(config_dir)
}

pub fn load_session() -> anyhow::Result<Option<StoredSession>> {
    let session_file = get_config_dir()?.join(SESSION_FILE);
    if !session_file.exists() {
        return Ok(None);
    }

    let content = fs::read_to_string(session_file)?;
    Ok(Some(serde_json::from_str(&content)?))
}

pub fn save_session(session: &StoredSession) -> anyhow::Result<()> {
    let session_file = get_config_dir()?.join(SESSION_FILE);
    fs::write(session_file, serde_json::to_string_pretty(session)?)?;
    Ok(())
}

/// Remove the stored session; returns whether one existed
pub fn clear_session() -> anyhow::Result<bool> {
    let session_file = get_config_dir()?.join(SESSION_FILE);
    if !session_file.exists() {
        return Ok(false);
    }
    fs::remove_file(session_file)?;
    Ok(true)
}
