// Console wiring for one CLI invocation
use anyhow::Context;
use async_trait::async_trait;
use std::io::{self, BufRead, Write};
use std::sync::Arc;
use tracing::debug;

use crate::auth::HttpIdentityProvider;
use crate::cli::output::output_success;
use crate::cli::session::{load_session, StoredSession};
use crate::cli::OutputFormat;
use crate::client::ApiClient;
use crate::config::config;
use crate::console::{Console, Page};
use crate::model::SessionState;
use crate::mutation::notify::drain;
use crate::mutation::{Confirm, ConfirmPrompt, MutationStatus, NotificationLevel, NotificationReceiver};
use crate::routing::{Guarded, Route};
use crate::store::HttpStore;

pub struct CliContext {
    pub console: Console,
    pub identity: Arc<HttpIdentityProvider>,
    pub server_url: String,
    pub output_format: OutputFormat,
    notifications: NotificationReceiver,
}

impl CliContext {
    /// Build a console against `server` (or the stored/configured server)
    /// and restore the stored session if it belongs to that server.
    pub async fn connect(server: Option<&str>, output_format: OutputFormat) -> anyhow::Result<Self> {
        let stored = load_session()?;
        let server_url = server
            .map(str::to_string)
            .or_else(|| stored.as_ref().map(|s| s.server_url.clone()))
            .unwrap_or_else(|| config().client.server_url.clone());

        let client = ApiClient::new(&server_url, config().client.request_timeout())
            .with_context(|| format!("invalid server URL '{}'", server_url))?;
        let identity = Arc::new(HttpIdentityProvider::new(client.clone()));
        let store = Arc::new(HttpStore::new(client));

        let (mut console, notifications) = Console::new(store, identity.clone(), &config().console);

        let token = stored
            .filter(|s| s.server_url == server_url)
            .map(|s| s.token);
        debug!("Restoring session for {} (token present: {})", server_url, token.is_some());
        identity.restore(token).await;
        console.init().await?;

        Ok(Self {
            console,
            identity,
            server_url,
            output_format,
            notifications,
        })
    }

    pub fn session_state(&self) -> SessionState {
        self.console.gate().state()
    }

    /// Snapshot of the current session for `session.json`
    pub fn stored_session(&self) -> anyhow::Result<StoredSession> {
        let state = self.session_state();
        let session = state.session.context("not signed in")?;
        let token = self.identity.token().context("server issued no token")?;
        Ok(StoredSession::new(&self.server_url, token, session.uid, session.email))
    }

    /// Open a protected page, failing with a hint when there is no session
    pub async fn open(&self, route: Route) -> anyhow::Result<Page> {
        match self.console.open(route).await {
            Guarded::Render(page) => Ok(page),
            Guarded::Redirect(_) => anyhow::bail!("Not signed in. Run `vault login <email>` first."),
            Guarded::Loading => anyhow::bail!("Session is still resolving"),
        }
    }

    /// Print queued notifications and turn a failed mutation into an error
    pub fn report(&mut self, status: MutationStatus) -> anyhow::Result<()> {
        let notifications = drain(&mut self.notifications);
        for notification in notifications.iter().filter(|n| n.level == NotificationLevel::Success) {
            output_success(&self.output_format, &notification.message, None)?;
        }
        let failure = notifications
            .iter()
            .rev()
            .find(|n| n.level == NotificationLevel::Error)
            .map(|n| n.message.clone());

        match status {
            MutationStatus::Settled => Ok(()),
            MutationStatus::Cancelled => {
                println!("Cancelled");
                Ok(())
            }
            MutationStatus::Invalid(e) if e.missing_fields.is_empty() => Err(anyhow::anyhow!(e)),
            MutationStatus::Invalid(e) => {
                anyhow::bail!("{} (missing: {})", e.message, e.missing_fields.join(", "))
            }
            MutationStatus::Failed(e) => {
                let message = failure.unwrap_or_else(|| "Request failed".to_string());
                anyhow::bail!("{}: {}", message, e)
            }
        }
    }
}

/// Asks on the terminal; anything but `y`/`yes` declines
pub struct StdinConfirm;

#[async_trait]
impl Confirm for StdinConfirm {
    async fn confirm(&self, prompt: &ConfirmPrompt) -> bool {
        let question = format!("{}: {} [y/N] ", prompt.title, prompt.message);
        match prompt_line(&question).await {
            Ok(answer) => matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"),
            Err(e) => {
                debug!("No confirmation answer: {}", e);
                false
            }
        }
    }
}

/// Read one line from stdin after printing `label` to stderr
pub async fn prompt_line(label: &str) -> anyhow::Result<String> {
    let label = label.to_string();
    let line = tokio::task::spawn_blocking(move || -> io::Result<String> {
        let mut stderr = io::stderr();
        stderr.write_all(label.as_bytes())?;
        stderr.flush()?;
        let mut line = String::new();
        io::stdin().lock().read_line(&mut line)?;
        Ok(line)
    })
    .await??;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}
