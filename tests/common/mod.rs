#![allow(dead_code)]

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use student_vault::auth::LocalIdentityProvider;
use student_vault::config::{ConsoleConfig, LoadStrategy, ServerConfig};
use student_vault::error::StoreError;
use student_vault::model::Session;
use student_vault::mutation::{Notification, NotificationReceiver};
use student_vault::server::{self, AppState};
use student_vault::store::{Document, DocumentStore, Fields, MemoryStore};
use student_vault::types::EntityKind;
use student_vault::Console;

pub const JWT_SECRET: &str = "integration-test-secret";

pub fn fields(value: Value) -> Fields {
    value.as_object().cloned().expect("object literal")
}

pub async fn seed_course(store: &MemoryStore, id: &str, title: &str) {
    store
        .seed(EntityKind::Courses, Document::new(id, fields(json!({ "title": title }))))
        .await;
}

pub async fn seed_student(store: &MemoryStore, id: &str, name: &str, course_id: &str) {
    let doc = fields(json!({
        "name": name,
        "email": format!("{}@example.com", id),
        "gender": "Female",
        "contact": "555-0100",
        "courseId": course_id,
    }));
    store.seed(EntityKind::Students, Document::new(id, doc)).await;
}

pub async fn seed_attendance(store: &MemoryStore, id: &str, stname: &str, crname: &str, date: &str, status: &str) {
    let doc = fields(json!({
        "stname": stname,
        "crname": crname,
        "date": date,
        "attendance": status,
    }));
    store.seed(EntityKind::Attendance, Document::new(id, doc)).await;
}

pub fn console_config(initial_load: LoadStrategy) -> ConsoleConfig {
    ConsoleConfig {
        initial_load,
        notification_auto_close_ms: 3000,
    }
}

/// In-memory store whose list calls take `delay` to answer
pub struct SlowStore {
    inner: MemoryStore,
    delay: Duration,
}

impl SlowStore {
    pub fn new(inner: MemoryStore, delay: Duration) -> Self {
        Self { inner, delay }
    }
}

#[async_trait]
impl DocumentStore for SlowStore {
    async fn list(&self, kind: EntityKind) -> Result<Vec<Document>, StoreError> {
        tokio::time::sleep(self.delay).await;
        self.inner.list(kind).await
    }

    async fn create(&self, kind: EntityKind, fields: Fields) -> Result<String, StoreError> {
        self.inner.create(kind, fields).await
    }

    async fn update(&self, kind: EntityKind, id: &str, fields: Fields) -> Result<(), StoreError> {
        self.inner.update(kind, id, fields).await
    }

    async fn delete(&self, kind: EntityKind, id: &str) -> Result<(), StoreError> {
        self.inner.delete(kind, id).await
    }
}

/// Console over an instrumented in-memory store
pub struct Fixture {
    pub store: MemoryStore,
    pub identity: Arc<LocalIdentityProvider>,
    pub console: Console,
    pub notifications: NotificationReceiver,
}

impl Fixture {
    pub fn new(identity: LocalIdentityProvider) -> Self {
        let store = MemoryStore::instrumented();
        let identity = Arc::new(identity);
        let (console, notifications) = Console::new(
            Arc::new(store.clone()),
            identity.clone(),
            &console_config(LoadStrategy::Sequential),
        );
        Self {
            store,
            identity,
            console,
            notifications,
        }
    }

    /// Signed in, with two courses and one student seeded and no calls recorded
    pub async fn signed_in() -> Result<Self> {
        let identity = LocalIdentityProvider::new();
        identity.resolve(Some(Session::new("u1", Some("admin@example.com".into()))));
        let mut fixture = Self::new(identity);

        seed_course(&fixture.store, "c1", "React").await;
        seed_course(&fixture.store, "c2", "Angular").await;
        seed_student(&fixture.store, "s1", "Jane Doe", "c1").await;

        fixture.console.init().await?;
        fixture.store.clear_calls().await;
        Ok(fixture)
    }

    pub fn drain(&mut self) -> Vec<Notification> {
        student_vault::mutation::notify::drain(&mut self.notifications)
    }
}

/// Dev server running inside the test's runtime on a free port
pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    pub state: AppState,
    handle: JoinHandle<Result<()>>,
}

impl TestServer {
    pub async fn start() -> Result<Self> {
        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        let state = AppState::seeded(ServerConfig {
            port,
            jwt_secret: JWT_SECRET.to_string(),
            jwt_expiry_hours: 1,
            seed_courses: true,
        })
        .await;
        let listener = TcpListener::bind(("127.0.0.1", port))
            .await
            .with_context(|| format!("failed to bind port {}", port))?;
        let handle = tokio::spawn(server::run(listener, state.clone()));

        let server = Self {
            port,
            base_url,
            state,
            handle,
        };
        server.wait_ready(Duration::from_secs(10)).await?;
        Ok(server)
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let client = reqwest::Client::new();
        let deadline = Instant::now() + timeout;
        loop {
            if Instant::now() > deadline {
                break;
            }
            let url = format!("{}/health", self.base_url);
            if let Ok(resp) = client.get(&url).send().await {
                if resp.status() == StatusCode::OK {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        anyhow::bail!("server did not become ready on {} within {:?}", self.base_url, timeout)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
