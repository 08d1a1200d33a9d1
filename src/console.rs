//! The assembled console: session gate, route guard, collections and the
//! mutation pipeline wired over one store and one identity provider.

use std::sync::Arc;
use tracing::{debug, info};

use crate::auth::{AuthGate, IdentityProvider, SessionSubscription};
use crate::cache::Collections;
use crate::config::ConsoleConfig;
use crate::error::ConsoleError;
use crate::model::SessionState;
use crate::mutation::{MutationPipeline, NotificationReceiver, Notifier};
use crate::routing::{guard_async, Guarded, Route};
use crate::store::DocumentStore;
use crate::views::{AttendanceView, CoursesView, DashboardView, StudentsView};

/// A mounted page
pub enum Page {
    Dashboard(DashboardView),
    Students(StudentsView),
    Attendance(AttendanceView),
    Courses(CoursesView),
    Login,
    NotFound,
}

impl Page {
    pub fn route(&self) -> Route {
        match self {
            Page::Dashboard(_) => Route::Dashboard,
            Page::Students(_) => Route::Students,
            Page::Attendance(_) => Route::Attendance,
            Page::Courses(_) => Route::Courses,
            Page::Login => Route::Login,
            Page::NotFound => Route::NotFound,
        }
    }
}

pub struct Console {
    gate: AuthGate,
    collections: Arc<Collections>,
    pipeline: MutationPipeline,
    subscription: Option<SessionSubscription>,
}

impl Console {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        identity: Arc<dyn IdentityProvider>,
        config: &ConsoleConfig,
    ) -> (Self, NotificationReceiver) {
        let (notifier, notifications) = Notifier::channel(config.notification_auto_close());
        let collections = Arc::new(Collections::new(Arc::clone(&store), config.initial_load));
        let pipeline = MutationPipeline::new(store, Arc::clone(&collections), notifier);

        let console = Self {
            gate: AuthGate::new(identity),
            collections,
            pipeline,
            subscription: None,
        };
        (console, notifications)
    }

    /// Subscribe to the session and wait until it has resolved
    pub async fn init(&mut self) -> Result<SessionState, ConsoleError> {
        if self.collections.is_disposed() {
            return Err(ConsoleError::Disposed);
        }
        let subscription = self.subscription.get_or_insert_with(|| self.gate.observe_session());

        let state = subscription.current();
        if !state.loading {
            return Ok(state);
        }

        loop {
            match subscription.next().await {
                Some(state) if !state.loading => {
                    info!(
                        "Session resolved: {}",
                        state.session.as_ref().map_or("signed out", |s| s.uid.as_str())
                    );
                    return Ok(state);
                }
                Some(_) => continue,
                None => return Err(ConsoleError::ProviderClosed),
            }
        }
    }

    /// Navigate to `route`. Protected routes pass through the guard and are
    /// mounted (and fetched) only when a session is present.
    pub async fn open(&self, route: Route) -> Guarded<Page> {
        debug!("Opening {}", route.path());
        let collections = Arc::clone(&self.collections);

        if route.is_protected() {
            return guard_async(&self.gate, || mount(route, collections)).await;
        }
        Guarded::Render(mount(route, collections).await)
    }

    pub fn gate(&self) -> &AuthGate {
        &self.gate
    }

    pub fn collections(&self) -> &Arc<Collections> {
        &self.collections
    }

    pub fn pipeline(&self) -> &MutationPipeline {
        &self.pipeline
    }

    /// Release the session subscription and drop any in-flight fetch results
    pub fn dispose(&mut self) {
        if let Some(subscription) = self.subscription.take() {
            subscription.unsubscribe();
        }
        self.collections.dispose();
    }
}

impl Drop for Console {
    fn drop(&mut self) {
        self.dispose();
    }
}

async fn mount(route: Route, collections: Arc<Collections>) -> Page {
    match route {
        Route::Dashboard => Page::Dashboard(DashboardView::mount(collections).await),
        Route::Students => Page::Students(StudentsView::mount(collections).await),
        Route::Attendance => Page::Attendance(AttendanceView::mount(collections).await),
        Route::Courses => Page::Courses(CoursesView::mount(collections).await),
        Route::Login => Page::Login,
        Route::NotFound => Page::NotFound,
    }
}
