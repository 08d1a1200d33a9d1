use serde::Serialize;
use std::sync::Arc;

use crate::cache::{Collections, PageLoad};

/// Totals shown on the dashboard chart
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DashboardSummary {
    pub students: usize,
    pub courses: usize,
    pub attendance: usize,
}

pub struct DashboardView {
    collections: Arc<Collections>,
    load: PageLoad,
}

impl DashboardView {
    pub async fn mount(collections: Arc<Collections>) -> Self {
        let load = collections.initial_load().await;
        Self { collections, load }
    }

    /// `None` until this dashboard's own load has settled
    pub fn summary(&self) -> Option<DashboardSummary> {
        if self.load.is_loading() {
            return None;
        }
        Some(DashboardSummary {
            students: self.collections.students().len(),
            courses: self.collections.courses().len(),
            attendance: self.collections.attendance().len(),
        })
    }
}
