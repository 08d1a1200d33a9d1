use serde::Serialize;
use std::sync::Arc;

use crate::cache::{Collections, PageLoad};
use crate::model::{Attendance, AttendanceStatus, Course, Student};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttendanceRow {
    /// 1-based position in the filtered list
    pub index: usize,
    pub id: String,
    pub student: String,
    pub course: String,
    pub date: String,
    pub status: AttendanceStatus,
}

impl AttendanceRow {
    fn new(index: usize, record: &Attendance) -> Self {
        Self {
            index,
            id: record.id.clone(),
            student: record.stname.clone(),
            course: record.crname.clone(),
            date: record.date.clone(),
            status: record.status,
        }
    }
}

pub struct AttendanceView {
    collections: Arc<Collections>,
    load: PageLoad,
    /// Exact date to show; empty shows every record
    pub date_filter: String,
}

impl AttendanceView {
    pub async fn mount(collections: Arc<Collections>) -> Self {
        let load = collections.initial_load().await;
        Self {
            collections,
            load,
            date_filter: String::new(),
        }
    }

    pub fn is_loading(&self) -> bool {
        self.load.is_loading()
    }

    pub fn rows(&self) -> Vec<AttendanceRow> {
        let records = self.collections.attendance().snapshot();
        let filter = self.date_filter.trim();
        records
            .iter()
            .filter(|record| filter.is_empty() || record.date == filter)
            .enumerate()
            .map(|(i, record)| AttendanceRow::new(i + 1, record))
            .collect()
    }

    /// Message for an empty table; `None` while loading
    pub fn empty_message(&self) -> Option<String> {
        if self.is_loading() {
            return None;
        }
        let filter = self.date_filter.trim();
        Some(if filter.is_empty() {
            "No attendance records found".to_string()
        } else {
            format!("No attendance records found for date {}", filter)
        })
    }

    /// Student picker options of the record form
    pub fn students(&self) -> Arc<Vec<Student>> {
        self.collections.students().snapshot()
    }

    /// Course picker options of the record form
    pub fn courses(&self) -> Arc<Vec<Course>> {
        self.collections.courses().snapshot()
    }
}
