use serde::Serialize;
use std::str::FromStr;
use std::sync::Arc;

use crate::cache::{Collections, PageLoad};
use crate::join::resolve_course_title;
use crate::model::{Course, Student};
use crate::types::EntityKind;

/// Course filter of the students list; `all` or a course id
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CourseFilter {
    #[default]
    All,
    Course(String),
}

impl CourseFilter {
    pub fn matches(&self, student: &Student) -> bool {
        match self {
            CourseFilter::All => true,
            CourseFilter::Course(id) => student.course_id.as_deref() == Some(id.as_str()),
        }
    }
}

impl FromStr for CourseFilter {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim() {
            "" | "all" => CourseFilter::All,
            id => CourseFilter::Course(id.to_string()),
        })
    }
}

/// One rendered row of the students table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StudentRow {
    pub id: String,
    pub name: String,
    pub email: String,
    pub gender: String,
    pub contact: String,
    pub course: String,
}

impl StudentRow {
    fn new(student: &Student, courses: &[Course]) -> Self {
        Self {
            id: student.id.clone(),
            name: student.name.clone(),
            email: student.email.clone(),
            gender: student.gender.clone(),
            contact: student.contact.clone(),
            course: resolve_course_title(student.course_id(), courses).to_string(),
        }
    }
}

pub struct StudentsView {
    collections: Arc<Collections>,
    load: PageLoad,
    pub filter: CourseFilter,
}

impl StudentsView {
    pub const KINDS: [EntityKind; 2] = [EntityKind::Students, EntityKind::Courses];

    /// Fetch students, then courses
    pub async fn mount(collections: Arc<Collections>) -> Self {
        let load = collections.load(&Self::KINDS).await;
        Self {
            collections,
            load,
            filter: CourseFilter::All,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.load.is_loading()
    }

    pub fn rows(&self) -> Vec<StudentRow> {
        let students = self.collections.students().snapshot();
        let courses = self.collections.courses().snapshot();
        students
            .iter()
            .filter(|student| self.filter.matches(student))
            .map(|student| StudentRow::new(student, &courses))
            .collect()
    }

    /// Options for the course filter and course pickers
    pub fn courses(&self) -> Arc<Vec<Course>> {
        self.collections.courses().snapshot()
    }

    pub fn find(&self, id: &str) -> Option<Student> {
        self.collections
            .students()
            .snapshot()
            .iter()
            .find(|student| student.id == id)
            .cloned()
    }
}
