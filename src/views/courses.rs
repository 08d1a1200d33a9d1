use std::sync::Arc;

use crate::cache::Collections;
use crate::model::{Course, Student};
use crate::types::EntityKind;

pub struct CoursesView {
    collections: Arc<Collections>,
}

impl CoursesView {
    pub async fn mount(collections: Arc<Collections>) -> Self {
        collections.load(&[EntityKind::Courses, EntityKind::Students]).await;
        Self { collections }
    }

    pub fn courses(&self) -> Arc<Vec<Course>> {
        self.collections.courses().snapshot()
    }

    /// Students currently assigned to `course_id`
    pub fn enrolled(&self, course_id: &str) -> usize {
        self.collections
            .students()
            .snapshot()
            .iter()
            .filter(|student: &&Student| student.course_id() == Some(course_id))
            .count()
    }
}
