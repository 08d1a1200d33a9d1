//! Client-side joins between cached collections.

use crate::model::{Course, Student};

/// Label shown when a course reference does not resolve
pub const NOT_ASSIGNED: &str = "Not Assigned";

/// Title of the course with `course_id`, or [`NOT_ASSIGNED`].
///
/// Linear scan over the cached courses. Absent and empty ids fall through to
/// the fallback exactly like unknown ones.
pub fn resolve_course_title<'a>(course_id: Option<&str>, courses: &'a [Course]) -> &'a str {
    course_id
        .filter(|id| !id.is_empty())
        .and_then(|id| courses.iter().find(|course| course.id == id))
        .map(|course| course.title.as_str())
        .unwrap_or(NOT_ASSIGNED)
}

/// Display name of the cached student with `student_id`
pub fn find_student_name<'a>(student_id: &str, students: &'a [Student]) -> Option<&'a str> {
    students
        .iter()
        .find(|student| student.id == student_id)
        .map(|student| student.name.as_str())
}

/// Title of the cached course with `course_id`, without a fallback
pub fn find_course_title<'a>(course_id: &str, courses: &'a [Course]) -> Option<&'a str> {
    if course_id.is_empty() {
        return None;
    }
    courses
        .iter()
        .find(|course| course.id == course_id)
        .map(|course| course.title.as_str())
}
