//! View models rendered by the presentation layer.
//!
//! Each view fetches the collections it needs when mounted and then renders
//! straight from the cached snapshots.

pub mod attendance;
pub mod courses;
pub mod dashboard;
pub mod students;

pub use attendance::{AttendanceRow, AttendanceView};
pub use courses::CoursesView;
pub use dashboard::{DashboardSummary, DashboardView};
pub use students::{CourseFilter, StudentRow, StudentsView};
