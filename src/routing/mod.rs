//! Console routes and the guard in front of protected ones.

pub mod guard;

use serde::Serialize;

pub use guard::{guard, guard_async, Guarded, LOADING_PLACEHOLDER};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Route {
    Dashboard,
    Students,
    Attendance,
    Courses,
    Login,
    NotFound,
}

impl Route {
    /// Path matching is exact; anything unknown is `NotFound`
    pub fn from_path(path: &str) -> Self {
        match path.trim_end_matches('/') {
            "" => Route::Dashboard,
            "/students" => Route::Students,
            "/attendance" => Route::Attendance,
            "/courses" => Route::Courses,
            "/login" => Route::Login,
            _ => Route::NotFound,
        }
    }

    pub fn path(&self) -> &'static str {
        match self {
            Route::Dashboard => "/",
            Route::Students => "/students",
            Route::Attendance => "/attendance",
            Route::Courses => "/courses",
            Route::Login => "/login",
            Route::NotFound => "*",
        }
    }

    /// Only the students page sits behind the session check
    pub fn is_protected(&self) -> bool {
        matches!(self, Route::Students)
    }
}
