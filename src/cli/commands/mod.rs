pub mod attendance;
pub mod auth;
pub mod courses;
pub mod dashboard;
pub mod serve;
pub mod students;
