pub mod auth;
pub mod cache;
pub mod cli;
pub mod client;
pub mod config;
pub mod console;
pub mod error;
pub mod join;
pub mod model;
pub mod mutation;
pub mod routing;
pub mod server;
pub mod store;
pub mod types;
pub mod views;

pub use console::{Console, Page};
