pub mod app;
pub mod auth;
pub mod cache;
pub mod config;
pub mod constants;
pub mod database;
pub mod error;
pub mod logging;
pub mod map;
pub mod models;
pub mod routes;

mod test_utils;

pub const VERSION: &str = "0.1.0";
