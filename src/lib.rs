// src/lib.rs

pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod repositories;
pub mod utils;

// Re-export specific items for convenience
pub use db::Database;
pub use error::DbError;
