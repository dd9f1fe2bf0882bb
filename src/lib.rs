//! Dayflow HR - employee and department records
//!
//! Validated employee records with derived age and experience, sequence
//! allocated employee codes, department aggregates and a JSON API over both.

pub mod config;
pub mod db;
pub mod derived;
pub mod entity;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod sequence;
pub mod service;
pub mod state;
pub mod store;
pub mod validation;

// Re-export commonly used types
pub use config::Config;
pub use error::{AppError, AppResult};
pub use state::AppState;
