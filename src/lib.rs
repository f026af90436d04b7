pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;

pub use error::{ApiError, ApiResult};
pub use state::AppState;
