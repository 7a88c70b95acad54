pub mod state;
pub mod error;
pub mod auth;
pub mod shop;
pub mod admin;
pub mod orders;
pub mod dashboard;

pub use error::{AppError, AppResult};
pub use state::AppState;
