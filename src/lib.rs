pub mod app;
pub mod config;
pub mod display;
pub mod error;
pub mod export;
pub mod fetch;
pub mod format;
pub mod pipeline;
pub mod query;
pub mod table;
pub mod utils;

pub use error::{AppError, Result};
