pub mod bootstrap;
pub mod controller;

pub use bootstrap::controller_from_config;
pub use controller::{AppController, QueryRequest};
