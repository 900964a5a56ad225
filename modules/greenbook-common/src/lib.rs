pub mod config;
pub mod types;

pub use config::{Config, Environment};
pub use types::*;
