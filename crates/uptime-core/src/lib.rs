pub mod consolidate;
pub mod engine;
pub mod error;
pub mod interval;
pub mod settings;
pub mod store;
pub mod sweep;
pub mod types;

pub use error::{Result, UptimeError};
