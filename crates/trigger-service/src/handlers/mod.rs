//! HTTP route handlers.

pub mod health;
pub mod trigger;

pub use health::health_check;
pub use trigger::trigger_job;
