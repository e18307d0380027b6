//! Logging engines behind the [`Logger`](crate::Logger) facade
//!
//! - [`tracing_backend`]: `tracing` events rendered by a per-logger layer,
//!   extended with attribute rewriters
//! - [`log_backend`]: `log` records rendered by a per-logger `env_logger`,
//!   extended with hooks

pub mod log_backend;
pub mod tracing_backend;
