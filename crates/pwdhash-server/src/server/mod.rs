//! Server-side components of `pwdhash-server`.
//!
//! ## Submodules
//!
//! - [`config`] - CLI/environment configuration.
//! - [`routes`] - HTTP routes, handlers and error mapping.
//! - [`telemetry`] - Console logging and optional OpenTelemetry export.

pub mod config;
pub mod routes;
pub mod telemetry;
