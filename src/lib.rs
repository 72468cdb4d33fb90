//! Residential solar savings estimator and mock telemetry generator.
//!
//! The [`estimator`] and [`telemetry`] modules are pure computations; the
//! [`runner`] wires them to a profile source and a record sink, and the
//! optional `api` feature exposes them over HTTP.

#[cfg(feature = "api")]
pub mod api;
pub mod config;
pub mod error;
pub mod estimator;
pub mod io;
pub mod records;
pub mod runner;
pub mod status;
pub mod telemetry;

pub use error::{SolterraError, SolterraResult};
