//! HTTP service around the estimator, generator, and status report.
//!
//! Provides three POST endpoints mirroring the hosted functions:
//! - `/calculate-savings`: savings calculator, stored per user when named
//! - `/generate-mock-data`: seeds mock telemetry for a registered system
//! - `/system-status`: latest reading, efficiency, and alerts
//!
//! plus `GET /health`.

mod handlers;
mod types;

use std::net::SocketAddr;
use std::sync::{Arc, Mutex, MutexGuard};

use axum::Router;
use axum::routing::{get, post};
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::config::AppConfig;
use crate::error::{SolterraError, SolterraResult};
use crate::records::{MemorySink, SystemRegistry};
use crate::runner::Runner;

pub use types::{ErrorResponse, MockDataRequest, StatusRequest};

/// Application state shared across all request handlers.
///
/// Configuration and the registry are read-only; stored rows sit behind a
/// mutex that is never held across an await point.
///
/// The store is an in-memory stand-in for the external database: every
/// `/generate-mock-data` call appends up to `generator.max_days * 24` rows,
/// nothing is evicted, and `/system-status` scans all rows for the system.
/// Memory grows with the number of seeding calls until the process restarts.
pub struct AppState {
    pub runner: Runner,
    pub registry: SystemRegistry,
    pub store: Mutex<MemorySink>,
    /// Fixed seed for every request's random source; fresh entropy when `None`.
    pub seed: Option<u64>,
}

impl AppState {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            runner: Runner::from_config(config),
            registry: SystemRegistry::new(config.systems.iter().cloned()),
            store: Mutex::new(MemorySink::default()),
            seed: config.generator.seed,
        }
    }

    fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        }
    }

    fn store(&self) -> SolterraResult<MutexGuard<'_, MemorySink>> {
        self.store
            .lock()
            .map_err(|_| SolterraError::Config("record store lock poisoned".to_string()))
    }
}

/// Builds the axum router with all API routes.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/calculate-savings", post(handlers::calculate_savings))
        .route("/generate-mock-data", post(handlers::generate_mock_data))
        .route("/system-status", post(handlers::system_status))
        .with_state(state)
}

/// Binds to the given address and serves the API until the process exits.
///
/// # Errors
///
/// Returns an IO error if the listener cannot bind or the server fails.
pub async fn serve(state: Arc<AppState>, addr: SocketAddr) -> SolterraResult<()> {
    let systems = state.registry.len();
    if state.registry.is_empty() {
        tracing::warn!("no systems configured; mock data and status requests will return 404");
    }
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, systems, "API server listening");
    axum::serve(listener, app).await?;
    Ok(())
}
