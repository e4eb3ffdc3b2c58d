//! HUSH - backend for a simulated federated-learning wellness coach
//!
//! Clients submit per-feature attribution updates. Each update is
//! perturbed with Laplace noise, folded into a running federated average,
//! and stored as a dashboard snapshot in SQLite.
//!
//! # Architecture
//!
//! - `storage`: append-only SQLite table of dashboard snapshots
//! - `privacy`: noise injection for the differential-privacy simulation
//! - `aggregation`: feature types and the FedAvg accumulator
//! - `service`: update and query handling over the store and accumulator
//! - `server`: axum router and server lifecycle
//! - `config`, `cli`, `logging`: ambient setup
//! - `error`: error types and result aliases
//!
//! # Example
//!
//! ```no_run
//! use hush::{Config, HushService};
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = Config::default();
//!     config.validate()?;
//!
//!     let service = HushService::from_config(&config)?;
//!     service.bootstrap()?;
//!     println!("{} snapshots", service.dashboard_data()?.len());
//!     Ok(())
//! }
//! ```

pub mod aggregation;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod logging;
pub mod privacy;
pub mod server;
pub mod service;
pub mod storage;

// Re-export commonly used types
pub use aggregation::{AggregationState, Feature, FeatureAttributions, FeatureWeights};
pub use config::Config;
pub use error::{HushError, Result};
pub use privacy::{LaplaceNoise, NoNoise, NoiseInjector};
pub use server::router;
pub use service::{HushService, ModelUpdatePayload, UpdateResponse};
pub use storage::{DashboardSnapshot, SnapshotStore};
