//! Update and query handling
//!
//! `HushService` owns everything a request needs: the snapshot store, the
//! noise injector, and the FedAvg accumulator. Handlers receive it through
//! shared state rather than reaching for process-wide globals.

use crate::aggregation::{AggregationState, FeatureAttributions, FeatureWeights};
use crate::config::Config;
use crate::error::Result;
use crate::privacy::{LaplaceNoise, NoiseInjector};
use crate::storage::{DashboardSnapshot, NewSnapshot, SnapshotStore};
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, PoisonError};

/// Status string returned by the health check
pub const HEALTH_STATUS: &str = "HUSH Backend is running.";

/// Status string returned after an accepted update
pub const UPDATE_STATUS: &str = "update received and saved";

/// Body of `POST /v1/submit-update`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelUpdatePayload {
    /// Per-feature contributions from one client
    pub feature_attributions: FeatureAttributions,
    /// Opaque client identifier; only logged
    pub user_id: String,
}

/// Response of `POST /v1/submit-update`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateResponse {
    pub status: String,
    pub new_data_point: DashboardSnapshot,
}

/// Response of `GET /`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

impl Default for HealthResponse {
    fn default() -> Self {
        Self {
            status: HEALTH_STATUS.to_string(),
        }
    }
}

/// Aggregation service shared by all request handlers
pub struct HushService {
    store: SnapshotStore,
    noise: Arc<dyn NoiseInjector>,
    state: Mutex<AggregationState>,
}

impl HushService {
    /// Create a service over an open store
    pub fn new(
        store: SnapshotStore,
        noise: Arc<dyn NoiseInjector>,
        initial_weights: FeatureWeights,
    ) -> Self {
        Self {
            store,
            noise,
            state: Mutex::new(AggregationState::new(initial_weights)),
        }
    }

    /// Open the configured store and build a service with Laplace noise
    pub fn from_config(config: &Config) -> Result<Self> {
        let store = SnapshotStore::new_with_path(&config.storage.db_path)?;
        let noise = Arc::new(LaplaceNoise::new(config.privacy.noise_scale));
        Ok(Self::new(store, noise, config.aggregation.initial_weights))
    }

    /// The underlying snapshot store
    pub fn store(&self) -> &SnapshotStore {
        &self.store
    }

    /// Seed the store if it is empty
    ///
    /// The schema already exists once the store is open. Must run before
    /// the first request is served. Returns the number of seed rows written.
    pub fn bootstrap(&self) -> Result<usize> {
        let seeded = self.store.seed_if_empty()?;
        if seeded > 0 {
            tracing::info!(rows = seeded, "Database was empty, populated seed snapshots");
        } else {
            tracing::debug!("Database already populated, skipping seed");
        }
        Ok(seeded)
    }

    /// Fold one client update into the global average and persist it
    ///
    /// Each known feature is perturbed with an independent noise draw and
    /// folded into the running mean. The accumulator only advances once
    /// the snapshot row is written, and the lock is held across both so
    /// concurrent updates cannot interleave.
    pub fn submit_update(&self, payload: ModelUpdatePayload) -> Result<UpdateResponse> {
        let noisy = payload.feature_attributions.perturbed(self.noise.as_ref());

        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        let next = state.fold(&noisy);

        let new_data_point = self.store.insert(&NewSnapshot {
            timestamp: now_timestamp(),
            avg_text_importance: next.weights.text,
            avg_typing_importance: next.weights.typing,
            avg_voice_importance: next.weights.voice,
        })?;
        *state = next;
        drop(state);

        tracing::info!(
            user_id = %payload.user_id,
            snapshot_id = new_data_point.id,
            update_count = next.update_count,
            "Processed and saved update"
        );

        Ok(UpdateResponse {
            status: UPDATE_STATUS.to_string(),
            new_data_point,
        })
    }

    /// Full snapshot history, ascending by timestamp
    pub fn dashboard_data(&self) -> Result<Vec<DashboardSnapshot>> {
        self.store.list()
    }

    /// Copy of the current accumulator
    pub fn aggregation_state(&self) -> AggregationState {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Current UTC time as `YYYY-MM-DDTHH:MM:SSZ`, the seed row format
///
/// Every stored timestamp has this shape so string order is chronological.
pub fn now_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}
