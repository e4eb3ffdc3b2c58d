//! Federated averaging of per-feature importance weights
//!
//! Each accepted update is folded into a running mean that weights every
//! prior update equally, regardless of which user sent it.

use crate::privacy::NoiseInjector;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A feature whose importance is tracked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Feature {
    Text,
    Typing,
    Voice,
}

impl Feature {
    /// All tracked features, in reporting order
    pub const ALL: [Feature; 3] = [Feature::Text, Feature::Typing, Feature::Voice];
}

/// One value per tracked feature
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureWeights {
    pub text: f64,
    pub typing: f64,
    pub voice: f64,
}

impl FeatureWeights {
    pub fn new(text: f64, typing: f64, voice: f64) -> Self {
        Self {
            text,
            typing,
            voice,
        }
    }

    pub fn get(&self, feature: Feature) -> f64 {
        match feature {
            Feature::Text => self.text,
            Feature::Typing => self.typing,
            Feature::Voice => self.voice,
        }
    }

    /// Apply `f` to each feature's value
    pub fn map<F>(&self, mut f: F) -> Self
    where
        F: FnMut(Feature, f64) -> f64,
    {
        Self {
            text: f(Feature::Text, self.text),
            typing: f(Feature::Typing, self.typing),
            voice: f(Feature::Voice, self.voice),
        }
    }

    /// Whether every value is finite
    pub fn is_finite(&self) -> bool {
        Feature::ALL.iter().all(|f| self.get(*f).is_finite())
    }
}

impl Default for FeatureWeights {
    /// Hardcoded starting point of the accumulator
    fn default() -> Self {
        Self::new(0.33, 0.33, 0.34)
    }
}

/// Per-feature contributions sent by a client
///
/// A missing known feature contributes 0; an explicit `null` is a type
/// error. Other keys are accepted when their values are numbers, and
/// ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureAttributions {
    #[serde(default)]
    pub text: f64,
    #[serde(default)]
    pub typing: f64,
    #[serde(default)]
    pub voice: f64,
    #[serde(flatten)]
    pub other: HashMap<String, f64>,
}

impl FeatureAttributions {
    /// Contribution for `feature`; 0 when the key was absent
    pub fn contribution(&self, feature: Feature) -> f64 {
        match feature {
            Feature::Text => self.text,
            Feature::Typing => self.typing,
            Feature::Voice => self.voice,
        }
    }

    /// Contributions of all tracked features, with missing ones set to 0
    pub fn to_weights(&self) -> FeatureWeights {
        FeatureWeights::new(
            self.contribution(Feature::Text),
            self.contribution(Feature::Typing),
            self.contribution(Feature::Voice),
        )
    }

    /// Contributions with one independent noise draw per feature
    pub fn perturbed(&self, noise: &dyn NoiseInjector) -> FeatureWeights {
        self.to_weights().map(|_, value| noise.perturb(value))
    }
}

/// Running FedAvg accumulator
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AggregationState {
    pub weights: FeatureWeights,
    pub update_count: u64,
}

impl AggregationState {
    pub fn new(initial_weights: FeatureWeights) -> Self {
        Self {
            weights: initial_weights,
            update_count: 0,
        }
    }

    /// State after folding one more contribution into the running mean
    ///
    /// With `n = update_count + 1`, each weight becomes
    /// `(old * (n - 1) + value) / n`. The first update therefore replaces
    /// the initial weights entirely.
    pub fn fold(&self, contribution: &FeatureWeights) -> AggregationState {
        let n = self.update_count + 1;
        let total = n as f64;
        let weights = self
            .weights
            .map(|feature, old| (old * (total - 1.0) + contribution.get(feature)) / total);
        AggregationState {
            weights,
            update_count: n,
        }
    }
}

impl Default for AggregationState {
    fn default() -> Self {
        Self::new(FeatureWeights::default())
    }
}
