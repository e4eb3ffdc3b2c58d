//! Differential-privacy simulation
//!
//! Client contributions are perturbed with zero-mean Laplace noise before
//! they are folded into the global average. There is no clipping and no
//! privacy budget accounting; this only simulates the perturbation step.

use rand::Rng;

/// Default Laplace scale applied to every feature contribution
pub const DEFAULT_NOISE_SCALE: f64 = 0.1;

/// Perturbs a single scalar contribution
///
/// Implementations must draw independently on every call.
pub trait NoiseInjector: Send + Sync {
    /// Return `value` plus one noise draw
    fn perturb(&self, value: f64) -> f64;
}

/// Laplace(0, scale) noise drawn from the thread-local RNG
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LaplaceNoise {
    scale: f64,
}

impl LaplaceNoise {
    /// Create a Laplace noise source with the given scale
    pub fn new(scale: f64) -> Self {
        Self { scale }
    }

    /// Scale parameter of the distribution
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Draw one sample from Laplace(0, scale) using `rng`
    ///
    /// Uses inverse-CDF sampling on a uniform draw from (-0.5, 0.5).
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        if self.scale == 0.0 {
            return 0.0;
        }
        let u = loop {
            let u = rng.random::<f64>() - 0.5;
            // -0.5 maps to ln(0)
            if u != -0.5 {
                break u;
            }
        };
        -self.scale * u.signum() * (1.0 - 2.0 * u.abs()).ln()
    }
}

impl Default for LaplaceNoise {
    fn default() -> Self {
        Self::new(DEFAULT_NOISE_SCALE)
    }
}

impl NoiseInjector for LaplaceNoise {
    fn perturb(&self, value: f64) -> f64 {
        value + self.sample(&mut rand::rng())
    }
}

/// Identity injector, for deterministic aggregation
#[derive(Debug, Clone, Copy, Default)]
pub struct NoNoise;

impl NoiseInjector for NoNoise {
    fn perturb(&self, value: f64) -> f64 {
        value
    }
}
