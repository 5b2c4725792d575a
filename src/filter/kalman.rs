//! Scalar Kalman estimator
//!
//! The one-dimensional predict/correct recursion:
//!
//! ```text
//! p = p + q                    (predict: grow uncertainty)
//! k = p / (p + r)              (gain)
//! x = x + k * (z - x)          (correct toward measurement z)
//! p = (1 - k) * p              (shrink uncertainty)
//! ```
//!
//! State is four persisted scalars; nothing else is retained between
//! updates. Compared to the median filter this trades spike rejection for
//! a tunable noise model: a small `q` relative to `r` yields heavy
//! smoothing, a large `q` tracks the measurement closely.

/// Scalar recursive estimator with process noise `q`, measurement noise
/// `r`, estimate `x`, and error covariance `p`.
///
/// ```
/// use stratus_core::KalmanEstimator;
///
/// let mut estimator = KalmanEstimator::new(0.05, 2.0, 1.0, 3.30);
/// let smoothed = estimator.update(3.34);
/// assert!(smoothed > 3.30 && smoothed < 3.34);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct KalmanEstimator {
    /// Process noise covariance.
    q: f32,
    /// Measurement noise covariance.
    r: f32,
    /// Current estimate.
    x: f32,
    /// Estimation error covariance.
    p: f32,
}

impl KalmanEstimator {
    /// Build an estimator from its noise model and starting state.
    pub const fn new(
        process_noise: f32,
        measurement_noise: f32,
        initial_covariance: f32,
        initial_estimate: f32,
    ) -> Self {
        Self {
            q: process_noise,
            r: measurement_noise,
            x: initial_estimate,
            p: initial_covariance,
        }
    }

    /// Fold one measurement into the estimate and return the updated value.
    pub fn update(&mut self, measurement: f32) -> f32 {
        self.p += self.q;
        let k = self.p / (self.p + self.r);
        self.x += k * (measurement - self.x);
        self.p *= 1.0 - k;
        self.x
    }

    /// Current estimate without feeding a measurement.
    pub fn estimate(&self) -> f32 {
        self.x
    }
}
