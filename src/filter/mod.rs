//! Bounded noise-filtering primitives
//!
//! Two smoothing strategies, both allocation-free after construction:
//!
//! - [`MedianFilter`] — fixed odd-capacity circular window; reading sorts a
//!   copy and returns the middle element. The default smoother for every
//!   registered device. Robust against single-sample spikes, which is the
//!   dominant failure mode of cheap bus sensors.
//! - [`KalmanEstimator`] — scalar recursive estimator for sensors where a
//!   tunable noise model beats rank-order filtering (slow analog channels,
//!   supply-voltage monitoring).
//!
//! Both expose an explicit two-operation contract: feed raw samples in,
//! read the smoothed value out. Reading never mutates.

mod kalman;
mod median;

pub use kalman::KalmanEstimator;
pub use median::{MedianFilter, MEDIAN_MAX_WINDOW};
