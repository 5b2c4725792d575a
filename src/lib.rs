//! Telemetry acquisition core for Stratus monitoring controllers
//!
//! Cooperative task scheduling plus a sensor/device registry with noise
//! filtering, presence tracking, and bounded history logging.
//!
//! Key constraints:
//! - Runs unattended forever in a few tens of KB of RAM
//! - Survives a 32-bit millisecond counter that wraps (~49.7 days)
//! - Tolerates absent or noisy sensors without crashing
//! - Supports virtual sensors computed from other sensors' filtered values
//!
//! ```no_run
//! use stratus_core::{Registry, DeviceSpec, Knob};
//!
//! let mut registry = Registry::new();
//! let knob = Knob::new(-40, 125, ".1", "Temperature", "C");
//!
//! registry.register(
//!     DeviceSpec::new("out_temperature", knob, |_| 21.4)
//!         .address(0x76)
//!         .logged(),
//! ).unwrap();
//!
//! registry.sample_all();
//! let t = registry.value("out_temperature");
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(unsafe_code)]
#![warn(missing_docs)]

extern crate alloc;

pub mod errors;
pub mod filter;
pub mod history;
pub mod physics;
pub mod registry;
pub mod scheduler;
pub mod time;
pub mod traits;

// Public API
pub use errors::{RegistryError, RegistryResult, SchedulerError, SchedulerResult};
pub use filter::{KalmanEstimator, MedianFilter, MEDIAN_MAX_WINDOW};
pub use history::{RingLog, RingLogIter, LOG_DEPTH};
pub use registry::{Device, DeviceInfo, DeviceSpec, Knob, Location, Registry, MAX_DEVICES};
pub use scheduler::{Scheduler, Task, MAX_TASKS};
pub use time::{wrap_safe_elapsed, TimeSource, Timestamp};
pub use traits::{NoYield, PresenceProbe, YieldNow};

/// Crate version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_exists() {
        assert!(!VERSION.is_empty());
    }
}
