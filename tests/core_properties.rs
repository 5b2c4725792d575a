//! Property tests for the arithmetic the whole crate leans on: wrap-safe
//! elapsed time, median bounds, and circular-log retention.

use proptest::prelude::*;
use stratus_core::{wrap_safe_elapsed, MedianFilter, RingLog};

proptest! {
    /// Advancing a wrapping counter by `delta` and measuring back always
    /// recovers `delta`, wherever the counter started.
    #[test]
    fn elapsed_recovers_any_delta(earlier: u32, delta: u32) {
        let now = earlier.wrapping_add(delta);
        prop_assert_eq!(wrap_safe_elapsed(earlier, now), delta);
    }

    #[test]
    fn elapsed_at_same_instant_is_zero(t: u32) {
        prop_assert_eq!(wrap_safe_elapsed(t, t), 0);
    }

    /// The median never leaves the range of what could be in the window:
    /// the pushed samples plus the initial zero fill.
    #[test]
    fn median_bounded_by_window_contents(
        samples in prop::collection::vec(-1e6f32..1e6, 0..40),
        window in 0usize..20,
    ) {
        let mut filter = MedianFilter::new(window);
        for &sample in &samples {
            filter.push(sample);
        }
        let median = filter.read();
        let lo = samples.iter().copied().fold(0.0f32, f32::min);
        let hi = samples.iter().copied().fold(0.0f32, f32::max);
        prop_assert!(median >= lo && median <= hi, "median {} outside [{}, {}]", median, lo, hi);
    }

    /// A circular log always holds exactly the newest samples, in order.
    #[test]
    fn ring_log_retains_newest_suffix(
        samples in prop::collection::vec(-1e9f32..1e9, 0..100),
    ) {
        let mut log: RingLog<16> = RingLog::new();
        for &sample in &samples {
            log.push(sample);
        }

        let stored: Vec<f32> = log.iter().collect();
        let start = samples.len().saturating_sub(16);
        prop_assert_eq!(stored.as_slice(), &samples[start..]);
    }
}
