//! Fixed-capacity median filter
//!
//! A circular window of raw samples plus a write cursor. Writing overwrites
//! the oldest slot; reading copies the window, sorts the copy ascending,
//! and returns the middle element — the true median for the fixed odd
//! window. The window starts zero-filled, so a freshly registered device
//! reads `0.0` until real samples displace the zeros.
//!
//! The window length is forced odd and at least 3: an even or too-small
//! requested size is rounded up to the next odd value, then clamped to
//! [`MEDIAN_MAX_WINDOW`]. An odd window guarantees a single middle element
//! with no averaging step.

use heapless::Vec;

/// Upper bound on the filter window, in samples.
///
/// Odd, so the clamp cannot break the forced-odd invariant. Larger windows
/// buy little smoothing for slow environmental channels and cost 4 bytes a
/// sample per device.
pub const MEDIAN_MAX_WINDOW: usize = 15;

/// Fixed odd-capacity circular median filter.
///
/// ```
/// use stratus_core::MedianFilter;
///
/// let mut filter = MedianFilter::new(5);
/// for sample in [2.0, 1.0, 3.0, 4.0, 0.0] {
///     filter.push(sample);
/// }
/// assert_eq!(filter.read(), 2.0);
/// ```
#[derive(Debug, Clone)]
pub struct MedianFilter {
    window: Vec<f32, MEDIAN_MAX_WINDOW>,
    cursor: usize,
}

impl MedianFilter {
    /// Create a zero-filled filter.
    ///
    /// `requested` is rounded up to the next odd value no smaller than 3
    /// and clamped to [`MEDIAN_MAX_WINDOW`]:
    ///
    /// ```
    /// use stratus_core::MedianFilter;
    ///
    /// assert_eq!(MedianFilter::new(4).capacity(), 5);
    /// assert_eq!(MedianFilter::new(0).capacity(), 3);
    /// ```
    pub fn new(requested: usize) -> Self {
        let size = if requested < 3 {
            3
        } else if requested % 2 == 0 {
            requested + 1
        } else {
            requested
        };
        let size = size.min(MEDIAN_MAX_WINDOW);

        let mut window = Vec::new();
        // size is clamped to the Vec capacity, so resize cannot fail
        let _ = window.resize(size, 0.0);

        Self { window, cursor: 0 }
    }

    /// Actual window length after rounding and clamping.
    pub fn capacity(&self) -> usize {
        self.window.len()
    }

    /// Feed one raw sample, overwriting the oldest slot.
    pub fn push(&mut self, sample: f32) {
        self.window[self.cursor] = sample;
        self.cursor = (self.cursor + 1) % self.window.len();
    }

    /// Current median of the window. Never mutates the filter.
    pub fn read(&self) -> f32 {
        let mut sorted = self.window.clone();
        sorted.sort_unstable_by(|a, b| a.total_cmp(b));
        sorted[(sorted.len() - 1) / 2]
    }
}

impl Default for MedianFilter {
    /// The deployment default: a 5-sample window.
    fn default() -> Self {
        Self::new(5)
    }
}
