//! Fixed-capacity circular history log
//!
//! Each logging device owns one [`RingLog`]: a circular buffer of filtered
//! samples plus a write cursor. Pushing always succeeds and overwrites the
//! oldest slot once the buffer has wrapped — for a day-long telemetry trace
//! the most recent samples are the valuable ones.
//!
//! Chronological read-out is the load-bearing contract: once the buffer has
//! wrapped, the oldest sample sits at the write cursor, so iteration starts
//! there and walks the full capacity, wrapping once. Before the first wrap
//! the cursor and the logical origin coincide at zero.
//!
//! ```text
//! Physical array:  [D, E, A, B, C]   (cursor = 2)
//!                   0  1  2  3  4
//! Logical view:    [A, B, C, D, E]   (oldest to newest)
//! ```
//!
//! At the reference roll interval of one sample per 10 minutes, the default
//! depth of [`LOG_DEPTH`] slots covers exactly one day.

/// Reference log depth: 144 samples, one per 10 minutes across a day.
pub const LOG_DEPTH: usize = 144;

/// Fixed-capacity circular log of filtered samples.
///
/// `N` is the capacity in samples. All storage is inline; a `RingLog` in a
/// static is fine.
#[derive(Debug, Clone)]
pub struct RingLog<const N: usize> {
    data: [f32; N],
    /// Next write position; wraps to 0 at N.
    cursor: usize,
    /// Number of valid samples, saturating at N.
    len: usize,
}

impl<const N: usize> RingLog<N> {
    /// Empty log.
    pub const fn new() -> Self {
        Self {
            data: [0.0; N],
            cursor: 0,
            len: 0,
        }
    }

    /// Append a sample, overwriting the oldest once full.
    pub fn push(&mut self, value: f32) {
        self.data[self.cursor] = value;
        self.cursor = (self.cursor + 1) % N;
        if self.len < N {
            self.len += 1;
        }
    }

    /// Number of stored samples.
    pub fn len(&self) -> usize {
        self.len
    }

    /// `true` when nothing has been logged yet.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// `true` once the log has wrapped at least once.
    pub fn is_full(&self) -> bool {
        self.len == N
    }

    /// Most recently logged sample.
    pub fn last(&self) -> Option<f32> {
        if self.is_empty() {
            return None;
        }
        let idx = if self.cursor == 0 { N - 1 } else { self.cursor - 1 };
        Some(self.data[idx])
    }

    /// Iterate samples oldest to newest.
    pub fn iter(&self) -> RingLogIter<'_, N> {
        RingLogIter { log: self, count: 0 }
    }

    /// Sample by logical index: 0 = oldest, `len - 1` = newest.
    fn get(&self, index: usize) -> Option<f32> {
        if index >= self.len {
            return None;
        }
        let physical = if self.len < N {
            // Not wrapped yet; logical and physical coincide.
            index
        } else {
            // Wrapped; the oldest sample sits at the cursor.
            (self.cursor + index) % N
        };
        Some(self.data[physical])
    }
}

impl<const N: usize> Default for RingLog<N> {
    fn default() -> Self {
        Self::new()
    }
}

/// Chronological iterator over a [`RingLog`].
pub struct RingLogIter<'a, const N: usize> {
    log: &'a RingLog<N>,
    count: usize,
}

impl<const N: usize> Iterator for RingLogIter<'_, N> {
    type Item = f32;

    fn next(&mut self) -> Option<f32> {
        let item = self.log.get(self.count)?;
        self.count += 1;
        Some(item)
    }
}
