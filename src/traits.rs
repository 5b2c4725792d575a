//! Hardware seams consumed by the core
//!
//! The core never talks to a bus or a runtime directly. The host supplies
//! two primitives through these traits: a presence probe for bus-addressed
//! devices and a cooperative yield point serviced during long table passes.
//! Both are object-safe so they can be handed in as trait objects.

/// Bus-level presence check for a physical device.
///
/// On the original hardware this is an empty I2C transaction: a device is
/// present when it ACKs its address. Implementations should complete within
/// a bounded, short duration — a hung probe stalls the whole run loop.
pub trait PresenceProbe {
    /// `true` when a device responds at `address`.
    fn probe(&mut self, address: u8) -> bool;
}

/// Cooperative yield point.
///
/// Called between devices in a full probe pass and after each fired task so
/// the host runtime can service network or radio housekeeping. The current
/// pass's state is internally consistent at every call: each device or task
/// is fully processed before the hook runs. This is not a suspension; the
/// hook must return.
pub trait YieldNow {
    /// Give the host runtime a chance to breathe.
    fn yield_now(&mut self);
}

/// Any `FnMut()` closure works as a yield hook.
impl<F: FnMut()> YieldNow for F {
    fn yield_now(&mut self) {
        self()
    }
}

/// Yield hook that does nothing. Default when no hook is installed.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoYield;

impl YieldNow for NoYield {
    fn yield_now(&mut self) {}
}

/// Yield hook backed by `std::thread::yield_now`, for host builds.
#[cfg(feature = "std")]
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadYield;

#[cfg(feature = "std")]
impl YieldNow for ThreadYield {
    fn yield_now(&mut self) {
        std::thread::yield_now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closures_are_yield_hooks() {
        let mut count = 0;
        {
            let mut hook = || count += 1;
            hook.yield_now();
            hook.yield_now();
        }
        assert_eq!(count, 2);
    }

    #[test]
    fn no_yield_is_a_no_op() {
        NoYield.yield_now();
    }
}
