//! Error types for the registry and scheduler tables
//!
//! Errors here follow the crate's graceful-degradation policy: nothing in
//! this core is fatal on its own. Failed lookups return sentinel values
//! (`0.0`, `false`, `None`) rather than errors; the enums below cover the
//! only two operations that can actually be refused, both at registration
//! time. Each variant is a plain `Copy` value so callers can store or
//! ignore it without allocation.

use thiserror_no_std::Error;

/// Result type for device registry operations.
pub type RegistryResult<T> = Result<T, RegistryError>;

/// Result type for scheduler operations.
pub type SchedulerResult<T> = Result<T, SchedulerError>;

/// Device registration failures.
///
/// Both variants leave the registry untouched; the first registration of a
/// name stays authoritative.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistryError {
    /// A device with this name is already registered.
    #[error("device name already registered")]
    DuplicateName,

    /// The fixed-capacity device table is full.
    #[error("device table full")]
    TableFull,
}

/// Task registration failures.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerError {
    /// The fixed-capacity task table is full.
    #[error("task table full")]
    TableFull,
}

#[cfg(feature = "defmt")]
impl defmt::Format for RegistryError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Self::DuplicateName => defmt::write!(fmt, "device name already registered"),
            Self::TableFull => defmt::write!(fmt, "device table full"),
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for SchedulerError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Self::TableFull => defmt::write!(fmt, "task table full"),
        }
    }
}
