//! Error type for handle initialization.
//!
//! Operational methods keep the kernel's boolean/`Option` result
//! conventions; only the one-time `init()` calls return a structured
//! error, since that is the only place a caller can meaningfully react
//! to the cause.

use core::fmt;

/// Why a handle's `init()` failed.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RtosError {
    /// The kernel could not allocate the underlying object.
    OutOfMemory,
    /// A construction parameter was rejected (empty name, zero stack,
    /// zero capacity).
    InvalidParameter,
    /// `init()` was already completed on this handle.
    AlreadyInitialized,
}

impl fmt::Display for RtosError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RtosError::OutOfMemory => f.write_str("kernel object allocation failed"),
            RtosError::InvalidParameter => f.write_str("invalid construction parameter"),
            RtosError::AlreadyInitialized => f.write_str("handle already initialized"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for RtosError {}
