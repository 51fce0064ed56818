//! Status-line macros.
//!
//! Thin wrappers over `tracing` that tag user-facing lines with a dedicated
//! target so terminal formatters can style them apart from diagnostics.

#[doc(hidden)]
pub use tracing;

/// Target used for lines reporting a completed action.
pub const SUCCESS_TARGET: &str = "hostwatch::success";

/// Target used for every other user-facing status line.
pub const STATUS_TARGET: &str = "hostwatch::status";

#[macro_export]
macro_rules! success {
    ($($arg:tt)*) => {
        $crate::log::tracing::info!(target: $crate::log::SUCCESS_TARGET, $($arg)*)
    };
}

#[macro_export]
macro_rules! info {
    ($($arg:tt)*) => {
        $crate::log::tracing::info!(target: $crate::log::STATUS_TARGET, $($arg)*)
    };
}

#[macro_export]
macro_rules! warn {
    ($($arg:tt)*) => {
        $crate::log::tracing::warn!(target: $crate::log::STATUS_TARGET, $($arg)*)
    };
}
