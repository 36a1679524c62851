//! Indicator backend trait and related types

use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Opaque reference to an indicator owned by a backend.
///
/// Only backends mint handles; the registry stores them and hands them back
/// unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IndicatorHandle(u64);

impl IndicatorHandle {
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn raw(self) -> u64 {
        self.0
    }
}

/// Failure reported by a backend while registering an indicator
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    #[error("indicator name {name:?} is already in use")]
    NameInUse { name: String },

    #[error("indicator backend unavailable: {message}")]
    Unavailable { message: String },
}

/// Trait for indicator backends
///
/// A backend owns named blinkable objects (LED triggers). It must be safe to
/// call from many threads at once as long as the handles differ.
pub trait IndicatorBackend: Send + Sync {
    /// Create an indicator under `name` and return its handle
    fn register_indicator(&self, name: &str) -> Result<IndicatorHandle, BackendError>;

    /// Release an indicator. Called exactly once per successful register.
    fn unregister_indicator(&self, handle: IndicatorHandle);

    /// Request a single blink. Must not block.
    fn fire_oneshot(
        &self,
        handle: IndicatorHandle,
        delay_on: Duration,
        delay_off: Duration,
        invert: bool,
    );
}

/// Type-erased backend shared between the registry and its indicators
pub type SharedBackend = Arc<dyn IndicatorBackend>;
