//! ledtrig-core: Indicator backend trait and device trigger registry.
//!
//! This crate contains the [`IndicatorBackend`] seam, the RAII
//! [`Indicator`] that ties a backend registration to an owner, and the
//! [`DeviceTriggerRegistry`] that maps devices to indicators and fires them
//! on activity.

pub mod constants;
mod backend;
mod error;
mod indicator;
mod registry;

#[cfg(test)]
mod testing;

pub use backend::{BackendError, IndicatorBackend, IndicatorHandle, SharedBackend};
pub use constants::{MAX_NAME_LEN, TRIGGER_NAME_PREFIX};
pub use error::RegistryError;
pub use indicator::{trigger_name, Indicator};
pub use registry::DeviceTriggerRegistry;

// Re-export types used in public signatures for convenience
pub use ledtrig_types::{BlinkTiming, DeviceId};
