//! ledtrig-types: Shared data types for ledtrig-dev.
//!
//! This crate contains pure data types (device identifiers, blink timing)
//! that are shared across all ledtrig-dev crates. Nothing here touches a
//! lock or an indicator backend, making it suitable as a foundation layer.

pub mod blink;
pub mod device;

// Re-export commonly used types at the crate root for convenience
pub use blink::{BlinkTiming, DEFAULT_BLINK_DELAY_MS};
pub use device::{DeviceId, ParseDeviceIdError, MINOR_BITS};
