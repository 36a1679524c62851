//! ledtrig-dev: Per-device LED activity triggers
//!
//! This library provides the application side of ledtrig-dev:
//! - Configuration management
//! - The built-in in-memory indicator backend
//! - The text control surface (list / register / unregister / trigger)
//!
//! The registry itself lives in `ledtrig-core`.

pub mod backends;
pub mod config;
pub mod control;

// Re-export commonly used types
pub use config::AppConfig;
pub use control::{ControlCommand, ControlError, ControlSurface};
pub use ledtrig_core::{BlinkTiming, DeviceId, DeviceTriggerRegistry};
