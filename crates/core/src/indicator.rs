//! Backend-registered indicator with guaranteed release

use crate::backend::{BackendError, IndicatorHandle, SharedBackend};
use crate::constants::{MAX_NAME_LEN, TRIGGER_NAME_PREFIX};
use ledtrig_types::{BlinkTiming, DeviceId};
use log::debug;
use std::fmt;

/// Build the trigger name for a device, cut to the name buffer size
pub fn trigger_name(device: DeviceId) -> String {
    let mut name = format!("{}{}", TRIGGER_NAME_PREFIX, device);
    // ASCII only, any byte index is a char boundary
    name.truncate(MAX_NAME_LEN - 1);
    name
}

/// An indicator registered with a backend.
///
/// Creating one registers it; dropping it unregisters it. The handle is never
/// exposed for release elsewhere, so every successful registration is undone
/// exactly once.
pub struct Indicator {
    backend: SharedBackend,
    handle: IndicatorHandle,
    name: String,
}

impl Indicator {
    /// Register `name` with the backend
    pub fn register(backend: &SharedBackend, name: String) -> Result<Self, BackendError> {
        let handle = backend.register_indicator(&name)?;
        debug!("Registered indicator {} ({:?})", name, handle);
        Ok(Self {
            backend: SharedBackend::clone(backend),
            handle,
            name,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn handle(&self) -> IndicatorHandle {
        self.handle
    }

    /// Ask the backend for a single blink
    pub fn fire(&self, timing: &BlinkTiming) {
        self.backend.fire_oneshot(
            self.handle,
            timing.delay_on(),
            timing.delay_off(),
            timing.invert,
        );
    }
}

impl Drop for Indicator {
    fn drop(&mut self) {
        self.backend.unregister_indicator(self.handle);
        debug!("Unregistered indicator {} ({:?})", self.name, self.handle);
    }
}

impl fmt::Debug for Indicator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Indicator")
            .field("name", &self.name)
            .field("handle", &self.handle)
            .field("backend", &"<backend>")
            .finish()
    }
}
