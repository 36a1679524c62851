//! Text control surface
//!
//! Administrative commands in the shape of the original debugfs files:
//! reading `list` gives one `major:minor` line per trigger, writing a
//! `major:minor` pair to `register`, `unregister` or `trigger` forwards it to
//! the registry. Text is parsed here; the registry only sees [`DeviceId`]s.
//!
//! Registry outcomes are logged, not returned. Only malformed input is
//! reported back to the caller.

mod command;

pub use command::{ControlCommand, ControlError};

use ledtrig_core::{DeviceId, DeviceTriggerRegistry, RegistryError};
use log::{debug, warn};
use std::sync::Arc;

/// Text front end over a shared registry
#[derive(Debug, Clone)]
pub struct ControlSurface {
    registry: Arc<DeviceTriggerRegistry>,
}

impl ControlSurface {
    pub fn new(registry: Arc<DeviceTriggerRegistry>) -> Self {
        Self { registry }
    }

    /// Registered devices, one `major:minor` per line
    pub fn list(&self) -> String {
        self.registry
            .list()
            .iter()
            .map(|device| format!("{}\n", device))
            .collect()
    }

    /// Handle text written to the `register` file
    pub fn register(&self, input: &str) -> Result<(), ControlError> {
        let device = parse_device(input)?;
        self.add_device(device);
        Ok(())
    }

    /// Handle text written to the `unregister` file
    pub fn unregister(&self, input: &str) -> Result<(), ControlError> {
        let device = parse_device(input)?;
        self.remove_device(device);
        Ok(())
    }

    /// Handle text written to the `trigger` file
    pub fn trigger(&self, input: &str) -> Result<(), ControlError> {
        let device = parse_device(input)?;
        self.registry.signal_activity(device);
        Ok(())
    }

    /// Execute one command line and return its output
    pub fn execute(&self, line: &str) -> Result<String, ControlError> {
        match line.parse::<ControlCommand>()? {
            ControlCommand::List => return Ok(self.list()),
            ControlCommand::Register(device) => self.add_device(device),
            ControlCommand::Unregister(device) => self.remove_device(device),
            ControlCommand::Trigger(device) => self.registry.signal_activity(device),
            ControlCommand::Clear => {
                self.registry.remove_all();
            }
        }
        Ok(String::new())
    }

    fn add_device(&self, device: DeviceId) {
        match self.registry.add(device) {
            Ok(()) => debug!("Registered trigger for device {}", device),
            // Already logged by the registry
            Err(RegistryError::DuplicateDevice(_)) => {}
            Err(e) => warn!("{}", e),
        }
    }

    fn remove_device(&self, device: DeviceId) {
        if let Err(e) = self.registry.remove(device) {
            debug!("{}", e);
        }
    }
}

/// Parse a device written to a control file, tolerating the trailing newline
fn parse_device(input: &str) -> Result<DeviceId, ControlError> {
    Ok(input.trim().parse::<DeviceId>()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::MemoryBackend;

    fn setup() -> (Arc<MemoryBackend>, ControlSurface) {
        let backend = Arc::new(MemoryBackend::new());
        let registry = Arc::new(DeviceTriggerRegistry::new(backend.clone()));
        (backend, ControlSurface::new(registry))
    }

    #[test]
    fn test_list_format() {
        let (_backend, surface) = setup();
        assert_eq!(surface.list(), "");

        surface.register("8:0\n").unwrap();
        surface.register("8:16").unwrap();
        assert_eq!(surface.list(), "8:0\n8:16\n");
    }

    #[test]
    fn test_duplicate_register_is_silent() {
        let (backend, surface) = setup();
        surface.register("8:0").unwrap();
        surface.register("8:0").unwrap();

        assert_eq!(surface.list(), "8:0\n");
        assert_eq!(backend.len(), 1);
    }

    #[test]
    fn test_unregister_unknown_is_silent() {
        let (_backend, surface) = setup();
        surface.register("8:0").unwrap();
        surface.unregister("9:9").unwrap();
        surface.unregister("8:0").unwrap();
        assert_eq!(surface.list(), "");
    }

    #[test]
    fn test_malformed_input_never_reaches_registry() {
        let (backend, surface) = setup();
        for bad in ["", "sda", "8", "8:x", "8:0:0", "-8:0"] {
            assert!(surface.register(bad).is_err(), "{:?} accepted", bad);
        }
        assert!(matches!(
            surface.trigger("8.0"),
            Err(ControlError::InvalidDevice(_))
        ));
        assert!(backend.is_empty());
    }

    #[test]
    fn test_trigger_fires_registered_device() {
        let (backend, surface) = setup();
        surface.register("8:0").unwrap();

        surface.trigger("8:0\n").unwrap();
        surface.trigger("9:0").unwrap();

        assert_eq!(backend.fire_count("dev-8:0"), Some(1));
        let snapshot = backend.snapshot();
        assert_eq!(
            snapshot[0].last_blink,
            Some((
                std::time::Duration::from_millis(30),
                std::time::Duration::from_millis(30),
                false
            ))
        );
    }

    #[test]
    fn test_execute_dispatches_commands() {
        let (backend, surface) = setup();

        assert_eq!(surface.execute("register 8:0").unwrap(), "");
        assert_eq!(surface.execute("register 8:16").unwrap(), "");
        assert_eq!(surface.execute("list").unwrap(), "8:0\n8:16\n");

        surface.execute("trigger 8:16").unwrap();
        assert_eq!(backend.fire_count("dev-8:16"), Some(1));

        surface.execute("unregister 8:0").unwrap();
        assert_eq!(surface.execute("list").unwrap(), "8:16\n");

        surface.execute("clear").unwrap();
        assert_eq!(surface.execute("list").unwrap(), "");
        assert!(backend.is_empty());
    }

    #[test]
    fn test_execute_rejects_unknown_command() {
        let (_backend, surface) = setup();
        assert!(matches!(
            surface.execute("blink 8:0"),
            Err(ControlError::UnknownCommand(_))
        ));
    }
}
