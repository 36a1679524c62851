//! Registry error types

use crate::backend::BackendError;
use ledtrig_types::DeviceId;
use thiserror::Error;

/// Outcome of a registry mutation that did not change anything.
///
/// None of these leave the registry in a different state than before the
/// call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("device {0} is already registered")]
    DuplicateDevice(DeviceId),

    #[error("device {0} is not registered")]
    NotFound(DeviceId),

    #[error("failed to register indicator for device {device}: {source}")]
    BackendRegistration {
        device: DeviceId,
        #[source]
        source: BackendError,
    },
}
