//! Shared constants for device triggers

/// Size of the trigger name buffer, terminator included.
/// Names are cut to `MAX_NAME_LEN - 1` characters.
pub const MAX_NAME_LEN: usize = 20;

/// Prefix of every device trigger name (`dev-<major>:<minor>`)
pub const TRIGGER_NAME_PREFIX: &str = "dev-";
