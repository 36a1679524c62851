//! Device identifiers

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Number of minor bits in the kernel-internal packed device number
pub const MINOR_BITS: u32 = 20;

const MINOR_MASK: u32 = (1 << MINOR_BITS) - 1;
const MAJOR_MAX: u32 = u32::MAX >> MINOR_BITS;

/// `<major>:<minor>`, both unsigned decimal integers and nothing else
static DEVICE_ID_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([0-9]+):([0-9]+)$").expect("device id pattern is valid"));

/// Identifies a device by its major (class) and minor (instance) numbers.
///
/// This is the registry key. Its text form is `major:minor`, which is also
/// how it is serialized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DeviceId {
    pub major: u32,
    pub minor: u32,
}

impl DeviceId {
    pub const fn new(major: u32, minor: u32) -> Self {
        Self { major, minor }
    }

    /// Decode a kernel-internal packed device number (`MKDEV` layout).
    pub const fn from_kdev(dev: u32) -> Self {
        Self {
            major: dev >> MINOR_BITS,
            minor: dev & MINOR_MASK,
        }
    }

    /// Pack into the kernel-internal layout.
    ///
    /// Returns `None` when either half does not fit (12 major bits,
    /// 20 minor bits).
    pub fn to_kdev(self) -> Option<u32> {
        if self.major > MAJOR_MAX || self.minor > MINOR_MASK {
            return None;
        }
        Some((self.major << MINOR_BITS) | self.minor)
    }
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.major, self.minor)
    }
}

/// Error returned when text is not a valid `major:minor` pair
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseDeviceIdError {
    #[error("expected <major>:<minor>, got {input:?}")]
    Format { input: String },

    #[error("device number out of range in {input:?}")]
    OutOfRange { input: String },
}

impl FromStr for DeviceId {
    type Err = ParseDeviceIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let caps = DEVICE_ID_RE
            .captures(s)
            .ok_or_else(|| ParseDeviceIdError::Format {
                input: s.to_string(),
            })?;

        // Digits only, so the sole failure left is overflow
        let number = |idx: usize| {
            caps[idx]
                .parse::<u32>()
                .map_err(|_| ParseDeviceIdError::OutOfRange {
                    input: s.to_string(),
                })
        };

        Ok(Self {
            major: number(1)?,
            minor: number(2)?,
        })
    }
}

impl Serialize for DeviceId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for DeviceId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}
