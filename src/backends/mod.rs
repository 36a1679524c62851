//! Built-in indicator backends
//!
//! This module contains implementations of [`ledtrig_core::IndicatorBackend`].
//! Each backend owns the indicators it registers and decides what a blink
//! actually does.

mod memory;

pub use memory::{IndicatorSnapshot, MemoryBackend};
