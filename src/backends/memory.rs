//! In-memory indicator backend
//!
//! Keeps a board of named indicators and counts the blinks requested on each
//! one. Useful for running the trigger registry without LED hardware and for
//! inspecting what it fired.

use ledtrig_core::{BackendError, IndicatorBackend, IndicatorHandle};
use log::{debug, trace};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{PoisonError, RwLock};
use std::time::Duration;

/// Per-indicator state. Blink bookkeeping is atomic so concurrent fires only
/// share the board's read lock.
#[derive(Debug)]
struct IndicatorSlot {
    name: String,
    fires: AtomicU64,
    last_delay_on_ms: AtomicU64,
    last_delay_off_ms: AtomicU64,
    last_invert: AtomicBool,
}

impl IndicatorSlot {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            fires: AtomicU64::new(0),
            last_delay_on_ms: AtomicU64::new(0),
            last_delay_off_ms: AtomicU64::new(0),
            last_invert: AtomicBool::new(false),
        }
    }
}

/// Point-in-time view of one indicator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndicatorSnapshot {
    pub handle: IndicatorHandle,
    pub name: String,
    pub fires: u64,
    /// Timing of the most recent blink, `(on, off, invert)`
    pub last_blink: Option<(Duration, Duration, bool)>,
}

/// Indicator backend that keeps everything in process memory
#[derive(Debug, Default)]
pub struct MemoryBackend {
    next_handle: AtomicU64,
    board: RwLock<HashMap<IndicatorHandle, IndicatorSlot>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of currently registered indicators
    pub fn len(&self) -> usize {
        self.board.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Snapshot of all indicators, sorted by name
    pub fn snapshot(&self) -> Vec<IndicatorSnapshot> {
        let board = self.board.read().unwrap_or_else(PoisonError::into_inner);
        let mut indicators: Vec<_> = board
            .iter()
            .map(|(handle, slot)| {
                let fires = slot.fires.load(Ordering::Relaxed);
                IndicatorSnapshot {
                    handle: *handle,
                    name: slot.name.clone(),
                    fires,
                    last_blink: (fires > 0).then(|| {
                        (
                            Duration::from_millis(slot.last_delay_on_ms.load(Ordering::Relaxed)),
                            Duration::from_millis(slot.last_delay_off_ms.load(Ordering::Relaxed)),
                            slot.last_invert.load(Ordering::Relaxed),
                        )
                    }),
                }
            })
            .collect();
        indicators.sort_by(|a, b| a.name.cmp(&b.name));
        indicators
    }

    /// Blink count of the indicator registered under `name`
    pub fn fire_count(&self, name: &str) -> Option<u64> {
        let board = self.board.read().unwrap_or_else(PoisonError::into_inner);
        board
            .values()
            .find(|slot| slot.name == name)
            .map(|slot| slot.fires.load(Ordering::Relaxed))
    }
}

impl IndicatorBackend for MemoryBackend {
    fn register_indicator(&self, name: &str) -> Result<IndicatorHandle, BackendError> {
        let mut board = self.board.write().unwrap_or_else(PoisonError::into_inner);

        // Trigger names are unique, like the kernel trigger list
        if board.values().any(|slot| slot.name == name) {
            return Err(BackendError::NameInUse {
                name: name.to_string(),
            });
        }

        let handle = IndicatorHandle::from_raw(self.next_handle.fetch_add(1, Ordering::Relaxed) + 1);
        board.insert(handle, IndicatorSlot::new(name));
        debug!("Memory backend: registered {} as #{}", name, handle.raw());
        Ok(handle)
    }

    fn unregister_indicator(&self, handle: IndicatorHandle) {
        let mut board = self.board.write().unwrap_or_else(PoisonError::into_inner);
        match board.remove(&handle) {
            Some(slot) => debug!(
                "Memory backend: unregistered {} after {} blinks",
                slot.name,
                slot.fires.load(Ordering::Relaxed)
            ),
            None => debug!("Memory backend: unknown handle {:?}", handle),
        }
    }

    fn fire_oneshot(
        &self,
        handle: IndicatorHandle,
        delay_on: Duration,
        delay_off: Duration,
        invert: bool,
    ) {
        let board = self.board.read().unwrap_or_else(PoisonError::into_inner);
        if let Some(slot) = board.get(&handle) {
            slot.last_delay_on_ms
                .store(saturating_millis(delay_on), Ordering::Relaxed);
            slot.last_delay_off_ms
                .store(saturating_millis(delay_off), Ordering::Relaxed);
            slot.last_invert.store(invert, Ordering::Relaxed);
            slot.fires.fetch_add(1, Ordering::Relaxed);
            trace!("Blink {} on={:?} off={:?} invert={}", slot.name, delay_on, delay_off, invert);
        }
    }
}

fn saturating_millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
