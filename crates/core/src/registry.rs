//! Device trigger registry
//!
//! Maps devices to indicators and fires the matching indicator whenever a
//! device reports activity.
//!
//! Activity signals are frequent and must never stall the caller, so they
//! only *try* to take the shared lock and silently skip the blink while an
//! administrative mutation holds it. Mutations are rare and take the
//! exclusive lock. `add` claims the device under the lock, registers with the
//! backend outside it, then links the entry; unregistration happens while the
//! lock is still held, after the entry has been unlinked.

use crate::backend::SharedBackend;
use crate::error::RegistryError;
use crate::indicator::{trigger_name, Indicator};
use ledtrig_types::{BlinkTiming, DeviceId};
use log::{debug, info};
use std::fmt;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard, TryLockError};

/// A device linked to its indicator. Immutable once linked.
#[derive(Debug)]
struct TriggerEntry {
    device: DeviceId,
    indicator: Indicator,
}

#[derive(Debug, Default)]
struct Entries {
    /// Visible to activity signals, in insertion order
    linked: Vec<TriggerEntry>,
    /// Claimed by an `add` that is still registering with the backend
    pending: Vec<DeviceId>,
}

impl Entries {
    fn find(&self, device: DeviceId) -> Option<&TriggerEntry> {
        self.linked.iter().find(|e| e.device == device)
    }

    fn is_claimed(&self, device: DeviceId) -> bool {
        self.find(device).is_some() || self.pending.contains(&device)
    }

    fn release_claim(&mut self, device: DeviceId) {
        self.pending.retain(|d| *d != device);
    }
}

/// Registry of per-device activity triggers
///
/// Entries are kept in insertion order and looked up by linear scan; the
/// registry is expected to hold a handful of devices.
pub struct DeviceTriggerRegistry {
    backend: SharedBackend,
    timing: BlinkTiming,
    entries: RwLock<Entries>,
}

impl DeviceTriggerRegistry {
    /// Create an empty registry firing with the default 30ms/30ms blink
    pub fn new(backend: SharedBackend) -> Self {
        Self::with_timing(backend, BlinkTiming::default())
    }

    /// Create an empty registry with a custom blink timing
    pub fn with_timing(backend: SharedBackend, timing: BlinkTiming) -> Self {
        Self {
            backend,
            timing,
            entries: RwLock::new(Entries::default()),
        }
    }

    pub fn timing(&self) -> BlinkTiming {
        self.timing
    }

    /// Signal activity on `device`.
    ///
    /// Fires the device's indicator once. Returns immediately without firing
    /// when the device is unknown or when a writer currently holds the lock.
    /// Never blocks and never allocates.
    pub fn signal_activity(&self, device: DeviceId) {
        let entries = match self.entries.try_read() {
            Ok(guard) => guard,
            Err(TryLockError::Poisoned(poisoned)) => poisoned.into_inner(),
            Err(TryLockError::WouldBlock) => return,
        };

        if let Some(entry) = entries.find(device) {
            entry.indicator.fire(&self.timing);
        }
    }

    /// Signal activity on a device given as a kernel packed device number
    pub fn signal_kdev(&self, dev: u32) {
        self.signal_activity(DeviceId::from_kdev(dev));
    }

    /// Add a trigger for `device`.
    ///
    /// The trigger is registered with the backend as `dev-<major>:<minor>`
    /// before it becomes visible to activity signals. If the backend refuses
    /// the registration nothing is linked. A device that is linked, or that
    /// another `add` is still registering, is reported as a duplicate and
    /// never reaches the backend.
    pub fn add(&self, device: DeviceId) -> Result<(), RegistryError> {
        // Phase 1: Claim the device under the exclusive lock
        let claim = match self.claim(device) {
            Some(claim) => claim,
            None => {
                info!("Device {} already registered", device);
                return Err(RegistryError::DuplicateDevice(device));
            }
        };

        // Phase 2: Register with the backend OUTSIDE the lock
        // On failure the claim is released when it drops
        let name = trigger_name(device);
        let indicator = Indicator::register(&self.backend, name)
            .map_err(|source| RegistryError::BackendRegistration { device, source })?;

        // Phase 3: Link under the exclusive lock
        debug!("Linked trigger {} for device {}", indicator.name(), device);
        claim.link(indicator);
        Ok(())
    }

    /// Remove the trigger for `device` and release its indicator
    pub fn remove(&self, device: DeviceId) -> Result<(), RegistryError> {
        let mut entries = self.write_entries();
        let position = entries
            .linked
            .iter()
            .position(|e| e.device == device)
            .ok_or(RegistryError::NotFound(device))?;

        let entry = entries.linked.remove(position);
        // Unregister while readers are still excluded
        drop(entry);
        drop(entries);

        debug!("Removed trigger for device {}", device);
        Ok(())
    }

    /// Remove every trigger, releasing each indicator exactly once.
    ///
    /// Returns the number of triggers removed. Safe to call on an empty
    /// registry. An `add` still registering with the backend is not
    /// affected and links its entry afterwards.
    pub fn remove_all(&self) -> usize {
        let mut entries = self.write_entries();
        let count = entries.linked.len();
        for entry in entries.linked.drain(..) {
            debug!("Removing trigger for device {}", entry.device);
        }
        drop(entries);

        if count > 0 {
            info!("Removed {} device triggers", count);
        }
        count
    }

    /// Snapshot of registered devices in insertion order
    pub fn list(&self) -> Vec<DeviceId> {
        self.read_entries().linked.iter().map(|e| e.device).collect()
    }

    pub fn contains(&self, device: DeviceId) -> bool {
        self.read_entries().find(device).is_some()
    }

    pub fn len(&self) -> usize {
        self.read_entries().linked.len()
    }

    pub fn is_empty(&self) -> bool {
        self.read_entries().linked.is_empty()
    }

    fn claim(&self, device: DeviceId) -> Option<PendingClaim<'_>> {
        let mut entries = self.write_entries();
        if entries.is_claimed(device) {
            return None;
        }
        entries.pending.push(device);
        Some(PendingClaim {
            registry: self,
            device,
            linked: false,
        })
    }

    // A panicking backend poisons the lock; the entry list itself is still
    // consistent, so keep going with it.
    fn read_entries(&self) -> RwLockReadGuard<'_, Entries> {
        self.entries.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_entries(&self) -> RwLockWriteGuard<'_, Entries> {
        self.entries.write().unwrap_or_else(PoisonError::into_inner)
    }
}

/// A device reserved by an in-flight `add`. Released on drop unless linked.
struct PendingClaim<'a> {
    registry: &'a DeviceTriggerRegistry,
    device: DeviceId,
    linked: bool,
}

impl PendingClaim<'_> {
    fn link(mut self, indicator: Indicator) {
        let mut entries = self.registry.write_entries();
        entries.release_claim(self.device);
        entries.linked.push(TriggerEntry {
            device: self.device,
            indicator,
        });
        self.linked = true;
    }
}

impl Drop for PendingClaim<'_> {
    fn drop(&mut self) {
        if !self.linked {
            self.registry.write_entries().release_claim(self.device);
        }
    }
}

impl fmt::Debug for DeviceTriggerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeviceTriggerRegistry")
            .field("timing", &self.timing)
            .field("devices", &self.list())
            .finish()
    }
}
