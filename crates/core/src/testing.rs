//! Recording backend for unit tests

use crate::backend::{BackendError, IndicatorBackend, IndicatorHandle};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::mpsc::{Receiver, Sender};
use std::sync::Mutex;
use std::time::Duration;

/// One recorded `fire_oneshot` call
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Fire {
    pub handle: IndicatorHandle,
    pub delay_on: Duration,
    pub delay_off: Duration,
    pub invert: bool,
}

#[derive(Default)]
struct Calls {
    live: HashMap<IndicatorHandle, String>,
    registered: Vec<IndicatorHandle>,
    unregistered: Vec<IndicatorHandle>,
    fires: Vec<Fire>,
}

/// Parks the next gated call until released
struct Gate {
    entered: Sender<()>,
    release: Receiver<()>,
}

/// Backend that records every call and can be told to misbehave
#[derive(Default)]
pub(crate) struct RecordingBackend {
    next_handle: AtomicU64,
    fail_register: AtomicBool,
    calls: Mutex<Calls>,
    register_gate: Mutex<Option<Gate>>,
    unregister_gate: Mutex<Option<Gate>>,
}

impl Gate {
    fn pass(slot: &Mutex<Option<Gate>>) {
        let gate = slot.lock().unwrap().take();
        if let Some(gate) = gate {
            let _ = gate.entered.send(());
            let _ = gate.release.recv();
        }
    }
}

impl RecordingBackend {
    pub fn fail_registrations(&self, fail: bool) {
        self.fail_register.store(fail, Ordering::SeqCst);
    }

    /// Block the next unregister: `entered` is signalled once the call is
    /// inside the backend, which then waits on `release`.
    pub fn block_next_unregister(&self, entered: Sender<()>, release: Receiver<()>) {
        *self.unregister_gate.lock().unwrap() = Some(Gate { entered, release });
    }

    /// Block the next successful register after its name has been taken,
    /// before the handle is returned.
    pub fn block_next_register(&self, entered: Sender<()>, release: Receiver<()>) {
        *self.register_gate.lock().unwrap() = Some(Gate { entered, release });
    }

    pub fn live_count(&self) -> usize {
        self.calls.lock().unwrap().live.len()
    }

    pub fn live_names(&self) -> Vec<String> {
        let mut names: Vec<_> = self.calls.lock().unwrap().live.values().cloned().collect();
        names.sort();
        names
    }

    pub fn registered(&self) -> Vec<IndicatorHandle> {
        self.calls.lock().unwrap().registered.clone()
    }

    pub fn total_registers(&self) -> usize {
        self.calls.lock().unwrap().registered.len()
    }

    pub fn total_unregisters(&self) -> usize {
        self.calls.lock().unwrap().unregistered.len()
    }

    pub fn unregister_count(&self, handle: IndicatorHandle) -> usize {
        self.calls
            .lock()
            .unwrap()
            .unregistered
            .iter()
            .filter(|h| **h == handle)
            .count()
    }

    pub fn fires(&self) -> Vec<Fire> {
        self.calls.lock().unwrap().fires.clone()
    }

    pub fn fire_count(&self) -> usize {
        self.calls.lock().unwrap().fires.len()
    }
}

impl IndicatorBackend for RecordingBackend {
    fn register_indicator(&self, name: &str) -> Result<IndicatorHandle, BackendError> {
        if self.fail_register.load(Ordering::SeqCst) {
            return Err(BackendError::Unavailable {
                message: "registration disabled".to_string(),
            });
        }

        let handle = {
            let mut calls = self.calls.lock().unwrap();
            if calls.live.values().any(|n| n == name) {
                return Err(BackendError::NameInUse {
                    name: name.to_string(),
                });
            }

            let handle =
                IndicatorHandle::from_raw(self.next_handle.fetch_add(1, Ordering::SeqCst) + 1);
            calls.live.insert(handle, name.to_string());
            calls.registered.push(handle);
            handle
        };

        Gate::pass(&self.register_gate);
        Ok(handle)
    }

    fn unregister_indicator(&self, handle: IndicatorHandle) {
        Gate::pass(&self.unregister_gate);

        let mut calls = self.calls.lock().unwrap();
        calls.live.remove(&handle);
        calls.unregistered.push(handle);
    }

    fn fire_oneshot(
        &self,
        handle: IndicatorHandle,
        delay_on: Duration,
        delay_off: Duration,
        invert: bool,
    ) {
        self.calls.lock().unwrap().fires.push(Fire {
            handle,
            delay_on,
            delay_off,
            invert,
        });
    }
}
