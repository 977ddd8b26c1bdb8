use std::{
    collections::HashSet,
    sync::{Arc, Mutex, MutexGuard},
};

use super::{Geometry, Handle, RenderBackend};
use crate::style::Style;

/// One call received by a [`RecordingBackend`].
#[derive(Debug, Clone, PartialEq)]
pub enum BackendCall {
    /// A node started rendering.
    Attach(Handle, Geometry, Style),
    /// A drawn node changed.
    Update(Handle, Geometry, Style),
    /// A node stopped rendering.
    Detach(Handle),
}

/// Shared state behind a [`RecordingBackend`].
#[derive(Debug, Default)]
struct Recorded {
    /// Every call, in order.
    calls: Vec<BackendCall>,
    /// Handles that are attached and not yet detached.
    live: HashSet<Handle>,
    /// Detach calls for handles that were not live.
    stray_detaches: usize,
}

/// Read access to what a [`RecordingBackend`] has seen. Clones share state.
#[derive(Debug, Clone, Default)]
pub struct BackendLog {
    /// Shared recording.
    inner: Arc<Mutex<Recorded>>,
}

impl BackendLog {
    /// Lock the recording. A poisoned lock still yields the data.
    fn lock(&self) -> MutexGuard<'_, Recorded> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// A copy of every call so far.
    pub fn calls(&self) -> Vec<BackendCall> {
        self.lock().calls.clone()
    }

    /// Number of handles currently attached.
    pub fn live(&self) -> usize {
        self.lock().live.len()
    }

    /// Is this handle currently attached?
    pub fn is_live(&self, handle: Handle) -> bool {
        self.lock().live.contains(&handle)
    }

    /// Detach calls that named a handle which was not attached.
    pub fn stray_detaches(&self) -> usize {
        self.lock().stray_detaches
    }

    /// The most recent style sent for a handle.
    pub fn last_style(&self, handle: Handle) -> Option<Style> {
        self.lock().calls.iter().rev().find_map(|c| match c {
            BackendCall::Attach(h, _, s) | BackendCall::Update(h, _, s) if *h == handle => {
                Some(s.clone())
            }
            _ => None,
        })
    }

    /// Forget recorded calls, keeping the live set.
    pub fn clear(&self) {
        self.lock().calls.clear();
    }
}

/// A backend that draws nothing and records every call.
#[derive(Debug, Default)]
pub struct RecordingBackend {
    /// Shared recording.
    log: BackendLog,
    /// Next handle to issue.
    next: u64,
}

impl RecordingBackend {
    /// Create a backend and a log handle that observes it.
    pub fn new() -> (Self, BackendLog) {
        let backend = Self::default();
        let log = backend.log.clone();
        (backend, log)
    }
}

impl RenderBackend for RecordingBackend {
    fn attach(&mut self, geometry: Geometry, style: &Style) -> Handle {
        self.next += 1;
        let handle = Handle(self.next);
        let mut rec = self.log.lock();
        rec.live.insert(handle);
        rec.calls
            .push(BackendCall::Attach(handle, geometry, style.clone()));
        handle
    }

    fn update(&mut self, handle: Handle, geometry: Geometry, style: &Style) {
        self.log
            .lock()
            .calls
            .push(BackendCall::Update(handle, geometry, style.clone()));
    }

    fn detach(&mut self, handle: Handle) {
        let mut rec = self.log.lock();
        if !rec.live.remove(&handle) {
            rec.stray_detaches += 1;
        }
        rec.calls.push(BackendCall::Detach(handle));
    }
}
