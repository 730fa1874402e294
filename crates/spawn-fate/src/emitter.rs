// SPDX-License-Identifier: MIT OR Apache-2.0
//! Listener registries backing the handle event surface.
//!
//! Two dispatch shapes cover every event a process handle emits:
//! [`Broadcast`] for repeatable events (output chunks) and [`Latch`] for
//! lifecycle events that fire effectively once and must be replayed to
//! late subscribers.

use std::sync::Mutex;

/// Fan-out dispatch for repeatable events.
///
/// Listeners attached after an emission only observe later emissions.
pub struct Broadcast<T: ?Sized> {
    #[allow(clippy::type_complexity)]
    listeners: Mutex<Vec<Box<dyn FnMut(&T) + Send>>>,
}

impl<T: ?Sized> Broadcast<T> {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            listeners: Mutex::new(Vec::new()),
        }
    }

    /// Register a listener.
    pub fn subscribe(&self, listener: Box<dyn FnMut(&T) + Send>) {
        self.listeners
            .lock()
            .expect("listener lock poisoned")
            .push(listener);
    }

    /// Invoke every listener with `payload`, in subscription order.
    ///
    /// Listeners run under the registry lock and must not re-enter it.
    pub fn emit(&self, payload: &T) {
        let mut listeners = self.listeners.lock().expect("listener lock poisoned");
        for listener in listeners.iter_mut() {
            listener(payload);
        }
    }
}

impl<T: ?Sized> Default for Broadcast<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ?Sized> std::fmt::Debug for Broadcast<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Broadcast").finish_non_exhaustive()
    }
}

/// Sticky dispatch for events that fire effectively once.
///
/// The first payload is retained; a listener subscribed after the fact is
/// invoked immediately with it. Further emissions still reach current
/// listeners but do not replace the retained payload.
pub struct Latch<T: Clone> {
    inner: Mutex<LatchInner<T>>,
}

struct LatchInner<T> {
    fired: Option<T>,
    listeners: Vec<Box<dyn FnMut(T) + Send>>,
}

impl<T: Clone> Latch<T> {
    /// Create an unfired latch with no listeners.
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(LatchInner {
                fired: None,
                listeners: Vec::new(),
            }),
        }
    }

    /// Register a listener, replaying the retained payload if the event
    /// has already fired.
    pub fn subscribe(&self, mut listener: Box<dyn FnMut(T) + Send>) {
        let mut inner = self.inner.lock().expect("latch lock poisoned");
        if let Some(payload) = &inner.fired {
            listener(payload.clone());
        }
        inner.listeners.push(listener);
    }

    /// Invoke every listener with `payload`, in subscription order.
    ///
    /// Listeners run under the registry lock and must not re-enter it.
    pub fn emit(&self, payload: T) {
        let mut inner = self.inner.lock().expect("latch lock poisoned");
        if inner.fired.is_none() {
            inner.fired = Some(payload.clone());
        }
        for listener in inner.listeners.iter_mut() {
            listener(payload.clone());
        }
    }

    /// `true` once the event has fired at least once.
    pub fn has_fired(&self) -> bool {
        self.inner
            .lock()
            .expect("latch lock poisoned")
            .fired
            .is_some()
    }
}

impl<T: Clone> Default for Latch<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> std::fmt::Debug for Latch<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Latch")
            .field("fired", &self.has_fired())
            .finish_non_exhaustive()
    }
}
