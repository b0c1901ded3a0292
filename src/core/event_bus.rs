// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.
// https://github.com/bad-antics/sensorkit-rs

//! Synchronous fan-out for sensor notifications

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::trace;

use crate::provider::{ListenerHandle, RawEvent, RawEventCallback};

/// Token returned by [`EventHandler::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

type Handler<T> = Arc<dyn Fn(&T) + Send + Sync + 'static>;

/// Ordered list of subscriber closures for one notification type.
///
/// Handlers run on the thread that calls [`EventHandler::invoke`], in the
/// order they were registered.
pub struct EventHandler<T> {
    handlers: RwLock<Vec<(SubscriptionId, Handler<T>)>>,
    next_id: AtomicU64,
}

impl<T> EventHandler<T> {
    pub fn new() -> Self {
        Self {
            handlers: RwLock::new(Vec::new()),
            next_id: AtomicU64::new(0),
        }
    }

    pub fn subscribe<F>(&self, handler: F) -> SubscriptionId
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.handlers.write().push((id, Arc::new(handler)));
        id
    }

    /// Returns `false` if the id was not registered
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut handlers = self.handlers.write();
        let before = handlers.len();
        handlers.retain(|(existing, _)| *existing != id);
        handlers.len() != before
    }

    pub fn len(&self) -> usize {
        self.handlers.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.read().is_empty()
    }

    pub fn clear(&self) {
        self.handlers.write().clear();
    }

    /// Deliver `value` to every subscriber and return how many ran.
    pub fn invoke(&self, value: &T) -> usize {
        // Snapshot so handlers may (un)subscribe while being called.
        let snapshot: Vec<Handler<T>> = self
            .handlers
            .read()
            .iter()
            .map(|(_, handler)| Arc::clone(handler))
            .collect();

        for handler in &snapshot {
            handler(value);
        }
        snapshot.len()
    }
}

impl<T> Default for EventHandler<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Event callbacks registered per listener handle.
///
/// Providers own one of these and call [`CallbackTable::dispatch`] from their
/// delivery thread.
#[derive(Default)]
pub struct CallbackTable {
    entries: RwLock<HashMap<ListenerHandle, RawEventCallback>>,
}

impl CallbackTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `callback` to `listener`, replacing any previous binding
    pub fn register(&self, listener: ListenerHandle, callback: RawEventCallback) {
        self.entries.write().insert(listener, callback);
    }

    pub fn unregister(&self, listener: ListenerHandle) -> bool {
        self.entries.write().remove(&listener).is_some()
    }

    pub fn is_registered(&self, listener: ListenerHandle) -> bool {
        self.entries.read().contains_key(&listener)
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Run the callback bound to `listener`. Returns `false` when none is bound.
    pub fn dispatch(&self, listener: ListenerHandle, event: &RawEvent) -> bool {
        let callback = self.entries.read().get(&listener).cloned();
        match callback {
            Some(callback) => {
                callback(event);
                true
            }
            None => {
                trace!("No callback bound to listener {:?}", listener);
                false
            }
        }
    }
}
