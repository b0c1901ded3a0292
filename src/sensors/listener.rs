// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.
// https://github.com/bad-antics/sensorkit-rs

//! Owned listener handle

use std::sync::Arc;

use tracing::{debug, error, warn};

use super::SensorAttribute;
use crate::core::{NativeError, Operation, Result, SensorError};
use crate::provider::{CapabilityProvider, ListenerHandle, RawEventCallback, SensorHandle};

/// A live listener. The provider-side listener is destroyed exactly once,
/// when this value is dropped.
pub struct Listener {
    provider: Arc<dyn CapabilityProvider>,
    handle: ListenerHandle,
}

impl Listener {
    pub(crate) fn create(provider: Arc<dyn CapabilityProvider>, sensor: SensorHandle) -> Result<Self> {
        let handle = provider.create_listener(sensor).map_err(|code| {
            error!("Error creating sensor listener handle: {}", code);
            SensorError::from_native(Operation::CreateListener, code)
        })?;

        if handle.is_null() {
            error!("Sensor listener handle is null");
            return Err(SensorError::InvalidHandle("listener"));
        }

        debug!("Created listener {:?} for {:?}", handle, sensor);
        Ok(Self { provider, handle })
    }

    pub fn handle(&self) -> ListenerHandle {
        self.handle
    }

    pub fn set_attribute(&self, attribute: SensorAttribute, value: i32) -> Result<()> {
        let operation = match attribute {
            SensorAttribute::PausePolicy => Operation::SetPausePolicy,
            _ => Operation::SetAttribute,
        };
        self.call(operation, |p, l| p.set_attribute(l, attribute, value))
    }

    pub(crate) fn start(&self) -> Result<()> {
        self.call(Operation::StartListener, |p, l| p.start_listener(l))
    }

    pub(crate) fn stop(&self) -> Result<()> {
        self.call(Operation::StopListener, |p, l| p.stop_listener(l))
    }

    pub(crate) fn set_interval(&self, interval_ms: u32) -> Result<()> {
        self.call(Operation::SetInterval, |p, l| p.set_interval(l, interval_ms))
    }

    pub(crate) fn set_max_batch_latency(&self, latency_ms: u32) -> Result<()> {
        self.call(Operation::SetMaxBatchLatency, |p, l| {
            p.set_max_batch_latency(l, latency_ms)
        })
    }

    pub(crate) fn bind(&self, interval_ms: u32, callback: RawEventCallback) -> Result<()> {
        self.call(Operation::SetEventCallback, |p, l| {
            p.set_event_callback(l, interval_ms, callback)
        })
    }

    pub(crate) fn unbind(&self) -> Result<()> {
        self.call(Operation::UnsetEventCallback, |p, l| p.unset_event_callback(l))
    }

    fn call<F>(&self, operation: Operation, f: F) -> Result<()>
    where
        F: FnOnce(&dyn CapabilityProvider, ListenerHandle) -> std::result::Result<(), NativeError>,
    {
        f(&*self.provider, self.handle).map_err(|code| {
            error!("{} failed on {:?}: {}", operation, self.handle, code);
            SensorError::from_native(operation, code)
        })
    }
}

impl Drop for Listener {
    fn drop(&mut self) {
        match self.provider.destroy_listener(self.handle) {
            Ok(()) => debug!("Destroyed listener {:?}", self.handle),
            Err(code) => warn!("Error destroying listener {:?}: {}", self.handle, code),
        }
    }
}

impl std::fmt::Debug for Listener {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Listener").field("handle", &self.handle).finish()
    }
}
