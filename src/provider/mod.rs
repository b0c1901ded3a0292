// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.
// https://github.com/bad-antics/sensorkit-rs

//! Capability provider - the native sensor backend surface

mod simulator;

pub use simulator::{ProviderCall, SimulatedProvider, SimulatedSensor};

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::core::NativeError;
use crate::sensors::{SensorAttribute, SensorType};

/// Number of value slots in a native event buffer
pub const MAX_EVENT_VALUES: usize = 16;

/// Opaque identifier of a discovered sensor. Zero is the null handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SensorHandle(pub u64);

impl SensorHandle {
    pub const NULL: SensorHandle = SensorHandle(0);

    pub fn is_null(self) -> bool {
        self.0 == 0
    }
}

/// Opaque identifier of a listener bound to one sensor. Zero is the null handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ListenerHandle(pub u64);

impl ListenerHandle {
    pub const NULL: ListenerHandle = ListenerHandle(0);

    pub fn is_null(self) -> bool {
        self.0 == 0
    }
}

/// One raw event as delivered by the backend
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawEvent {
    /// Hardware timestamp in microseconds
    pub timestamp: i64,
    pub accuracy: i32,
    pub value_count: usize,
    pub values: [f32; MAX_EVENT_VALUES],
}

impl RawEvent {
    /// Build an event; values beyond [`MAX_EVENT_VALUES`] are dropped.
    pub fn new(timestamp: i64, accuracy: i32, values: &[f32]) -> Self {
        let value_count = values.len().min(MAX_EVENT_VALUES);
        let mut buffer = [0.0; MAX_EVENT_VALUES];
        buffer[..value_count].copy_from_slice(&values[..value_count]);
        Self {
            timestamp,
            accuracy,
            value_count,
            values: buffer,
        }
    }

    pub fn values(&self) -> &[f32] {
        &self.values[..self.value_count]
    }
}

/// Callback bound to a listener; called on the provider's delivery thread
pub type RawEventCallback = Arc<dyn Fn(&RawEvent) + Send + Sync + 'static>;

/// Narrow interface over the native sensor backend.
///
/// Every call is synchronous. Implementations deliver events by invoking the
/// callback registered through [`CapabilityProvider::set_event_callback`].
pub trait CapabilityProvider: Send + Sync {
    /// Enumerate every sensor of the given class
    fn sensor_list(&self, sensor_type: SensorType) -> Result<Vec<SensorHandle>, NativeError>;

    /// Whether the backend supports the sensor class at all
    fn is_sensor_supported(&self, sensor_type: SensorType) -> Result<bool, NativeError>;

    /// Platform feature query. `None` when the key is unknown.
    fn feature_flag(&self, key: &str) -> Option<bool>;

    fn create_listener(&self, sensor: SensorHandle) -> Result<ListenerHandle, NativeError>;
    fn destroy_listener(&self, listener: ListenerHandle) -> Result<(), NativeError>;
    fn start_listener(&self, listener: ListenerHandle) -> Result<(), NativeError>;
    fn stop_listener(&self, listener: ListenerHandle) -> Result<(), NativeError>;

    /// Bind the event callback, delivering at `interval_ms`
    fn set_event_callback(
        &self,
        listener: ListenerHandle,
        interval_ms: u32,
        callback: RawEventCallback,
    ) -> Result<(), NativeError>;
    fn unset_event_callback(&self, listener: ListenerHandle) -> Result<(), NativeError>;

    fn set_attribute(
        &self,
        listener: ListenerHandle,
        attribute: SensorAttribute,
        value: i32,
    ) -> Result<(), NativeError>;
    fn set_interval(&self, listener: ListenerHandle, interval_ms: u32) -> Result<(), NativeError>;
    fn set_max_batch_latency(
        &self,
        listener: ListenerHandle,
        latency_ms: u32,
    ) -> Result<(), NativeError>;

    // Descriptor
    fn name(&self, sensor: SensorHandle) -> Result<String, NativeError>;
    fn vendor(&self, sensor: SensorHandle) -> Result<String, NativeError>;
    fn min_range(&self, sensor: SensorHandle) -> Result<f32, NativeError>;
    fn max_range(&self, sensor: SensorHandle) -> Result<f32, NativeError>;
    fn resolution(&self, sensor: SensorHandle) -> Result<f32, NativeError>;
    fn min_interval(&self, sensor: SensorHandle) -> Result<i32, NativeError>;
    fn fifo_count(&self, sensor: SensorHandle) -> Result<i32, NativeError>;
    fn max_batch_count(&self, sensor: SensorHandle) -> Result<i32, NativeError>;
}
