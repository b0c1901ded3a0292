// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.
// https://github.com/bad-antics/sensorkit-rs

//! In-memory capability provider for demo/testing

use std::collections::HashMap;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use super::{CapabilityProvider, ListenerHandle, RawEvent, RawEventCallback, SensorHandle};
use crate::core::{CallbackTable, NativeError, Operation, Property};
use crate::sensors::{SensorAttribute, SensorType};

/// Static description of one simulated device sensor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulatedSensor {
    pub name: String,
    pub vendor: String,
    pub min_range: f32,
    pub max_range: f32,
    pub resolution: f32,
    pub min_interval: i32,
    pub fifo_count: i32,
    pub max_batch_count: i32,
}

impl SimulatedSensor {
    pub fn new(name: &str, vendor: &str) -> Self {
        Self {
            name: name.to_string(),
            vendor: vendor.to_string(),
            min_range: 0.0,
            max_range: 1.0,
            resolution: 1.0,
            min_interval: 10,
            fifo_count: 0,
            max_batch_count: 0,
        }
    }
}

/// Every call the provider has received, in order
#[derive(Debug, Clone, PartialEq)]
pub enum ProviderCall {
    SensorList(SensorType),
    IsSensorSupported(SensorType),
    CreateListener(SensorHandle),
    DestroyListener(ListenerHandle),
    StartListener(ListenerHandle),
    StopListener(ListenerHandle),
    SetEventCallback(ListenerHandle, u32),
    UnsetEventCallback(ListenerHandle),
    SetAttribute(ListenerHandle, SensorAttribute, i32),
    SetInterval(ListenerHandle, u32),
    SetMaxBatchLatency(ListenerHandle, u32),
    GetProperty(SensorHandle, Property),
}

#[derive(Debug)]
struct ListenerState {
    sensor: SensorHandle,
    started: bool,
    interval: u32,
    max_batch_latency: u32,
    attributes: HashMap<SensorAttribute, i32>,
}

#[derive(Default)]
struct Inner {
    sensors: HashMap<SensorHandle, SimulatedSensor>,
    by_code: HashMap<i32, Vec<SensorHandle>>,
    features: HashMap<String, bool>,
    listeners: HashMap<ListenerHandle, ListenerState>,
    calls: Vec<ProviderCall>,
    operation_faults: HashMap<Operation, NativeError>,
    property_faults: HashMap<Property, NativeError>,
    null_listeners: bool,
    next_handle: u64,
}

impl Inner {
    fn allocate(&mut self) -> u64 {
        self.next_handle += 1;
        self.next_handle
    }

    fn fault(&self, operation: Operation) -> Result<(), NativeError> {
        match self.operation_faults.get(&operation) {
            Some(code) => Err(*code),
            None => Ok(()),
        }
    }

    fn listener_mut(&mut self, listener: ListenerHandle) -> Result<&mut ListenerState, NativeError> {
        self.listeners
            .get_mut(&listener)
            .ok_or(NativeError::InvalidParameter)
    }

    fn property<T>(
        &mut self,
        sensor: SensorHandle,
        property: Property,
        read: impl FnOnce(&SimulatedSensor) -> T,
    ) -> Result<T, NativeError> {
        self.calls.push(ProviderCall::GetProperty(sensor, property));
        if let Some(code) = self.property_faults.get(&property) {
            return Err(*code);
        }
        self.sensors
            .get(&sensor)
            .map(read)
            .ok_or(NativeError::InvalidParameter)
    }
}

/// Device backend kept entirely in memory.
///
/// Sensors are indexed by native type code, so classes that share a code
/// (the activity detectors) enumerate the same handles. Events are delivered
/// synchronously on the thread that calls [`SimulatedProvider::emit`].
#[derive(Default)]
pub struct SimulatedProvider {
    inner: Mutex<Inner>,
    callbacks: CallbackTable,
}

impl SimulatedProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a sensor of `sensor_type` and return its handle
    pub fn add_sensor(&self, sensor_type: SensorType, sensor: SimulatedSensor) -> SensorHandle {
        let mut inner = self.inner.lock();
        let handle = SensorHandle(inner.allocate());
        debug!("Simulated sensor {:?} added as {:?}", sensor.name, handle);
        inner.sensors.insert(handle, sensor);
        inner
            .by_code
            .entry(sensor_type.native_code())
            .or_default()
            .push(handle);
        handle
    }

    pub fn set_feature(&self, key: &str, supported: bool) {
        self.inner.lock().features.insert(key.to_string(), supported);
    }

    /// Make every later call of `operation` fail with `code`
    pub fn fail_operation(&self, operation: Operation, code: NativeError) {
        self.inner.lock().operation_faults.insert(operation, code);
    }

    /// Make every later fetch of `property` fail with `code`
    pub fn fail_property(&self, property: Property, code: NativeError) {
        self.inner.lock().property_faults.insert(property, code);
    }

    /// Hand out null listener handles from `create_listener`
    pub fn return_null_listeners(&self, enabled: bool) {
        self.inner.lock().null_listeners = enabled;
    }

    pub fn clear_faults(&self) {
        let mut inner = self.inner.lock();
        inner.operation_faults.clear();
        inner.property_faults.clear();
        inner.null_listeners = false;
    }

    pub fn calls(&self) -> Vec<ProviderCall> {
        self.inner.lock().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.inner.lock().calls.clear();
    }

    pub fn count_calls(&self, predicate: impl Fn(&ProviderCall) -> bool) -> usize {
        self.inner.lock().calls.iter().filter(|call| predicate(call)).count()
    }

    /// Listeners created and not yet destroyed
    pub fn live_listeners(&self) -> Vec<ListenerHandle> {
        let mut listeners: Vec<_> = self.inner.lock().listeners.keys().copied().collect();
        listeners.sort_by_key(|l| l.0);
        listeners
    }

    pub fn is_started(&self, listener: ListenerHandle) -> bool {
        self.inner
            .lock()
            .listeners
            .get(&listener)
            .map(|state| state.started)
            .unwrap_or(false)
    }

    pub fn attribute(&self, listener: ListenerHandle, attribute: SensorAttribute) -> Option<i32> {
        self.inner
            .lock()
            .listeners
            .get(&listener)
            .and_then(|state| state.attributes.get(&attribute).copied())
    }

    pub fn interval(&self, listener: ListenerHandle) -> Option<u32> {
        self.inner.lock().listeners.get(&listener).map(|s| s.interval)
    }

    pub fn max_batch_latency(&self, listener: ListenerHandle) -> Option<u32> {
        self.inner
            .lock()
            .listeners
            .get(&listener)
            .map(|s| s.max_batch_latency)
    }

    pub fn has_callback(&self, listener: ListenerHandle) -> bool {
        self.callbacks.is_registered(listener)
    }

    /// Deliver `event` to one listener. Only started listeners with a bound
    /// callback receive events.
    pub fn emit(&self, listener: ListenerHandle, event: &RawEvent) -> bool {
        if !self.is_started(listener) {
            trace!("Dropping event for idle listener {:?}", listener);
            return false;
        }
        self.callbacks.dispatch(listener, event)
    }

    /// Deliver `event` to every started listener of `sensor`; returns the
    /// number of listeners reached.
    pub fn emit_to_sensor(&self, sensor: SensorHandle, event: &RawEvent) -> usize {
        let targets: Vec<ListenerHandle> = {
            let inner = self.inner.lock();
            let mut targets: Vec<_> = inner
                .listeners
                .iter()
                .filter(|(_, state)| state.sensor == sensor && state.started)
                .map(|(handle, _)| *handle)
                .collect();
            targets.sort_by_key(|l| l.0);
            targets
        };

        targets
            .into_iter()
            .filter(|listener| self.callbacks.dispatch(*listener, event))
            .count()
    }
}

impl CapabilityProvider for SimulatedProvider {
    fn sensor_list(&self, sensor_type: SensorType) -> Result<Vec<SensorHandle>, NativeError> {
        let mut inner = self.inner.lock();
        inner.calls.push(ProviderCall::SensorList(sensor_type));
        inner.fault(Operation::SensorList)?;
        match inner.by_code.get(&sensor_type.native_code()) {
            Some(handles) if !handles.is_empty() => Ok(handles.clone()),
            _ => Err(NativeError::NotSupported),
        }
    }

    fn is_sensor_supported(&self, sensor_type: SensorType) -> Result<bool, NativeError> {
        let mut inner = self.inner.lock();
        inner.calls.push(ProviderCall::IsSensorSupported(sensor_type));
        Ok(inner
            .by_code
            .get(&sensor_type.native_code())
            .map(|handles| !handles.is_empty())
            .unwrap_or(false))
    }

    fn feature_flag(&self, key: &str) -> Option<bool> {
        self.inner.lock().features.get(key).copied()
    }

    fn create_listener(&self, sensor: SensorHandle) -> Result<ListenerHandle, NativeError> {
        let mut inner = self.inner.lock();
        inner.calls.push(ProviderCall::CreateListener(sensor));
        inner.fault(Operation::CreateListener)?;
        if !inner.sensors.contains_key(&sensor) {
            return Err(NativeError::InvalidParameter);
        }
        if inner.null_listeners {
            return Ok(ListenerHandle::NULL);
        }

        let listener = ListenerHandle(inner.allocate());
        inner.listeners.insert(
            listener,
            ListenerState {
                sensor,
                started: false,
                interval: 0,
                max_batch_latency: 0,
                attributes: HashMap::new(),
            },
        );
        Ok(listener)
    }

    fn destroy_listener(&self, listener: ListenerHandle) -> Result<(), NativeError> {
        {
            let mut inner = self.inner.lock();
            inner.calls.push(ProviderCall::DestroyListener(listener));
            inner.fault(Operation::DestroyListener)?;
            inner
                .listeners
                .remove(&listener)
                .ok_or(NativeError::InvalidParameter)?;
        }
        self.callbacks.unregister(listener);
        Ok(())
    }

    fn start_listener(&self, listener: ListenerHandle) -> Result<(), NativeError> {
        let mut inner = self.inner.lock();
        inner.calls.push(ProviderCall::StartListener(listener));
        inner.fault(Operation::StartListener)?;
        inner.listener_mut(listener)?.started = true;
        Ok(())
    }

    fn stop_listener(&self, listener: ListenerHandle) -> Result<(), NativeError> {
        let mut inner = self.inner.lock();
        inner.calls.push(ProviderCall::StopListener(listener));
        inner.fault(Operation::StopListener)?;
        inner.listener_mut(listener)?.started = false;
        Ok(())
    }

    fn set_event_callback(
        &self,
        listener: ListenerHandle,
        interval_ms: u32,
        callback: RawEventCallback,
    ) -> Result<(), NativeError> {
        {
            let mut inner = self.inner.lock();
            inner
                .calls
                .push(ProviderCall::SetEventCallback(listener, interval_ms));
            inner.fault(Operation::SetEventCallback)?;
            inner.listener_mut(listener)?.interval = interval_ms;
        }
        self.callbacks.register(listener, callback);
        Ok(())
    }

    fn unset_event_callback(&self, listener: ListenerHandle) -> Result<(), NativeError> {
        {
            let mut inner = self.inner.lock();
            inner.calls.push(ProviderCall::UnsetEventCallback(listener));
            inner.fault(Operation::UnsetEventCallback)?;
            inner.listener_mut(listener)?;
        }
        self.callbacks.unregister(listener);
        Ok(())
    }

    fn set_attribute(
        &self,
        listener: ListenerHandle,
        attribute: SensorAttribute,
        value: i32,
    ) -> Result<(), NativeError> {
        let mut inner = self.inner.lock();
        inner
            .calls
            .push(ProviderCall::SetAttribute(listener, attribute, value));
        inner.fault(Operation::SetAttribute)?;
        inner.listener_mut(listener)?.attributes.insert(attribute, value);
        Ok(())
    }

    fn set_interval(&self, listener: ListenerHandle, interval_ms: u32) -> Result<(), NativeError> {
        let mut inner = self.inner.lock();
        inner.calls.push(ProviderCall::SetInterval(listener, interval_ms));
        inner.fault(Operation::SetInterval)?;
        inner.listener_mut(listener)?.interval = interval_ms;
        Ok(())
    }

    fn set_max_batch_latency(
        &self,
        listener: ListenerHandle,
        latency_ms: u32,
    ) -> Result<(), NativeError> {
        let mut inner = self.inner.lock();
        inner
            .calls
            .push(ProviderCall::SetMaxBatchLatency(listener, latency_ms));
        inner.fault(Operation::SetMaxBatchLatency)?;
        inner.listener_mut(listener)?.max_batch_latency = latency_ms;
        Ok(())
    }

    fn name(&self, sensor: SensorHandle) -> Result<String, NativeError> {
        self.inner
            .lock()
            .property(sensor, Property::Name, |s| s.name.clone())
    }

    fn vendor(&self, sensor: SensorHandle) -> Result<String, NativeError> {
        self.inner
            .lock()
            .property(sensor, Property::Vendor, |s| s.vendor.clone())
    }

    fn min_range(&self, sensor: SensorHandle) -> Result<f32, NativeError> {
        self.inner
            .lock()
            .property(sensor, Property::MinValue, |s| s.min_range)
    }

    fn max_range(&self, sensor: SensorHandle) -> Result<f32, NativeError> {
        self.inner
            .lock()
            .property(sensor, Property::MaxValue, |s| s.max_range)
    }

    fn resolution(&self, sensor: SensorHandle) -> Result<f32, NativeError> {
        self.inner
            .lock()
            .property(sensor, Property::Resolution, |s| s.resolution)
    }

    fn min_interval(&self, sensor: SensorHandle) -> Result<i32, NativeError> {
        self.inner
            .lock()
            .property(sensor, Property::MinInterval, |s| s.min_interval)
    }

    fn fifo_count(&self, sensor: SensorHandle) -> Result<i32, NativeError> {
        self.inner
            .lock()
            .property(sensor, Property::FifoCount, |s| s.fifo_count)
    }

    fn max_batch_count(&self, sensor: SensorHandle) -> Result<i32, NativeError> {
        self.inner
            .lock()
            .property(sensor, Property::MaxBatchCount, |s| s.max_batch_count)
    }
}
