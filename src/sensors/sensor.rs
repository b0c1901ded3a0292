// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.
// https://github.com/bad-antics/sensorkit-rs

//! Sensor lifecycle: discovery, listener ownership, configuration and dispatch

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tracing::{debug, error, info, warn};

use super::{
    Listener, SensingState, SensorAttribute, SensorDataAccuracy, SensorDataUpdated,
    SensorDescriptor, SensorEvent, SensorKind, SensorPausePolicy, SensorType,
};
use crate::core::{
    EventHandler, NativeError, Operation, Property, Result, SensorError, SubscriptionId,
};
use crate::provider::{CapabilityProvider, ListenerHandle, RawEvent, RawEventCallback, SensorHandle};

struct EventCache<R> {
    time_span: Duration,
    accuracy: SensorDataAccuracy,
    latest: Option<R>,
}

/// State touched from the provider's delivery thread
struct Shared<R> {
    cache: Mutex<EventCache<R>>,
    raw_updated: EventHandler<SensorEvent>,
    data_updated: EventHandler<SensorDataUpdated<R>>,
}

/// One sensor of class `K` and its listener.
///
/// Construction either yields a fully initialised sensor or an error with the
/// listener already released. Lifecycle methods take `&mut self`, so a single
/// owner drives each instance; events arrive on whatever thread the provider
/// delivers them on.
pub struct Sensor<K: SensorKind> {
    kind: Arc<K>,
    provider: Arc<dyn CapabilityProvider>,
    index: u32,
    handle: SensorHandle,
    listener: Option<Listener>,
    descriptor: SensorDescriptor,
    interval: u32,
    max_batch_latency: u32,
    pause_policy: SensorPausePolicy,
    state: SensingState,
    shared: Arc<Shared<K::Reading>>,
}

impl<K: SensorKind> Sensor<K> {
    /// Open the `index`-th sensor of class `K`
    pub fn new(provider: Arc<dyn CapabilityProvider>, index: u32) -> Result<Self> {
        Self::with_kind(provider, index, K::default())
    }

    pub fn with_kind(provider: Arc<dyn CapabilityProvider>, index: u32, kind: K) -> Result<Self> {
        let sensor_type = K::SENSOR_TYPE;
        let handle = Self::handle_at(provider.as_ref(), index)?;

        // Dropping the guard on any error below destroys the listener.
        let listener = Listener::create(Arc::clone(&provider), handle)?;
        let descriptor = fetch_descriptor(provider.as_ref(), handle)?;
        kind.configure(&listener)?;

        info!(
            "Created {:?} #{} \"{}\" ({}) on listener {:?}",
            sensor_type,
            index,
            descriptor.name,
            descriptor.vendor,
            listener.handle()
        );

        Ok(Self {
            kind: Arc::new(kind),
            provider,
            index,
            handle,
            listener: Some(listener),
            descriptor,
            interval: 0,
            max_batch_latency: 0,
            pause_policy: SensorPausePolicy::None,
            state: SensingState::Idle,
            shared: Arc::new(Shared {
                cache: Mutex::new(EventCache {
                    time_span: Duration::ZERO,
                    accuracy: SensorDataAccuracy::Undefined,
                    latest: None,
                }),
                raw_updated: EventHandler::new(),
                data_updated: EventHandler::new(),
            }),
        })
    }

    fn handle_at(provider: &dyn CapabilityProvider, index: u32) -> Result<SensorHandle> {
        let sensor_type = K::SENSOR_TYPE;
        let not_supported = SensorError::NotSupported { sensor_type, index };

        // The list is owned here and released on return.
        let handles = match provider.sensor_list(sensor_type) {
            Ok(handles) => handles,
            Err(NativeError::NotSupported) => {
                error!("{:?} is not available on this device", sensor_type);
                return Err(not_supported);
            }
            Err(code) => {
                error!("Error getting sensor list: {}", code);
                return Err(SensorError::from_native(Operation::SensorList, code));
            }
        };

        let handle = handles.get(index as usize).copied().ok_or_else(|| {
            error!("{:?} index {} out of range ({} found)", sensor_type, index, handles.len());
            not_supported
        })?;

        if handle.is_null() {
            error!("Sensor handle is null");
            return Err(SensorError::InvalidHandle("sensor"));
        }
        Ok(handle)
    }

    /// Whether class `K` is usable on this device: the platform feature must
    /// be present and enabled and the backend must support the class.
    pub fn is_supported(provider: &dyn CapabilityProvider) -> bool {
        match provider.feature_flag(K::FEATURE_KEY) {
            Some(true) => {}
            _ => {
                error!("Error checking if sensor is supported (feature {})", K::FEATURE_KEY);
                return false;
            }
        }

        provider
            .is_sensor_supported(K::SENSOR_TYPE)
            .unwrap_or_else(|code| {
                error!("Error checking if sensor is supported: {}", code);
                false
            })
    }

    /// Number of sensors of class `K` on this device
    pub fn count(provider: &dyn CapabilityProvider) -> usize {
        match provider.sensor_list(K::SENSOR_TYPE) {
            Ok(handles) => handles.len(),
            Err(code) => {
                error!("Error getting sensor list for {:?}: {}", K::SENSOR_TYPE, code);
                0
            }
        }
    }

    pub fn sensor_type(&self) -> SensorType {
        K::SENSOR_TYPE
    }

    pub fn index(&self) -> u32 {
        self.index
    }

    pub fn handle(&self) -> SensorHandle {
        self.handle
    }

    /// `None` once disposed
    pub fn listener_handle(&self) -> Option<ListenerHandle> {
        self.listener.as_ref().map(Listener::handle)
    }

    pub fn kind(&self) -> &K {
        &self.kind
    }

    pub fn descriptor(&self) -> &SensorDescriptor {
        &self.descriptor
    }

    pub fn name(&self) -> &str {
        &self.descriptor.name
    }

    pub fn vendor(&self) -> &str {
        &self.descriptor.vendor
    }

    pub fn min_value(&self) -> f32 {
        self.descriptor.min_value
    }

    pub fn max_value(&self) -> f32 {
        self.descriptor.max_value
    }

    pub fn resolution(&self) -> f32 {
        self.descriptor.resolution
    }

    pub fn min_interval(&self) -> i32 {
        self.descriptor.min_interval
    }

    pub fn fifo_count(&self) -> i32 {
        self.descriptor.fifo_count
    }

    pub fn max_batch_count(&self) -> i32 {
        self.descriptor.max_batch_count
    }

    /// Sampling interval in milliseconds
    pub fn interval(&self) -> u32 {
        self.interval
    }

    /// Set the sampling interval.
    ///
    /// While sensing the value goes to the provider immediately. While idle it
    /// is only stored, and the next [`Sensor::start`] binds the event callback
    /// at this rate.
    pub fn set_interval(&mut self, interval_ms: u32) -> Result<()> {
        let listener = self.listener()?;
        if self.state == SensingState::Active {
            listener.set_interval(interval_ms)?;
        }
        debug!("Interval of {:?} set to {} ms", K::SENSOR_TYPE, interval_ms);
        self.interval = interval_ms;
        Ok(())
    }

    /// Max batch latency in milliseconds
    pub fn max_batch_latency(&self) -> u32 {
        self.max_batch_latency
    }

    pub fn set_max_batch_latency(&mut self, latency_ms: u32) -> Result<()> {
        self.listener()?.set_max_batch_latency(latency_ms)?;
        debug!("Max batch latency of {:?} set to {} ms", K::SENSOR_TYPE, latency_ms);
        self.max_batch_latency = latency_ms;
        Ok(())
    }

    pub fn pause_policy(&self) -> SensorPausePolicy {
        self.pause_policy
    }

    pub fn set_pause_policy(&mut self, policy: SensorPausePolicy) -> Result<()> {
        self.listener()?
            .set_attribute(SensorAttribute::PausePolicy, policy.code())?;
        debug!("Pause policy of {:?} set to {:?}", K::SENSOR_TYPE, policy);
        self.pause_policy = policy;
        Ok(())
    }

    /// Write a raw listener attribute
    pub fn set_attribute(&mut self, attribute: SensorAttribute, value: i32) -> Result<()> {
        self.listener()?.set_attribute(attribute, value)
    }

    pub fn is_sensing(&self) -> bool {
        self.state == SensingState::Active
    }

    pub fn state(&self) -> SensingState {
        self.state
    }

    /// Timestamp of the most recent event
    pub fn time_span(&self) -> Duration {
        self.shared.cache.lock().time_span
    }

    /// Accuracy of the most recent event
    pub fn accuracy(&self) -> SensorDataAccuracy {
        self.shared.cache.lock().accuracy
    }

    /// Most recent decoded reading
    pub fn latest(&self) -> Option<K::Reading> {
        self.shared.cache.lock().latest.clone()
    }

    /// Start delivering events. A no-op when already sensing.
    pub fn start(&mut self) -> Result<()> {
        info!("Starting {:?}", K::SENSOR_TYPE);
        let listener = self.listener()?;
        if self.state == SensingState::Active {
            debug!("{:?} already started", K::SENSOR_TYPE);
            return Ok(());
        }

        listener.start()?;

        let callback = self.event_callback();
        if let Err(e) = listener.bind(self.interval, callback) {
            if let Err(stop_err) = listener.stop() {
                warn!("Error rolling back start of {:?}: {}", K::SENSOR_TYPE, stop_err);
            }
            return Err(e);
        }

        self.state = SensingState::Active;
        info!("{:?} started", K::SENSOR_TYPE);
        Ok(())
    }

    /// Stop delivering events. A no-op when idle.
    ///
    /// On failure the sensor is left sensing with its callback bound.
    pub fn stop(&mut self) -> Result<()> {
        info!("Stopping {:?}", K::SENSOR_TYPE);
        if self.state != SensingState::Active {
            return Ok(());
        }

        let listener = self.listener()?;
        listener.unbind()?;
        if let Err(e) = listener.stop() {
            if let Err(bind_err) = listener.bind(self.interval, self.event_callback()) {
                warn!("Error rebinding {:?} after failed stop: {}", K::SENSOR_TYPE, bind_err);
            }
            return Err(e);
        }

        self.state = SensingState::Idle;
        info!("{:?} stopped", K::SENSOR_TYPE);
        Ok(())
    }

    /// Release the listener. Safe to call any number of times; provider
    /// errors during release are logged, never returned.
    pub fn dispose(&mut self) {
        let Some(listener) = self.listener.take() else {
            return;
        };

        if self.state == SensingState::Active {
            if let Err(e) = listener.unbind() {
                warn!("Error unbinding {:?} during dispose: {}", K::SENSOR_TYPE, e);
            }
            if let Err(e) = listener.stop() {
                warn!("Error stopping {:?} during dispose: {}", K::SENSOR_TYPE, e);
            }
            self.state = SensingState::Idle;
        }

        drop(listener);
        info!("Disposed {:?} #{}", K::SENSOR_TYPE, self.index);
    }

    pub fn is_disposed(&self) -> bool {
        self.listener.is_none()
    }

    /// Subscribe to decoded notifications
    pub fn subscribe<F>(&self, handler: F) -> SubscriptionId
    where
        F: Fn(&SensorDataUpdated<K::Reading>) + Send + Sync + 'static,
    {
        self.shared.data_updated.subscribe(handler)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.shared.data_updated.unsubscribe(id)
    }

    /// Subscribe to undecoded notifications
    pub fn subscribe_raw<F>(&self, handler: F) -> SubscriptionId
    where
        F: Fn(&SensorEvent) + Send + Sync + 'static,
    {
        self.shared.raw_updated.subscribe(handler)
    }

    pub fn unsubscribe_raw(&self, id: SubscriptionId) -> bool {
        self.shared.raw_updated.unsubscribe(id)
    }

    pub fn provider(&self) -> &Arc<dyn CapabilityProvider> {
        &self.provider
    }

    fn listener(&self) -> Result<&Listener> {
        self.listener.as_ref().ok_or_else(|| {
            error!("Sensor listener handle is null");
            SensorError::InvalidHandle("listener")
        })
    }

    fn event_callback(&self) -> RawEventCallback {
        let kind = Arc::clone(&self.kind);
        let shared = Arc::clone(&self.shared);
        Arc::new(move |event: &RawEvent| translate::<K>(&kind, &shared, event))
    }
}

impl<K: SensorKind> fmt::Debug for Sensor<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sensor")
            .field("sensor_type", &K::SENSOR_TYPE)
            .field("index", &self.index)
            .field("handle", &self.handle)
            .field("listener", &self.listener_handle())
            .field("state", &self.state)
            .field("interval", &self.interval)
            .field("max_batch_latency", &self.max_batch_latency)
            .field("pause_policy", &self.pause_policy)
            .finish()
    }
}

impl<K: SensorKind> Drop for Sensor<K> {
    fn drop(&mut self) {
        self.dispose();
    }
}

/// Cache timestamp and accuracy, decode, then notify generic and typed
/// subscribers in registration order.
fn translate<K: SensorKind>(kind: &K, shared: &Shared<K::Reading>, event: &RawEvent) {
    let timestamp = Duration::from_micros(u64::try_from(event.timestamp).unwrap_or(0));
    let accuracy = SensorDataAccuracy::from_raw(event.accuracy);
    let reading = kind.decode(event);

    {
        let mut cache = shared.cache.lock();
        cache.time_span = timestamp;
        cache.accuracy = accuracy;
        cache.latest = Some(reading.clone());
    }

    shared.raw_updated.invoke(&SensorEvent {
        timestamp,
        accuracy,
        values: event.values().to_vec(),
    });
    let delivered = shared.data_updated.invoke(&SensorDataUpdated {
        timestamp,
        accuracy,
        reading,
    });
    debug!("{:?} event at {:?} delivered to {} subscribers", K::SENSOR_TYPE, timestamp, delivered);
}

fn fetch_descriptor(provider: &dyn CapabilityProvider, handle: SensorHandle) -> Result<SensorDescriptor> {
    fn fetch<T>(property: Property, value: std::result::Result<T, NativeError>) -> Result<T> {
        value.map_err(|code| {
            error!("Error getting {}: {}", property, code);
            SensorError::PropertyUnavailable { property, code }
        })
    }

    Ok(SensorDescriptor {
        name: fetch(Property::Name, provider.name(handle))?,
        vendor: fetch(Property::Vendor, provider.vendor(handle))?,
        min_value: fetch(Property::MinValue, provider.min_range(handle))?,
        max_value: fetch(Property::MaxValue, provider.max_range(handle))?,
        resolution: fetch(Property::Resolution, provider.resolution(handle))?,
        min_interval: fetch(Property::MinInterval, provider.min_interval(handle))?,
        fifo_count: fetch(Property::FifoCount, provider.fifo_count(handle))?,
        max_batch_count: fetch(Property::MaxBatchCount, provider.max_batch_count(handle))?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::{ProviderCall, SimulatedProvider, SimulatedSensor};

    /// Three-axis kind used to exercise the core without an attribute write
    #[derive(Default)]
    struct Axes;

    impl SensorKind for Axes {
        type Reading = [f32; 3];
        const SENSOR_TYPE: SensorType = SensorType::Accelerometer;
        const FEATURE_KEY: &'static str = "http://tizen.org/feature/sensor.accelerometer";

        fn decode(&self, event: &RawEvent) -> [f32; 3] {
            [event.values[0], event.values[1], event.values[2]]
        }
    }

    fn device(count: usize) -> Arc<SimulatedProvider> {
        let provider = Arc::new(SimulatedProvider::new());
        for i in 0..count {
            let mut sensor = SimulatedSensor::new(&format!("accel-{}", i), "acme");
            sensor.min_range = -19.6;
            sensor.max_range = 19.6;
            sensor.resolution = 0.01;
            sensor.min_interval = 5;
            sensor.fifo_count = 64;
            sensor.max_batch_count = 128;
            provider.add_sensor(SensorType::Accelerometer, sensor);
        }
        provider
    }

    fn open(provider: &Arc<SimulatedProvider>, index: u32) -> Result<Sensor<Axes>> {
        Sensor::<Axes>::new(provider.clone(), index)
    }

    #[test]
    fn test_construction_caches_descriptor() {
        let provider = device(2);
        let sensor = open(&provider, 1).unwrap();

        assert_eq!(sensor.name(), "accel-1");
        assert_eq!(sensor.vendor(), "acme");
        assert_eq!(sensor.min_value(), -19.6);
        assert_eq!(sensor.max_value(), 19.6);
        assert_eq!(sensor.resolution(), 0.01);
        assert_eq!(sensor.min_interval(), 5);
        assert_eq!(sensor.fifo_count(), 64);
        assert_eq!(sensor.max_batch_count(), 128);
        assert!(!sensor.is_sensing());

        let fetches = provider.count_calls(|c| matches!(c, ProviderCall::GetProperty(..)));
        let _ = sensor.name();
        let _ = sensor.descriptor().clone();
        assert_eq!(
            provider.count_calls(|c| matches!(c, ProviderCall::GetProperty(..))),
            fetches
        );
    }

    #[test]
    fn test_index_out_of_range_leaves_no_listener() {
        let provider = device(1);
        let err = open(&provider, 1).unwrap_err();

        assert_eq!(
            err,
            SensorError::NotSupported { sensor_type: SensorType::Accelerometer, index: 1 }
        );
        assert!(provider.live_listeners().is_empty());
        assert_eq!(
            provider.count_calls(|c| matches!(c, ProviderCall::CreateListener(_))),
            0
        );
    }

    #[test]
    fn test_missing_class_is_not_supported() {
        let provider = Arc::new(SimulatedProvider::new());
        let err = open(&provider, 0).unwrap_err();
        assert!(err.is_not_supported());
    }

    #[test]
    fn test_enumeration_failure_is_typed() {
        let provider = device(1);
        provider.fail_operation(Operation::SensorList, NativeError::IoError);

        assert_eq!(
            open(&provider, 0).unwrap_err(),
            SensorError::Provider { operation: Operation::SensorList, code: NativeError::IoError }
        );
    }

    #[test]
    fn test_listener_creation_failure_propagates() {
        let provider = device(1);
        provider.fail_operation(Operation::CreateListener, NativeError::OutOfMemory);

        assert_eq!(
            open(&provider, 0).unwrap_err(),
            SensorError::Provider {
                operation: Operation::CreateListener,
                code: NativeError::OutOfMemory
            }
        );
    }

    #[test]
    fn test_null_listener_is_invalid_handle() {
        let provider = device(1);
        provider.return_null_listeners(true);

        assert_eq!(open(&provider, 0).unwrap_err(), SensorError::InvalidHandle("listener"));
    }

    #[test]
    fn test_property_failure_releases_listener() {
        let provider = device(1);
        provider.fail_property(Property::Resolution, NativeError::IoError);

        let err = open(&provider, 0).unwrap_err();
        assert_eq!(
            err,
            SensorError::PropertyUnavailable { property: Property::Resolution, code: NativeError::IoError }
        );
        assert!(provider.live_listeners().is_empty());
        assert_eq!(
            provider.count_calls(|c| matches!(c, ProviderCall::DestroyListener(_))),
            1
        );
    }

    #[test]
    fn test_start_then_stop_returns_to_idle() {
        let provider = device(1);
        let mut sensor = open(&provider, 0).unwrap();
        let listener = sensor.listener_handle().unwrap();

        sensor.start().unwrap();
        assert!(sensor.is_sensing());
        assert!(provider.is_started(listener));
        assert!(provider.has_callback(listener));

        sensor.stop().unwrap();
        assert_eq!(sensor.state(), SensingState::Idle);
        assert!(!provider.is_started(listener));
        assert!(!provider.has_callback(listener));
    }

    #[test]
    fn test_stop_before_start_is_noop() {
        let provider = device(1);
        let mut sensor = open(&provider, 0).unwrap();
        provider.clear_calls();

        sensor.stop().unwrap();
        assert!(provider.calls().is_empty());
        assert!(!sensor.is_sensing());
    }

    #[test]
    fn test_double_start_issues_one_provider_start() {
        let provider = device(1);
        let mut sensor = open(&provider, 0).unwrap();

        sensor.start().unwrap();
        sensor.start().unwrap();
        assert_eq!(
            provider.count_calls(|c| matches!(c, ProviderCall::StartListener(_))),
            1
        );
        assert!(sensor.is_sensing());
    }

    #[test]
    fn test_start_failure_keeps_state() {
        let provider = device(1);
        let mut sensor = open(&provider, 0).unwrap();
        provider.fail_operation(Operation::StartListener, NativeError::IoError);

        let err = sensor.start().unwrap_err();
        assert_eq!(err.native_code(), Some(NativeError::IoError));
        assert!(!sensor.is_sensing());
    }

    #[test]
    fn test_callback_binding_failure_rolls_back_start() {
        let provider = device(1);
        let mut sensor = open(&provider, 0).unwrap();
        let listener = sensor.listener_handle().unwrap();
        provider.fail_operation(Operation::SetEventCallback, NativeError::OperationFailed);

        assert!(sensor.start().is_err());
        assert!(!sensor.is_sensing());
        assert!(!provider.is_started(listener));
    }

    #[test]
    fn test_stop_failure_keeps_state() {
        let provider = device(1);
        let mut sensor = open(&provider, 0).unwrap();
        sensor.start().unwrap();
        provider.fail_operation(Operation::StopListener, NativeError::IoError);

        assert_eq!(
            sensor.stop().unwrap_err(),
            SensorError::Provider { operation: Operation::StopListener, code: NativeError::IoError }
        );
        assert!(sensor.is_sensing());

        let listener = sensor.listener_handle().unwrap();
        assert!(provider.is_started(listener));
        assert!(provider.has_callback(listener));
        assert!(provider.emit(listener, &RawEvent::new(1, 2, &[0.0, 0.0, 1.0])));
        assert_eq!(sensor.latest(), Some([0.0, 0.0, 1.0]));
    }

    #[test]
    fn test_unbind_failure_keeps_sensor_delivering() {
        let provider = device(1);
        let mut sensor = open(&provider, 0).unwrap();
        let listener = sensor.listener_handle().unwrap();
        sensor.start().unwrap();
        provider.fail_operation(Operation::UnsetEventCallback, NativeError::IoError);

        assert_eq!(
            sensor.stop().unwrap_err(),
            SensorError::Provider {
                operation: Operation::UnsetEventCallback,
                code: NativeError::IoError
            }
        );
        assert!(sensor.is_sensing());
        assert!(provider.is_started(listener));

        provider.clear_faults();
        sensor.start().unwrap();
        assert!(provider.emit(listener, &RawEvent::new(7, 2, &[1.0, 2.0, 3.0])));
        assert_eq!(sensor.latest(), Some([1.0, 2.0, 3.0]));

        sensor.stop().unwrap();
        assert!(!sensor.is_sensing());
        assert!(!provider.is_started(listener));
        assert!(!provider.has_callback(listener));
    }

    #[test]
    fn test_interval_forwarded_only_while_sensing() {
        let provider = device(1);
        let mut sensor = open(&provider, 0).unwrap();
        let listener = sensor.listener_handle().unwrap();
        let set_interval = |c: &ProviderCall| matches!(c, ProviderCall::SetInterval(..));

        sensor.set_interval(250).unwrap();
        assert_eq!(sensor.interval(), 250);
        assert_eq!(provider.count_calls(set_interval), 0);

        sensor.start().unwrap();
        assert!(provider
            .calls()
            .contains(&ProviderCall::SetEventCallback(listener, 250)));
        assert_eq!(provider.interval(listener), Some(250));

        sensor.set_interval(100).unwrap();
        assert_eq!(provider.count_calls(set_interval), 1);
        assert!(provider.calls().contains(&ProviderCall::SetInterval(listener, 100)));
        assert_eq!(sensor.interval(), 100);
    }

    #[test]
    fn test_failed_setter_names_setting_and_keeps_value() {
        let provider = device(1);
        let mut sensor = open(&provider, 0).unwrap();
        provider.fail_operation(Operation::SetMaxBatchLatency, NativeError::IoError);

        let err = sensor.set_max_batch_latency(500).unwrap_err();
        assert_eq!(
            err,
            SensorError::Provider { operation: Operation::SetMaxBatchLatency, code: NativeError::IoError }
        );
        assert_eq!(sensor.max_batch_latency(), 0);
        assert!(!sensor.is_sensing());

        provider.fail_operation(Operation::SetAttribute, NativeError::PermissionDenied);
        let err = sensor.set_pause_policy(SensorPausePolicy::All).unwrap_err();
        assert!(err.to_string().starts_with("Sensor.PausePolicy failed"));
        assert_eq!(sensor.pause_policy(), SensorPausePolicy::None);
    }

    #[test]
    fn test_batch_latency_and_pause_policy_forwarded_when_idle() {
        let provider = device(1);
        let mut sensor = open(&provider, 0).unwrap();
        let listener = sensor.listener_handle().unwrap();

        sensor.set_max_batch_latency(1000).unwrap();
        sensor.set_pause_policy(SensorPausePolicy::DisplayOff).unwrap();

        assert_eq!(provider.max_batch_latency(listener), Some(1000));
        assert_eq!(provider.attribute(listener, SensorAttribute::PausePolicy), Some(1));
        assert_eq!(sensor.pause_policy(), SensorPausePolicy::DisplayOff);
    }

    #[test]
    fn test_dispose_destroys_listener_once() {
        let provider = device(1);
        let mut sensor = open(&provider, 0).unwrap();
        sensor.start().unwrap();

        for _ in 0..3 {
            sensor.dispose();
        }
        drop(sensor);

        assert_eq!(
            provider.count_calls(|c| matches!(c, ProviderCall::DestroyListener(_))),
            1
        );
        assert!(provider.live_listeners().is_empty());
    }

    #[test]
    fn test_operations_after_dispose_are_invalid_handle() {
        let provider = device(1);
        let mut sensor = open(&provider, 0).unwrap();
        sensor.dispose();

        assert!(sensor.is_disposed());
        assert_eq!(sensor.start().unwrap_err(), SensorError::InvalidHandle("listener"));
        assert_eq!(sensor.set_interval(10).unwrap_err(), SensorError::InvalidHandle("listener"));
        assert!(sensor.stop().is_ok());
    }

    #[test]
    fn test_dispose_swallows_destroy_failure() {
        let provider = device(1);
        let mut sensor = open(&provider, 0).unwrap();
        provider.fail_operation(Operation::DestroyListener, NativeError::IoError);

        sensor.dispose();
        sensor.dispose();
        assert_eq!(
            provider.count_calls(|c| matches!(c, ProviderCall::DestroyListener(_))),
            1
        );
    }

    #[test]
    fn test_drop_releases_listener() {
        let provider = device(1);
        {
            let _sensor = open(&provider, 0).unwrap();
            assert_eq!(provider.live_listeners().len(), 1);
        }
        assert!(provider.live_listeners().is_empty());
    }

    #[test]
    fn test_raw_and_typed_notifications() {
        let provider = device(1);
        let mut sensor = open(&provider, 0).unwrap();
        let listener = sensor.listener_handle().unwrap();

        let raw = Arc::new(Mutex::new(Vec::new()));
        let typed = Arc::new(Mutex::new(Vec::new()));
        let r = Arc::clone(&raw);
        sensor.subscribe_raw(move |e: &SensorEvent| r.lock().push(e.values.clone()));
        let t = Arc::clone(&typed);
        sensor.subscribe(move |e: &SensorDataUpdated<[f32; 3]>| t.lock().push(e.reading));

        let event = RawEvent::new(2_000_000, 3, &[0.1, 0.2, 9.8]);
        assert!(!provider.emit(listener, &event));

        sensor.start().unwrap();
        assert!(provider.emit(listener, &event));

        assert_eq!(*raw.lock(), vec![vec![0.1, 0.2, 9.8]]);
        assert_eq!(*typed.lock(), vec![[0.1, 0.2, 9.8]]);
        assert_eq!(sensor.time_span(), Duration::from_secs(2));
        assert_eq!(sensor.accuracy(), SensorDataAccuracy::VeryGood);
        assert_eq!(sensor.latest(), Some([0.1, 0.2, 9.8]));

        sensor.stop().unwrap();
        assert!(!provider.emit(listener, &event));
        assert_eq!(typed.lock().len(), 1);
    }

    #[test]
    fn test_static_queries_need_no_instance() {
        let provider = device(3);
        assert_eq!(Sensor::<Axes>::count(&*provider), 3);
        assert!(!Sensor::<Axes>::is_supported(&*provider));

        provider.set_feature(Axes::FEATURE_KEY, false);
        assert!(!Sensor::<Axes>::is_supported(&*provider));

        provider.set_feature(Axes::FEATURE_KEY, true);
        assert!(Sensor::<Axes>::is_supported(&*provider));

        let empty = SimulatedProvider::new();
        empty.set_feature(Axes::FEATURE_KEY, true);
        assert_eq!(Sensor::<Axes>::count(&empty), 0);
        assert!(!Sensor::<Axes>::is_supported(&empty));
    }
}
