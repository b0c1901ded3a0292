// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.
// https://github.com/bad-antics/sensorkit-rs

//! Activity detectors - running, walking, stationary and in-vehicle

use std::fmt;
use std::marker::PhantomData;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{
    ActivityType, DetectorState, Listener, Sensor, SensorAttribute, SensorKind, SensorType,
};
use crate::core::Result;
use crate::provider::RawEvent;

/// Platform feature shared by every activity detector
pub const ACTIVITY_FEATURE_KEY: &str = "http://tizen.org/feature/sensor.activity_recognition";

/// One activity sub-kind of the shared activity sensor
pub trait ActivityKind: Send + Sync + 'static {
    const SENSOR_TYPE: SensorType;
    const ACTIVITY: ActivityType;
}

/// Running activity
pub struct Running;
/// Walking activity
pub struct Walking;
/// Stationary activity
pub struct Stationary;
/// In-vehicle activity
pub struct InVehicle;

impl ActivityKind for Running {
    const SENSOR_TYPE: SensorType = SensorType::RunningActivityDetector;
    const ACTIVITY: ActivityType = ActivityType::Running;
}

impl ActivityKind for Walking {
    const SENSOR_TYPE: SensorType = SensorType::WalkingActivityDetector;
    const ACTIVITY: ActivityType = ActivityType::Walking;
}

impl ActivityKind for Stationary {
    const SENSOR_TYPE: SensorType = SensorType::StationaryActivityDetector;
    const ACTIVITY: ActivityType = ActivityType::Stationary;
}

impl ActivityKind for InVehicle {
    const SENSOR_TYPE: SensorType = SensorType::InVehicleActivityDetector;
    const ACTIVITY: ActivityType = ActivityType::InVehicle;
}

/// Decoded activity event
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ActivityReading {
    pub state: DetectorState,
    /// Value slot 0 as reported by the backend
    pub raw: f32,
}

/// [`SensorKind`] for activity sub-kind `A`
pub struct Activity<A> {
    _kind: PhantomData<fn() -> A>,
}

impl<A> Default for Activity<A> {
    fn default() -> Self {
        Self { _kind: PhantomData }
    }
}

impl<A: ActivityKind> fmt::Debug for Activity<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Activity({:?})", A::ACTIVITY)
    }
}

impl<A: ActivityKind> SensorKind for Activity<A> {
    type Reading = ActivityReading;

    const SENSOR_TYPE: SensorType = A::SENSOR_TYPE;
    const FEATURE_KEY: &'static str = ACTIVITY_FEATURE_KEY;

    fn configure(&self, listener: &Listener) -> Result<()> {
        debug!("Selecting {:?} on listener {:?}", A::ACTIVITY, listener.handle());
        listener.set_attribute(SensorAttribute::Activity, A::ACTIVITY.code())
    }

    /// Slot 0 is cast straight to a detector state. Codes outside the defined
    /// set come back as [`DetectorState::Other`], not as an error. An event
    /// carrying no values reads as `Unknown` with a NaN raw value.
    fn decode(&self, event: &RawEvent) -> ActivityReading {
        match event.values().first() {
            Some(&raw) => ActivityReading {
                state: DetectorState::from_raw(raw as i32),
                raw,
            },
            None => {
                debug!("{:?} event at {} carried no values", A::ACTIVITY, event.timestamp);
                ActivityReading {
                    state: DetectorState::Unknown,
                    raw: f32::NAN,
                }
            }
        }
    }
}

pub type ActivityDetector<A> = Sensor<Activity<A>>;
pub type RunningActivityDetector = ActivityDetector<Running>;
pub type WalkingActivityDetector = ActivityDetector<Walking>;
pub type StationaryActivityDetector = ActivityDetector<Stationary>;
pub type InVehicleActivityDetector = ActivityDetector<InVehicle>;

impl<A: ActivityKind> Sensor<Activity<A>> {
    /// Last detected state; `Unknown` until the first event
    pub fn detected(&self) -> DetectorState {
        self.latest()
            .map(|reading| reading.state)
            .unwrap_or(DetectorState::Unknown)
    }

    pub fn activity(&self) -> ActivityType {
        A::ACTIVITY
    }
}
