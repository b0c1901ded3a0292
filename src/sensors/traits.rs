// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.
// https://github.com/bad-antics/sensorkit-rs

//! Sensor traits and common types

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::Listener;
use crate::core::Result;
use crate::provider::RawEvent;

/// Sensor classes known to the native backend.
///
/// Several classes share one native code (all activity detectors use
/// `0x1A00`); they are told apart by an attribute written after the listener
/// is created. Never use the native code as a key for the class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SensorType {
    // Motion
    Accelerometer,
    GravitySensor,
    LinearAccelerationSensor,
    Magnetometer,
    RotationVectorSensor,
    OrientationSensor,
    Gyroscope,

    // Environment
    LightSensor,
    ProximitySensor,
    PressureSensor,
    UltravioletSensor,
    TemperatureSensor,
    HumiditySensor,

    // Health
    HeartRateMonitor,
    Pedometer,
    SleepMonitor,

    // Uncalibrated / fused
    UncalibratedGyroscope,
    UncalibratedMagnetometer,
    GyroscopeRotationVectorSensor,
    MagnetometerRotationVectorSensor,

    // Activity recognition
    WalkingActivityDetector,
    RunningActivityDetector,
    StationaryActivityDetector,
    InVehicleActivityDetector,

    // Gestures
    WristUpGestureDetector,
    PickUpGestureDetector,
    FaceDownGestureDetector,
}

impl SensorType {
    /// Code used by the native backend. Not unique across classes.
    pub const fn native_code(self) -> i32 {
        match self {
            SensorType::Accelerometer => 0,
            SensorType::GravitySensor => 1,
            SensorType::LinearAccelerationSensor => 2,
            SensorType::Magnetometer => 3,
            SensorType::RotationVectorSensor => 4,
            SensorType::OrientationSensor => 5,
            SensorType::Gyroscope => 6,
            SensorType::LightSensor => 7,
            SensorType::ProximitySensor => 8,
            SensorType::PressureSensor => 9,
            SensorType::UltravioletSensor => 10,
            SensorType::TemperatureSensor => 11,
            SensorType::HumiditySensor => 12,
            SensorType::HeartRateMonitor => 13,
            SensorType::UncalibratedGyroscope => 17,
            SensorType::UncalibratedMagnetometer => 18,
            SensorType::GyroscopeRotationVectorSensor => 19,
            SensorType::MagnetometerRotationVectorSensor => 20,
            SensorType::Pedometer => 0x300,
            SensorType::SleepMonitor => 0x301,
            SensorType::WalkingActivityDetector
            | SensorType::RunningActivityDetector
            | SensorType::StationaryActivityDetector
            | SensorType::InVehicleActivityDetector => ACTIVITY_NATIVE_CODE,
            SensorType::WristUpGestureDetector => 0x1201,
            SensorType::PickUpGestureDetector => 0x1204,
            SensorType::FaceDownGestureDetector => 0x1205,
        }
    }
}

pub(crate) const ACTIVITY_NATIVE_CODE: i32 = 0x1A00;

/// Listener attributes accepted by `SetAttribute`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SensorAttribute {
    AxisOrientation,
    PausePolicy,
    /// Selects the activity sub-kind on a shared activity sensor
    Activity,
}

impl SensorAttribute {
    pub const fn code(self) -> i32 {
        match self {
            SensorAttribute::AxisOrientation => 0,
            SensorAttribute::PausePolicy => 1,
            SensorAttribute::Activity => (ACTIVITY_NATIVE_CODE << 8) | 0x80 | 0x1,
        }
    }
}

/// Whether events keep flowing while the display is off or in power save
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SensorPausePolicy {
    /// Pauses when the display is off and in power save mode
    #[default]
    None,
    /// Keeps delivering while the display is off
    DisplayOff,
    /// Keeps delivering in power save mode
    PowerSaveMode,
    /// Never pauses
    All,
}

impl SensorPausePolicy {
    pub const fn code(self) -> i32 {
        match self {
            SensorPausePolicy::None => 0,
            SensorPausePolicy::DisplayOff => 1,
            SensorPausePolicy::PowerSaveMode => 2,
            SensorPausePolicy::All => 3,
        }
    }
}

/// Provider-reported confidence tier of a reading
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SensorDataAccuracy {
    #[default]
    Undefined,
    Bad,
    Normal,
    Good,
    VeryGood,
}

impl SensorDataAccuracy {
    /// Unknown codes decode to `Undefined`
    pub fn from_raw(code: i32) -> Self {
        match code {
            0 => SensorDataAccuracy::Bad,
            1 => SensorDataAccuracy::Normal,
            2 => SensorDataAccuracy::Good,
            3 => SensorDataAccuracy::VeryGood,
            _ => SensorDataAccuracy::Undefined,
        }
    }

    pub const fn code(self) -> i32 {
        match self {
            SensorDataAccuracy::Undefined => -1,
            SensorDataAccuracy::Bad => 0,
            SensorDataAccuracy::Normal => 1,
            SensorDataAccuracy::Good => 2,
            SensorDataAccuracy::VeryGood => 3,
        }
    }
}

/// Output of a detector sensor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DetectorState {
    #[default]
    Unknown,
    NotDetected,
    Detected,
    /// Code outside the defined set, kept as reported
    Other(i32),
}

impl DetectorState {
    /// Direct cast of the native code; no range check.
    pub fn from_raw(code: i32) -> Self {
        match code {
            -1 => DetectorState::Unknown,
            0 => DetectorState::NotDetected,
            1 => DetectorState::Detected,
            other => DetectorState::Other(other),
        }
    }

    pub fn is_defined(self) -> bool {
        !matches!(self, DetectorState::Other(_))
    }
}

/// Activity sub-kinds selectable through [`SensorAttribute::Activity`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityType {
    Unknown,
    Stationary,
    Walking,
    Running,
    InVehicle,
    OnBicycle,
}

impl ActivityType {
    pub const fn code(self) -> i32 {
        match self {
            ActivityType::Unknown => 1,
            ActivityType::Stationary => 2,
            ActivityType::Walking => 4,
            ActivityType::Running => 8,
            ActivityType::InVehicle => 16,
            ActivityType::OnBicycle => 32,
        }
    }
}

/// Sensing state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SensingState {
    #[default]
    Idle,
    Active,
}

/// Hardware description fetched once at construction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorDescriptor {
    pub name: String,
    pub vendor: String,
    pub min_value: f32,
    pub max_value: f32,
    pub resolution: f32,
    pub min_interval: i32,
    pub fifo_count: i32,
    pub max_batch_count: i32,
}

/// Generic notification carrying the undecoded values
#[derive(Debug, Clone, PartialEq)]
pub struct SensorEvent {
    pub timestamp: Duration,
    pub accuracy: SensorDataAccuracy,
    pub values: Vec<f32>,
}

/// Typed notification produced by a sensor kind
#[derive(Debug, Clone, PartialEq)]
pub struct SensorDataUpdated<R> {
    pub timestamp: Duration,
    pub accuracy: SensorDataAccuracy,
    pub reading: R,
}

/// One physical sensor class.
///
/// The kind names its native class and platform feature key, configures the
/// listener right after it is created and decodes raw value vectors.
pub trait SensorKind: Default + Send + Sync + 'static {
    type Reading: Clone + fmt::Debug + Send + Sync + 'static;

    const SENSOR_TYPE: SensorType;

    /// Platform feature that must be present for the class to be usable
    const FEATURE_KEY: &'static str;

    /// Called once after the listener exists
    fn configure(&self, _listener: &Listener) -> Result<()> {
        Ok(())
    }

    fn decode(&self, event: &RawEvent) -> Self::Reading;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_activity_detectors_share_native_code() {
        let codes = [
            SensorType::WalkingActivityDetector,
            SensorType::RunningActivityDetector,
            SensorType::StationaryActivityDetector,
            SensorType::InVehicleActivityDetector,
        ]
        .map(SensorType::native_code);
        assert!(codes.iter().all(|code| *code == 0x1A00));
        assert_ne!(SensorType::RunningActivityDetector, SensorType::WalkingActivityDetector);
    }

    #[test]
    fn test_activity_attribute_code() {
        assert_eq!(SensorAttribute::Activity.code(), 0x1A_0081);
        assert_eq!(SensorAttribute::PausePolicy.code(), 1);
    }

    #[test]
    fn test_detector_state_keeps_unknown_codes() {
        assert_eq!(DetectorState::from_raw(1), DetectorState::Detected);
        assert_eq!(DetectorState::from_raw(-1), DetectorState::Unknown);
        let odd = DetectorState::from_raw(99);
        assert_eq!(odd, DetectorState::Other(99));
        assert!(!odd.is_defined());
    }

    #[test]
    fn test_accuracy_round_trip_and_fallback() {
        assert_eq!(SensorDataAccuracy::from_raw(2), SensorDataAccuracy::Good);
        assert_eq!(SensorDataAccuracy::from_raw(42), SensorDataAccuracy::Undefined);
        assert_eq!(SensorDataAccuracy::VeryGood.code(), 3);
    }
}
