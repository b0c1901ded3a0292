//! Sensor module - lifecycle core and sensor kinds

mod activity;
mod listener;
mod sensor;
mod traits;

pub use activity::{
    Activity, ActivityDetector, ActivityKind, ActivityReading, InVehicle, InVehicleActivityDetector,
    Running, RunningActivityDetector, Stationary, StationaryActivityDetector, Walking,
    WalkingActivityDetector, ACTIVITY_FEATURE_KEY,
};
pub use listener::Listener;
pub use sensor::Sensor;
pub use traits::{
    ActivityType, DetectorState, SensingState, SensorAttribute, SensorDataAccuracy,
    SensorDataUpdated, SensorDescriptor, SensorEvent, SensorKind, SensorPausePolicy, SensorType,
};
