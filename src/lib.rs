// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.
// https://github.com/bad-antics/sensorkit-rs

//! SensorKit - sensor lifecycle and event dispatch
//!
//! A thin in-process layer over a native sensor backend:
//! - discovers a sensor by class and index and caches its descriptor
//! - owns exactly one listener per sensor and releases it on every path
//! - buffers and forwards runtime configuration (interval, batch latency, pause policy)
//! - turns raw backend callbacks into typed, timestamped notifications
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        Subscribers                          │
//! ├─────────────────────────────────────────────────────────────┤
//! │  ┌──────────────┐   decode   ┌────────────────────────────┐ │
//! │  │ SensorKind   │ ◄───────── │ Sensor (lifecycle, config) │ │
//! │  │ (activity..) │            │  └─ Listener (owned handle)│ │
//! │  └──────────────┘            └────────────────────────────┘ │
//! │                                   ↑ raw events   ↓ calls    │
//! │  ┌─────────────────────────────────────────────────────┐    │
//! │  │        CapabilityProvider (native backend)          │    │
//! │  │   CallbackTable keyed by listener handle            │    │
//! │  └─────────────────────────────────────────────────────┘    │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use sensorkit::provider::{RawEvent, SimulatedProvider, SimulatedSensor};
//! use sensorkit::sensors::{DetectorState, RunningActivityDetector, SensorType};
//!
//! let provider = Arc::new(SimulatedProvider::new());
//! provider.add_sensor(SensorType::RunningActivityDetector, SimulatedSensor::new("activity", "acme"));
//!
//! let mut detector = RunningActivityDetector::new(provider.clone(), 0)?;
//! detector.start()?;
//!
//! let listener = detector.listener_handle().unwrap();
//! provider.emit(listener, &RawEvent::new(1_000, 2, &[1.0]));
//! assert_eq!(detector.detected(), DetectorState::Detected);
//!
//! detector.stop()?;
//! # Ok::<(), sensorkit::SensorError>(())
//! ```

pub mod config;
pub mod core;
pub mod provider;
pub mod sensors;

// Re-exports for convenience
pub use crate::config::Config;
pub use crate::core::{EventHandler, NativeError, Result, SensorError};
pub use crate::provider::{CapabilityProvider, SimulatedProvider};
pub use crate::sensors::{Sensor, SensorKind, SensorType};

/// SensorKit version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// SensorKit name
pub const NAME: &str = "SensorKit";

/// Build info
pub fn build_info() -> BuildInfo {
    BuildInfo {
        version: VERSION.to_string(),
        target: std::env::consts::ARCH.to_string(),
        os: std::env::consts::OS.to_string(),
    }
}

/// Build information
#[derive(Debug, Clone)]
pub struct BuildInfo {
    /// Version string
    pub version: String,
    /// Target architecture
    pub target: String,
    /// Operating system
    pub os: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_info_reports_package_version() {
        let info = build_info();
        assert_eq!(info.version, VERSION);
        assert_eq!(info.os, std::env::consts::OS);
        assert!(!info.target.is_empty());
    }
}
