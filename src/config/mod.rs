// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.
// https://github.com/bad-antics/sensorkit-rs

//! Configuration module

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::core::SensorError;
use crate::sensors::{ActivityType, Sensor, SensorKind, SensorPausePolicy};

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Application name
    pub app_name: String,

    /// Log level
    pub log_level: String,

    /// Sensor configuration
    pub sensor: SensorConfig,

    /// Simulated device configuration
    pub simulator: SimulatorConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            app_name: crate::NAME.to_string(),
            log_level: "info".to_string(),
            sensor: SensorConfig::default(),
            simulator: SimulatorConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        info!("Loaded configuration from {:?}", path);
        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        info!("Saved configuration to {:?}", path);
        Ok(())
    }

    /// Load or create default configuration
    pub fn load_or_create(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            let config = Self::default();

            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }

            config.save(path)?;
            Ok(config)
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.simulator.detection_probability) {
            bail!(
                "simulator.detection_probability must be within 0..=1, got {}",
                self.simulator.detection_probability
            );
        }
        if self.simulator.period_ms == 0 {
            bail!("simulator.period_ms must be positive");
        }
        Ok(())
    }

    /// Get configuration directory
    pub fn config_dir() -> PathBuf {
        dirs::config_dir()
            .map(|d| d.join("sensorkit"))
            .unwrap_or_else(|| PathBuf::from("./config"))
    }

    /// Get default configuration path
    pub fn default_path() -> PathBuf {
        Self::config_dir().join("config.toml")
    }
}

/// Runtime settings applied to an opened sensor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SensorConfig {
    /// Activity detector to open
    pub activity: ActivityType,

    /// Index among sensors of that class
    pub index: u32,

    /// Sampling interval in milliseconds (0 keeps the backend default)
    pub interval_ms: u32,

    /// Max batch latency in milliseconds, if any
    pub max_batch_latency_ms: Option<u32>,

    /// Pause policy
    pub pause_policy: SensorPausePolicy,
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            activity: ActivityType::Running,
            index: 0,
            interval_ms: 100,
            max_batch_latency_ms: None,
            pause_policy: SensorPausePolicy::None,
        }
    }
}

impl SensorConfig {
    /// Write these settings to `sensor`.
    ///
    /// An interval below the sensor's minimum is rejected before any provider
    /// call is made.
    pub fn apply<K: SensorKind>(&self, sensor: &mut Sensor<K>) -> crate::core::Result<()> {
        let min_interval = u32::try_from(sensor.min_interval()).unwrap_or(0);
        if self.interval_ms != 0 && self.interval_ms < min_interval {
            return Err(SensorError::InvalidArgument(format!(
                "interval {} ms is below the minimum of {} ms",
                self.interval_ms, min_interval
            )));
        }

        sensor.set_interval(self.interval_ms)?;
        if let Some(latency) = self.max_batch_latency_ms {
            sensor.set_max_batch_latency(latency)?;
        }
        if self.pause_policy != sensor.pause_policy() {
            sensor.set_pause_policy(self.pause_policy)?;
        }

        debug!("Applied {:?} to {:?}", self, sensor.sensor_type());
        Ok(())
    }
}

/// Simulated device configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulatorConfig {
    /// Number of activity sensors on the simulated device
    pub detectors: usize,

    /// Vendor reported by simulated sensors
    pub vendor: String,

    /// Delay between simulated events in milliseconds
    pub period_ms: u64,

    /// Chance that an event reports a detection
    pub detection_probability: f64,

    /// Accuracy code attached to simulated events
    pub accuracy: i32,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            detectors: 1,
            vendor: "Simulated".to_string(),
            period_ms: 500,
            detection_probability: 0.3,
            accuracy: 2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::provider::{SimulatedProvider, SimulatedSensor};
    use crate::sensors::{RunningActivityDetector, SensorType};

    #[test]
    fn test_load_or_create_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let created = Config::load_or_create(&path).unwrap();
        assert!(path.exists());

        let loaded = Config::load(&path).unwrap();
        assert_eq!(loaded.sensor, created.sensor);
        assert_eq!(loaded.simulator, created.simulator);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "log_level = \"debug\"\n[sensor]\nactivity = \"walking\"\npause_policy = \"display_off\"\n",
        )
        .unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.app_name, crate::NAME);
        assert_eq!(config.sensor.activity, ActivityType::Walking);
        assert_eq!(config.sensor.pause_policy, SensorPausePolicy::DisplayOff);
        assert_eq!(config.sensor.interval_ms, 100);
        assert_eq!(config.simulator, SimulatorConfig::default());
    }

    #[test]
    fn test_invalid_probability_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[simulator]\ndetection_probability = 1.5\n").unwrap();

        assert!(Config::load(&path).is_err());
    }

    #[test]
    fn test_apply_writes_settings() {
        let provider = Arc::new(SimulatedProvider::new());
        provider.add_sensor(
            SensorType::RunningActivityDetector,
            SimulatedSensor::new("activity", "acme"),
        );
        let mut detector = RunningActivityDetector::new(provider.clone(), 0).unwrap();
        let listener = detector.listener_handle().unwrap();

        let settings = SensorConfig {
            interval_ms: 200,
            max_batch_latency_ms: Some(2000),
            pause_policy: SensorPausePolicy::All,
            ..SensorConfig::default()
        };
        settings.apply(&mut detector).unwrap();

        assert_eq!(detector.interval(), 200);
        assert_eq!(detector.max_batch_latency(), 2000);
        assert_eq!(detector.pause_policy(), SensorPausePolicy::All);
        assert_eq!(provider.max_batch_latency(listener), Some(2000));
    }

    #[test]
    fn test_apply_rejects_interval_below_minimum() {
        let provider = Arc::new(SimulatedProvider::new());
        provider.add_sensor(
            SensorType::RunningActivityDetector,
            SimulatedSensor::new("activity", "acme"),
        );
        let mut detector = RunningActivityDetector::new(provider.clone(), 0).unwrap();

        let settings = SensorConfig { interval_ms: 1, ..SensorConfig::default() };
        let err = settings.apply(&mut detector).unwrap_err();
        assert!(matches!(err, SensorError::InvalidArgument(_)));
        assert_eq!(detector.interval(), 0);
    }
}
