// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.
// https://github.com/bad-antics/sensorkit-rs

//! Error taxonomy for the sensor layer

use std::fmt;

use crate::sensors::SensorType;

/// Result alias used by every sensor operation
pub type Result<T> = std::result::Result<T, SensorError>;

const ERROR_MIN_PLATFORM: i32 = -0x4000_0000;
const ERROR_SENSOR: i32 = -0x0244_0000;

/// Native status codes reported by a capability provider.
///
/// Success is not represented: providers return `Ok(..)` instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, thiserror::Error)]
pub enum NativeError {
    #[error("I/O error")]
    IoError,
    #[error("invalid parameter")]
    InvalidParameter,
    #[error("not supported")]
    NotSupported,
    #[error("permission denied")]
    PermissionDenied,
    #[error("out of memory")]
    OutOfMemory,
    #[error("no data")]
    NoData,
    #[error("calibration not needed")]
    NotNeedCalibration,
    #[error("operation failed")]
    OperationFailed,
    #[error("native error {0}")]
    Other(i32),
}

impl NativeError {
    /// Native success code
    pub const NONE: i32 = 0;

    /// Raw native code for this error
    pub fn code(self) -> i32 {
        match self {
            NativeError::IoError => -5,
            NativeError::InvalidParameter => -22,
            NativeError::NotSupported => ERROR_MIN_PLATFORM + 2,
            NativeError::PermissionDenied => -13,
            NativeError::OutOfMemory => -12,
            NativeError::NoData => -61,
            NativeError::NotNeedCalibration => ERROR_SENSOR | 0x03,
            NativeError::OperationFailed => ERROR_SENSOR | 0x06,
            NativeError::Other(code) => code,
        }
    }

    /// Decode a raw native status. Returns `None` for success.
    pub fn from_code(code: i32) -> Option<Self> {
        let error = match code {
            Self::NONE => return None,
            -5 => NativeError::IoError,
            -22 => NativeError::InvalidParameter,
            -13 => NativeError::PermissionDenied,
            -12 => NativeError::OutOfMemory,
            -61 => NativeError::NoData,
            c if c == ERROR_MIN_PLATFORM + 2 => NativeError::NotSupported,
            c if c == ERROR_SENSOR | 0x03 => NativeError::NotNeedCalibration,
            c if c == ERROR_SENSOR | 0x06 => NativeError::OperationFailed,
            other => NativeError::Other(other),
        };
        Some(error)
    }
}

/// Provider operation that can fail after construction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    SensorList,
    CreateListener,
    DestroyListener,
    StartListener,
    StopListener,
    SetEventCallback,
    UnsetEventCallback,
    SetAttribute,
    SetPausePolicy,
    SetInterval,
    SetMaxBatchLatency,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Operation::SensorList => "Sensor.GetSensorList",
            Operation::CreateListener => "Sensor.CreateListener",
            Operation::DestroyListener => "Sensor.DestroyListener",
            Operation::StartListener => "Sensor.Start",
            Operation::StopListener => "Sensor.Stop",
            Operation::SetEventCallback => "Sensor.SetEventCallback",
            Operation::UnsetEventCallback => "Sensor.UnsetEventCallback",
            Operation::SetAttribute => "Sensor.SetAttribute",
            Operation::SetPausePolicy => "Sensor.PausePolicy",
            Operation::SetInterval => "Sensor.Interval",
            Operation::SetMaxBatchLatency => "Sensor.MaxBatchLatency",
        };
        f.write_str(name)
    }
}

/// Descriptor property fetched at construction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Property {
    Name,
    Vendor,
    MinValue,
    MaxValue,
    Resolution,
    MinInterval,
    FifoCount,
    MaxBatchCount,
}

impl fmt::Display for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Property::Name => "Sensor.Name",
            Property::Vendor => "Sensor.Vendor",
            Property::MinValue => "Sensor.MinValue",
            Property::MaxValue => "Sensor.MaxValue",
            Property::Resolution => "Sensor.Resolution",
            Property::MinInterval => "Sensor.MinInterval",
            Property::FifoCount => "Sensor.FifoCount",
            Property::MaxBatchCount => "Sensor.MaxBatchCount",
        };
        f.write_str(name)
    }
}

/// Errors surfaced by the sensor layer
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SensorError {
    /// Sensor or listener handle is missing, null or already released
    #[error("invalid handle: {0}")]
    InvalidHandle(&'static str),

    /// Sensor class or index is not available on this device
    #[error("{sensor_type:?} #{index} is not supported on this device")]
    NotSupported { sensor_type: SensorType, index: u32 },

    /// A provider call returned a failure status
    #[error("{operation} failed: {code}")]
    Provider { operation: Operation, code: NativeError },

    /// A descriptor property could not be fetched during construction
    #[error("{property} unavailable: {code}")]
    PropertyUnavailable { property: Property, code: NativeError },

    /// Bad index or configuration value
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

impl SensorError {
    /// Translate a provider failure for `operation` into the public taxonomy
    pub fn from_native(operation: Operation, code: NativeError) -> Self {
        match code {
            NativeError::InvalidParameter => {
                SensorError::InvalidArgument(format!("{} rejected its parameter", operation))
            }
            code => SensorError::Provider { operation, code },
        }
    }

    /// Native code carried by this error, if any
    pub fn native_code(&self) -> Option<NativeError> {
        match self {
            SensorError::Provider { code, .. } | SensorError::PropertyUnavailable { code, .. } => {
                Some(*code)
            }
            _ => None,
        }
    }

    pub fn is_not_supported(&self) -> bool {
        matches!(self, SensorError::NotSupported { .. })
    }
}
