//! Core plumbing shared by providers and sensors: error taxonomy and event fan-out

mod error;
mod event_bus;

pub use error::{NativeError, Operation, Property, Result, SensorError};
pub use event_bus::{CallbackTable, EventHandler, SubscriptionId};
