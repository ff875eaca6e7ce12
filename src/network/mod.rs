//! Network layer - HTTP calls against the devices API
//!
//! The Network actor receives device commands and sends back responses.

pub mod actor;
pub mod client;
pub mod error;

pub use actor::NetworkActor;
pub use client::DeviceClient;
pub use error::{ApiError, Operation};
