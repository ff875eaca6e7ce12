//! Network messages - communication between App and Network layers

use crate::models::{Device, DeviceCreate};
use crate::network::Operation;

/// Commands sent from App layer to Network layer
#[derive(Debug, Clone, PartialEq)]
pub enum NetworkCommand {
    /// Fetch the full device collection
    FetchDevices { id: u64 },
    /// Create a device
    AddDevice { id: u64, device: DeviceCreate },
    /// Replace the editable fields of an existing device
    UpdateDevice {
        id: u64,
        device_id: String,
        device: DeviceCreate,
    },
    /// Delete a device
    DeleteDevice { id: u64, device_id: String },
    /// Probe the backend health endpoint
    CheckHealth { id: u64 },
    /// Shutdown the network actor
    Shutdown,
}

impl NetworkCommand {
    pub fn id(&self) -> Option<u64> {
        match self {
            NetworkCommand::FetchDevices { id }
            | NetworkCommand::AddDevice { id, .. }
            | NetworkCommand::UpdateDevice { id, .. }
            | NetworkCommand::DeleteDevice { id, .. }
            | NetworkCommand::CheckHealth { id } => Some(*id),
            NetworkCommand::Shutdown => None,
        }
    }
}

/// Responses sent from Network layer to App layer
#[derive(Debug, Clone, PartialEq)]
pub enum NetworkResponse {
    /// Device collection fetched
    DevicesLoaded { id: u64, devices: Vec<Device> },
    /// Device collection fetch failed
    FetchFailed { id: u64, message: String },
    /// A mutation was accepted by the backend
    MutationSucceeded {
        id: u64,
        operation: Operation,
        device_id: Option<String>,
    },
    /// A mutation failed
    MutationFailed {
        id: u64,
        operation: Operation,
        message: String,
    },
    /// Result of a health probe
    Health {
        id: u64,
        healthy: bool,
        detail: String,
    },
}

impl NetworkResponse {
    /// Get the request ID
    pub fn id(&self) -> u64 {
        match self {
            NetworkResponse::DevicesLoaded { id, .. } => *id,
            NetworkResponse::FetchFailed { id, .. } => *id,
            NetworkResponse::MutationSucceeded { id, .. } => *id,
            NetworkResponse::MutationFailed { id, .. } => *id,
            NetworkResponse::Health { id, .. } => *id,
        }
    }
}
