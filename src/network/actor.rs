//! Network actor - runs device API calls in the Tokio runtime

use tokio::sync::mpsc;
use tokio::task::JoinSet;

use crate::messages::{NetworkCommand, NetworkResponse};
use crate::network::client::DeviceClient;
use crate::network::error::Operation;

/// Network actor that processes device API commands
pub struct NetworkActor {
    client: DeviceClient,
    response_tx: mpsc::UnboundedSender<NetworkResponse>,
    active_requests: JoinSet<()>,
}

impl NetworkActor {
    pub fn new(client: DeviceClient, response_tx: mpsc::UnboundedSender<NetworkResponse>) -> Self {
        NetworkActor {
            client,
            response_tx,
            active_requests: JoinSet::new(),
        }
    }

    /// Run the network actor message loop
    pub async fn run(mut self, mut cmd_rx: mpsc::UnboundedReceiver<NetworkCommand>) {
        loop {
            tokio::select! {
                biased;

                cmd = cmd_rx.recv() => {
                    match cmd {
                        Some(NetworkCommand::Shutdown) | None => {
                            self.active_requests.abort_all();
                            break;
                        }
                        Some(cmd) => self.spawn(cmd),
                    }
                }

                // Clean up completed tasks
                Some(_result) = self.active_requests.join_next() => {}
            }
        }
    }

    /// Execute one command in its own task; every command yields one response
    fn spawn(&mut self, cmd: NetworkCommand) {
        let client = self.client.clone();
        let response_tx = self.response_tx.clone();

        self.active_requests.spawn(async move {
            if let Some(response) = execute(&client, cmd).await {
                let _ = response_tx.send(response);
            }
        });
    }
}

/// Run a command against the API and translate the outcome into a response
pub async fn execute(client: &DeviceClient, cmd: NetworkCommand) -> Option<NetworkResponse> {
    let response = match cmd {
        NetworkCommand::FetchDevices { id } => {
            tracing::info!(id, "GET /devices");
            match client.list_devices().await {
                Ok(devices) => NetworkResponse::DevicesLoaded { id, devices },
                Err(e) => NetworkResponse::FetchFailed {
                    id,
                    message: e.to_string(),
                },
            }
        }

        NetworkCommand::AddDevice { id, device } => {
            tracing::info!(id, name = %device.name, "POST /devices");
            mutation_response(id, Operation::Add, None, client.create_device(&device).await)
        }

        NetworkCommand::UpdateDevice {
            id,
            device_id,
            device,
        } => {
            tracing::info!(id, device_id = %device_id, "PUT /devices/{{id}}");
            let result = client.update_device(&device_id, &device).await;
            mutation_response(id, Operation::Update, Some(device_id), result)
        }

        NetworkCommand::DeleteDevice { id, device_id } => {
            tracing::info!(id, device_id = %device_id, "DELETE /devices/{{id}}");
            let result = client.delete_device(&device_id).await;
            mutation_response(id, Operation::Delete, Some(device_id), result)
        }

        NetworkCommand::CheckHealth { id } => match client.health().await {
            Ok(health) => NetworkResponse::Health {
                id,
                healthy: health.status == "healthy",
                detail: health.status,
            },
            Err(e) => NetworkResponse::Health {
                id,
                healthy: false,
                detail: e.to_string(),
            },
        },

        NetworkCommand::Shutdown => return None,
    };
    Some(response)
}

fn mutation_response(
    id: u64,
    operation: Operation,
    device_id: Option<String>,
    result: Result<(), crate::network::ApiError>,
) -> NetworkResponse {
    match result {
        Ok(()) => NetworkResponse::MutationSucceeded {
            id,
            operation,
            device_id,
        },
        Err(e) => NetworkResponse::MutationFailed {
            id,
            operation,
            message: e.to_string(),
        },
    }
}
