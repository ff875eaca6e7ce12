//! HTTP client wrapper - one method per devices API endpoint

use std::time::{Duration, Instant};

use serde::Deserialize;

use crate::models::{Device, DeviceCreate};
use crate::network::error::{ApiError, Operation};

/// Body of `GET /health`
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct HealthStatus {
    pub status: String,
}

/// Client for the devices REST API
#[derive(Clone, Debug)]
pub struct DeviceClient {
    client: reqwest::Client,
    base: String,
}

impl DeviceClient {
    /// `base` is the absolute API root, e.g. `http://localhost:3000/api`
    pub fn new(base: impl Into<String>, timeout: Duration) -> Self {
        DeviceClient {
            client: create_client(timeout),
            base: base.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    fn collection_url(&self) -> String {
        format!("{}/devices", self.base)
    }

    fn device_url(&self, id: &str) -> String {
        format!("{}/devices/{}", self.base, urlencoding::encode(id))
    }

    /// `GET /devices`
    pub async fn list_devices(&self) -> Result<Vec<Device>, ApiError> {
        let start = Instant::now();
        let resp = self.client.get(self.collection_url()).send().await?;
        let status = resp.status();
        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), "Device list request rejected");
            return Err(ApiError::Status {
                operation: Operation::Fetch,
                status: status.as_u16(),
            });
        }

        let body = resp.text().await?;
        let devices: Vec<Device> = serde_json::from_str(&body)?;
        tracing::debug!(
            count = devices.len(),
            time_ms = start.elapsed().as_millis() as u64,
            "Fetched devices"
        );
        Ok(devices)
    }

    /// `POST /devices`
    pub async fn create_device(&self, device: &DeviceCreate) -> Result<(), ApiError> {
        let resp = self
            .client
            .post(self.collection_url())
            .json(device)
            .send()
            .await?;
        check_status(resp, Operation::Add)
    }

    /// `PUT /devices/{id}`
    pub async fn update_device(&self, id: &str, device: &DeviceCreate) -> Result<(), ApiError> {
        let resp = self
            .client
            .put(self.device_url(id))
            .json(device)
            .send()
            .await?;
        check_status(resp, Operation::Update)
    }

    /// `DELETE /devices/{id}`
    pub async fn delete_device(&self, id: &str) -> Result<(), ApiError> {
        let resp = self.client.delete(self.device_url(id)).send().await?;
        check_status(resp, Operation::Delete)
    }

    /// `GET /health`
    pub async fn health(&self) -> Result<HealthStatus, ApiError> {
        let resp = self
            .client
            .get(format!("{}/health", self.base))
            .send()
            .await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(ApiError::Status {
                operation: Operation::Health,
                status: status.as_u16(),
            });
        }
        let body = resp.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}

fn check_status(resp: reqwest::Response, operation: Operation) -> Result<(), ApiError> {
    let status = resp.status();
    if status.is_success() {
        Ok(())
    } else {
        tracing::warn!(
            operation = operation.as_str(),
            status = status.as_u16(),
            "Device request rejected"
        );
        Err(ApiError::Status {
            operation,
            status: status.as_u16(),
        })
    }
}

/// Create an HTTP client with the given timeout
pub fn create_client(timeout: Duration) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .unwrap_or_else(|_| reqwest::Client::new())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_device_url_encodes_id() {
        let client = DeviceClient::new("http://localhost:3000/api/", Duration::from_secs(1));
        assert_eq!(client.base(), "http://localhost:3000/api");
        assert_eq!(
            client.device_url("a b/c"),
            "http://localhost:3000/api/devices/a%20b%2Fc"
        );
    }
}
