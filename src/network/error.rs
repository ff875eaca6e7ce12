//! API error taxonomy

use thiserror::Error;

/// Backend operation performed by the client
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operation {
    Fetch,
    Add,
    Update,
    Delete,
    Health,
}

impl Operation {
    /// Fixed message shown when the backend answers with a non-2xx status
    pub fn failure_message(&self) -> &'static str {
        match self {
            Operation::Fetch => "Failed to fetch devices",
            Operation::Add => "Failed to add device",
            Operation::Update => "Failed to update device",
            Operation::Delete => "Failed to delete device",
            Operation::Health => "Health check failed",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Fetch => "fetch",
            Operation::Add => "add",
            Operation::Update => "update",
            Operation::Delete => "delete",
            Operation::Health => "health",
        }
    }
}

/// A failed call against the devices API.
///
/// Status failures render the fixed per-operation message; transport and
/// decode failures render the underlying error text.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{}", .operation.failure_message())]
    Status { operation: Operation, status: u16 },

    #[error("{0}")]
    Transport(#[from] reqwest::Error),

    #[error("{0}")]
    Decode(#[from] serde_json::Error),
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_error_uses_fixed_message() {
        let err = ApiError::Status {
            operation: Operation::Add,
            status: 500,
        };
        assert_eq!(err.to_string(), "Failed to add device");
        assert_eq!(err.status(), Some(500));
    }

    #[test]
    fn test_decode_error_uses_underlying_text() {
        let inner = serde_json::from_str::<Vec<u8>>("{").unwrap_err();
        let text = inner.to_string();
        let err = ApiError::from(inner);
        assert_eq!(err.to_string(), text);
        assert_eq!(err.status(), None);
    }
}
