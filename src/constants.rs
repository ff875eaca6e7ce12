//! Application constants
//!
//! Centralized location for magic strings and configuration defaults.

/// Default API base path when no override is supplied
pub const DEFAULT_API_BASE: &str = "/api";

/// Origin used to resolve a relative API base path
pub const DEFAULT_SERVER_ORIGIN: &str = "http://localhost:3000";

/// Default HTTP timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Environment variable overriding the API base
pub const ENV_API_URL: &str = "DEVICE_API_URL";

/// Environment variable overriding the origin for relative API bases
pub const ENV_SERVER_ORIGIN: &str = "DEVICE_SERVER_ORIGIN";

/// Environment variable overriding the request timeout
pub const ENV_TIMEOUT_SECS: &str = "DEVICE_API_TIMEOUT_SECS";

/// Preference key holding the theme mode
pub const THEME_STORAGE_KEY: &str = "theme";

/// Directory (under the home dir) for persisted preferences
pub const CONFIG_DIR_NAME: &str = ".devinv";

/// Preferences file name
pub const PREFERENCES_FILE: &str = "preferences.yaml";

/// Log file name
pub const LOG_FILE: &str = "devinv.log";

/// Prompt shown before a delete is dispatched
pub const DELETE_CONFIRM_PROMPT: &str = "Are you sure you want to delete this device?";

/// Application name
pub const APP_NAME: &str = "Device Management";
