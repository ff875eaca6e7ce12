//! # Device Inventory TUI
//!
//! A terminal client for a REST devices API: list, add, edit and delete
//! device records.
//!
//! ## Features
//! - Full-collection sync on start and after every change
//! - Add / edit form with required name and optional assignee
//! - Delete with an explicit confirmation step
//! - Light/dark theme persisted across runs
//!
//! ## Architecture
//! Actor-based with channels:
//! - UI Layer (Ratatui) - synchronous
//! - App Layer (State machine)
//! - Network Layer (Tokio runtime)

pub mod app;
pub mod config;
pub mod constants;
pub mod messages;
pub mod models;
pub mod network;
pub mod storage;
pub mod theme;
pub mod ui;

// Re-export commonly used types
pub use models::{Device, DeviceCreate, ThemeMode};
pub use messages::{UiEvent, NetworkCommand, NetworkResponse, RenderState};
pub use app::{AppState, AppActor, SyncState};
pub use network::{DeviceClient, NetworkActor, ApiError, Operation};
pub use storage::{PreferenceProvider, FilePreferences, MemoryPreferences};
