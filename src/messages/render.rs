//! Render state - data structure sent from App layer to UI for rendering

use crate::messages::ui_events::{FormField, InputMode, Panel};
use crate::models::{Device, ThemeMode};

/// Complete state needed by the UI to render
#[derive(Debug, Clone)]
pub struct RenderState {
    // Devices
    pub devices: Vec<Device>,
    pub selected_device: usize,
    pub loading: bool,
    pub error: Option<String>,

    // Form
    pub editing_device: Option<Device>,
    pub form_name: String,
    pub form_assigned_to: String,
    pub form_field: FormField,
    pub cursor_position: usize,

    // UI state
    pub active_panel: Panel,
    pub input_mode: InputMode,
    pub theme: ThemeMode,

    // Popups
    pub show_help: bool,
    pub pending_delete: Option<Device>,

    // Backend
    pub api_base: String,
    pub backend_healthy: Option<bool>,
}

impl RenderState {
    pub fn form_title(&self) -> &'static str {
        if self.editing_device.is_some() {
            "Edit Device"
        } else {
            "Add New Device"
        }
    }
}

impl Default for RenderState {
    fn default() -> Self {
        RenderState {
            devices: Vec::new(),
            selected_device: 0,
            loading: false,
            error: None,
            editing_device: None,
            form_name: String::new(),
            form_assigned_to: String::new(),
            form_field: FormField::Name,
            cursor_position: 0,
            active_panel: Panel::Form,
            input_mode: InputMode::Normal,
            theme: ThemeMode::Dark,
            show_help: false,
            pending_delete: None,
            api_base: String::new(),
            backend_healthy: None,
        }
    }
}
