//! App state - pure data structure with no I/O logic

use std::collections::BTreeSet;

use crate::messages::ui_events::{FormField, InputMode, Panel};
use crate::messages::RenderState;
use crate::models::{Device, DeviceCreate, ThemeMode};
use crate::storage::PreferenceProvider;
use crate::theme;

/// Progress of the device collection sync
#[derive(Clone, Debug, Default, PartialEq)]
pub enum SyncState {
    /// Nothing fetched yet
    #[default]
    Idle,
    /// One or more fetches outstanding, keyed by request id
    Loading { pending: BTreeSet<u64> },
    /// Last completed fetch succeeded
    Loaded,
    /// Last completed fetch failed
    Failed,
}

impl SyncState {
    pub fn is_loading(&self) -> bool {
        matches!(self, SyncState::Loading { .. })
    }

    /// Register an outstanding fetch
    pub fn begin(self, request_id: u64) -> SyncState {
        let mut pending = match self {
            SyncState::Loading { pending } => pending,
            _ => BTreeSet::new(),
        };
        pending.insert(request_id);
        SyncState::Loading { pending }
    }

    /// Settle a fetch. Loading ends once no fetch remains outstanding.
    ///
    /// Returns the new state and whether `request_id` was outstanding.
    pub fn complete(self, request_id: u64, succeeded: bool) -> (SyncState, bool) {
        match self {
            SyncState::Loading { mut pending } => {
                let known = pending.remove(&request_id);
                if !known {
                    return (SyncState::Loading { pending }, false);
                }
                if pending.is_empty() {
                    let settled = if succeeded {
                        SyncState::Loaded
                    } else {
                        SyncState::Failed
                    };
                    (settled, true)
                } else {
                    (SyncState::Loading { pending }, true)
                }
            }
            other => (other, false),
        }
    }
}

/// Text held by the add/edit form
#[derive(Clone, Debug)]
pub struct DeviceForm {
    pub name: String,
    pub assigned_to: String,
    pub field: FormField,
    pub cursor_position: usize,
}

impl Default for DeviceForm {
    fn default() -> Self {
        DeviceForm {
            name: String::new(),
            assigned_to: String::new(),
            field: FormField::Name,
            cursor_position: 0,
        }
    }
}

impl DeviceForm {
    /// Form prefilled with a device's editable fields
    pub fn from_device(device: &Device) -> Self {
        let name = device.name.clone();
        DeviceForm {
            cursor_position: name.chars().count(),
            name,
            assigned_to: device.assigned_to.clone().unwrap_or_default(),
            field: FormField::Name,
        }
    }

    pub fn current(&self) -> &str {
        match self.field {
            FormField::Name => &self.name,
            FormField::AssignedTo => &self.assigned_to,
        }
    }

    pub fn current_mut(&mut self) -> &mut String {
        match self.field {
            FormField::Name => &mut self.name,
            FormField::AssignedTo => &mut self.assigned_to,
        }
    }

    pub fn payload(&self) -> Option<DeviceCreate> {
        DeviceCreate::from_form(&self.name, &self.assigned_to)
    }
}

/// Main application state - pure data, no I/O
pub struct AppState {
    // Devices (backend order)
    pub devices: Vec<Device>,
    pub selected_device: usize,
    pub sync: SyncState,
    pub error: Option<String>,

    // Form
    pub editing_device: Option<Device>,
    pub form: DeviceForm,

    // UI state
    pub active_panel: Panel,
    pub input_mode: InputMode,
    pub theme: ThemeMode,

    // Popups
    pub show_help: bool,
    pub pending_delete: Option<Device>,

    // Requests
    pub next_request_id: u64,

    // Backend
    pub api_base: String,
    pub backend_healthy: Option<bool>,

    // Persisted preferences
    pub preferences: Box<dyn PreferenceProvider>,
}

impl AppState {
    /// Create the state at mount: empty devices and the resolved theme
    pub fn new(preferences: Box<dyn PreferenceProvider>, api_base: impl Into<String>) -> Self {
        let mut state = AppState {
            devices: Vec::new(),
            selected_device: 0,
            sync: SyncState::Idle,
            error: None,
            editing_device: None,
            form: DeviceForm::default(),
            active_panel: Panel::Form,
            input_mode: InputMode::Normal,
            theme: theme::initial_theme(preferences.as_ref()),
            show_help: false,
            pending_delete: None,
            next_request_id: 1,
            api_base: api_base.into(),
            backend_healthy: None,
            preferences,
        };
        let initial = state.theme;
        state.set_theme(initial);
        state
    }

    /// Generate a unique request ID
    pub fn next_id(&mut self) -> u64 {
        let id = self.next_request_id;
        self.next_request_id += 1;
        id
    }

    pub fn loading(&self) -> bool {
        self.sync.is_loading()
    }

    pub fn selected(&self) -> Option<&Device> {
        self.devices.get(self.selected_device)
    }

    /// Convert state to RenderState for UI
    pub fn to_render_state(&self) -> RenderState {
        RenderState {
            devices: self.devices.clone(),
            selected_device: self.selected_device,
            loading: self.loading(),
            error: self.error.clone(),
            editing_device: self.editing_device.clone(),
            form_name: self.form.name.clone(),
            form_assigned_to: self.form.assigned_to.clone(),
            form_field: self.form.field,
            cursor_position: self.form.cursor_position,
            active_panel: self.active_panel,
            input_mode: self.input_mode,
            theme: self.theme,
            show_help: self.show_help,
            pending_delete: self.pending_delete.clone(),
            api_base: self.api_base.clone(),
            backend_healthy: self.backend_healthy,
        }
    }
}
