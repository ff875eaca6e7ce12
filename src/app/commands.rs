//! Command handlers - business logic for processing UI events

use crate::app::state::{AppState, DeviceForm};
use crate::messages::ui_events::{FormField, InputMode, Panel};
use crate::messages::{NetworkCommand, NetworkResponse};
use crate::models::{Device, ThemeMode};
use crate::network::Operation;
use crate::theme;

impl AppState {
    // ========================
    // Sync
    // ========================

    /// Start a full-collection fetch
    pub fn refresh(&mut self) -> NetworkCommand {
        let id = self.next_id();
        self.sync = std::mem::take(&mut self.sync).begin(id);
        self.error = None;
        tracing::debug!(id, "Refreshing devices");
        NetworkCommand::FetchDevices { id }
    }

    /// Commands issued when the view mounts
    pub fn mount(&mut self) -> Vec<NetworkCommand> {
        let health = NetworkCommand::CheckHealth { id: self.next_id() };
        vec![health, self.refresh()]
    }

    /// Apply a network response; returns a follow-up command if one is due
    pub fn handle_response(&mut self, response: NetworkResponse) -> Option<NetworkCommand> {
        tracing::debug!(id = response.id(), "Network response received");
        match response {
            NetworkResponse::DevicesLoaded { id, devices } => {
                self.settle_fetch(id, true);
                self.replace_devices(devices);
                None
            }
            NetworkResponse::FetchFailed { id, message } => {
                self.settle_fetch(id, false);
                self.error = Some(message);
                None
            }
            NetworkResponse::MutationSucceeded {
                id,
                operation,
                device_id,
            } => {
                tracing::info!(id, operation = operation.as_str(), "Mutation succeeded");
                let follow_up = self.refresh();
                match operation {
                    Operation::Add => self.reset_form(),
                    Operation::Update => {
                        let edited = self.editing_device.as_ref().map(|d| d.id.clone());
                        if edited.is_some() && edited == device_id {
                            self.clear_editing();
                        }
                    }
                    _ => {}
                }
                Some(follow_up)
            }
            NetworkResponse::MutationFailed {
                id,
                operation,
                message,
            } => {
                tracing::warn!(id, operation = operation.as_str(), %message, "Mutation failed");
                self.error = Some(message);
                None
            }
            NetworkResponse::Health {
                healthy, detail, ..
            } => {
                tracing::info!(healthy, %detail, "Backend health");
                self.backend_healthy = Some(healthy);
                None
            }
        }
    }

    fn settle_fetch(&mut self, id: u64, succeeded: bool) {
        let (sync, known) = std::mem::take(&mut self.sync).complete(id, succeeded);
        self.sync = sync;
        if !known {
            tracing::debug!(id, "Fetch result for untracked request");
        }
    }

    fn replace_devices(&mut self, devices: Vec<Device>) {
        self.devices = devices;
        if self.selected_device >= self.devices.len() {
            self.selected_device = self.devices.len().saturating_sub(1);
        }

        // The edited device must still exist in the collection
        let still_present = self
            .editing_device
            .as_ref()
            .map(|editing| self.devices.iter().any(|d| d.id == editing.id));
        if still_present == Some(false) {
            tracing::info!("Edited device no longer present, leaving edit mode");
            self.clear_editing();
        }
    }

    // ========================
    // Mutations
    // ========================

    /// Submit the form as an add or an update depending on edit mode
    pub fn submit_form(&mut self) -> Option<NetworkCommand> {
        self.input_mode = InputMode::Normal;

        let Some(device) = self.form.payload() else {
            self.error = Some(String::from("Device name is required"));
            return None;
        };

        let id = self.next_id();
        match &self.editing_device {
            Some(editing) => Some(NetworkCommand::UpdateDevice {
                id,
                device_id: editing.id.clone(),
                device,
            }),
            None => Some(NetworkCommand::AddDevice { id, device }),
        }
    }

    /// Ask for confirmation before deleting a device
    pub fn request_delete(&mut self, device: Device) {
        self.pending_delete = Some(device);
    }

    pub fn delete_selected(&mut self) {
        if let Some(device) = self.selected().cloned() {
            self.request_delete(device);
        }
    }

    /// User accepted the confirmation prompt
    pub fn confirm_delete(&mut self) -> Option<NetworkCommand> {
        let device = self.pending_delete.take()?;
        Some(NetworkCommand::DeleteDevice {
            id: self.next_id(),
            device_id: device.id,
        })
    }

    /// User declined the confirmation prompt
    pub fn cancel_delete(&mut self) {
        self.pending_delete = None;
    }

    // ========================
    // Editing
    // ========================

    pub fn edit_device(&mut self, device: Device) {
        self.form = DeviceForm::from_device(&device);
        self.editing_device = Some(device);
        self.active_panel = Panel::Form;
        self.input_mode = InputMode::Normal;
    }

    pub fn edit_selected(&mut self) {
        if let Some(device) = self.selected().cloned() {
            self.edit_device(device);
        }
    }

    /// Leave edit mode (or clear the add form)
    pub fn cancel_edit(&mut self) {
        self.clear_editing();
    }

    pub fn new_device(&mut self) {
        self.clear_editing();
        self.active_panel = Panel::Form;
        self.start_editing();
    }

    fn clear_editing(&mut self) {
        self.editing_device = None;
        self.reset_form();
    }

    fn reset_form(&mut self) {
        self.form = DeviceForm::default();
        self.input_mode = InputMode::Normal;
    }

    // ========================
    // Theme
    // ========================

    pub fn set_theme(&mut self, mode: ThemeMode) {
        self.theme = mode;
        theme::persist_theme(self.preferences.as_mut(), mode);
    }

    pub fn toggle_theme(&mut self) {
        let next = self.theme.toggled();
        self.set_theme(next);
    }

    // ========================
    // Navigation
    // ========================

    pub fn next_panel(&mut self) {
        self.active_panel = self.active_panel.next();
        self.input_mode = InputMode::Normal;
    }

    pub fn prev_panel(&mut self) {
        self.active_panel = self.active_panel.prev();
        self.input_mode = InputMode::Normal;
    }

    pub fn select_next(&mut self) {
        if !self.devices.is_empty() {
            self.selected_device = (self.selected_device + 1) % self.devices.len();
        }
    }

    pub fn select_prev(&mut self) {
        if !self.devices.is_empty() {
            self.selected_device = self
                .selected_device
                .checked_sub(1)
                .unwrap_or(self.devices.len() - 1);
        }
    }

    // ========================
    // Input editing
    // ========================

    pub fn start_editing(&mut self) {
        self.input_mode = InputMode::Editing;
        self.form.cursor_position = self.form.current().chars().count();
    }

    pub fn stop_editing(&mut self) {
        self.input_mode = InputMode::Normal;
    }

    pub fn next_field(&mut self) {
        self.form.field = self.form.field.next();
        self.form.cursor_position = self.form.current().chars().count();
    }

    pub fn prev_field(&mut self) {
        // Two fields: previous and next coincide
        self.next_field();
    }

    pub fn enter_char(&mut self, c: char) {
        let cursor = self.form.cursor_position;
        let input = self.form.current_mut();
        let index = byte_index(input, cursor);
        input.insert(index, c);
        self.form.cursor_position += 1;
    }

    pub fn delete_char(&mut self) {
        let cursor = self.form.cursor_position;
        if cursor == 0 {
            return;
        }
        let input = self.form.current_mut();
        let index = byte_index(input, cursor - 1);
        input.remove(index);
        self.form.cursor_position -= 1;
    }

    pub fn move_cursor_left(&mut self) {
        self.form.cursor_position = self.form.cursor_position.saturating_sub(1);
    }

    pub fn move_cursor_right(&mut self) {
        let len = self.form.current().chars().count();
        self.form.cursor_position = (self.form.cursor_position + 1).min(len);
    }

    pub fn focus_field(&mut self, field: FormField) {
        self.form.field = field;
        self.form.cursor_position = self.form.current().chars().count();
    }

    // ========================
    // Help popup
    // ========================

    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    pub fn close_help(&mut self) {
        self.show_help = false;
    }
}

/// Byte offset of the `char_index`-th character, clamped to the end
fn byte_index(text: &str, char_index: usize) -> usize {
    text.char_indices()
        .nth(char_index)
        .map(|(i, _)| i)
        .unwrap_or(text.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::THEME_STORAGE_KEY;
    use crate::storage::{MemoryPreferences, PreferenceProvider};
    use std::sync::{Arc, Mutex};

    /// Memory preferences observable after being boxed into the state
    #[derive(Clone, Default)]
    struct SharedPrefs(Arc<Mutex<MemoryPreferences>>);

    impl PreferenceProvider for SharedPrefs {
        fn get(&self, key: &str) -> Option<String> {
            self.0.lock().unwrap().get(key)
        }
        fn set(&mut self, key: &str, value: &str) -> anyhow::Result<()> {
            self.0.lock().unwrap().set(key, value)
        }
        fn prefers_dark(&self) -> Option<bool> {
            self.0.lock().unwrap().prefers_dark()
        }
    }

    fn device(id: &str, name: &str) -> Device {
        serde_json::from_value(serde_json::json!({ "id": id, "name": name })).unwrap()
    }

    fn new_state() -> AppState {
        AppState::new(Box::new(MemoryPreferences::new()), "http://test/api")
    }

    fn loaded_state(devices: Vec<Device>) -> AppState {
        let mut state = new_state();
        let cmd = state.refresh();
        let id = cmd.id().unwrap();
        state.handle_response(NetworkResponse::DevicesLoaded { id, devices });
        state
    }

    fn type_text(state: &mut AppState, text: &str) {
        for c in text.chars() {
            state.enter_char(c);
        }
    }

    #[test]
    fn test_refresh_success_replaces_devices() {
        let mut state = new_state();
        state.error = Some(String::from("stale"));
        let cmd = state.refresh();
        assert!(state.loading());
        assert_eq!(state.error, None);

        let id = cmd.id().unwrap();
        let follow_up = state.handle_response(NetworkResponse::DevicesLoaded {
            id,
            devices: vec![device("1", "A")],
        });

        assert_eq!(follow_up, None);
        assert!(!state.loading());
        assert_eq!(state.error, None);
        assert_eq!(state.devices, vec![device("1", "A")]);
    }

    #[test]
    fn test_refresh_failure_sets_error_and_clears_loading() {
        let mut state = loaded_state(vec![device("1", "A")]);
        let id = state.refresh().id().unwrap();
        state.handle_response(NetworkResponse::FetchFailed {
            id,
            message: String::from("Failed to fetch devices"),
        });
        assert!(!state.loading());
        assert_eq!(state.error.as_deref(), Some("Failed to fetch devices"));
        assert_eq!(state.devices.len(), 1);
    }

    #[test]
    fn test_later_resolving_refresh_wins() {
        let mut state = new_state();
        let first = state.refresh().id().unwrap();
        let second = state.refresh().id().unwrap();

        state.handle_response(NetworkResponse::DevicesLoaded {
            id: second,
            devices: vec![device("2", "B")],
        });
        assert!(state.loading());
        state.handle_response(NetworkResponse::DevicesLoaded {
            id: first,
            devices: vec![device("1", "A")],
        });
        assert!(!state.loading());
        assert_eq!(state.devices, vec![device("1", "A")]);
    }

    #[test]
    fn test_add_emits_post_then_refresh() {
        let mut state = loaded_state(Vec::new());
        type_text(&mut state, "MacBook Pro M3");
        state.focus_field(FormField::AssignedTo);
        type_text(&mut state, "Alice Smith");

        let cmd = state.submit_form().unwrap();
        let NetworkCommand::AddDevice { id, device } = cmd else {
            panic!("expected add command");
        };
        assert_eq!(device.name, "MacBook Pro M3");
        assert_eq!(device.assigned_to.as_deref(), Some("Alice Smith"));

        let follow_up = state.handle_response(NetworkResponse::MutationSucceeded {
            id,
            operation: Operation::Add,
            device_id: None,
        });
        assert!(matches!(follow_up, Some(NetworkCommand::FetchDevices { .. })));
        assert!(state.loading());
        assert!(state.form.name.is_empty());
    }

    #[test]
    fn test_add_failure_sets_error_without_refresh() {
        let mut state = loaded_state(vec![device("1", "A")]);
        type_text(&mut state, "Phone");
        let id = state.submit_form().unwrap().id().unwrap();

        let follow_up = state.handle_response(NetworkResponse::MutationFailed {
            id,
            operation: Operation::Add,
            message: String::from("Failed to add device"),
        });
        assert_eq!(follow_up, None);
        assert_eq!(state.error.as_deref(), Some("Failed to add device"));
        assert_eq!(state.devices, vec![device("1", "A")]);
        assert!(!state.loading());
    }

    #[test]
    fn test_empty_name_is_rejected_locally() {
        let mut state = new_state();
        type_text(&mut state, "   ");
        assert_eq!(state.submit_form(), None);
        assert_eq!(state.error.as_deref(), Some("Device name is required"));
    }

    #[test]
    fn test_update_success_clears_editing() {
        let mut state = loaded_state(vec![device("1", "A"), device("2", "B")]);
        state.select_next();
        state.edit_selected();
        assert_eq!(state.editing_device.as_ref().map(|d| d.id.as_str()), Some("2"));
        assert_eq!(state.form.name, "B");

        state.start_editing();
        type_text(&mut state, "eta");
        let cmd = state.submit_form().unwrap();
        let NetworkCommand::UpdateDevice { id, device_id, device } = cmd else {
            panic!("expected update command");
        };
        assert_eq!(device_id, "2");
        assert_eq!(device.name, "Beta");

        let follow_up = state.handle_response(NetworkResponse::MutationSucceeded {
            id,
            operation: Operation::Update,
            device_id: Some(device_id),
        });
        assert!(matches!(follow_up, Some(NetworkCommand::FetchDevices { .. })));
        assert_eq!(state.editing_device, None);
    }

    #[test]
    fn test_update_failure_keeps_editing() {
        let mut state = loaded_state(vec![device("1", "A")]);
        state.edit_selected();
        let id = state.submit_form().unwrap().id().unwrap();
        state.handle_response(NetworkResponse::MutationFailed {
            id,
            operation: Operation::Update,
            message: String::from("Failed to update device"),
        });
        assert_eq!(state.editing_device, Some(device("1", "A")));
        assert_eq!(state.error.as_deref(), Some("Failed to update device"));
    }

    #[test]
    fn test_declined_delete_is_noop() {
        let mut state = loaded_state(vec![device("1", "A")]);
        let before_id = state.next_request_id;
        state.delete_selected();
        assert!(state.pending_delete.is_some());
        state.cancel_delete();

        assert_eq!(state.pending_delete, None);
        assert_eq!(state.confirm_delete(), None);
        assert_eq!(state.next_request_id, before_id);
        assert_eq!(state.devices, vec![device("1", "A")]);
    }

    #[test]
    fn test_confirmed_delete_then_refresh() {
        let mut state = loaded_state(vec![device("1", "A"), device("2", "B")]);
        state.delete_selected();
        let cmd = state.confirm_delete().unwrap();
        let NetworkCommand::DeleteDevice { id, device_id } = cmd else {
            panic!("expected delete command");
        };
        assert_eq!(device_id, "1");

        let follow_up = state
            .handle_response(NetworkResponse::MutationSucceeded {
                id,
                operation: Operation::Delete,
                device_id: Some(device_id),
            })
            .unwrap();
        state.handle_response(NetworkResponse::DevicesLoaded {
            id: follow_up.id().unwrap(),
            devices: vec![device("2", "B")],
        });
        assert_eq!(state.devices, vec![device("2", "B")]);
    }

    #[test]
    fn test_editing_dropped_when_device_disappears() {
        let mut state = loaded_state(vec![device("1", "A")]);
        state.edit_selected();
        let id = state.refresh().id().unwrap();
        state.handle_response(NetworkResponse::DevicesLoaded {
            id,
            devices: Vec::new(),
        });
        assert_eq!(state.editing_device, None);
        assert_eq!(state.selected_device, 0);
    }

    #[test]
    fn test_theme_toggle_persists_every_change() {
        let prefs = SharedPrefs::default();
        let mut state = AppState::new(Box::new(prefs.clone()), "http://test/api");
        assert_eq!(state.theme, ThemeMode::Dark);

        state.toggle_theme();
        assert_eq!(state.theme, ThemeMode::Light);
        assert_eq!(prefs.get(THEME_STORAGE_KEY).as_deref(), Some("light"));

        state.toggle_theme();
        assert_eq!(state.theme, ThemeMode::Dark);
        assert_eq!(prefs.get(THEME_STORAGE_KEY).as_deref(), Some("dark"));

        let writes = prefs.0.lock().unwrap().writes.len();
        assert_eq!(writes, 3);
    }

    #[test]
    fn test_unicode_editing() {
        let mut state = new_state();
        state.start_editing();
        type_text(&mut state, "Écran");
        state.move_cursor_left();
        state.delete_char();
        assert_eq!(state.form.name, "Écrn");
        state.enter_char('ä');
        assert_eq!(state.form.name, "Écrän");
    }
}
