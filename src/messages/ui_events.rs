//! UI events - messages from UI layer to App layer

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Events generated from user input in the UI layer
#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    // Panel navigation
    NextPanel,
    PrevPanel,

    // Device list
    SelectNext,
    SelectPrev,
    EditSelected,
    DeleteSelected,
    NewDevice,

    // Delete confirmation
    ConfirmDelete,
    CancelDelete,

    // Form editing
    StartEditing,
    StopEditing,
    CharInput(char),
    Backspace,
    CursorLeft,
    CursorRight,
    NextField,
    PrevField,
    SubmitForm,
    CancelEdit,

    // Sync
    Refresh,

    // Theme
    ToggleTheme,

    // Popups
    ToggleHelp,
    CloseHelp,

    // System
    Quit,
}

/// Focused area of the screen
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum Panel {
    Form,
    List,
}

impl Panel {
    pub fn next(&self) -> Panel {
        match self {
            Panel::Form => Panel::List,
            Panel::List => Panel::Form,
        }
    }

    pub fn prev(&self) -> Panel {
        // Two panels: previous and next coincide
        self.next()
    }
}

/// Input mode
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum InputMode {
    Normal,
    Editing,
}

/// Device form field
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum FormField {
    Name,
    AssignedTo,
}

impl FormField {
    pub fn next(&self) -> FormField {
        match self {
            FormField::Name => FormField::AssignedTo,
            FormField::AssignedTo => FormField::Name,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            FormField::Name => "Device Name",
            FormField::AssignedTo => "Assigned To",
        }
    }
}

/// Convert a key event to a UiEvent based on current UI context
pub fn key_to_ui_event(
    key: KeyEvent,
    active_panel: Panel,
    input_mode: InputMode,
    show_help: bool,
    confirming_delete: bool,
) -> Option<UiEvent> {
    use crossterm::event::KeyEventKind;

    if key.kind != KeyEventKind::Press {
        return None;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) {
        match key.code {
            KeyCode::Char('c') => return Some(UiEvent::Quit),
            KeyCode::Char('r') => return Some(UiEvent::Refresh),
            _ => {}
        }
    }

    // Confirmation popup captures every key
    if confirming_delete {
        return match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => Some(UiEvent::ConfirmDelete),
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => Some(UiEvent::CancelDelete),
            _ => None,
        };
    }

    if show_help {
        return Some(UiEvent::CloseHelp);
    }

    match input_mode {
        InputMode::Normal => handle_normal_keys(key, active_panel),
        InputMode::Editing => match key.code {
            KeyCode::Esc => Some(UiEvent::StopEditing),
            KeyCode::Left => Some(UiEvent::CursorLeft),
            KeyCode::Right => Some(UiEvent::CursorRight),
            KeyCode::Backspace => Some(UiEvent::Backspace),
            KeyCode::Tab | KeyCode::Down => Some(UiEvent::NextField),
            KeyCode::BackTab | KeyCode::Up => Some(UiEvent::PrevField),
            KeyCode::Enter => Some(UiEvent::SubmitForm),
            KeyCode::Char(c) => Some(UiEvent::CharInput(c)),
            _ => None,
        },
    }
}

fn handle_normal_keys(key: KeyEvent, active_panel: Panel) -> Option<UiEvent> {
    match key.code {
        KeyCode::Char('q') => return Some(UiEvent::Quit),
        KeyCode::Char('?') => return Some(UiEvent::ToggleHelp),
        KeyCode::Char('t') => return Some(UiEvent::ToggleTheme),
        KeyCode::Char('r') => return Some(UiEvent::Refresh),
        KeyCode::Tab => return Some(UiEvent::NextPanel),
        KeyCode::BackTab => return Some(UiEvent::PrevPanel),
        _ => {}
    }

    match active_panel {
        Panel::List => match key.code {
            KeyCode::Up | KeyCode::Char('k') => Some(UiEvent::SelectPrev),
            KeyCode::Down | KeyCode::Char('j') => Some(UiEvent::SelectNext),
            KeyCode::Char('e') | KeyCode::Enter => Some(UiEvent::EditSelected),
            KeyCode::Char('d') | KeyCode::Delete => Some(UiEvent::DeleteSelected),
            KeyCode::Char('a') => Some(UiEvent::NewDevice),
            _ => None,
        },
        Panel::Form => match key.code {
            KeyCode::Char('e') | KeyCode::Enter => Some(UiEvent::StartEditing),
            KeyCode::Down => Some(UiEvent::NextField),
            KeyCode::Up => Some(UiEvent::PrevField),
            KeyCode::Char('s') => Some(UiEvent::SubmitForm),
            KeyCode::Char('a') => Some(UiEvent::NewDevice),
            KeyCode::Esc | KeyCode::Char('c') => Some(UiEvent::CancelEdit),
            _ => None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_confirmation_captures_keys() {
        let event = key_to_ui_event(press(KeyCode::Char('q')), Panel::List, InputMode::Normal, false, true);
        assert_eq!(event, None);
        let event = key_to_ui_event(press(KeyCode::Char('y')), Panel::List, InputMode::Normal, false, true);
        assert_eq!(event, Some(UiEvent::ConfirmDelete));
        let event = key_to_ui_event(press(KeyCode::Esc), Panel::List, InputMode::Normal, false, true);
        assert_eq!(event, Some(UiEvent::CancelDelete));
    }

    #[test]
    fn test_list_keys() {
        let event = key_to_ui_event(press(KeyCode::Char('d')), Panel::List, InputMode::Normal, false, false);
        assert_eq!(event, Some(UiEvent::DeleteSelected));
        let event = key_to_ui_event(press(KeyCode::Enter), Panel::List, InputMode::Normal, false, false);
        assert_eq!(event, Some(UiEvent::EditSelected));
    }

    #[test]
    fn test_editing_keys_are_text() {
        let event = key_to_ui_event(press(KeyCode::Char('q')), Panel::Form, InputMode::Editing, false, false);
        assert_eq!(event, Some(UiEvent::CharInput('q')));
        let event = key_to_ui_event(press(KeyCode::Enter), Panel::Form, InputMode::Editing, false, false);
        assert_eq!(event, Some(UiEvent::SubmitForm));
    }

    #[test]
    fn test_ctrl_c_always_quits() {
        let key = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(
            key_to_ui_event(key, Panel::Form, InputMode::Editing, false, true),
            Some(UiEvent::Quit)
        );
    }
}
