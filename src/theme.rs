//! Theme controller - resolves, toggles and persists the color scheme

use ratatui::style::Color;

use crate::constants::THEME_STORAGE_KEY;
use crate::models::ThemeMode;
use crate::storage::PreferenceProvider;

/// Resolve the theme to start with.
///
/// A stored `dark`/`light` value wins, then the OS signal, then dark.
pub fn initial_theme(prefs: &dyn PreferenceProvider) -> ThemeMode {
    if let Some(mode) = prefs
        .get(THEME_STORAGE_KEY)
        .as_deref()
        .and_then(ThemeMode::parse)
    {
        return mode;
    }
    match prefs.prefers_dark() {
        Some(true) => ThemeMode::Dark,
        Some(false) => ThemeMode::Light,
        None => ThemeMode::Dark,
    }
}

/// Persist the theme under the storage key. Failures are logged only.
pub fn persist_theme(prefs: &mut dyn PreferenceProvider, mode: ThemeMode) {
    if let Err(e) = prefs.set(THEME_STORAGE_KEY, mode.as_str()) {
        tracing::warn!(error = %e, theme = mode.as_str(), "Failed to persist theme");
    }
}

/// Colors derived from the theme mode
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Palette {
    pub background: Color,
    pub foreground: Color,
    pub muted: Color,
    pub accent: Color,
    pub focus: Color,
    pub error: Color,
    pub selection: Color,
}

impl Palette {
    pub fn for_mode(mode: ThemeMode) -> Self {
        match mode {
            ThemeMode::Dark => Palette {
                background: Color::Black,
                foreground: Color::White,
                muted: Color::DarkGray,
                accent: Color::Cyan,
                focus: Color::Yellow,
                error: Color::LightRed,
                selection: Color::Rgb(40, 44, 52),
            },
            ThemeMode::Light => Palette {
                background: Color::White,
                foreground: Color::Black,
                muted: Color::Gray,
                accent: Color::Blue,
                focus: Color::Magenta,
                error: Color::Red,
                selection: Color::Rgb(220, 224, 232),
            },
        }
    }
}

/// Label for the theme toggle, describing what pressing it does
pub fn toggle_label(mode: ThemeMode) -> &'static str {
    if mode.is_dark() {
        "Switch to light mode"
    } else {
        "Switch to dark mode"
    }
}
