//! Device Inventory TUI - actor-based device manager
//!
//! Architecture:
//! - UI Layer (Ratatui) - synchronous terminal rendering
//! - App Layer - central state machine processing events
//! - Network Layer (Tokio) - async calls against the devices API

use std::io;
use std::time::Duration;
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    prelude::*,
    widgets::*,
};
use tokio::sync::mpsc;

use devinv_tui::app::{AppActor, AppState};
use devinv_tui::config::AppConfig;
use devinv_tui::constants::{APP_NAME, DELETE_CONFIRM_PROMPT, LOG_FILE};
use devinv_tui::messages::ui_events::{key_to_ui_event, FormField, InputMode, Panel};
use devinv_tui::messages::{NetworkCommand, NetworkResponse, RenderState, UiEvent};
use devinv_tui::network::{DeviceClient, NetworkActor};
use devinv_tui::storage::FilePreferences;
use devinv_tui::theme::{toggle_label, Palette};
use devinv_tui::ui::{centered_rect, cursor_column, device_items, health_color, key_hints, render_input};

/// Terminal cleanup guard
struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging to file
    let file_appender = tracing_appender::rolling::never(".", LOG_FILE);
    let (non_blocking, _log_guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_ansi(false)
        .init();

    let config = AppConfig::from_env();
    tracing::info!(api = %config.api_base, timeout = ?config.timeout, "Starting device manager");

    let preferences = FilePreferences::new(config.config_dir.clone());
    let state = AppState::new(Box::new(preferences), config.api_base.clone());
    let client = DeviceClient::new(config.api_base.clone(), config.timeout);

    // Terminal setup
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let _guard = TerminalGuard;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Create channels
    let (ui_tx, ui_rx) = mpsc::unbounded_channel::<UiEvent>();
    let (net_cmd_tx, net_cmd_rx) = mpsc::unbounded_channel::<NetworkCommand>();
    let (net_resp_tx, net_resp_rx) = mpsc::unbounded_channel::<NetworkResponse>();
    let (render_tx, mut render_rx) = mpsc::unbounded_channel::<RenderState>();

    // Spawn network actor
    let network_actor = NetworkActor::new(client, net_resp_tx);
    tokio::spawn(network_actor.run(net_cmd_rx));

    // Spawn app actor
    let app_actor = AppActor::new(state, net_cmd_tx, render_tx);
    tokio::spawn(app_actor.run(ui_rx, net_resp_rx));

    run_ui_loop(&mut terminal, ui_tx, &mut render_rx).await?;

    tracing::info!("Device manager exited");
    Ok(())
}

/// Run the synchronous UI rendering loop
async fn run_ui_loop(
    terminal: &mut Terminal<impl Backend>,
    ui_tx: mpsc::UnboundedSender<UiEvent>,
    render_rx: &mut mpsc::UnboundedReceiver<RenderState>,
) -> anyhow::Result<()> {
    let mut current_state = RenderState::default();

    loop {
        terminal.draw(|f| draw_ui(f, &current_state))?;

        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if let Some(event) = key_to_ui_event(
                    key,
                    current_state.active_panel,
                    current_state.input_mode,
                    current_state.show_help,
                    current_state.pending_delete.is_some(),
                ) {
                    let quit = matches!(event, UiEvent::Quit);
                    let _ = ui_tx.send(event);
                    if quit {
                        break;
                    }
                }
            }
        }

        // Check for state updates (non-blocking)
        while let Ok(state) = render_rx.try_recv() {
            current_state = state;
        }
    }

    Ok(())
}

// ============================================================================
// UI Drawing Functions
// ============================================================================

fn draw_ui(f: &mut Frame, state: &RenderState) {
    let palette = Palette::for_mode(state.theme);
    let area = f.area();

    f.render_widget(
        Block::default().style(Style::default().bg(palette.background).fg(palette.foreground)),
        area,
    );

    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Header
            Constraint::Min(0),    // Content
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    draw_header(f, state, &palette, main_chunks[0]);

    let content = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(main_chunks[1]);

    draw_form(f, state, &palette, content[0]);
    draw_list_section(f, state, &palette, content[1]);
    draw_status_bar(f, state, &palette, main_chunks[2]);

    if state.show_help {
        draw_help_popup(f, &palette, area);
    }

    if let Some(device) = &state.pending_delete {
        draw_confirm_popup(f, &palette, &device.name, area);
    }
}

fn draw_header(f: &mut Frame, state: &RenderState, palette: &Palette, area: Rect) {
    let theme_icon = if state.theme.is_dark() { "[dark]" } else { "[light]" };
    let header = Line::from(vec![
        Span::styled(format!(" {} ", APP_NAME), Style::default().fg(palette.accent).bold()),
        Span::styled(
            format!(" {} ", state.api_base),
            Style::default().fg(health_color(state.backend_healthy)),
        ),
        Span::styled(
            format!(" {} t: {} ", theme_icon, toggle_label(state.theme)),
            Style::default().fg(palette.muted),
        ),
    ]);
    f.render_widget(Paragraph::new(header), area);
}

fn draw_form(f: &mut Frame, state: &RenderState, palette: &Palette, area: Rect) {
    let is_focused = state.active_panel == Panel::Form;
    let border_style = if is_focused {
        Style::default().fg(palette.accent)
    } else {
        Style::default().fg(palette.muted)
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(format!(" {} ", state.form_title()));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(1),
        ])
        .split(inner);

    let editing = is_focused && state.input_mode == InputMode::Editing;
    let fields = [
        (FormField::Name, state.form_name.as_str(), rows[0]),
        (FormField::AssignedTo, state.form_assigned_to.as_str(), rows[1]),
    ];
    for (field, content, rect) in fields {
        let focused = is_focused && state.form_field == field;
        let input = render_input(content, field.label(), focused, focused && editing, palette);
        f.render_widget(input, rect);

        if focused && editing {
            let max_x = rect.x + rect.width.saturating_sub(2);
            let column = cursor_column(content, state.cursor_position);
            let cursor_x = rect.x.saturating_add(column).saturating_add(1).min(max_x);
            f.set_cursor_position(Position::new(cursor_x, rect.y + 1));
        }
    }

    let submit = if state.editing_device.is_some() { "update" } else { "add device" };
    let mut hints = vec![("e", "edit field"), ("s", submit)];
    if state.editing_device.is_some() {
        hints.push(("c", "cancel"));
    }
    f.render_widget(Paragraph::new(key_hints(&hints, palette)), rows[2]);
}

fn draw_list_section(f: &mut Frame, state: &RenderState, palette: &Palette, area: Rect) {
    let is_focused = state.active_panel == Panel::List;
    let border_style = if is_focused {
        Style::default().fg(palette.accent)
    } else {
        Style::default().fg(palette.muted)
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(format!(" Devices ({}) ", state.devices.len()));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let error_height = if state.error.is_some() { 2 } else { 0 };
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(error_height), Constraint::Min(0)])
        .split(inner);

    if let Some(error) = &state.error {
        let message = Paragraph::new(error.as_str())
            .style(Style::default().fg(palette.error).bold())
            .wrap(Wrap { trim: true });
        f.render_widget(message, rows[0]);
    }

    if state.loading {
        let loading = Paragraph::new("Loading devices...").style(Style::default().fg(palette.muted));
        f.render_widget(loading, rows[1]);
        return;
    }

    if state.devices.is_empty() {
        let empty = Paragraph::new("No devices found. Add one using the form.")
            .style(Style::default().fg(palette.muted));
        f.render_widget(empty, rows[1]);
        return;
    }

    let list = List::new(device_items(&state.devices, palette))
        .highlight_style(Style::default().bg(palette.selection).fg(palette.focus))
        .highlight_symbol("> ");
    let mut list_state = ListState::default();
    list_state.select(Some(state.selected_device));
    f.render_stateful_widget(list, rows[1], &mut list_state);
}

fn draw_status_bar(f: &mut Frame, state: &RenderState, palette: &Palette, area: Rect) {
    let hints: &[(&str, &str)] = if state.input_mode == InputMode::Editing {
        &[("Esc", "stop editing"), ("Tab", "next field"), ("Enter", "submit")]
    } else if state.active_panel == Panel::List {
        &[("↑/↓", "select"), ("e", "edit"), ("d", "delete"), ("r", "refresh"), ("Tab", "form"), ("?", "help"), ("q", "quit")]
    } else {
        &[("e", "edit"), ("s", "submit"), ("a", "new"), ("Tab", "list"), ("t", "theme"), ("?", "help"), ("q", "quit")]
    };
    f.render_widget(Paragraph::new(key_hints(hints, palette)), area);
}

fn draw_help_popup(f: &mut Frame, palette: &Palette, area: Rect) {
    let popup_area = centered_rect(60, 60, area);

    let help_text = r#"
 DEVICE MANAGEMENT - Keyboard Shortcuts

 GENERAL
   Tab / Shift+Tab    Switch between form and list
   t                  Toggle light/dark theme
   r / Ctrl+R         Refresh devices
   ?                  Toggle this help
   q / Ctrl+C         Quit

 FORM
   e / Enter          Edit focused field
   ↑ / ↓              Switch field
   s                  Add or update device
   a                  Start a new device
   c / Esc            Cancel edit

 LIST
   ↑ / ↓              Select device
   e / Enter          Edit selected device
   d / Delete         Delete selected device

 Press any key to close...
"#;

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Help ")
        .style(Style::default().bg(palette.background).fg(palette.foreground));

    let help = Paragraph::new(help_text)
        .block(block)
        .wrap(Wrap { trim: false });

    f.render_widget(Clear, popup_area);
    f.render_widget(help, popup_area);
}

fn draw_confirm_popup(f: &mut Frame, palette: &Palette, device_name: &str, area: Rect) {
    let popup_area = centered_rect(50, 20, area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(palette.error))
        .title(" Delete Device (y: confirm, n/Esc: cancel) ")
        .style(Style::default().bg(palette.background).fg(palette.foreground));

    let text = vec![
        Line::from(DELETE_CONFIRM_PROMPT),
        Line::from(""),
        Line::from(Span::styled(device_name.to_string(), Style::default().bold())),
    ];
    let prompt = Paragraph::new(text)
        .block(block)
        .wrap(Wrap { trim: false });

    f.render_widget(Clear, popup_area);
    f.render_widget(prompt, popup_area);
}
