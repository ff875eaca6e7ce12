use ratatui::{prelude::*, widgets::*};

use crate::models::Device;
use crate::theme::Palette;

/// Renders a labelled text input field
pub fn render_input<'a>(
    content: &'a str,
    title: &'a str,
    is_focused: bool,
    is_editing: bool,
    palette: &Palette,
) -> Paragraph<'a> {
    let border_style = if is_editing {
        Style::default().fg(palette.focus)
    } else if is_focused {
        Style::default().fg(palette.accent)
    } else {
        Style::default().fg(palette.muted)
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(format!(" {} ", title));

    Paragraph::new(content)
        .style(Style::default().fg(palette.foreground))
        .block(block)
}

/// One list row per device
pub fn device_items<'a>(devices: &'a [Device], palette: &Palette) -> Vec<ListItem<'a>> {
    devices
        .iter()
        .map(|device| {
            let name = Span::styled(
                device.name.as_str(),
                Style::default().fg(palette.foreground).bold(),
            );
            let assignment = Span::styled(
                format!("  {}", device.assignment_label()),
                Style::default().fg(assignment_color(device, palette)),
            );
            let mut lines = vec![Line::from(vec![name, assignment])];

            if let Some(updated) = device.updated_at.or(device.created_at) {
                lines.push(Line::from(Span::styled(
                    format!("  updated {}", updated.format("%Y-%m-%d %H:%M")),
                    Style::default().fg(palette.muted),
                )));
            }
            ListItem::new(lines)
        })
        .collect()
}

fn assignment_color(device: &Device, palette: &Palette) -> Color {
    match device.assigned_to.as_deref() {
        Some(who) if !who.is_empty() => palette.accent,
        _ => palette.muted,
    }
}

/// Key hint line, e.g. `e:edit  d:delete`
pub fn key_hints<'a>(hints: &[(&'a str, &'a str)], palette: &Palette) -> Line<'a> {
    let mut spans = Vec::with_capacity(hints.len() * 2);
    for (key, action) in hints {
        spans.push(Span::styled(*key, Style::default().fg(palette.focus).bold()));
        spans.push(Span::styled(
            format!(":{}  ", action),
            Style::default().fg(palette.muted),
        ));
    }
    Line::from(spans)
}

/// Display column of a character-indexed cursor, counting wide glyphs as two
pub fn cursor_column(text: &str, cursor: usize) -> u16 {
    let end = text
        .char_indices()
        .nth(cursor)
        .map(|(i, _)| i)
        .unwrap_or(text.len());
    Span::raw(&text[..end]).width().min(u16::MAX as usize) as u16
}

/// Color of the backend health indicator
pub fn health_color(healthy: Option<bool>) -> Color {
    match healthy {
        Some(true) => Color::Green,
        Some(false) => Color::Red,
        None => Color::Yellow,
    }
}

/// Rectangle centered in `r`, sized by percentages
pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ThemeMode;

    #[test]
    fn test_device_items_one_per_device() {
        let devices: Vec<Device> = serde_json::from_str(
            r#"[{"id":"1","name":"A"},{"id":"2","name":"B","assigned_to":"Kim","updated_at":"2024-01-02T03:04:05Z"}]"#,
        )
        .unwrap();
        let palette = Palette::for_mode(ThemeMode::Dark);
        let items = device_items(&devices, &palette);
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].height(), 1);
        assert_eq!(items[1].height(), 2);
    }

    #[test]
    fn test_cursor_column_counts_display_width() {
        assert_eq!(cursor_column("Pixel", 5), 5);
        assert_eq!(cursor_column("Écran", 2), 2);
        assert_eq!(cursor_column("端末A", 2), 4);
        assert_eq!(cursor_column("端末A", 9), 5);
        assert_eq!(cursor_column("", 0), 0);
    }

    #[test]
    fn test_centered_rect_fits_inside() {
        let outer = Rect::new(0, 0, 100, 50);
        let inner = centered_rect(60, 20, outer);
        assert_eq!(inner.width, 60);
        assert_eq!(inner.height, 10);
        assert_eq!(inner.x, 20);
    }
}
