pub mod card_list;
pub mod card_view;
pub mod layout;

use chrono::Local;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Widget, Wrap},
};

use crate::app::{AddField, App, ConfirmAction, InputMode, SettingsSelection};
use crate::config::Theme;

pub use card_list::CardListPanel;
pub use card_view::CardView;
pub use layout::AppLayout;

pub fn render(app: &mut App, area: Rect, buf: &mut Buffer) {
    let layout = AppLayout::new(area);

    // Selection scrolling needs the list height from this frame
    app.update_card_list_area(layout.card_list);

    render_header(app, layout.header, buf);
    render_banner(app, layout.banner, buf);
    CardListPanel::new(app).render(layout.card_list, buf);
    CardView::new(app).render(layout.card_view, buf);
    render_footer(app, layout.footer, buf);

    // Overlays
    match &app.input_mode {
        InputMode::AddWord => render_add_word_dialog(app, area, buf),
        InputMode::AddDefinition => {
            let title = app
                .selected_word()
                .map(|w| format!("Add definition: {}", w.text))
                .unwrap_or_else(|| "Add definition".to_string());
            render_input_dialog(app, &title, "Definition:", area, buf)
        }
        InputMode::SetTime => {
            render_input_dialog(app, "Daily reminder", "Time (HH:MM, empty to turn off):", area, buf)
        }
        InputMode::Help => render_help_dialog(app, area, buf),
        InputMode::Settings => render_settings_dialog(app, area, buf),
        InputMode::Confirm(action) => {
            let msg = match action {
                ConfirmAction::ClearAll => "Delete every word?",
            };
            render_confirm_dialog(app, msg, area, buf);
        }
        InputMode::Alert(message) => render_alert_dialog(app, message, area, buf),
        InputMode::Normal => {}
    }
}

/// Write `text` at `col`/`row` relative to `area`. Anything that lands
/// outside the area or the buffer is dropped.
pub(crate) fn put_str(buf: &mut Buffer, area: Rect, col: u16, row: u16, text: &str, style: Style) {
    let area = area.intersection(buf.area);
    if col >= area.width || row >= area.height {
        return;
    }
    buf.set_stringn(
        area.x + col,
        area.y + row,
        text,
        (area.width - col) as usize,
        style,
    );
}

fn put_line(buf: &mut Buffer, area: Rect, row: u16, line: &Line) {
    let area = area.intersection(buf.area);
    if row >= area.height {
        return;
    }
    buf.set_line(area.x, area.y + row, line, area.width);
}

/// Centered dialog rectangle, clamped to the screen.
fn dialog_rect(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width.saturating_sub(4));
    let height = height.min(area.height.saturating_sub(2));
    let x = area.x + (area.width - width) / 2;
    let y = area.y + (area.height - height) / 2;
    Rect::new(x, y, width, height)
}

fn render_header(app: &App, area: Rect, buf: &mut Buffer) {
    let theme = app.theme();
    let title_style = Style::default()
        .fg(theme.accent_primary)
        .add_modifier(Modifier::BOLD);
    let dim = Style::default().fg(theme.foreground_dim);

    let title = Line::from(vec![
        Span::styled(" Wordcards ", title_style),
        Span::styled("│", dim),
        Span::styled(
            format!(
                " {} to learn, {} learned ",
                app.words.unlearned().len(),
                app.words.learned().len()
            ),
            Style::default().fg(theme.foreground),
        ),
        Span::styled("│", dim),
        Span::styled(" Press ", dim),
        Span::styled("?", Style::default().fg(theme.hint_key)),
        Span::styled(" for help", dim),
    ]);

    put_line(buf, area, 0, &title);
}

/// Last delivered notification, or the armed reminder time.
fn render_banner(app: &App, area: Rect, buf: &mut Buffer) {
    let theme = app.theme();
    let style = Style::default().fg(theme.banner);

    let text = if let Some(ref delivered) = app.last_notification {
        format!(
            " 🔔 {} - {} ({})",
            delivered.content.title,
            delivered.content.body,
            delivered.delivered_at.with_timezone(&Local).format("%H:%M")
        )
    } else if let Some(at) = app.notification_time {
        format!(
            " Daily reminder at {} ({})",
            at.with_timezone(&Local).format("%H:%M"),
            app.config.schedule_policy.label()
        )
    } else if !app.config.notifications_enabled {
        " Notifications off".to_string()
    } else {
        format!(" {}", app.config.schedule_policy.label())
    };

    put_str(buf, area, 0, 0, &card_list::truncate(&text, area.width as usize), style);
}

fn render_footer(app: &App, area: Rect, buf: &mut Buffer) {
    let theme = app.theme();
    let hint_style = Style::default().fg(theme.hint_text);
    let key_style = Style::default().fg(theme.hint_key);

    let line1 = Line::from(vec![
        Span::styled(" ", hint_style),
        Span::styled("Space", key_style),
        Span::styled(":Flip  ", hint_style),
        Span::styled("d", key_style),
        Span::styled(":Next def  ", hint_style),
        Span::styled("m", key_style),
        Span::styled(":Learned  ", hint_style),
        Span::styled("a", key_style),
        Span::styled(":Add  ", hint_style),
        Span::styled("Tab", key_style),
        Span::styled(":Switch list  ", hint_style),
        Span::styled("n", key_style),
        Span::styled(":Notify  ", hint_style),
        Span::styled("q", key_style),
        Span::styled(":Quit", hint_style),
    ]);

    put_line(buf, area, 0, &line1);

    // Status message on second line
    if let Some(ref msg) = app.status_message {
        let status_style = Style::default().fg(theme.success);
        put_str(buf, area, 1, 1, msg, status_style);
    }
}

fn input_line(theme: &Theme, text: &str, focused: bool) -> (String, Style) {
    let style = Style::default().fg(theme.input_fg).bg(theme.input_bg);
    if focused {
        (format!("{}_", text), style)
    } else {
        (text.to_string(), style.bg(theme.foreground_dim))
    }
}

fn render_input_dialog(app: &App, title: &str, prompt: &str, area: Rect, buf: &mut Buffer) {
    let theme = app.theme();
    let dialog_area = dialog_rect(area, 60, 5);

    // Clear background
    Clear.render(dialog_area, buf);

    let block = Block::default()
        .title(format!(" {} ", title))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.dialog_border));

    let inner = block.inner(dialog_area);
    block.render(dialog_area, buf);

    put_str(buf, inner, 1, 0, prompt, Style::default().fg(theme.foreground));

    let (text, style) = input_line(&theme, &app.input_buffer, true);
    put_str(buf, inner, 1, 1, &text, style);

    let hint_style = Style::default().fg(theme.hint_text);
    put_str(buf, inner, 1, 2, "Enter to confirm, Esc to cancel", hint_style);
}

fn render_add_word_dialog(app: &App, area: Rect, buf: &mut Buffer) {
    let theme = app.theme();
    let dialog_area = dialog_rect(area, 60, 8);

    Clear.render(dialog_area, buf);

    let block = Block::default()
        .title(" Add word ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.dialog_border));

    let inner = block.inner(dialog_area);
    block.render(dialog_area, buf);

    let label_style = Style::default().fg(theme.foreground);
    let active_label = Style::default()
        .fg(theme.accent_primary)
        .add_modifier(Modifier::BOLD);

    let fields = [
        ("Word:", &app.word_input, AddField::Word),
        ("Definition:", &app.definition_input, AddField::Definition),
    ];
    for (i, (label, value, field)) in fields.into_iter().enumerate() {
        let row = i as u16 * 2;
        let focused = app.add_field == field;
        let style = if focused { active_label } else { label_style };
        put_str(buf, inner, 1, row, label, style);

        let (text, input_style) = input_line(&theme, value, focused);
        put_str(buf, inner, 1, row + 1, &text, input_style);
    }

    let hint_style = Style::default().fg(theme.hint_text);
    put_str(
        buf,
        inner,
        1,
        5,
        "Tab to switch field, Enter to save, Esc to cancel",
        hint_style,
    );
}

fn render_confirm_dialog(app: &App, message: &str, area: Rect, buf: &mut Buffer) {
    let theme = app.theme();
    let dialog_area = dialog_rect(area, 40, 5);

    Clear.render(dialog_area, buf);

    let block = Block::default()
        .title(" Confirm ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.warning));

    let inner = block.inner(dialog_area);
    block.render(dialog_area, buf);

    put_str(buf, inner, 1, 0, message, Style::default().fg(theme.foreground));

    let hint_style = Style::default().fg(theme.hint_text);
    put_str(buf, inner, 1, 1, "Press 'y' to confirm, 'n' to cancel", hint_style);
}

fn render_alert_dialog(app: &App, message: &str, area: Rect, buf: &mut Buffer) {
    let theme = app.theme();
    let dialog_area = dialog_rect(area, 50, 7);

    Clear.render(dialog_area, buf);

    let block = Block::default()
        .title(" Notice ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.error));

    let lines = vec![
        Line::from(Span::styled(message.to_string(), Style::default().fg(theme.foreground))),
        Line::from(""),
        Line::from(Span::styled("Press any key", Style::default().fg(theme.hint_text))),
    ];

    Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: true })
        .render(dialog_area, buf);
}

fn render_help_dialog(app: &App, area: Rect, buf: &mut Buffer) {
    let theme = app.theme();
    let dialog_area = dialog_rect(area, 50, 24);

    Clear.render(dialog_area, buf);

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.dialog_border));

    let inner = block.inner(dialog_area);
    block.render(dialog_area, buf);

    let help_text = [
        "Navigation:",
        "  j/k or ↑/↓     Move selection",
        "  g / G          First / last card",
        "  Tab            Unlearned / learned list",
        "",
        "Cards:",
        "  Space/Enter    Flip card",
        "  d              Next definition",
        "  m or ←/→       Move to other list",
        "  a              Add word",
        "  A              Add definition",
        "  s              Shuffle unlearned",
        "  D              Delete all words",
        "",
        "Notifications:",
        "  n              Notify now",
        "  t              Set daily reminder time",
        "  ,              Settings",
        "",
        "Press any key to close",
    ];

    let desc_style = Style::default().fg(theme.foreground);
    let header_style = Style::default()
        .fg(theme.header)
        .add_modifier(Modifier::BOLD);

    for (i, line) in help_text.iter().enumerate() {
        let style = if line.ends_with(':') && !line.starts_with(' ') {
            header_style
        } else {
            desc_style
        };

        put_str(buf, inner, 1, i as u16, line, style);
    }
}

fn render_settings_dialog(app: &App, area: Rect, buf: &mut Buffer) {
    let theme = app.theme();
    let dialog_area = dialog_rect(area, 54, 13);

    Clear.render(dialog_area, buf);

    let block = Block::default()
        .title(" Settings ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.dialog_border));

    let inner = block.inner(dialog_area);
    block.render(dialog_area, buf);

    let label_style = Style::default().fg(theme.foreground);
    let value_style = Style::default().fg(theme.accent_primary);
    let selected_style = Style::default()
        .fg(theme.selection_fg)
        .bg(theme.selection_bg)
        .add_modifier(Modifier::BOLD);

    let rows = [
        (
            SettingsSelection::SchedulePolicy,
            "Notifications:",
            app.config.schedule_policy.label().to_string(),
        ),
        (
            SettingsSelection::SortPolicy,
            "Sort:",
            app.config.sort_policy.label().to_string(),
        ),
        (
            SettingsSelection::Notifications,
            "Enabled:",
            if app.config.notifications_enabled { "ON" } else { "OFF" }.to_string(),
        ),
        (
            SettingsSelection::Theme,
            "Theme:",
            app.config.theme.label().to_string(),
        ),
    ];

    for (i, (selection, label, value)) in rows.iter().enumerate() {
        let row = i as u16 * 2;
        let value = format!("< {} >", value);
        let (label_style, value_style) = if app.settings_selection == *selection {
            (selected_style, selected_style)
        } else {
            (label_style, value_style)
        };
        put_str(buf, inner, 1, row, label, label_style);
        put_str(buf, inner, 20, row, &value, value_style);
    }

    // Hints
    let hint_style = Style::default().fg(theme.hint_text);
    put_str(buf, inner, 1, 8, "Use ↑/↓ to navigate, ←/→ or Enter to change", hint_style);
    put_str(buf, inner, 1, 9, "Press Esc to close", hint_style);
}
