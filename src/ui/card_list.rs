use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Rect},
    style::{Modifier, Style},
    widgets::{Block, Borders, Row, Table, Widget},
};

use crate::app::App;
use crate::cards::ListKind;
use crate::ui::put_str;

pub struct CardListPanel<'a> {
    app: &'a App,
}

impl<'a> CardListPanel<'a> {
    pub fn new(app: &'a App) -> Self {
        Self { app }
    }
}

impl Widget for CardListPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let theme = self.app.theme();
        let words = self.app.current_list();
        let accent = match self.app.view {
            ListKind::Unlearned => theme.accent_primary,
            ListKind::Learned => theme.accent_learned,
        };

        let title = format!(
            " {} ({}) - Sort: {} ",
            self.app.view.label(),
            words.len(),
            self.app.config.sort_policy.label()
        );

        let block = Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(accent));

        let inner = block.inner(area);
        block.render(area, buf);

        if words.is_empty() {
            let hint_style = Style::default().fg(theme.foreground_dim);
            let (first, second) = match self.app.view {
                ListKind::Unlearned => ("No words yet", "Press 'a' to add one"),
                ListKind::Learned => ("Nothing learned yet", "Press 'm' on a card to move it here"),
            };
            put_str(buf, inner, 1, 1, first, hint_style);
            put_str(buf, inner, 1, 2, second, hint_style);
            return;
        }

        let visible_rows = inner.height as usize;
        let word_width = (inner.width as usize).saturating_sub(8);

        let rows: Vec<Row> = words
            .iter()
            .enumerate()
            .skip(self.app.list_offset)
            .take(visible_rows)
            .map(|(i, word)| {
                let is_selected = i == self.app.selected;
                let is_flipped = self.app.words.is_flipped(word.id);

                let style = if is_selected {
                    Style::default()
                        .fg(theme.selection_fg)
                        .bg(theme.selection_bg)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(theme.foreground)
                };

                let flip_indicator = if is_flipped { "↺" } else { " " };
                let definitions = if word.definitions.len() > 1 {
                    format!("{}", word.definitions.len())
                } else {
                    String::new()
                };

                Row::new(vec![
                    flip_indicator.to_string(),
                    truncate(&word.text, word_width),
                    definitions,
                ])
                .style(style)
            })
            .collect();

        let widths = [
            Constraint::Length(2),
            Constraint::Min(10),
            Constraint::Length(3),
        ];

        let table = Table::new(rows, widths).column_spacing(1);

        Widget::render(table, inner, buf);
    }
}

pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len > 3 {
        format!("{}...", s.chars().take(max_len - 3).collect::<String>())
    } else {
        s.chars().take(max_len).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_counts_chars() {
        assert_eq!(truncate("cat", 10), "cat");
        assert_eq!(truncate("éléphant", 6), "élé...");
        assert_eq!(truncate("abcdef", 2), "ab");
    }
}
