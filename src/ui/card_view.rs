use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
};

use crate::app::App;
use crate::cards::Word;
use crate::config::Theme;
use crate::ui::put_str;

/// The selected word as a flashcard: the word on the front, one
/// definition at a time on the back.
pub struct CardView<'a> {
    app: &'a App,
}

impl<'a> CardView<'a> {
    pub fn new(app: &'a App) -> Self {
        Self { app }
    }

    fn front(word: &Word, theme: &Theme) -> Vec<Line<'static>> {
        vec![
            Line::from(""),
            Line::from(Span::styled(
                word.text.clone(),
                Style::default()
                    .fg(theme.card_front)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(Span::styled(
                "space to flip",
                Style::default().fg(theme.foreground_dim),
            )),
        ]
    }

    fn back(word: &Word, theme: &Theme) -> Vec<Line<'static>> {
        let mut lines = vec![
            Line::from(Span::styled(
                word.text.clone(),
                Style::default().fg(theme.foreground_dim),
            )),
            Line::from(""),
            Line::from(Span::styled(
                word.current_definition().to_string(),
                Style::default().fg(theme.card_back),
            )),
            Line::from(""),
        ];

        if let Some(index) = definition_index(word) {
            lines.push(Line::from(vec![
                Span::styled(index, Style::default().fg(theme.accent_primary)),
                Span::styled("  d: next definition", Style::default().fg(theme.foreground_dim)),
            ]));
        }
        lines
    }
}

impl Widget for CardView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let theme = self.app.theme();

        let Some(word) = self.app.selected_word() else {
            let block = Block::default()
                .title(" Card ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.border_inactive));
            let inner = block.inner(area);
            block.render(area, buf);
            put_str(
                buf,
                inner,
                1,
                1,
                "No card selected",
                Style::default().fg(theme.foreground_dim),
            );
            return;
        };

        let flipped = self.app.words.is_flipped(word.id);
        let (title, lines) = if flipped {
            (" Definition ", Self::back(word, &theme))
        } else {
            (" Word ", Self::front(word, &theme))
        };

        let block = Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.border_active));

        Paragraph::new(lines)
            .block(block)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .render(area, buf);
    }
}

/// "2/3" style position of the shown definition, for words with several.
pub fn definition_index(word: &Word) -> Option<String> {
    if word.definitions.len() < 2 {
        return None;
    }
    Some(format!(
        "{}/{}",
        word.current_def_index + 1,
        word.definitions.len()
    ))
}
