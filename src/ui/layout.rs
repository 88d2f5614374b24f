use ratatui::layout::{Constraint, Direction, Layout, Rect};

pub struct AppLayout {
    pub header: Rect,
    pub banner: Rect,
    pub card_list: Rect,
    pub card_view: Rect,
    pub footer: Rect,
}

impl AppLayout {
    pub fn new(area: Rect) -> Self {
        // Main vertical split: header, banner, content, footer
        let main_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // Header
                Constraint::Length(1), // Notification banner
                Constraint::Min(8),    // Content
                Constraint::Length(2), // Footer
            ])
            .split(area);

        // Content horizontal split: word list, card
        let content_chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(40), // Word list
                Constraint::Percentage(60), // Flashcard
            ])
            .split(main_chunks[2]);

        Self {
            header: main_chunks[0],
            banner: main_chunks[1],
            card_list: content_chunks[0],
            card_view: content_chunks[1],
            footer: main_chunks[3],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_fill_the_screen() {
        let layout = AppLayout::new(Rect::new(0, 0, 100, 30));
        assert_eq!(layout.header.height, 1);
        assert_eq!(layout.footer.height, 2);
        assert_eq!(layout.card_list.height, 26);
        assert_eq!(layout.card_list.width + layout.card_view.width, 100);
    }
}
