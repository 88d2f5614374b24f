use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    // Navigation
    Up,
    Down,
    Left,
    Right,
    Top,
    Bottom,
    ToggleView,
    Enter,
    Escape,
    NextField,

    // Cards
    Flip,
    CycleDefinition,
    MarkLearned,
    AddWord,
    AddDefinition,
    Shuffle,
    ClearAll,

    // Notifications
    NotifyNow,
    SetNotificationTime,

    // UI
    Help,
    Settings,
    Quit,

    // Text entry and prompts
    Confirm,
    Backspace,
    Char(char),

    // No action
    None,
}

impl Action {
    pub fn from_key_event(key: KeyEvent) -> Self {
        match (key.code, key.modifiers) {
            // Quit
            (KeyCode::Char('q'), KeyModifiers::NONE) => Action::Quit,
            (KeyCode::Char('c'), KeyModifiers::CONTROL) => Action::Quit,

            // Navigation
            (KeyCode::Up | KeyCode::Char('k'), KeyModifiers::NONE) => Action::Up,
            (KeyCode::Down | KeyCode::Char('j'), KeyModifiers::NONE) => Action::Down,
            (KeyCode::Left | KeyCode::Char('h'), KeyModifiers::NONE) => Action::Left,
            (KeyCode::Right | KeyCode::Char('l'), KeyModifiers::NONE) => Action::Right,
            (KeyCode::Home | KeyCode::Char('g'), KeyModifiers::NONE) => Action::Top,
            (KeyCode::End, _) | (KeyCode::Char('G'), KeyModifiers::SHIFT) => Action::Bottom,
            (KeyCode::Tab, KeyModifiers::NONE) => Action::ToggleView,
            (KeyCode::BackTab, _) => Action::NextField,
            (KeyCode::Enter, _) => Action::Enter,
            (KeyCode::Esc, _) => Action::Escape,

            // Cards
            (KeyCode::Char(' '), KeyModifiers::NONE) => Action::Flip,
            (KeyCode::Char('d'), KeyModifiers::NONE) => Action::CycleDefinition,
            (KeyCode::Char('m'), KeyModifiers::NONE) => Action::MarkLearned,
            (KeyCode::Char('a'), KeyModifiers::NONE) => Action::AddWord,
            (KeyCode::Char('A'), KeyModifiers::SHIFT) => Action::AddDefinition,
            (KeyCode::Char('s'), KeyModifiers::NONE) => Action::Shuffle,
            (KeyCode::Char('D'), KeyModifiers::SHIFT) => Action::ClearAll,

            // Notifications
            (KeyCode::Char('n'), KeyModifiers::NONE) => Action::NotifyNow,
            (KeyCode::Char('t'), KeyModifiers::NONE) => Action::SetNotificationTime,

            // UI
            (KeyCode::Char('?'), KeyModifiers::NONE | KeyModifiers::SHIFT) => Action::Help,
            (KeyCode::Char(','), KeyModifiers::NONE) => Action::Settings,

            // Special
            (KeyCode::Char('y'), KeyModifiers::NONE) => Action::Confirm,
            (KeyCode::Backspace, _) => Action::Backspace,
            (KeyCode::Char(c), KeyModifiers::NONE | KeyModifiers::SHIFT) => Action::Char(c),

            _ => Action::None,
        }
    }

    /// The literal character for text entry, if this key produced one.
    /// Bindings like `q` or `a` still type their letter inside a text field.
    pub fn typed_char(key: KeyEvent) -> Option<char> {
        match (key.code, key.modifiers) {
            (KeyCode::Char(c), KeyModifiers::NONE | KeyModifiers::SHIFT) => Some(c),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    #[test]
    fn card_bindings() {
        assert_eq!(Action::from_key_event(key(KeyCode::Char(' '), KeyModifiers::NONE)), Action::Flip);
        assert_eq!(
            Action::from_key_event(key(KeyCode::Char('m'), KeyModifiers::NONE)),
            Action::MarkLearned
        );
        assert_eq!(
            Action::from_key_event(key(KeyCode::Char('D'), KeyModifiers::SHIFT)),
            Action::ClearAll
        );
        assert_eq!(
            Action::from_key_event(key(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Action::Quit
        );
    }

    #[test]
    fn unbound_letters_become_chars() {
        assert_eq!(
            Action::from_key_event(key(KeyCode::Char('z'), KeyModifiers::NONE)),
            Action::Char('z')
        );
        assert_eq!(
            Action::from_key_event(key(KeyCode::F(5), KeyModifiers::NONE)),
            Action::None
        );
    }

    #[test]
    fn typed_char_ignores_bindings() {
        assert_eq!(Action::typed_char(key(KeyCode::Char('q'), KeyModifiers::NONE)), Some('q'));
        assert_eq!(Action::typed_char(key(KeyCode::Char('Q'), KeyModifiers::SHIFT)), Some('Q'));
        assert_eq!(Action::typed_char(key(KeyCode::Char('c'), KeyModifiers::CONTROL)), None);
        assert_eq!(Action::typed_char(key(KeyCode::Enter, KeyModifiers::NONE)), None);
    }
}
