use ratatui::style::Color;
use serde::{Deserialize, Serialize};

/// Available theme presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ThemePreset {
    #[default]
    Default,
    Dracula,
    Gruvbox,
}

impl ThemePreset {
    pub fn label(&self) -> &'static str {
        match self {
            ThemePreset::Default => "Default",
            ThemePreset::Dracula => "Dracula",
            ThemePreset::Gruvbox => "Gruvbox",
        }
    }

    pub fn next(&self) -> Self {
        match self {
            ThemePreset::Default => ThemePreset::Dracula,
            ThemePreset::Dracula => ThemePreset::Gruvbox,
            ThemePreset::Gruvbox => ThemePreset::Default,
        }
    }

    pub fn prev(&self) -> Self {
        match self {
            ThemePreset::Default => ThemePreset::Gruvbox,
            ThemePreset::Dracula => ThemePreset::Default,
            ThemePreset::Gruvbox => ThemePreset::Dracula,
        }
    }

    pub fn theme(&self) -> Theme {
        match self {
            ThemePreset::Default => Theme::default_theme(),
            ThemePreset::Dracula => Theme::dracula(),
            ThemePreset::Gruvbox => Theme::gruvbox(),
        }
    }
}

/// Theme colors for the entire application
#[derive(Debug, Clone)]
pub struct Theme {
    // Base colors
    pub foreground: Color,
    pub foreground_dim: Color,

    // UI elements
    pub border_active: Color,
    pub border_inactive: Color,

    // Selection/cursor
    pub selection_bg: Color,
    pub selection_fg: Color,

    // Accents
    pub accent_primary: Color, // Unlearned list
    pub accent_learned: Color, // Learned list

    // Status colors
    pub success: Color,
    pub warning: Color,
    pub error: Color,

    // Cards
    pub card_front: Color,
    pub card_back: Color,
    pub banner: Color,
    pub header: Color,

    // Dialogs
    pub dialog_border: Color,
    pub input_bg: Color,
    pub input_fg: Color,

    // Hints/help
    pub hint_key: Color,
    pub hint_text: Color,
}

impl Theme {
    /// Default cyan-focused theme
    pub fn default_theme() -> Self {
        Self {
            foreground: Color::White,
            foreground_dim: Color::DarkGray,

            border_active: Color::Cyan,
            border_inactive: Color::DarkGray,

            selection_bg: Color::Cyan,
            selection_fg: Color::Black,

            accent_primary: Color::Cyan,
            accent_learned: Color::Green,

            success: Color::Green,
            warning: Color::Yellow,
            error: Color::Red,

            card_front: Color::White,
            card_back: Color::Cyan,
            banner: Color::Magenta,
            header: Color::Yellow,

            dialog_border: Color::Cyan,
            input_bg: Color::DarkGray,
            input_fg: Color::White,

            hint_key: Color::Yellow,
            hint_text: Color::DarkGray,
        }
    }

    /// Dracula theme - purple/pink focused
    pub fn dracula() -> Self {
        let background = Color::Rgb(40, 42, 54);
        let foreground = Color::Rgb(248, 248, 242);
        let comment = Color::Rgb(98, 114, 164);
        let cyan = Color::Rgb(139, 233, 253);
        let green = Color::Rgb(80, 250, 123);
        let orange = Color::Rgb(255, 184, 108);
        let pink = Color::Rgb(255, 121, 198);
        let purple = Color::Rgb(189, 147, 249);
        let red = Color::Rgb(255, 85, 85);
        let yellow = Color::Rgb(241, 250, 140);

        Self {
            foreground,
            foreground_dim: comment,

            border_active: purple,
            border_inactive: comment,

            selection_bg: purple,
            selection_fg: background,

            accent_primary: purple,
            accent_learned: green,

            success: green,
            warning: yellow,
            error: red,

            card_front: foreground,
            card_back: cyan,
            banner: pink,
            header: orange,

            dialog_border: purple,
            input_bg: Color::Rgb(68, 71, 90),
            input_fg: foreground,

            hint_key: yellow,
            hint_text: comment,
        }
    }

    /// Gruvbox theme - warm retro colors
    pub fn gruvbox() -> Self {
        let bg = Color::Rgb(40, 40, 40);
        let fg = Color::Rgb(235, 219, 178);
        let gray = Color::Rgb(146, 131, 116);
        let red = Color::Rgb(251, 73, 52);
        let green = Color::Rgb(184, 187, 38);
        let yellow = Color::Rgb(250, 189, 47);
        let aqua = Color::Rgb(142, 192, 124);
        let orange = Color::Rgb(254, 128, 25);

        Self {
            foreground: fg,
            foreground_dim: gray,

            border_active: yellow,
            border_inactive: gray,

            selection_bg: yellow,
            selection_fg: bg,

            accent_primary: yellow,
            accent_learned: aqua,

            success: green,
            warning: yellow,
            error: red,

            card_front: fg,
            card_back: aqua,
            banner: orange,
            header: orange,

            dialog_border: yellow,
            input_bg: Color::Rgb(60, 56, 54),
            input_fg: fg,

            hint_key: yellow,
            hint_text: gray,
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::default_theme()
    }
}
