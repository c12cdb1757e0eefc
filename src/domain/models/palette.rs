use ratatui::style::Color;
use strum::EnumIter;
use strum::EnumVariantNames;
use strum::IntoEnumIterator;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, EnumIter, EnumVariantNames, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum ThemeName {
    #[default]
    Dark,
    Light,
}

impl ThemeName {
    pub fn parse(text: String) -> Option<ThemeName> {
        return ThemeName::iter().find(|e| return e.to_string() == text);
    }
}

/// Colours and layout for the chat view. Variants of the same screen are
/// expressed through this instead of separate views.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Palette {
    pub accent: Color,
    pub user_bubble: Color,
    pub bot_bubble: Color,
    pub muted: Color,
    pub error: Color,
    pub success: Color,
    pub highlight_bg: Color,
    pub sidebar_visible: bool,
    pub sidebar_width: u16,
}

impl Palette {
    pub fn new(theme: ThemeName, sidebar_visible: bool, sidebar_width: u16) -> Palette {
        let mut palette = match theme {
            ThemeName::Dark => Palette::dark(),
            ThemeName::Light => Palette::light(),
        };
        palette.sidebar_visible = sidebar_visible;
        palette.sidebar_width = sidebar_width.clamp(16, 60);

        return palette;
    }

    fn dark() -> Palette {
        return Palette {
            accent: Color::LightBlue,
            user_bubble: Color::White,
            bot_bubble: Color::Gray,
            muted: Color::DarkGray,
            error: Color::LightRed,
            success: Color::LightGreen,
            highlight_bg: Color::Blue,
            sidebar_visible: true,
            sidebar_width: 28,
        };
    }

    fn light() -> Palette {
        return Palette {
            accent: Color::Blue,
            user_bubble: Color::Black,
            bot_bubble: Color::DarkGray,
            muted: Color::Gray,
            error: Color::Red,
            success: Color::Green,
            highlight_bg: Color::LightBlue,
            sidebar_visible: true,
            sidebar_width: 28,
        };
    }
}

impl Default for Palette {
    fn default() -> Palette {
        return Palette::dark();
    }
}
