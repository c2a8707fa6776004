//! Color themes: two fixed palettes and the mapping from token kinds to colors.

use crate::highlight::TokenKind;
use crossterm::style::Color;
use serde::{Deserialize, Serialize};

/// Which of the two built-in palettes is active.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    pub fn palette(self) -> &'static Palette {
        match self {
            Self::Dark => &DARK,
            Self::Light => &LIGHT,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Self::Dark => Self::Light,
            Self::Light => Self::Dark,
        }
    }
}

/// The eight color roles the editor paints with.
///
/// Constant data, not computed; everything that draws takes the palette it
/// was handed rather than reaching for a global.
pub struct Palette {
    pub background: Color,
    pub foreground: Color,
    pub keyword: Color,
    pub builtin: Color,
    pub comment: Color,
    pub string: Color,
    pub number: Color,
    pub function: Color,
}

impl Palette {
    /// Foreground color for a highlighted token kind.
    pub fn color_for(&self, kind: TokenKind) -> Color {
        match kind {
            TokenKind::Keyword => self.keyword,
            TokenKind::Builtin => self.builtin,
            TokenKind::Number => self.number,
            TokenKind::Str => self.string,
            TokenKind::Comment => self.comment,
            TokenKind::FuncName => self.function,
        }
    }
}

/// GitHub-dark colors.
pub const DARK: Palette = Palette {
    background: Color::Rgb { r: 0x0d, g: 0x11, b: 0x17 },
    foreground: Color::Rgb { r: 0xc9, g: 0xd1, b: 0xd9 },
    keyword: Color::Rgb { r: 0x79, g: 0xc0, b: 0xff },
    builtin: Color::Rgb { r: 0xd2, g: 0xa8, b: 0xff },
    comment: Color::Rgb { r: 0x8b, g: 0x94, b: 0x9e },
    string: Color::Rgb { r: 0x7e, g: 0xe7, b: 0x87 },
    number: Color::Rgb { r: 0xff, g: 0xa6, b: 0x57 },
    function: Color::Rgb { r: 0xd2, g: 0xa8, b: 0xff },
};

/// GitHub-light colors.
pub const LIGHT: Palette = Palette {
    background: Color::Rgb { r: 0xff, g: 0xff, b: 0xff },
    foreground: Color::Rgb { r: 0x24, g: 0x29, b: 0x2f },
    keyword: Color::Rgb { r: 0x05, g: 0x50, b: 0xae },
    builtin: Color::Rgb { r: 0x82, g: 0x50, b: 0xdf },
    comment: Color::Rgb { r: 0x6e, g: 0x77, b: 0x81 },
    string: Color::Rgb { r: 0xa3, g: 0x15, b: 0x15 },
    number: Color::Rgb { r: 0x11, g: 0x63, b: 0x29 },
    function: Color::Rgb { r: 0x95, g: 0x38, b: 0x00 },
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggled_flips_between_the_two_themes() {
        assert_eq!(Theme::Dark.toggled(), Theme::Light);
        assert_eq!(Theme::Light.toggled().toggled(), Theme::Light);
    }

    #[test]
    fn serializes_as_lowercase_names() {
        #[derive(Serialize, Deserialize)]
        struct Wrap { theme: Theme }

        let s = toml::to_string(&Wrap { theme: Theme::Light }).unwrap();
        assert!(s.contains("\"light\""));
        let back: Wrap = toml::from_str("theme = \"dark\"").unwrap();
        assert_eq!(back.theme, Theme::Dark);
    }

    #[test]
    fn palettes_disagree_on_background() {
        assert_ne!(DARK.background, LIGHT.background);
        assert_eq!(Theme::Dark.palette().background, DARK.background);
    }
}
