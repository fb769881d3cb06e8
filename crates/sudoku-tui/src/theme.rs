use clap::ValueEnum;
use crossterm::style::Color;
use sudoku_board::{FillSource, Provenance};

/// Palette selectable from the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ThemeName {
    #[default]
    Dark,
    Light,
}

impl ThemeName {
    pub fn toggle(self) -> Self {
        match self {
            ThemeName::Dark => ThemeName::Light,
            ThemeName::Light => ThemeName::Dark,
        }
    }
}

/// Color theme for the board
#[derive(Debug, Clone)]
pub struct Theme {
    pub name: ThemeName,
    /// Background color
    pub bg: Color,
    /// Default text color
    pub fg: Color,
    /// Grid border color
    pub border: Color,
    /// Box border color (thicker 3x3 separators)
    pub box_border: Color,
    /// Clue of the active puzzle
    pub given: Color,
    /// Digit typed by the player
    pub user: Color,
    /// Digit placed by the recognition reveal
    pub ocr: Color,
    /// Digit placed by the solver
    pub answer: Color,
    /// Selected cell background
    pub selected_bg: Color,
    /// Conflict color
    pub error: Color,
    pub success: Color,
    /// Timer/info text color
    pub info: Color,
    /// Key binding text color
    pub key: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

impl Theme {
    pub fn from_name(name: ThemeName) -> Self {
        match name {
            ThemeName::Dark => Self::dark(),
            ThemeName::Light => Self::light(),
        }
    }

    pub fn dark() -> Self {
        Self {
            name: ThemeName::Dark,
            bg: Color::Rgb { r: 20, g: 22, b: 30 },
            fg: Color::Rgb { r: 230, g: 230, b: 240 },
            border: Color::Rgb { r: 70, g: 75, b: 90 },
            box_border: Color::Rgb { r: 130, g: 140, b: 170 },
            given: Color::Rgb { r: 255, g: 255, b: 255 },
            user: Color::Rgb { r: 80, g: 180, b: 255 },
            ocr: Color::Rgb { r: 190, g: 140, b: 255 },
            answer: Color::Rgb { r: 120, g: 230, b: 160 },
            selected_bg: Color::Rgb { r: 70, g: 90, b: 140 },
            error: Color::Rgb { r: 255, g: 90, b: 90 },
            success: Color::Rgb { r: 90, g: 255, b: 130 },
            info: Color::Rgb { r: 160, g: 165, b: 185 },
            key: Color::Rgb { r: 255, g: 210, b: 100 },
        }
    }

    pub fn light() -> Self {
        Self {
            name: ThemeName::Light,
            bg: Color::Rgb { r: 248, g: 248, b: 252 },
            fg: Color::Rgb { r: 30, g: 30, b: 40 },
            border: Color::Rgb { r: 180, g: 180, b: 195 },
            box_border: Color::Rgb { r: 60, g: 60, b: 80 },
            given: Color::Rgb { r: 0, g: 0, b: 0 },
            user: Color::Rgb { r: 30, g: 100, b: 200 },
            ocr: Color::Rgb { r: 120, g: 60, b: 190 },
            answer: Color::Rgb { r: 30, g: 140, b: 70 },
            selected_bg: Color::Rgb { r: 180, g: 200, b: 255 },
            error: Color::Rgb { r: 220, g: 50, b: 50 },
            success: Color::Rgb { r: 40, g: 160, b: 60 },
            info: Color::Rgb { r: 90, g: 90, b: 110 },
            key: Color::Rgb { r: 200, g: 120, b: 20 },
        }
    }

    /// Swap to the other palette
    pub fn toggled(&self) -> Self {
        Self::from_name(self.name.toggle())
    }

    /// Digit color for a cell. Conflicts win, then solver provenance, then
    /// clue status, then how the digit was typed.
    pub fn digit_color(
        &self,
        has_error: bool,
        is_fixed: bool,
        provenance: Provenance,
        source: FillSource,
    ) -> Color {
        if has_error {
            return self.error;
        }
        match provenance {
            Provenance::Question => return self.given,
            Provenance::Answer => return self.answer,
            Provenance::Empty => {}
        }
        if is_fixed {
            return self.given;
        }
        match source {
            FillSource::Ocr => self.ocr,
            FillSource::User => self.user,
            FillSource::Empty => self.fg,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_round_trips() {
        let theme = Theme::dark();
        assert_eq!(theme.toggled().name, ThemeName::Light);
        assert_eq!(theme.toggled().toggled().name, ThemeName::Dark);
    }

    #[test]
    fn test_error_color_wins() {
        let theme = Theme::dark();
        let color = theme.digit_color(true, true, Provenance::Question, FillSource::User);
        assert_eq!(color, theme.error);
    }

    #[test]
    fn test_provenance_before_fill_source() {
        let theme = Theme::light();
        assert_eq!(
            theme.digit_color(false, false, Provenance::Answer, FillSource::User),
            theme.answer
        );
        assert_eq!(
            theme.digit_color(false, false, Provenance::Empty, FillSource::Ocr),
            theme.ocr
        );
        assert_eq!(
            theme.digit_color(false, true, Provenance::Empty, FillSource::Empty),
            theme.given
        );
    }
}
