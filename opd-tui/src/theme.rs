//! Slate theme tokens for the OPD review console.
//!
//! # Color Palette
//! - **Accent**: Sky blue (focus, titles, cursor)
//! - **Positive**: Green (approved, necessity pass, high confidence)
//! - **Negative**: Red (rejected, errors)
//! - **Warning**: Amber (partial, necessity fail, low confidence)
//! - **Neutral**: Slate (manual review, unknown status)
//! - **Muted**: Gray (secondary text, hints)

use ratatui::style::{Color, Modifier, Style};

use opd_core::render::Tone;

#[derive(Debug, Clone, Copy)]
pub struct Theme {
    pub accent: Color,
    pub positive: Color,
    pub negative: Color,
    pub warning: Color,
    pub neutral: Color,
    pub muted: Color,
    pub text_primary: Color,
}

impl Theme {
    pub const fn slate() -> Self {
        Self {
            accent: Color::Rgb(56, 189, 248),
            positive: Color::Rgb(34, 197, 94),
            negative: Color::Rgb(239, 68, 68),
            warning: Color::Rgb(245, 158, 11),
            neutral: Color::Rgb(148, 163, 184),
            muted: Color::Rgb(100, 116, 139),
            text_primary: Color::White,
        }
    }

    /// Color for a status badge or panel tone.
    pub fn tone_color(&self, tone: Tone) -> Color {
        match tone {
            Tone::Positive => self.positive,
            Tone::Negative => self.negative,
            Tone::Warning => self.warning,
            Tone::Neutral => self.neutral,
        }
    }
}

const THEME: Theme = Theme::slate();

pub fn accent() -> Style {
    Style::default().fg(THEME.accent)
}

pub fn accent_bold() -> Style {
    accent().add_modifier(Modifier::BOLD)
}

pub fn muted() -> Style {
    Style::default().fg(THEME.muted)
}

pub fn text() -> Style {
    Style::default().fg(THEME.text_primary)
}

pub fn positive() -> Style {
    Style::default().fg(THEME.positive)
}

pub fn negative() -> Style {
    Style::default().fg(THEME.negative)
}

pub fn warning() -> Style {
    Style::default().fg(THEME.warning)
}

pub fn tone(tone: Tone) -> Style {
    Style::default().fg(THEME.tone_color(tone))
}

/// Status badge: bold, tone-colored.
pub fn badge(t: Tone) -> Style {
    tone(t).add_modifier(Modifier::BOLD)
}

pub fn panel_border(active: bool) -> Style {
    if active {
        accent()
    } else {
        muted()
    }
}

pub fn panel_title(active: bool) -> Style {
    if active {
        accent_bold()
    } else {
        muted()
    }
}

/// Highlighted table row under the cursor.
pub fn cursor_row() -> Style {
    accent().add_modifier(Modifier::REVERSED)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tone_colors() {
        let theme = THEME;
        assert_eq!(theme.tone_color(Tone::Positive), theme.positive);
        assert_eq!(theme.tone_color(Tone::Negative), theme.negative);
        assert_eq!(theme.tone_color(Tone::Warning), theme.warning);
        assert_eq!(theme.tone_color(Tone::Neutral), theme.neutral);
    }

    #[test]
    fn badge_is_bold() {
        assert!(badge(Tone::Positive).add_modifier.contains(Modifier::BOLD));
        assert_eq!(badge(Tone::Negative).fg, Some(THEME.negative));
    }
}
