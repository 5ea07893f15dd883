//! Hardwood theme tokens for the ScoutLab dashboard
//!
//! # Color Palette
//! - **Accent**: Court orange (focus, highlights)
//! - **Positive**: Bright green (winning records, available players)
//! - **Negative**: Red (losing records, errors)
//! - **Warning**: Amber (alerts, expiring contracts)
//! - **Neutral**: Lavender (secondary info)
//! - **Muted**: Slate (disabled, secondary text)

use ratatui::style::{Color, Modifier, Style};

use scoutlab_core::domain::{ContractStatus, GLeagueCategory};

/// Hardwood theme for the dashboard
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

impl Default for Theme {
    fn default() -> Self {
        Self::hardwood()
    }
}

impl Theme {
    pub fn hardwood() -> Self {
        Self {
            accent: Color::Rgb(255, 140, 40),
            positive: Color::Rgb(80, 220, 120),
            negative: Color::Rgb(235, 70, 70),
            warning: Color::Rgb(255, 200, 60),
            neutral: Color::Rgb(170, 150, 230),
            muted: Color::Rgb(120, 135, 155),
            text_primary: Color::White,
        }
    }

    /// Win% above .600 is green, under .400 red.
    pub fn win_pct_color(&self, pct: f64) -> Color {
        match pct {
            p if p >= 0.6 => self.positive,
            p if p >= 0.4 => self.accent,
            _ => self.negative,
        }
    }

    /// Percentile bands: 75+ strong, 25 or less weak.
    pub fn percentile_color(&self, pct: f64) -> Color {
        match pct {
            p if p >= 75.0 => self.positive,
            p if p > 25.0 => self.accent,
            _ => self.negative,
        }
    }

    pub fn category_color(&self, category: GLeagueCategory) -> Color {
        match category {
            GLeagueCategory::Struggling => self.warning,
            GLeagueCategory::WellRounded => self.positive,
            GLeagueCategory::NotTarget => self.muted,
        }
    }

    pub fn status_color(&self, status: ContractStatus) -> Color {
        match status {
            s if s.is_signable_now() => self.positive,
            ContractStatus::Expiring => self.warning,
            _ => self.muted,
        }
    }
}

fn fg(color: Color) -> Style {
    Style::default().fg(color)
}

pub fn accent() -> Style {
    fg(Theme::default().accent)
}

pub fn accent_bold() -> Style {
    accent().add_modifier(Modifier::BOLD)
}

pub fn positive() -> Style {
    fg(Theme::default().positive)
}

pub fn negative() -> Style {
    fg(Theme::default().negative)
}

pub fn warning() -> Style {
    fg(Theme::default().warning)
}

pub fn neutral() -> Style {
    fg(Theme::default().neutral)
}

pub fn muted() -> Style {
    fg(Theme::default().muted)
}

pub fn text() -> Style {
    fg(Theme::default().text_primary)
}

/// Highlighted row under the cursor.
pub fn cursor() -> Style {
    accent().add_modifier(Modifier::REVERSED)
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

pub fn win_pct(pct: f64) -> Style {
    fg(Theme::default().win_pct_color(pct))
}

pub fn percentile(pct: f64) -> Style {
    fg(Theme::default().percentile_color(pct))
}

pub fn category(category: GLeagueCategory) -> Style {
    fg(Theme::default().category_color(category))
}

pub fn status(status: ContractStatus) -> Style {
    fg(Theme::default().status_color(status))
}
