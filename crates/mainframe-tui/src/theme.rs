//! Color palettes for the six dashboard themes, plus semantic styles.

use ratatui::style::{Color, Modifier, Style};

use mainframe_core::{CpuBand, RamBand, Theme};

/// Every color a screen needs. One per [`Theme`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub accent: Color,
    pub secondary: Color,
    pub text: Color,
    pub muted: Color,
    pub border: Color,
    pub bg: Color,
    pub highlight_bg: Color,
    pub success: Color,
    pub warning: Color,
    pub error: Color,
}

impl Palette {
    pub fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Nebula => Self {
                accent: Color::Rgb(225, 53, 255),     // #e135ff
                secondary: Color::Rgb(128, 255, 234), // #80ffea
                text: Color::Rgb(189, 193, 207),
                muted: Color::Rgb(98, 114, 164),
                border: Color::Rgb(98, 114, 164),
                bg: Color::Rgb(30, 31, 41),
                highlight_bg: Color::Rgb(40, 42, 54),
                success: Color::Rgb(80, 250, 123),
                warning: Color::Rgb(241, 250, 140),
                error: Color::Rgb(255, 99, 99),
            },
            Theme::Matrix => Self {
                accent: Color::Rgb(0, 255, 65),
                secondary: Color::Rgb(0, 143, 17),
                text: Color::Rgb(180, 255, 180),
                muted: Color::Rgb(60, 120, 60),
                border: Color::Rgb(0, 100, 20),
                bg: Color::Rgb(0, 10, 0),
                highlight_bg: Color::Rgb(0, 40, 10),
                success: Color::Rgb(0, 255, 65),
                warning: Color::Rgb(200, 255, 0),
                error: Color::Rgb(255, 60, 60),
            },
            Theme::Sunset => Self {
                accent: Color::Rgb(255, 126, 95),
                secondary: Color::Rgb(254, 180, 123),
                text: Color::Rgb(255, 228, 210),
                muted: Color::Rgb(150, 100, 110),
                border: Color::Rgb(134, 72, 105),
                bg: Color::Rgb(38, 20, 36),
                highlight_bg: Color::Rgb(62, 32, 55),
                success: Color::Rgb(168, 230, 130),
                warning: Color::Rgb(255, 206, 84),
                error: Color::Rgb(255, 82, 82),
            },
            Theme::Glacier => Self {
                accent: Color::Rgb(136, 192, 208),
                secondary: Color::Rgb(143, 188, 187),
                text: Color::Rgb(229, 233, 240),
                muted: Color::Rgb(120, 135, 160),
                border: Color::Rgb(76, 86, 106),
                bg: Color::Rgb(46, 52, 64),
                highlight_bg: Color::Rgb(59, 66, 82),
                success: Color::Rgb(163, 190, 140),
                warning: Color::Rgb(235, 203, 139),
                error: Color::Rgb(191, 97, 106),
            },
            Theme::Ember => Self {
                accent: Color::Rgb(255, 140, 0),
                secondary: Color::Rgb(255, 196, 0),
                text: Color::Rgb(240, 220, 200),
                muted: Color::Rgb(140, 100, 80),
                border: Color::Rgb(110, 55, 30),
                bg: Color::Rgb(25, 12, 8),
                highlight_bg: Color::Rgb(55, 25, 15),
                success: Color::Rgb(160, 220, 90),
                warning: Color::Rgb(255, 196, 0),
                error: Color::Rgb(255, 69, 0),
            },
            Theme::Mono => Self {
                accent: Color::White,
                secondary: Color::Gray,
                text: Color::Gray,
                muted: Color::DarkGray,
                border: Color::DarkGray,
                bg: Color::Black,
                highlight_bg: Color::Rgb(48, 48, 48),
                success: Color::White,
                warning: Color::Gray,
                error: Color::White,
            },
        }
    }

    // ── Semantic styles ─────────────────────────────────────────────

    pub fn title(&self) -> Style {
        Style::default().fg(self.secondary).add_modifier(Modifier::BOLD)
    }

    pub fn border_focused(&self) -> Style {
        Style::default().fg(self.accent)
    }

    pub fn border_default(&self) -> Style {
        Style::default().fg(self.border)
    }

    pub fn body(&self) -> Style {
        Style::default().fg(self.text)
    }

    pub fn selected(&self) -> Style {
        Style::default()
            .fg(self.accent)
            .bg(self.highlight_bg)
            .add_modifier(Modifier::BOLD)
    }

    pub fn key_hint(&self) -> Style {
        Style::default().fg(self.muted)
    }

    pub fn key_hint_key(&self) -> Style {
        Style::default().fg(self.secondary).add_modifier(Modifier::BOLD)
    }

    /// Gauge color for a CPU band.
    pub fn cpu_band(&self, band: CpuBand) -> Color {
        match band {
            CpuBand::Idle => self.success,
            CpuBand::Moderate => self.secondary,
            CpuBand::High => self.warning,
            CpuBand::Critical => self.error,
        }
    }

    pub fn ram_band(&self, band: RamBand) -> Color {
        match band {
            RamBand::Plenty => self.success,
            RamBand::Healthy => self.secondary,
            RamBand::Busy => self.warning,
            RamBand::NearCapacity => self.error,
        }
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::for_theme(Theme::default())
    }
}
