use ratatui::style::{Color, Modifier, Style};

use crate::model::Thresholds;

pub const BG: Color = Color::Rgb(9, 15, 25);
pub const PANEL: Color = Color::Rgb(16, 27, 44);
pub const ACCENT: Color = Color::Rgb(52, 211, 153);
pub const MUTED: Color = Color::Rgb(140, 156, 178);
pub const WARN: Color = Color::Rgb(251, 191, 36);
pub const ERROR: Color = Color::Rgb(248, 113, 113);
pub const INFO: Color = Color::Rgb(96, 165, 250);
pub const PL_A: Color = Color::Rgb(17, 94, 89);
pub const PL_B: Color = Color::Rgb(30, 64, 175);
pub const PL_C: Color = Color::Rgb(55, 48, 163);
pub const PL_D: Color = Color::Rgb(82, 24, 124);

#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum Tone {
    Plain,
    Good,
    Warn,
    Bad,
    Info,
    Muted,
}

impl Tone {
    pub fn style(self) -> Style {
        match self {
            Self::Plain => Style::default().fg(Color::White),
            Self::Good => Style::default().fg(ACCENT),
            Self::Warn => Style::default().fg(WARN),
            Self::Bad => Style::default().fg(ERROR).add_modifier(Modifier::BOLD),
            Self::Info => Style::default().fg(INFO),
            Self::Muted => Style::default().fg(MUTED),
        }
    }
}

pub fn percent_tone(percent: u64, thresholds: &Thresholds) -> Tone {
    if percent >= thresholds.critical_percent {
        Tone::Bad
    } else if percent >= thresholds.warn_percent {
        Tone::Warn
    } else {
        Tone::Good
    }
}

pub fn ratio_tone(current: u32, desired: u32) -> Tone {
    if desired == 0 {
        Tone::Muted
    } else if current >= desired {
        Tone::Good
    } else if current == 0 {
        Tone::Bad
    } else {
        Tone::Warn
    }
}

pub fn title_style() -> Style {
    Style::default()
        .fg(Color::Rgb(147, 197, 253))
        .add_modifier(Modifier::BOLD)
}

pub fn section_style() -> Style {
    Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)
}

pub fn header_style() -> Style {
    Style::default().fg(MUTED).add_modifier(Modifier::BOLD)
}

pub fn label_style() -> Style {
    Style::default().fg(MUTED)
}

pub fn selected_style() -> Style {
    Style::default()
        .bg(Color::Rgb(30, 64, 175))
        .add_modifier(Modifier::BOLD)
}

#[cfg(test)]
mod tests {
    use super::{Tone, percent_tone, ratio_tone};
    use crate::model::Thresholds;

    #[test]
    fn percent_bands_follow_thresholds() {
        let thresholds = Thresholds::default();
        assert_eq!(percent_tone(0, &thresholds), Tone::Good);
        assert_eq!(percent_tone(69, &thresholds), Tone::Good);
        assert_eq!(percent_tone(70, &thresholds), Tone::Warn);
        assert_eq!(percent_tone(90, &thresholds), Tone::Bad);
        assert_eq!(percent_tone(150, &thresholds), Tone::Bad);
    }

    #[test]
    fn readiness_ratio_tones() {
        assert_eq!(ratio_tone(3, 3), Tone::Good);
        assert_eq!(ratio_tone(1, 3), Tone::Warn);
        assert_eq!(ratio_tone(0, 3), Tone::Bad);
        assert_eq!(ratio_tone(0, 0), Tone::Muted);
    }
}
