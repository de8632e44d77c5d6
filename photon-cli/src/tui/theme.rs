//! Colors and text styles.

use ratatui::style::{Color, Modifier, Style};

pub const PRIMARY: Color = Color::Rgb(0x7C, 0x3A, 0xED);
pub const SECONDARY: Color = Color::Rgb(0xA7, 0x8B, 0xFA);
pub const ACCENT: Color = Color::Rgb(0xF5, 0x9E, 0x0B);
pub const SUCCESS: Color = Color::Rgb(0x10, 0xB9, 0x81);
pub const DANGER: Color = Color::Rgb(0xEF, 0x44, 0x44);
pub const MUTED: Color = Color::Rgb(0x6B, 0x72, 0x80);
pub const BG: Color = Color::Rgb(0x1F, 0x29, 0x37);
pub const BG_LIGHT: Color = Color::Rgb(0x37, 0x41, 0x51);
pub const FG: Color = Color::Rgb(0xF9, 0xFA, 0xFB);
pub const FG_MUTED: Color = Color::Rgb(0x9C, 0xA3, 0xAF);

pub fn logo() -> Style {
    Style::new().fg(PRIMARY).add_modifier(Modifier::BOLD)
}

pub fn title() -> Style {
    Style::new().fg(FG).add_modifier(Modifier::BOLD)
}

pub fn subtitle() -> Style {
    Style::new().fg(FG_MUTED).add_modifier(Modifier::ITALIC)
}

pub fn item() -> Style {
    Style::new().fg(FG)
}

pub fn selected() -> Style {
    Style::new().fg(ACCENT).add_modifier(Modifier::BOLD)
}

pub fn dir() -> Style {
    Style::new().fg(SECONDARY).add_modifier(Modifier::BOLD)
}

pub fn image_file() -> Style {
    Style::new().fg(SUCCESS)
}

/// Missing recent files.
pub fn dimmed() -> Style {
    Style::new().fg(MUTED).add_modifier(Modifier::CROSSED_OUT)
}

pub fn badge() -> Style {
    Style::new().fg(FG).bg(PRIMARY)
}

pub fn badge_selected() -> Style {
    Style::new().fg(BG).bg(ACCENT).add_modifier(Modifier::BOLD)
}

pub fn success() -> Style {
    Style::new().fg(SUCCESS).add_modifier(Modifier::BOLD)
}

pub fn error() -> Style {
    Style::new().fg(DANGER).add_modifier(Modifier::BOLD)
}

pub fn warning() -> Style {
    Style::new().fg(ACCENT)
}

pub fn help() -> Style {
    Style::new().fg(MUTED)
}

pub fn slider_filled() -> Style {
    Style::new().fg(PRIMARY)
}

pub fn slider_track() -> Style {
    Style::new().fg(BG_LIGHT)
}
