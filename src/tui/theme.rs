use std::collections::HashMap;

use ratatui::style::Color;

use crate::model::{FileStatus, Priority, ProjectStatus, TaskStatus, UiConfig};

/// Parsed color theme for the TUI
#[derive(Debug, Clone)]
pub struct Theme {
    pub background: Color,
    pub text: Color,
    pub text_bright: Color,
    pub highlight: Color,
    pub dim: Color,
    pub red: Color,
    pub yellow: Color,
    pub green: Color,
    pub cyan: Color,
    pub purple: Color,
    pub blue: Color,
    pub selection_bg: Color,
    pub selection_border: Color,
    pub search_match_bg: Color,
    pub search_match_fg: Color,
    /// Badge color per priority
    pub priority_colors: HashMap<Priority, Color>,
}

impl Default for Theme {
    fn default() -> Self {
        let mut priority_colors = HashMap::new();
        priority_colors.insert(Priority::Urgent, Color::Rgb(0xFF, 0x44, 0x44));
        priority_colors.insert(Priority::Medium, Color::Rgb(0xFF, 0xD7, 0x00));
        priority_colors.insert(Priority::Low, Color::Rgb(0x44, 0xFF, 0x88));

        Theme {
            background: Color::Rgb(0x0C, 0x00, 0x1B),
            text: Color::Rgb(0xB0, 0xAA, 0xFF),
            text_bright: Color::Rgb(0xFF, 0xFF, 0xFF),
            highlight: Color::Rgb(0xFB, 0x41, 0x96),
            dim: Color::Rgb(0x7D, 0x78, 0xBF),
            red: Color::Rgb(0xFF, 0x44, 0x44),
            yellow: Color::Rgb(0xFF, 0xD7, 0x00),
            green: Color::Rgb(0x44, 0xFF, 0x88),
            cyan: Color::Rgb(0x44, 0xDD, 0xFF),
            purple: Color::Rgb(0xCC, 0x66, 0xFF),
            blue: Color::Rgb(0x44, 0x88, 0xFF),
            selection_bg: Color::Rgb(0x3D, 0x14, 0x38),
            selection_border: Color::Rgb(0xFB, 0x41, 0x96),
            search_match_bg: Color::Rgb(0x40, 0xE0, 0xD0),
            search_match_fg: Color::Rgb(0x0C, 0x00, 0x1B),
            priority_colors,
        }
    }
}

/// Parse a hex color string like "#FF4444" into an RGB Color
fn parse_hex_color(hex: &str) -> Option<Color> {
    let hex = hex.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some(Color::Rgb(r, g, b))
}

impl Theme {
    /// Create a theme from the UI config, falling back to defaults
    pub fn from_config(ui: &UiConfig) -> Self {
        let mut theme = Theme::default();

        // Apply color overrides from [ui.colors]
        for (key, value) in &ui.colors {
            if let Some(color) = parse_hex_color(value) {
                match key.as_str() {
                    "background" => theme.background = color,
                    "text" => theme.text = color,
                    "text_bright" => theme.text_bright = color,
                    "highlight" => theme.highlight = color,
                    "dim" => theme.dim = color,
                    "red" => theme.red = color,
                    "yellow" => theme.yellow = color,
                    "green" => theme.green = color,
                    "cyan" => theme.cyan = color,
                    "purple" => theme.purple = color,
                    "blue" => theme.blue = color,
                    "selection_bg" => theme.selection_bg = color,
                    "selection_border" => theme.selection_border = color,
                    "search_match_bg" => theme.search_match_bg = color,
                    "search_match_fg" => theme.search_match_fg = color,
                    _ => {}
                }
            }
        }

        // Apply priority overrides from [ui.priority_colors]
        for (name, value) in &ui.priority_colors {
            if let (Ok(priority), Some(color)) = (name.parse::<Priority>(), parse_hex_color(value)) {
                theme.priority_colors.insert(priority, color);
            }
        }

        theme
    }

    pub fn priority_color(&self, priority: Priority) -> Color {
        self.priority_colors
            .get(&priority)
            .copied()
            .unwrap_or(self.text)
    }

    /// Lane header color
    pub fn status_color(&self, status: TaskStatus) -> Color {
        match status {
            TaskStatus::Todo => self.text,
            TaskStatus::InProgress => self.highlight,
            TaskStatus::Done => self.green,
        }
    }

    pub fn project_status_color(&self, status: ProjectStatus) -> Color {
        match status {
            ProjectStatus::InProgress => self.cyan,
            ProjectStatus::Pending => self.yellow,
            ProjectStatus::Completed => self.green,
        }
    }

    pub fn file_status_color(&self, status: FileStatus) -> Color {
        match status {
            FileStatus::Ready => self.green,
            FileStatus::Error => self.red,
            FileStatus::Uploading | FileStatus::Processing => self.blue,
            FileStatus::Pending => self.dim,
        }
    }
}
