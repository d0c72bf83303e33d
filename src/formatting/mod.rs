use crate::triage::UrgencyLevel;
use colored::*;
use std::env;
use std::io::IsTerminal;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorMode {
    Auto,   // Detect based on terminal
    Always, // Force colors on
    Never,  // Force colors off
}

impl ColorMode {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "auto" => Some(Self::Auto),
            "always" => Some(Self::Always),
            "never" => Some(Self::Never),
            _ => None,
        }
    }

    pub fn should_use_color(&self) -> bool {
        match self {
            Self::Always => true,
            Self::Never => false,
            Self::Auto => detect_color_support(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormattingConfig {
    pub color: ColorMode,
}

impl Default for FormattingConfig {
    fn default() -> Self {
        Self {
            color: ColorMode::Auto,
        }
    }
}

impl FormattingConfig {
    pub fn new(color: ColorMode) -> Self {
        Self { color }
    }

    /// Honour NO_COLOR, CLICOLOR and CLICOLOR_FORCE
    pub fn from_env() -> Self {
        Self::from_vars(|key| env::var(key).ok())
    }

    pub(crate) fn from_vars(var: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        // Per no-color.org any value disables color
        if var("NO_COLOR").is_some() {
            config.color = ColorMode::Never;
        }
        if var("CLICOLOR").as_deref() == Some("0") {
            config.color = ColorMode::Never;
        }
        if var("CLICOLOR_FORCE").as_deref() == Some("1") {
            config.color = ColorMode::Always;
        }

        config
    }

    /// Plain output configuration (no colors)
    pub fn plain() -> Self {
        Self {
            color: ColorMode::Never,
        }
    }

    /// Apply a configured preference (`use_color` in `[output]`) unless the
    /// environment already forced a mode.
    pub fn with_preference(mut self, use_color: Option<bool>) -> Self {
        if self.color == ColorMode::Auto {
            match use_color {
                Some(true) => self.color = ColorMode::Always,
                Some(false) => self.color = ColorMode::Never,
                None => {}
            }
        }
        self
    }
}

/// Terminal styling for report elements
#[derive(Debug, Clone, Copy)]
pub struct Styler {
    enabled: bool,
}

impl Styler {
    pub fn new(config: FormattingConfig) -> Self {
        let enabled = config.color.should_use_color();
        colored::control::set_override(enabled);
        Self { enabled }
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub fn header(&self, text: &str) -> String {
        self.paint(text, |t| t.blue().bold())
    }

    pub fn dim(&self, text: &str) -> String {
        self.paint(text, |t| t.dimmed())
    }

    pub fn critical(&self, text: &str) -> String {
        self.paint(text, |t| t.red().bold())
    }

    pub fn warning(&self, text: &str) -> String {
        self.paint(text, |t| t.yellow())
    }

    /// Probability colored by band: 60+ red, 30+ yellow, else green
    pub fn probability(&self, probability: f64) -> String {
        let text = format!("{probability:.1}%");
        if probability >= 60.0 {
            self.paint(&text, |t| t.red())
        } else if probability >= 30.0 {
            self.paint(&text, |t| t.yellow())
        } else {
            self.paint(&text, |t| t.green())
        }
    }

    pub fn urgency(&self, level: UrgencyLevel) -> String {
        let text = level.label().to_uppercase();
        match level {
            UrgencyLevel::Emergency => self.paint(&text, |t| t.white().on_red().bold()),
            UrgencyLevel::Urgent => self.paint(&text, |t| t.red().bold()),
            UrgencyLevel::Gp => self.paint(&text, |t| t.yellow().bold()),
            UrgencyLevel::SelfCare => self.paint(&text, |t| t.green().bold()),
        }
    }

    fn paint(&self, text: &str, style: impl Fn(&str) -> ColoredString) -> String {
        if self.enabled {
            style(text).to_string()
        } else {
            text.to_string()
        }
    }
}

fn detect_color_support() -> bool {
    // Check if we're in a dumb terminal
    if let Ok(term) = env::var("TERM") {
        if term == "dumb" {
            return false;
        }
    }

    std::io::stdout().is_terminal()
}
