use std::{
    fmt,
    sync::atomic::{AtomicBool, Ordering},
};

use colored::Color;

/// Whether rendered reports carry ANSI colour codes. Enabled at process start.
static COLOUR_ENABLED: AtomicBool = AtomicBool::new(true);

/// Overwrite the process wide colour flag. Takes effect for every subsequent render.
pub fn set_colour_enabled(enabled: bool) {
    COLOUR_ENABLED.store(enabled, Ordering::Relaxed);
}

/// The current value of the process wide colour flag.
pub fn colour_enabled() -> bool {
    COLOUR_ENABLED.load(Ordering::Relaxed)
}

const RESET: &str = "\x1b[0m";

/// Wrap text in ANSI colour sequences, honouring the process wide colour flag at call time.
/// With the flag disabled the text passes through unchanged.
pub(crate) trait Coloured: fmt::Display {
    fn coloured(&self, colour: Color) -> String {
        if colour_enabled() {
            format!("\x1b[{}m{}{}", colour.to_fg_str(), self, RESET)
        } else {
            self.to_string()
        }
    }
    fn red(&self) -> String {
        self.coloured(Color::Red)
    }
    fn bright_red(&self) -> String {
        self.coloured(Color::BrightRed)
    }
    fn cyan(&self) -> String {
        self.coloured(Color::Cyan)
    }
    fn bright_cyan(&self) -> String {
        self.coloured(Color::BrightCyan)
    }
    fn bright_yellow(&self) -> String {
        self.coloured(Color::BrightYellow)
    }
    fn bright_blue(&self) -> String {
        self.coloured(Color::BrightBlue)
    }
    fn white(&self) -> String {
        self.coloured(Color::White)
    }
    fn bright_white(&self) -> String {
        self.coloured(Color::BrightWhite)
    }
}

impl Coloured for str {}
impl Coloured for String {}
