// Utility functions for CLI

use owo_colors::OwoColorize;
use std::path::Path;

/// Output handler that respects quiet mode
#[derive(Debug, Clone, Copy)]
pub struct OutputHandler {
    quiet: bool,
}

impl OutputHandler {
    pub fn new(quiet: bool) -> Self {
        Self { quiet }
    }

    /// Print explanatory text (suppressed in quiet mode)
    pub fn print_info(&self, text: &str) {
        if !self.quiet {
            println!("{text}");
        }
    }

    /// Print formatted explanatory text (suppressed in quiet mode)
    pub fn print_info_fmt(&self, args: std::fmt::Arguments) {
        if !self.quiet {
            println!("{args}");
        }
    }

    /// Print raw results (always shown)
    pub fn print_result(&self, text: &str) {
        println!("{text}");
    }

    /// Print to stderr (always shown)
    pub fn print_error(&self, text: &str) {
        eprintln!("{text}");
    }
}

// Colorization helpers
pub fn should_use_colors() -> bool {
    isatty::stdout_isatty()
}

pub fn colorize_address(address: &str) -> String {
    if should_use_colors() {
        address.green().to_string()
    } else {
        address.to_string()
    }
}

pub fn colorize_tag(tag: &str) -> String {
    if should_use_colors() {
        tag.blue().to_string()
    } else {
        tag.to_string()
    }
}

pub fn colorize_name(name: &str) -> String {
    if should_use_colors() {
        name.yellow().to_string()
    } else {
        name.to_string()
    }
}

pub fn colorize_warning(text: &str) -> String {
    if should_use_colors() {
        text.yellow().to_string()
    } else {
        text.to_string()
    }
}

pub fn colorize_error(text: &str) -> String {
    if should_use_colors() {
        text.red().to_string()
    } else {
        text.to_string()
    }
}

pub fn colorize_success(text: &str) -> String {
    if should_use_colors() {
        text.green().to_string()
    } else {
        text.to_string()
    }
}

pub fn colorize_detail(text: &str) -> String {
    if should_use_colors() {
        text.dimmed().to_string()
    } else {
        text.to_string()
    }
}

/// `path` relative to `base` when it lies below it
pub fn display_relative(path: &Path, base: &Path) -> String {
    path.strip_prefix(base)
        .unwrap_or(path)
        .display()
        .to_string()
}
