// Output formatting and styling

use colored::Colorize;
use std::io::IsTerminal;

/// Output styling configuration
pub struct OutputStyle {
    pub use_colors: bool,
}

impl Default for OutputStyle {
    fn default() -> Self {
        Self {
            use_colors: std::io::stdout().is_terminal(),
        }
    }
}

impl OutputStyle {
    pub fn plain() -> Self {
        Self { use_colors: false }
    }

    /// Format error message
    pub fn error(&self, msg: &str) -> String {
        if self.use_colors {
            format!("{} {}", "✗".red().bold(), msg)
        } else {
            format!("✗ {}", msg)
        }
    }

    /// Format a popup row; the highlighted row is marked
    pub fn suggestion(&self, index: usize, label: &str, replacement: &str, selected: bool) -> String {
        let marker = if selected { ">" } else { " " };
        let detail = if label == replacement {
            String::new()
        } else {
            format!("  → {:?}", replacement)
        };
        if self.use_colors && selected {
            format!("{} {:>2}. {}{}", marker.cyan().bold(), index, label.bold(), detail.dimmed())
        } else if self.use_colors {
            format!("{} {:>2}. {}{}", marker, index, label, detail.dimmed())
        } else {
            format!("{} {:>2}. {}{}", marker, index, label, detail)
        }
    }

    /// Format a heading line
    pub fn header(&self, msg: &str) -> String {
        if self.use_colors {
            msg.bold().underline().to_string()
        } else {
            msg.to_string()
        }
    }
}

/// Print an error to stderr
pub fn print_error(msg: &str) {
    eprintln!("{}", OutputStyle::default().error(msg));
}
