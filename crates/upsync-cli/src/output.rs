//! Terminal output formatting utilities.

use colored::Colorize;

/// Print a success message.
pub fn success(msg: &str) {
    println!("{} {}", "✓".green(), msg);
}

/// Print an error message (to stderr).
pub fn error(msg: &str) {
    eprintln!("{} {}", "✗".red(), msg);
}

/// Print a warning message (to stderr).
pub fn warn(msg: &str) {
    eprintln!("{} {}", "!".yellow(), msg);
}

/// Print an info message.
pub fn info(msg: &str) {
    println!("{} {}", "→".blue(), msg);
}

/// Print an indented detail line accompanying a previous message.
pub fn detail(msg: &str) {
    println!("  {msg}");
}

/// Print an indented detail line accompanying a warning or error.
pub fn detail_err(msg: &str) {
    eprintln!("  {msg}");
}
