//! Terminal output helpers.
//!
//! Status lines go to stderr so that stdout carries only the command's result
//! (a query, a URL, JSON) and stays pipeable.

use colored::Colorize;

/// Satisfiable / passed (green checkmark).
pub fn check_ok(msg: &str) {
    eprintln!("  {} {}", "\u{2714}".bright_green(), msg);
}

/// Not satisfiable / warning (yellow dash).
pub fn check_warn(msg: &str) {
    eprintln!("  {} {}", "-".bright_yellow(), msg.yellow());
}

/// Section header: ">> Title" in cyan.
pub fn section(title: &str) {
    eprintln!("  {} {}", ">>".bright_cyan().bold(), title.bold());
}

/// Key-value display: "  Label:       value".
pub fn kv(label: &str, value: &str) {
    eprintln!("  {:<13}{}", format!("{label}:"), value);
}

/// Hint line in dimmed text.
pub fn hint(msg: &str) {
    eprintln!("  {} {}", "hint:".dimmed(), msg.dimmed());
}

pub fn success(msg: &str) {
    eprintln!("  {} {}", "\u{2714}".bright_green(), msg);
}

pub fn error(msg: &str) {
    eprintln!("  {} {}", "\u{2718}".bright_red(), msg.bright_red());
}

/// Red error + yellow "fix:" suggestion.
pub fn error_with_fix(msg: &str, fix: &str) {
    eprintln!("  {} {}", "\u{2718}".bright_red(), msg.bright_red());
    eprintln!("    {} {}", "fix:".bright_yellow(), fix);
}

pub fn blank() {
    eprintln!();
}
