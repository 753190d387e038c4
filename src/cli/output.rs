//! Terminal output formatting with colors
//!
//! Respects NO_COLOR, CLICOLOR, CLICOLOR_FORCE automatically.

use colored::Colorize;

/// Print error (red bold "error:" prefix) to stderr
pub fn error(msg: &(impl std::fmt::Display + ?Sized)) {
    eprintln!("{}: {}", "error".red().bold(), msg);
}

/// Print warning (yellow "Warning:" prefix) to stderr
pub fn warning(msg: &(impl std::fmt::Display + ?Sized)) {
    eprintln!("{}: {}", "Warning".yellow(), msg);
}

/// Print success status (green checkmark)
pub fn success(msg: &(impl std::fmt::Display + ?Sized)) {
    println!("{} {}", "✓".green(), msg);
}

/// Print section header (cyan bold)
pub fn header(msg: &(impl std::fmt::Display + ?Sized)) {
    println!("{}", msg.to_string().cyan().bold());
}

/// Print aligned `label: value` line, indented
pub fn field(label: &str, value: &(impl std::fmt::Display + ?Sized)) {
    println!("  {:<14} {}", format!("{label}:").dimmed(), value);
}

/// Print command usage line: name padded, description plain
pub fn usage_line(name: &str, description: &str) {
    println!("  {:<28} {}", name.green(), description);
}

/// Print indented detail (no color)
pub fn detail(msg: &(impl std::fmt::Display + ?Sized)) {
    println!("  {}", msg);
}

/// Print plain output (no color)
pub fn info(msg: &(impl std::fmt::Display + ?Sized)) {
    println!("{}", msg);
}

/// Print startup banner with access URLs
pub fn banner(title: &str, urls: &[(&str, &str)]) {
    let rule = "=".repeat(60);
    println!("{}", rule.cyan());
    println!("{}", title.cyan().bold());
    for (label, url) in urls {
        println!("  {:<12} {}", format!("{label}:"), url.underline());
    }
    println!("{}", rule.cyan());
}
