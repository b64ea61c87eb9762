//! Status output for the weave CLI.
//!
//! `weave render` writes the expanded document to stdout, so it can be piped
//! or redirected. Everything else (warnings, statistics, check results) goes
//! to stderr through these helpers, styled with [`console`].

use console::style;

/// Section title, e.g. the statistics block or one file in `weave check`.
pub fn print_header(text: &str) {
    eprintln!("\n{}", style(text).bold().cyan());
    eprintln!("{}", style("=".repeat(text.len())).dim());
}

/// A completed step: output written, all references resolved.
pub fn print_success(text: &str) {
    eprintln!("{} {}", style("[OK]").green().bold(), text);
}

/// A recoverable problem, such as a template left unexpanded.
pub fn print_warning(text: &str) {
    eprintln!("{} {}", style("[WARN]").yellow().bold(), text);
}

/// A missing reference or unreadable input found by `weave check`.
pub fn print_error(text: &str) {
    eprintln!("{} {}", style("[ERROR]").red().bold(), text);
}

/// One indented statistic or detail line.
pub fn print_key_value(key: &str, value: &str) {
    eprintln!("  {}: {}", style(key).dim(), value);
}
