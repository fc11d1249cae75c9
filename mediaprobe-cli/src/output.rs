//! Terminal output helpers.
//!
//! Reports go to stdout untouched; status lines are colored, errors go to
//! stderr.

use owo_colors::OwoColorize;
use std::fmt::Display;

/// Print an info line with label and value, with the label colored
pub fn print_info<T: Display>(label: &str, value: T) {
    println!("{}: {}", label.bright_cyan(), value);
}

/// Print a success message with green styling
pub fn print_success(message: &str) {
    println!("{} {}", "✓".green(), message);
}

/// Print an error message with red styling
pub fn print_error(message: &str) {
    eprintln!("{} {}", "Error:".bold().bright_red(), message);
}

/// Print a report exactly as produced, ensuring a trailing newline.
pub fn print_report(report: &str) {
    if report.ends_with('\n') {
        print!("{}", report);
    } else {
        println!("{}", report);
    }
}
