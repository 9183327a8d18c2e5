//! Terminal output formatting with colors
//!
//! Respects NO_COLOR, CLICOLOR, CLICOLOR_FORCE automatically. Every helper
//! writes to the given sink so sessions can be captured in tests.

use std::fmt::Display;
use std::io::{self, Write};

use colored::Colorize;

/// Print error (red bold "error:" prefix)
pub fn error(out: &mut impl Write, msg: &(impl Display + ?Sized)) -> io::Result<()> {
    writeln!(out, "{}: {}", "error".red().bold(), msg)
}

/// Print warning (yellow "Warning:" prefix)
pub fn warning(out: &mut impl Write, msg: &(impl Display + ?Sized)) -> io::Result<()> {
    writeln!(out, "{}: {}", "Warning".yellow(), msg)
}

/// Print success status (green checkmark)
pub fn success(out: &mut impl Write, msg: &(impl Display + ?Sized)) -> io::Result<()> {
    writeln!(out, "{} {}", "✓".green(), msg)
}

/// Print section header (cyan bold)
pub fn header(out: &mut impl Write, msg: &(impl Display + ?Sized)) -> io::Result<()> {
    writeln!(out, "{}", msg.to_string().cyan().bold())
}

/// Print indented detail (no color)
pub fn detail(out: &mut impl Write, msg: &(impl Display + ?Sized)) -> io::Result<()> {
    writeln!(out, "  {}", msg)
}

/// Print plain output (no color)
pub fn info(out: &mut impl Write, msg: &(impl Display + ?Sized)) -> io::Result<()> {
    writeln!(out, "{}", msg)
}

/// Print prompt without newline (cyan)
pub fn prompt(out: &mut impl Write, msg: &(impl Display + ?Sized)) -> io::Result<()> {
    write!(out, "{}", msg.to_string().cyan())?;
    out.flush()
}
