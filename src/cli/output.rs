//! Terminal output formatting with colors
//!
//! Respects NO_COLOR, CLICOLOR, CLICOLOR_FORCE automatically. Every helper
//! writes to the given writer so the menu can be driven from tests.

use std::fmt::Display;
use std::io::{self, Write};

use colored::Colorize;

use crate::domain::Course;

/// Print error (red bold "error:" prefix)
pub fn error(w: &mut impl Write, msg: &(impl Display + ?Sized)) -> io::Result<()> {
    writeln!(w, "{}: {}", "error".red().bold(), msg)
}

/// Print warning (yellow "Warning:" prefix)
pub fn warning(w: &mut impl Write, msg: &(impl Display + ?Sized)) -> io::Result<()> {
    writeln!(w, "{}: {}", "Warning".yellow(), msg)
}

/// Print success status (green checkmark)
pub fn success(w: &mut impl Write, msg: &(impl Display + ?Sized)) -> io::Result<()> {
    writeln!(w, "{} {}", "✓".green(), msg)
}

/// Print section header (cyan bold)
pub fn header(w: &mut impl Write, msg: &(impl Display + ?Sized)) -> io::Result<()> {
    writeln!(w, "{}", msg.to_string().cyan().bold())
}

/// Print indented detail (no color)
pub fn detail(w: &mut impl Write, msg: &(impl Display + ?Sized)) -> io::Result<()> {
    writeln!(w, "  {}", msg)
}

/// Print plain output (no color)
pub fn info(w: &mut impl Write, msg: &(impl Display + ?Sized)) -> io::Result<()> {
    writeln!(w, "{}", msg)
}

/// Print prompt without newline (cyan)
pub fn prompt(w: &mut impl Write, msg: &(impl Display + ?Sized)) -> io::Result<()> {
    write!(w, "{} ", msg.to_string().cyan())?;
    w.flush()
}

/// Print a course with its prerequisites
pub fn course(w: &mut impl Write, course: &Course) -> io::Result<()> {
    writeln!(w, "{}", course)?;
    writeln!(w, "Prerequisites: {}", course.prerequisites_display())
}
