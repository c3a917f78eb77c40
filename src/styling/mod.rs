//! Styling for terminal output.
//!
//! Built on the anstyle ecosystem:
//! - anstream auto-detects color support
//! - color-print's `cformat!` carries inline styles in messages
//!
//! ## stdout vs stderr
//!
//! - **stdout**: primary data (the created URL, label and member listings)
//! - **stderr**: status messages (errors, hints, warnings)
//!
//! `lab mr create | xargs open` therefore only ever sees the URL.

mod constants;
mod format;
mod suggest;

pub use anstream::{eprint, eprintln, print, println, stderr, stdout};

pub use constants::*;
pub use format::format_with_gutter;
pub use suggest::{suggest_command, suggest_git};

/// Get terminal width, or `usize::MAX` if detection fails.
///
/// Checks stderr first (where status messages go), then stdout, then the
/// `COLUMNS` environment variable.
pub fn get_terminal_width() -> usize {
    if let Some((terminal_size::Width(w), _)) =
        terminal_size::terminal_size_of(std::io::stderr()).or_else(terminal_size::terminal_size)
    {
        return w as usize;
    }

    if let Ok(cols) = std::env::var("COLUMNS")
        && let Ok(width) = cols.parse::<usize>()
    {
        return width;
    }

    usize::MAX
}

/// Visual width of a string, ignoring ANSI escape codes.
pub fn visual_width(s: &str) -> usize {
    use ansi_str::AnsiStr;
    use unicode_width::UnicodeWidthStr;
    s.ansi_strip().width()
}

/// Strip ANSI escape codes, for comparing rendered messages in tests and logs.
pub fn strip_ansi(s: &str) -> String {
    use ansi_str::AnsiStr;
    s.ansi_strip().into_owned()
}
