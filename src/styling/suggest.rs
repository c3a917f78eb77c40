//! Command suggestion helpers for hint messages.
//!
//! ```
//! use labkit::styling::suggest_command;
//!
//! assert_eq!(
//!     suggest_command(&["mr", "create"], &["upstream"], &["--draft"]),
//!     "lab mr create upstream --draft"
//! );
//! ```

use shell_escape::escape;
use std::borrow::Cow;

/// Build a copy-pasteable `lab` command for a hint.
///
/// Positional arguments are shell-escaped. If one starts with `-`, a `--`
/// separator is inserted before it so clap does not read it as a flag.
/// Global flags such as `-C` are never included.
pub fn suggest_command(subcommand: &[&str], args: &[&str], flags: &[&str]) -> String {
    let mut parts = vec!["lab".to_string()];
    parts.extend(subcommand.iter().map(|s| s.to_string()));

    let mut separator_inserted = false;
    for arg in args {
        if arg.starts_with('-') && !separator_inserted {
            parts.push("--".to_string());
            separator_inserted = true;
        }
        parts.push(escape(Cow::Borrowed(*arg)).into_owned());
    }

    parts.extend(flags.iter().map(|s| s.to_string()));
    parts.join(" ")
}

/// Build a copy-pasteable `git` command, escaping every argument.
pub fn suggest_git(args: &[&str]) -> String {
    std::iter::once("git".to_string())
        .chain(args.iter().map(|a| escape(Cow::Borrowed(*a)).into_owned()))
        .collect::<Vec<_>>()
        .join(" ")
}
