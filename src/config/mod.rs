//! User configuration for `lab`.
//!
//! A single optional TOML file, `~/.config/labkit/config.toml` (or
//! `$LABKIT_CONFIG_PATH`):
//!
//! ```toml
//! default-remote = "upstream"
//! fork-remote = "origin"
//!
//! [merge-request]
//! template = "~/notes/mr-template.md"
//! draft = true
//! squash = true
//! remove-source-branch = true
//!
//! [issue]
//! template = "templates/bug.md"
//! ```
//!
//! Every key is optional and a missing file is the empty configuration.
//! Command-line flags can turn a boolean default on but never off.

mod user;

pub use user::{IssueConfig, MergeRequestConfig, UserConfig, get_config_path};
