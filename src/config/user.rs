use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::Context;
#[cfg(not(test))]
use etcetera::base_strategy::{BaseStrategy, choose_base_strategy};
use serde::{Deserialize, Serialize};

use crate::git::{MessageKind, Repository};

/// Settings for `lab mr create`.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct MergeRequestConfig {
    /// Template file, used instead of the project's
    /// `.gitlab/merge_request_templates/default.md`
    pub template: Option<PathBuf>,
    #[serde(default)]
    pub draft: bool,
    #[serde(default)]
    pub squash: bool,
    #[serde(default)]
    pub remove_source_branch: bool,
    #[serde(flatten, skip_serializing)]
    unknown: BTreeMap<String, toml::Value>,
}

/// Settings for `lab issue create`.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct IssueConfig {
    pub template: Option<PathBuf>,
    #[serde(flatten, skip_serializing)]
    unknown: BTreeMap<String, toml::Value>,
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct UserConfig {
    /// Remote to open merge requests and issues against
    pub default_remote: Option<String>,
    /// Remote holding the source branch when the current branch tracks none
    pub fork_remote: Option<String>,
    #[serde(default)]
    pub merge_request: MergeRequestConfig,
    #[serde(default)]
    pub issue: IssueConfig,
    /// Keys we don't recognize; warned about and otherwise ignored
    #[serde(flatten, skip_serializing)]
    unknown: BTreeMap<String, toml::Value>,
    /// Directory of the config file; relative template paths and user-level
    /// templates live here
    #[serde(skip)]
    dir: Option<PathBuf>,
}

impl UserConfig {
    /// Load the user config file. A missing file yields the default config.
    pub fn load() -> anyhow::Result<Self> {
        match get_config_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    /// Load from `path`. The file's directory is remembered even when the
    /// file doesn't exist, so user-level templates work without a config.
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let mut config = match std::fs::read_to_string(path) {
            Ok(contents) => {
                let config = Self::parse(&contents)
                    .with_context(|| format!("Failed to parse config file {}", path.display()))?;
                log::debug!("Loaded config from {}", path.display());
                config
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::debug!("No config at {}", path.display());
                Self::default()
            }
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to read {}", path.display()));
            }
        };
        config.dir = path.parent().map(Path::to_path_buf);
        Ok(config)
    }

    pub fn parse(contents: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Keys in the file that `lab` doesn't use, dotted for keys inside a
    /// section (`merge-request.labels`).
    pub fn unknown_keys(&self) -> impl Iterator<Item = String> + '_ {
        let sections = [
            ("merge-request", &self.merge_request.unknown),
            ("issue", &self.issue.unknown),
        ];
        self.unknown.keys().cloned().chain(
            sections
                .into_iter()
                .flat_map(|(section, keys)| keys.keys().map(move |key| format!("{section}.{key}"))),
        )
    }

    /// The remote to target when none is given on the command line:
    /// `default-remote`, else `upstream` if configured, else `origin`.
    pub fn default_remote(&self, repo: &Repository) -> anyhow::Result<String> {
        if let Some(remote) = &self.default_remote {
            return Ok(remote.clone());
        }
        Ok(if repo.is_remote("upstream")? {
            "upstream"
        } else {
            "origin"
        }
        .to_string())
    }

    /// The remote assumed to hold the source branch when the current branch
    /// has no `branch.<name>.remote`.
    pub fn fork_remote(&self) -> &str {
        self.fork_remote.as_deref().unwrap_or("origin")
    }

    /// Configured template file for `kind`, with `~` expanded and relative
    /// paths resolved against the config directory.
    pub fn template_path(&self, kind: MessageKind) -> Option<PathBuf> {
        let configured = match kind {
            MessageKind::MergeRequest => self.merge_request.template.as_ref(),
            MessageKind::Issue => self.issue.template.as_ref(),
        }?;
        let expanded = PathBuf::from(
            shellexpand::tilde(&configured.to_string_lossy()).into_owned(),
        );
        if expanded.is_absolute() {
            return Some(expanded);
        }
        Some(match &self.dir {
            Some(dir) => dir.join(expanded),
            None => expanded,
        })
    }

    /// User-level template for `kind` (`templates/merge_request.md` or
    /// `templates/issue.md` next to the config file).
    pub fn user_template_path(&self, kind: MessageKind) -> Option<PathBuf> {
        let name = match kind {
            MessageKind::MergeRequest => "merge_request.md",
            MessageKind::Issue => "issue.md",
        };
        self.dir
            .as_ref()
            .map(|dir| dir.join("templates").join(name))
    }
}

/// Path of the user config file.
///
/// `$LABKIT_CONFIG_PATH` wins; otherwise `<config dir>/labkit/config.toml`
/// using XDG conventions on Linux and macOS and `%APPDATA%` on Windows.
pub fn get_config_path() -> Option<PathBuf> {
    if let Ok(path) = std::env::var("LABKIT_CONFIG_PATH") {
        return Some(PathBuf::from(path));
    }

    // Tests must never read the developer's real config
    #[cfg(test)]
    panic!("LABKIT_CONFIG_PATH not set in test; construct UserConfig directly instead");

    #[cfg(not(test))]
    {
        let strategy = choose_base_strategy().ok()?;
        Some(strategy.config_dir().join("labkit").join("config.toml"))
    }
}
