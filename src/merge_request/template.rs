//! Editor text for new merge requests and issues.

use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::config::UserConfig;
use crate::git::{MessageKind, Repository};

/// Project template for `kind`, relative to the worktree root.
fn project_template(kind: MessageKind) -> PathBuf {
    let dir = match kind {
        MessageKind::MergeRequest => "merge_request_templates",
        MessageKind::Issue => "issue_templates",
    };
    Path::new(".gitlab").join(dir).join("default.md")
}

/// The description template for `kind`, trimmed.
///
/// Lookup order: the configured template (which must exist), the project's
/// `.gitlab/*_templates/default.md`, the user-level template next to the
/// config file, then empty text.
pub fn load_template(
    repo: &Repository,
    config: &UserConfig,
    kind: MessageKind,
) -> anyhow::Result<String> {
    if let Some(path) = config.template_path(kind) {
        log::debug!("Using configured {kind} template {}", path.display());
        let text = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read template {}", path.display()))?;
        return Ok(text.trim().to_string());
    }

    let candidates = [
        Some(repo.worktree_root()?.join(project_template(kind))),
        config.user_template_path(kind),
    ];
    for path in candidates.into_iter().flatten() {
        match std::fs::read_to_string(&path) {
            Ok(text) => {
                log::debug!("Using {kind} template {}", path.display());
                return Ok(text.trim().to_string());
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => continue,
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to read template {}", path.display()));
            }
        }
    }
    Ok(String::new())
}

/// Everything the merge request editor text is built from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeRequestTemplate<'a> {
    /// Initial title and description, e.g. the message of the only commit
    pub seed: &'a str,
    pub template: &'a str,
    pub comment_char: char,
    pub target_remote: &'a str,
    pub target_branch: &'a str,
    pub source_remote: &'a str,
    pub source_branch: &'a str,
    pub commit_count: usize,
    /// One-line commit summaries, newest first
    pub commit_log: &'a [String],
    pub cover_letter: bool,
}

impl MergeRequestTemplate<'_> {
    pub fn render(&self) -> String {
        let c = self.comment_char;
        let mut text = format!(
            "{seed}\n\n{template}\n\
             {c} Requesting a merge into {tr}:{tb} from {sr}:{sb} ({n} commits)\n\
             {c}\n\
             {c} Write a message for this merge request. The first block\n\
             {c} of text is the title and the rest is the description.",
            seed = self.seed,
            template = self.template,
            tr = self.target_remote,
            tb = self.target_branch,
            sr = self.source_remote,
            sb = self.source_branch,
            n = self.commit_count,
        );

        if !self.commit_log.is_empty() {
            text.push_str(&format!("\n{c}\n{c} Changes:\n{c}\n"));
            if self.cover_letter {
                text.push('\n');
                text.push_str(&self.commit_log.join("\n"));
            } else {
                let commented: Vec<String> = self
                    .commit_log
                    .iter()
                    .map(|line| format!("{c} {line}"))
                    .collect();
                text.push_str(&commented.join("\n"));
            }
        }
        text
    }
}

/// Editor text for a new issue.
pub fn issue_text(template: &str, comment_char: char) -> String {
    let c = comment_char;
    format!(
        "\n\n{template}\n\
         {c} Write a message for this issue. The first block\n\
         {c} of text is the title and the rest is the description."
    )
}
