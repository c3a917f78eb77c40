//! Editing messages in the user's editor.
//!
//! The seed text is written to a temp file inside the git directory (so that
//! editors with per-repository settings pick them up), the editor runs
//! attached to the terminal, and the file is read back. Each session owns
//! its own file; it is removed when the session is dropped.

use std::ffi::OsStr;
use std::io::Write;
use std::path::Path;

use anyhow::Context;
use tempfile::NamedTempFile;

use super::{GitError, MessageKind, Repository};
use crate::shell_exec::{ShellConfig, run_interactive};

/// One editor round-trip over a temp file.
pub struct EditorSession {
    file: NamedTempFile,
    editor: String,
}

impl EditorSession {
    /// Create the temp file for `kind` and write `seed` into it.
    pub fn new(repo: &Repository, kind: MessageKind, seed: &str) -> anyhow::Result<Self> {
        let prefix = match kind {
            MessageKind::MergeRequest => "MERGEREQ_EDITMSG.",
            MessageKind::Issue => "ISSUE_EDITMSG.",
        };
        let mut file = tempfile::Builder::new()
            .prefix(prefix)
            .suffix(".md")
            .tempfile_in(repo.git_dir()?)
            .context("Failed to create message file")?;
        file.write_all(seed.as_bytes())
            .and_then(|()| file.flush())
            .context("Failed to write message file")?;

        Ok(Self {
            file,
            editor: resolve_editor(repo)?,
        })
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Run the editor and return the saved text.
    pub fn run(self) -> anyhow::Result<String> {
        // Same invocation git uses: the editor string may carry its own
        // arguments (`code --wait`), the path is passed as "$1".
        let mut cmd = ShellConfig::get().command(
            &format!("{} \"$@\"", self.editor),
            [OsStr::new(&self.editor), self.path().as_os_str()],
        );

        let status =
            run_interactive(&mut cmd, Some("editor")).map_err(|e| GitError::EditorFailed {
                editor: self.editor.clone(),
                error: e.to_string(),
            })?;
        if !status.success() {
            return Err(GitError::EditorFailed {
                editor: self.editor.clone(),
                error: format!("exited with {status}"),
            }
            .into());
        }

        std::fs::read_to_string(self.path())
            .with_context(|| format!("Failed to read {}", self.path().display()))
    }
}

/// The editor command: `git var GIT_EDITOR`, which applies git's own
/// precedence. `:` (git's no-op editor) is kept as is.
pub fn resolve_editor(repo: &Repository) -> anyhow::Result<String> {
    let editor = repo.editor()?;
    if editor.is_empty() {
        return Err(GitError::EditorFailed {
            editor: String::new(),
            error: "no editor configured".into(),
        }
        .into());
    }
    log::debug!("Using editor: {editor}");
    Ok(editor)
}
