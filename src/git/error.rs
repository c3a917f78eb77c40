//! Error types and formatting.
//!
//! **`GitError`** is a typed enum for the failures `lab` reports to users. Use
//! `.into()` to convert to `anyhow::Error`; the type survives, so callers and
//! tests can `downcast_ref::<GitError>()` and match on the variant. Display
//! produces the styled message (red `✗` line, optional dim `↳` hint).

use color_print::cformat;

use crate::styling::{
    error_message, format_with_gutter, hint_message, suggest_command, suggest_git,
};

/// What kind of object a message was being composed for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum MessageKind {
    #[strum(serialize = "MR")]
    MergeRequest,
    #[strum(serialize = "issue")]
    Issue,
}

/// Domain errors for merge request and issue creation.
///
/// ```ignore
/// return Err(GitError::InvalidRemote { remote: "upstrem".into() }.into());
///
/// if let Some(GitError::EmptyCommitRange { base, .. }) = err.downcast_ref() {
///     println!("nothing to merge into {base}");
/// }
/// ```
#[derive(Debug, Clone)]
pub enum GitError {
    // Local git state
    DetachedHead {
        action: Option<String>,
    },
    InvalidRemote {
        remote: String,
    },
    RemoteUrlMissing {
        remote: String,
    },
    RemoteUrlUnparseable {
        remote: String,
        url: String,
    },

    // Range validation
    SourceBranchNotPushed {
        branch: String,
        remote: String,
    },
    TargetBranchMissing {
        remote: String,
        branch: String,
    },
    TrackingRefMissing {
        reference: String,
        remote: String,
    },
    EmptyCommitRange {
        base: String,
        head: String,
    },

    // Message composition
    ConflictingMessageOptions {
        message: String,
    },
    EmptyMessage {
        kind: MessageKind,
    },
    EditorFailed {
        editor: String,
        error: String,
    },

    // Metadata resolution
    LabelNotFound {
        term: String,
        project: String,
    },
    LabelAmbiguous {
        term: String,
        candidates: Vec<String>,
    },
    MilestoneNotFound {
        title: String,
        project: String,
    },

    // Remote API
    ProjectNotFound {
        path: String,
    },
    NamespaceNotFound {
        path: String,
    },
    GlabNotInstalled,
    GlabNotAuthenticated {
        host: Option<String>,
    },
    CliApiError {
        message: String,
        stderr: String,
    },

    Other {
        message: String,
    },
}

impl std::error::Error for GitError {}

impl std::fmt::Display for GitError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GitError::DetachedHead { action } => {
                let message = match action {
                    Some(action) => format!("Cannot {action}: not on a branch (detached HEAD)"),
                    None => "Not on a branch (detached HEAD)".to_string(),
                };
                write!(
                    f,
                    "{}\n{}",
                    error_message(&message),
                    hint_message(cformat!(
                        "To switch to a branch, run <bright-black>git switch <<branch>></>"
                    ))
                )
            }

            GitError::InvalidRemote { remote } => {
                write!(
                    f,
                    "{}\n{}",
                    error_message(cformat!("<bold>{remote}</> is not a valid remote")),
                    hint_message(cformat!(
                        "To list configured remotes, run <bright-black>git remote -v</>"
                    ))
                )
            }

            GitError::RemoteUrlMissing { remote } => {
                write!(
                    f,
                    "{}",
                    error_message(cformat!("Remote <bold>{remote}</> has no URL configured"))
                )
            }

            GitError::RemoteUrlUnparseable { remote, url } => {
                write!(
                    f,
                    "{}",
                    error_message(cformat!(
                        "Cannot determine the GitLab project of remote <bold>{remote}</> from <bold>{url}</>"
                    ))
                )
            }

            GitError::SourceBranchNotPushed { branch, remote } => {
                let push = suggest_git(&["push", "-u", remote, branch]);
                write!(
                    f,
                    "{}\n{}",
                    error_message(cformat!(
                        "Aborting MR, source branch <bold>{branch}</> not present on remote <bold>{remote}</>"
                    )),
                    hint_message(cformat!(
                        "Did you forget to push? Run <bright-black>{push}</>"
                    ))
                )
            }

            GitError::TargetBranchMissing { remote, branch } => {
                let push = suggest_git(&["push", remote, branch]);
                write!(
                    f,
                    "{}\n{}",
                    error_message(cformat!(
                        "Aborting MR, <bold>{remote}:{branch}</> is not a valid target"
                    )),
                    hint_message(cformat!(
                        "Did you forget to push <bold>{branch}</> to <bold>{remote}</>? Run <bright-black>{push}</>"
                    ))
                )
            }

            GitError::TrackingRefMissing { reference, remote } => {
                let fetch = suggest_git(&["fetch", remote]);
                write!(
                    f,
                    "{}\n{}",
                    error_message(cformat!("No local ref <bold>{reference}</>")),
                    hint_message(cformat!("To update it, run <bright-black>{fetch}</>"))
                )
            }

            GitError::EmptyCommitRange { base, head } => {
                write!(
                    f,
                    "{}",
                    error_message(cformat!(
                        "Aborting: the resulting merge request from <bold>{base}</> to <bold>{head}</> has 0 commits"
                    ))
                )
            }

            GitError::ConflictingMessageOptions { message } => {
                write!(f, "{}", error_message(message))
            }

            GitError::EmptyMessage { kind } => {
                write!(
                    f,
                    "{}",
                    error_message(format!("Aborting {kind} due to empty {kind} message"))
                )
            }

            GitError::EditorFailed { editor, error } => {
                write!(
                    f,
                    "{}\n{}",
                    format_error_block(
                        error_message(cformat!("Editor <bold>{editor}</> failed")),
                        error
                    ),
                    hint_message(cformat!(
                        "To pick another editor, set <bright-black>GIT_EDITOR</> or <bright-black>core.editor</>"
                    ))
                )
            }

            GitError::LabelNotFound { term, project } => {
                let list = suggest_command(&["label", "list"], &[], &[]);
                write!(
                    f,
                    "{}\n{}",
                    error_message(cformat!(
                        "Label <bold>{term}</> matches no label in <bold>{project}</>"
                    )),
                    hint_message(cformat!(
                        "To see available labels, run <bright-black>{list}</>"
                    ))
                )
            }

            GitError::LabelAmbiguous { term, candidates } => {
                write!(
                    f,
                    "{}\n{}",
                    error_message(cformat!(
                        "Label <bold>{term}</> is ambiguous: {}",
                        candidates.join(", ")
                    )),
                    hint_message("Use a longer term or the full label name")
                )
            }

            GitError::MilestoneNotFound { title, project } => {
                write!(
                    f,
                    "{}",
                    error_message(cformat!(
                        "Milestone <bold>{title}</> not found in <bold>{project}</>"
                    ))
                )
            }

            GitError::ProjectNotFound { path } => {
                write!(
                    f,
                    "{}",
                    error_message(cformat!("GitLab project <bold>{path}</> not found"))
                )
            }

            GitError::NamespaceNotFound { path } => {
                write!(
                    f,
                    "{}\n{}",
                    error_message(cformat!("GitLab group or user <bold>{path}</> not found")),
                    hint_message(cformat!(
                        "Leave out the namespace to create the project under your own user"
                    ))
                )
            }

            GitError::GlabNotInstalled => {
                write!(
                    f,
                    "{}\n{}",
                    error_message("GitLab CLI (glab) not installed"),
                    hint_message(cformat!(
                        "Install it from <bright-black>https://gitlab.com/gitlab-org/cli</>"
                    ))
                )
            }

            GitError::GlabNotAuthenticated { host } => {
                let login = match host {
                    Some(host) => format!("glab auth login --hostname {host}"),
                    None => "glab auth login".to_string(),
                };
                write!(
                    f,
                    "{}\n{}",
                    error_message("GitLab CLI (glab) is not authenticated"),
                    hint_message(cformat!("Run <bright-black>{login}</>"))
                )
            }

            GitError::CliApiError { message, stderr } => {
                write!(f, "{}", format_error_block(error_message(message), stderr))
            }

            GitError::Other { message } => {
                write!(f, "{}", error_message(message))
            }
        }
    }
}

/// Format an error with a header line and quoted detail beneath it.
fn format_error_block(header: impl Into<String>, detail: &str) -> String {
    let header = header.into();
    let trimmed = detail.trim();
    if trimmed.is_empty() {
        header
    } else {
        format!("{header}\n{}", format_with_gutter(trimmed, None))
    }
}
