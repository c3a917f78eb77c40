//! Merge request composition.
//!
//! [`create`] runs the whole pipeline for `lab mr create`:
//!
//! 1. [`RefResolver`] decides the source (current branch on the remote it
//!    tracks) and the target (a remote and branch, defaulting to the
//!    project's default branch).
//! 2. [`CommitRangeInspector`] checks the source branch was pushed, an
//!    explicit target branch exists, and the range has commits.
//! 3. [`MetadataResolver`] maps labels, milestone and assignees to IDs.
//! 4. The title and description come from `-m`, `-F`, or an editor session
//!    seeded by [`MergeRequestTemplate`].
//! 5. [`request::assemble`] builds the immutable draft, which is submitted
//!    once.
//!
//! Every check runs before the only remote mutation, the final submission.

pub mod draft;
pub mod message;
pub mod metadata;
pub mod range;
pub mod refs;
pub mod request;
pub mod template;

pub use message::{ComposedMessage, MessageSource};
pub use metadata::{MetadataResolver, MilestoneRef};
pub use range::{CommitRange, CommitRangeInspector};
pub use refs::{BranchRef, RefResolver, ResolvedRefs};
pub use request::{Metadata, RequestFlags};
pub use template::MergeRequestTemplate;

use crate::config::UserConfig;
use crate::git::{MessageKind, Repository};
use crate::gitlab::GitLabApi;

/// Everything `lab mr create` was asked to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateOptions {
    pub target_remote: Option<String>,
    pub target_branch: Option<String>,
    pub message: MessageSource,
    pub assignees: Vec<String>,
    pub labels: Vec<String>,
    pub milestone: Option<String>,
    pub flags: RequestFlags,
}

impl Default for CreateOptions {
    fn default() -> Self {
        Self {
            target_remote: None,
            target_branch: None,
            message: MessageSource::Editor {
                cover_letter: false,
            },
            assignees: Vec::new(),
            labels: Vec::new(),
            milestone: None,
            flags: RequestFlags::default(),
        }
    }
}

/// Create a merge request and return its URL.
pub fn create<A: GitLabApi + ?Sized>(
    repo: &Repository,
    api: &A,
    config: &UserConfig,
    options: &CreateOptions,
) -> anyhow::Result<String> {
    let refs = RefResolver::new(repo, api, config).resolve(
        options.target_remote.as_deref(),
        options.target_branch.as_deref(),
    )?;
    let range = CommitRangeInspector::new(repo, api).inspect(&refs)?;

    let resolver = MetadataResolver::new(
        api,
        refs.target_project.id,
        &refs.target_project.path_with_namespace,
    );
    let metadata = Metadata {
        labels: resolver.labels(&options.labels)?,
        milestone_id: resolver.milestone(options.milestone.as_deref())?,
        assignee_ids: resolver.assignees(&options.assignees)?,
    };

    let message = message::obtain_message(
        repo,
        MessageKind::MergeRequest,
        &options.message,
        |comment_char| {
            let seed = range.seed(repo)?;
            let template = template::load_template(repo, config, MessageKind::MergeRequest)?;
            let summaries = range.summaries(repo)?;
            Ok(MergeRequestTemplate {
                seed: &seed,
                template: &template,
                comment_char,
                target_remote: &refs.target.remote,
                target_branch: &refs.target.branch,
                source_remote: &refs.source.remote,
                source_branch: &refs.source.branch,
                commit_count: range.count,
                commit_log: &summaries,
                cover_letter: options.message.cover_letter(),
            }
            .render())
        },
    )?;

    let defaults = &config.merge_request;
    let flags = RequestFlags {
        draft: options.flags.draft || defaults.draft,
        squash: options.flags.squash || defaults.squash,
        remove_source_branch: options.flags.remove_source_branch || defaults.remove_source_branch,
        ..options.flags
    };

    let draft = request::assemble(&refs, message, metadata, flags);
    request::submit(api, &refs, &draft)
}
