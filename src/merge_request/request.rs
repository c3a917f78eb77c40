//! Building and sending the merge request.

use super::draft::normalize_draft_title;
use super::message::ComposedMessage;
use super::refs::ResolvedRefs;
use crate::gitlab::{GitLabApi, MergeRequestDraft};

/// Make every newline a markdown hard line break.
pub fn force_linebreaks(body: &str) -> String {
    body.replace('\n', "  \n")
}

/// Resolved metadata to attach to the merge request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Metadata {
    pub assignee_ids: Vec<u64>,
    pub labels: Vec<String>,
    pub milestone_id: Option<u64>,
}

/// Switches that shape the submitted fields.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RequestFlags {
    pub draft: bool,
    pub force_linebreak: bool,
    pub remove_source_branch: bool,
    pub squash: bool,
    pub allow_collaboration: bool,
}

pub fn assemble(
    refs: &ResolvedRefs,
    message: ComposedMessage,
    metadata: Metadata,
    flags: RequestFlags,
) -> MergeRequestDraft {
    let title = if flags.draft {
        normalize_draft_title(&message.title)
    } else {
        message.title
    };
    let description = if flags.force_linebreak {
        force_linebreaks(&message.body)
    } else {
        message.body
    };

    MergeRequestDraft {
        source_branch: refs.source.branch.clone(),
        target_project_id: refs.target_project.id,
        target_branch: refs.target.branch.clone(),
        title,
        description,
        assignee_ids: metadata.assignee_ids,
        labels: metadata.labels,
        milestone_id: metadata.milestone_id,
        remove_source_branch: flags.remove_source_branch,
        squash: flags.squash,
        allow_collaboration: flags.allow_collaboration,
    }
}

/// Create the merge request and return its URL. Failures are not retried.
pub fn submit<A: GitLabApi + ?Sized>(
    api: &A,
    refs: &ResolvedRefs,
    draft: &MergeRequestDraft,
) -> anyhow::Result<String> {
    if log::log_enabled!(log::Level::Debug) {
        match serde_json::to_string(draft) {
            Ok(json) => log::debug!("Submitting merge request: {json}"),
            Err(e) => log::debug!("Submitting merge request (unserializable: {e})"),
        }
    }
    api.create_merge_request(refs.source_project.id, draft)
}
