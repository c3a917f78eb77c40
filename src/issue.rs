//! Issue creation: the merge request message flow without refs or commits.

use crate::config::UserConfig;
use crate::git::{MessageKind, Repository};
use crate::gitlab::{GitLabApi, IssueDraft};
use crate::merge_request::message::obtain_message;
use crate::merge_request::refs::{remote_project, target_remote};
use crate::merge_request::template::{issue_text, load_template};
use crate::merge_request::{MessageSource, MetadataResolver};

/// Everything `lab issue create` was asked to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueOptions {
    pub remote: Option<String>,
    pub message: MessageSource,
    pub assignees: Vec<String>,
    pub labels: Vec<String>,
    pub milestone: Option<String>,
}

impl Default for IssueOptions {
    fn default() -> Self {
        Self {
            remote: None,
            message: MessageSource::Editor {
                cover_letter: false,
            },
            assignees: Vec::new(),
            labels: Vec::new(),
            milestone: None,
        }
    }
}

/// Open an issue and return its URL.
pub fn create<A: GitLabApi + ?Sized>(
    repo: &Repository,
    api: &A,
    config: &UserConfig,
    options: &IssueOptions,
) -> anyhow::Result<String> {
    let remote = target_remote(repo, config, options.remote.as_deref())?;
    let project = remote_project(repo, api, &remote)?;

    let resolver = MetadataResolver::new(api, project.id, &project.path_with_namespace);
    let labels = resolver.labels(&options.labels)?;
    let milestone_id = resolver.milestone(options.milestone.as_deref())?;
    let assignee_ids = resolver.assignees(&options.assignees)?;

    let message = obtain_message(repo, MessageKind::Issue, &options.message, |comment_char| {
        let template = load_template(repo, config, MessageKind::Issue)?;
        Ok(issue_text(&template, comment_char))
    })?;

    let draft = IssueDraft {
        title: message.title,
        description: message.body,
        assignee_ids,
        labels,
        milestone_id,
    };
    log::debug!("Creating issue in {}: {}", project.path_with_namespace, draft.title);
    api.create_issue(project.id, &draft)
}
