//! Checks on what a merge request would contain.

use super::refs::ResolvedRefs;
use crate::git::{GitError, Repository};
use crate::gitlab::GitLabApi;

/// The commits between the target and the source tracking refs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitRange {
    /// `targetRemote/targetBranch`
    pub base: String,
    /// `sourceRemote/sourceBranch`
    pub head: String,
    pub count: usize,
}

impl CommitRange {
    /// Text to start the message from: the full message of the only commit,
    /// or nothing when there are several.
    pub fn seed(&self, repo: &Repository) -> anyhow::Result<String> {
        if self.count == 1 {
            repo.commit_message(&self.head)
        } else {
            Ok(String::new())
        }
    }

    /// One-line summaries, newest first.
    pub fn summaries(&self, repo: &Repository) -> anyhow::Result<Vec<String>> {
        repo.commit_log(&self.base, &self.head)
    }
}

pub struct CommitRangeInspector<'a, A: GitLabApi + ?Sized> {
    repo: &'a Repository,
    api: &'a A,
}

impl<'a, A: GitLabApi + ?Sized> CommitRangeInspector<'a, A> {
    pub fn new(repo: &'a Repository, api: &'a A) -> Self {
        Self { repo, api }
    }

    /// Verify both branches exist remotely and the range isn't empty.
    pub fn inspect(&self, refs: &ResolvedRefs) -> anyhow::Result<CommitRange> {
        let source = &refs.source;
        if self
            .api
            .get_commit(refs.source_project.id, &source.branch)?
            .is_none()
        {
            return Err(GitError::SourceBranchNotPushed {
                branch: source.branch.clone(),
                remote: source.remote.clone(),
            }
            .into());
        }

        let target = &refs.target;
        if refs.explicit_target_branch
            && self
                .api
                .get_commit(refs.target_project.id, &target.branch)?
                .is_none()
        {
            return Err(GitError::TargetBranchMissing {
                remote: target.remote.clone(),
                branch: target.branch.clone(),
            }
            .into());
        }

        let base = target.tracking_ref();
        let head = source.tracking_ref();
        for (reference, remote) in [(&base, &target.remote), (&head, &source.remote)] {
            if !self.repo.ref_exists(reference)? {
                return Err(GitError::TrackingRefMissing {
                    reference: reference.clone(),
                    remote: remote.clone(),
                }
                .into());
            }
        }

        let count = self.repo.count_commits(&base, &head)?;
        log::debug!("{base}..{head} has {count} commits");
        if count == 0 {
            return Err(GitError::EmptyCommitRange { base, head }.into());
        }
        Ok(CommitRange { base, head, count })
    }
}
