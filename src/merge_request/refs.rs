//! Which branch merges into which.

use std::fmt;

use crate::config::UserConfig;
use crate::git::{GitError, Repository};
use crate::gitlab::{GitLabApi, Project};

/// A branch on a named remote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchRef {
    pub remote: String,
    pub branch: String,
}

impl BranchRef {
    pub fn new(remote: impl Into<String>, branch: impl Into<String>) -> Self {
        Self {
            remote: remote.into(),
            branch: branch.into(),
        }
    }

    /// The local remote-tracking ref, `remote/branch`.
    pub fn tracking_ref(&self) -> String {
        format!("{}/{}", self.remote, self.branch)
    }
}

/// `remote:branch`
impl fmt::Display for BranchRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.remote, self.branch)
    }
}

/// Source and target of a merge request, with their GitLab projects.
#[derive(Debug, Clone)]
pub struct ResolvedRefs {
    pub source: BranchRef,
    pub target: BranchRef,
    pub source_project: Project,
    pub target_project: Project,
    /// The target branch was given on the command line and differs from the
    /// project's default branch
    pub explicit_target_branch: bool,
}

/// The remote to open a merge request or issue against: `explicit` if
/// given (it must be a configured remote), else the configured default.
pub fn target_remote(
    repo: &Repository,
    config: &UserConfig,
    explicit: Option<&str>,
) -> anyhow::Result<String> {
    match explicit {
        Some(remote) if !repo.is_remote(remote)? => Err(GitError::InvalidRemote {
            remote: remote.to_string(),
        }
        .into()),
        Some(remote) => Ok(remote.to_string()),
        None => config.default_remote(repo),
    }
}

/// The GitLab project behind `remote`.
pub fn remote_project<A: GitLabApi + ?Sized>(
    repo: &Repository,
    api: &A,
    remote: &str,
) -> anyhow::Result<Project> {
    let url = repo.remote_project(remote)?;
    api.find_project(url.path_with_namespace())
}

pub struct RefResolver<'a, A: GitLabApi + ?Sized> {
    repo: &'a Repository,
    api: &'a A,
    config: &'a UserConfig,
}

impl<'a, A: GitLabApi + ?Sized> RefResolver<'a, A> {
    pub fn new(repo: &'a Repository, api: &'a A, config: &'a UserConfig) -> Self {
        Self { repo, api, config }
    }

    /// The source is the current branch on the remote it tracks (or the fork
    /// remote), under its upstream name when it has one. The target is
    /// `target_branch` on `target_remote`, defaulting to the project's
    /// default branch.
    pub fn resolve(
        &self,
        target_remote_arg: Option<&str>,
        target_branch_arg: Option<&str>,
    ) -> anyhow::Result<ResolvedRefs> {
        let local = self
            .repo
            .require_current_branch("create a merge request")?;

        let source_remote = match self.repo.branch_remote(&local)? {
            Some(remote) => remote,
            None => {
                let fork = self.config.fork_remote();
                log::debug!("{local} tracks no remote; assuming {fork}");
                fork.to_string()
            }
        };
        let source_branch = match self.repo.upstream_branch_name(&local)? {
            Some(upstream) => upstream,
            None => {
                log::debug!("{local} has no upstream branch; using the local name");
                local.clone()
            }
        };

        let target_remote = target_remote(self.repo, self.config, target_remote_arg)?;

        let source_project = remote_project(self.repo, self.api, &source_remote)?;
        let target_project = if target_remote == source_remote {
            source_project.clone()
        } else {
            remote_project(self.repo, self.api, &target_remote)?
        };

        let default_branch = target_project.default_branch.as_deref();
        let (target_branch, explicit_target_branch) = match (target_branch_arg, default_branch) {
            (Some(arg), Some(default)) if arg == default => (arg.to_string(), false),
            (Some(arg), _) => (arg.to_string(), true),
            (None, Some(default)) => (default.to_string(), false),
            (None, None) => {
                return Err(GitError::Other {
                    message: format!(
                        "Project {} has no default branch; name the target branch explicitly",
                        target_project.path_with_namespace
                    ),
                }
                .into());
            }
        };

        let refs = ResolvedRefs {
            source: BranchRef::new(source_remote, source_branch),
            target: BranchRef::new(target_remote, target_branch),
            source_project,
            target_project,
            explicit_target_branch,
        };
        log::debug!("Merge request from {} into {}", refs.source, refs.target);
        Ok(refs)
    }
}
