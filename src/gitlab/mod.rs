//! GitLab API access.
//!
//! [`GitLabApi`] is the seam between the composition pipeline and the
//! network: everything the pipeline needs from GitLab goes through it, and
//! the only mutating calls are [`GitLabApi::create_merge_request`] and
//! [`GitLabApi::create_issue`]. [`GlabClient`] implements it on top of the
//! `glab` CLI, which owns authentication and transport.
//!
//! Lookups that are allowed to miss return `Ok(None)` rather than a sentinel
//! value, so "not found" can't be confused with a real ID.

mod glab;

use serde::{Deserialize, Serialize};

pub use glab::GlabClient;

/// A GitLab project.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Project {
    pub id: u64,
    pub path_with_namespace: String,
    /// `None` for projects with an empty repository.
    #[serde(default)]
    pub default_branch: Option<String>,
    pub web_url: String,
    #[serde(default)]
    pub ssh_url_to_repo: Option<String>,
    #[serde(default)]
    pub http_url_to_repo: Option<String>,
    /// The project this one was forked from.
    #[serde(default)]
    pub forked_from_project: Option<Box<Project>>,
}

impl Project {
    /// URL to clone or push over: SSH when GitLab reports one, else HTTPS.
    pub fn clone_url(&self) -> Option<&str> {
        self.ssh_url_to_repo
            .as_deref()
            .or(self.http_url_to_repo.as_deref())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Label {
    pub name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Milestone {
    pub id: u64,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct User {
    pub id: u64,
    pub username: String,
}

/// A project member with their effective access level.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Member {
    pub id: u64,
    pub username: String,
    pub name: String,
    pub access_level: u32,
}

impl Member {
    /// GitLab's name for the member's access level.
    pub fn role(&self) -> &'static str {
        match self.access_level {
            0 => "No access",
            5 => "Minimal access",
            10 => "Guest",
            15 => "Planner",
            20 => "Reporter",
            30 => "Developer",
            40 => "Maintainer",
            50 => "Owner",
            _ => "Custom",
        }
    }
}

/// Fields of a new merge request, as sent to GitLab.
///
/// Built once by the pipeline and never modified afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MergeRequestDraft {
    pub source_branch: String,
    pub target_project_id: u64,
    pub target_branch: String,
    pub title: String,
    pub description: String,
    pub assignee_ids: Vec<u64>,
    pub labels: Vec<String>,
    pub milestone_id: Option<u64>,
    pub remove_source_branch: bool,
    pub squash: bool,
    pub allow_collaboration: bool,
}

/// Fields of a new issue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IssueDraft {
    pub title: String,
    pub description: String,
    pub assignee_ids: Vec<u64>,
    pub labels: Vec<String>,
    pub milestone_id: Option<u64>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum Visibility {
    #[default]
    Private,
    Internal,
    Public,
}

/// Fields of a new project. GitLab derives whichever of `path` and `name`
/// is missing from the other.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectDraft {
    pub path: Option<String>,
    pub name: Option<String>,
    /// Group or user namespace; the authenticated user's when `None`
    pub namespace_id: Option<u64>,
    pub description: Option<String>,
    pub visibility: Visibility,
}

/// Which projects `lab project list` shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectFilter {
    pub search: Option<String>,
    /// Only projects owned by the authenticated user
    pub owned: bool,
    /// Only projects the authenticated user is a member of
    pub membership: bool,
    pub starred: bool,
    /// Stop after this many projects; `None` lists all of them
    pub limit: Option<usize>,
}

impl Default for ProjectFilter {
    fn default() -> Self {
        Self {
            search: None,
            owned: false,
            membership: false,
            starred: false,
            limit: Some(100),
        }
    }
}

/// Remote API operations used by `lab`.
pub trait GitLabApi {
    /// Look up a project by `namespace/path`.
    fn find_project(&self, path_with_namespace: &str) -> anyhow::Result<Project>;

    /// The SHA `git_ref` resolves to in the project, or `None` if it doesn't exist.
    fn get_commit(&self, project_id: u64, git_ref: &str) -> anyhow::Result<Option<String>>;

    /// All labels of a project, in API order.
    fn labels(&self, project_id: u64) -> anyhow::Result<Vec<Label>>;

    /// The milestone with exactly this title, if any.
    fn milestone_by_title(&self, project_id: u64, title: &str)
    -> anyhow::Result<Option<Milestone>>;

    /// The ID of the user with this username, if any.
    fn user_id(&self, username: &str) -> anyhow::Result<Option<u64>>;

    /// Members of a project, including inherited ones.
    fn project_members(&self, project_id: u64) -> anyhow::Result<Vec<Member>>;

    /// Open a merge request from `source_project_id`. Returns its web URL.
    fn create_merge_request(
        &self,
        source_project_id: u64,
        draft: &MergeRequestDraft,
    ) -> anyhow::Result<String>;

    /// Open an issue. Returns its web URL.
    fn create_issue(&self, project_id: u64, draft: &IssueDraft) -> anyhow::Result<String>;

    /// The authenticated user.
    fn current_user(&self) -> anyhow::Result<User>;

    /// ID of a group or user namespace by full path, if it exists.
    fn namespace_id(&self, path: &str) -> anyhow::Result<Option<u64>>;

    fn create_project(&self, draft: &ProjectDraft) -> anyhow::Result<Project>;

    /// Projects visible to the authenticated user, oldest first.
    fn list_projects(&self, filter: &ProjectFilter) -> anyhow::Result<Vec<Project>>;
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
pub(crate) mod fake;
