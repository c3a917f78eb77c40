//! In-memory [`GitLabApi`] for unit tests.

use std::cell::RefCell;
use std::collections::HashMap;

use super::{
    GitLabApi, IssueDraft, Label, Member, MergeRequestDraft, Milestone, Project, ProjectDraft,
    ProjectFilter, User,
};
use crate::git::GitError;

#[derive(Debug, Default)]
pub(crate) struct FakeGitLab {
    pub projects: Vec<Project>,
    /// `(project_id, ref)` pairs that exist
    pub commits: Vec<(u64, String)>,
    pub labels: HashMap<u64, Vec<Label>>,
    pub milestones: HashMap<u64, Vec<Milestone>>,
    pub users: HashMap<String, u64>,
    /// Error message to fail every user lookup with
    pub user_lookup_error: Option<String>,
    pub members: HashMap<u64, Vec<Member>>,
    pub namespaces: HashMap<String, u64>,
    /// The authenticated user
    pub user: Option<User>,
    /// Error message to fail submissions with
    pub reject_submission: Option<String>,
    pub calls: RefCell<Vec<String>>,
    pub submitted: RefCell<Vec<(u64, MergeRequestDraft)>>,
    pub issues: RefCell<Vec<(u64, IssueDraft)>>,
    pub created_projects: RefCell<Vec<ProjectDraft>>,
}

impl FakeGitLab {
    pub fn with_project(mut self, id: u64, path: &str, default_branch: &str) -> Self {
        self.projects.push(Project {
            id,
            path_with_namespace: path.to_string(),
            default_branch: Some(default_branch.to_string()),
            web_url: format!("https://gitlab.com/{path}"),
            ssh_url_to_repo: Some(format!("git@gitlab.com:{path}.git")),
            http_url_to_repo: Some(format!("https://gitlab.com/{path}.git")),
            forked_from_project: None,
        });
        self
    }

    /// Mark project `id` as a fork of project `parent_id` (both already added).
    pub fn with_fork_parent(mut self, id: u64, parent_id: u64) -> Self {
        let parent = self.projects.iter().find(|p| p.id == parent_id).cloned();
        if let Some(project) = self.projects.iter_mut().find(|p| p.id == id) {
            project.forked_from_project = parent.map(Box::new);
        }
        self
    }

    pub fn with_namespace(mut self, path: &str, id: u64) -> Self {
        self.namespaces.insert(path.to_string(), id);
        self
    }

    /// Authenticate as `username`, who is also a known user.
    pub fn with_current_user(mut self, username: &str, id: u64) -> Self {
        self.user = Some(User {
            id,
            username: username.to_string(),
        });
        self.with_user(username, id)
    }

    pub fn with_commit(mut self, project_id: u64, git_ref: &str) -> Self {
        self.commits.push((project_id, git_ref.to_string()));
        self
    }

    pub fn with_label(mut self, project_id: u64, name: &str, description: &str) -> Self {
        self.labels.entry(project_id).or_default().push(Label {
            name: name.to_string(),
            description: description.to_string(),
        });
        self
    }

    pub fn with_milestone(mut self, project_id: u64, id: u64, title: &str) -> Self {
        self.milestones.entry(project_id).or_default().push(Milestone {
            id,
            title: title.to_string(),
        });
        self
    }

    pub fn with_user(mut self, username: &str, id: u64) -> Self {
        self.users.insert(username.to_string(), id);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    fn record(&self, call: String) {
        self.calls.borrow_mut().push(call);
    }
}

impl GitLabApi for FakeGitLab {
    fn find_project(&self, path_with_namespace: &str) -> anyhow::Result<Project> {
        self.record(format!("find_project {path_with_namespace}"));
        self.projects
            .iter()
            .find(|p| p.path_with_namespace == path_with_namespace)
            .cloned()
            .ok_or_else(|| {
                GitError::ProjectNotFound {
                    path: path_with_namespace.to_string(),
                }
                .into()
            })
    }

    fn get_commit(&self, project_id: u64, git_ref: &str) -> anyhow::Result<Option<String>> {
        self.record(format!("get_commit {project_id} {git_ref}"));
        Ok(self
            .commits
            .iter()
            .any(|(id, r)| *id == project_id && r == git_ref)
            .then(|| format!("sha-of-{git_ref}")))
    }

    fn labels(&self, project_id: u64) -> anyhow::Result<Vec<Label>> {
        self.record(format!("labels {project_id}"));
        Ok(self.labels.get(&project_id).cloned().unwrap_or_default())
    }

    fn milestone_by_title(
        &self,
        project_id: u64,
        title: &str,
    ) -> anyhow::Result<Option<Milestone>> {
        self.record(format!("milestone_by_title {project_id} {title}"));
        Ok(self
            .milestones
            .get(&project_id)
            .and_then(|ms| ms.iter().find(|m| m.title == title))
            .cloned())
    }

    fn user_id(&self, username: &str) -> anyhow::Result<Option<u64>> {
        self.record(format!("user_id {username}"));
        if let Some(message) = &self.user_lookup_error {
            anyhow::bail!("{message}");
        }
        Ok(self.users.get(username).copied())
    }

    fn project_members(&self, project_id: u64) -> anyhow::Result<Vec<Member>> {
        self.record(format!("project_members {project_id}"));
        Ok(self.members.get(&project_id).cloned().unwrap_or_default())
    }

    fn create_merge_request(
        &self,
        source_project_id: u64,
        draft: &MergeRequestDraft,
    ) -> anyhow::Result<String> {
        self.record(format!("create_merge_request {source_project_id}"));
        if let Some(message) = &self.reject_submission {
            return Err(GitError::CliApiError {
                message: "glab api merge_requests failed".into(),
                stderr: message.clone(),
            }
            .into());
        }
        let mut submitted = self.submitted.borrow_mut();
        submitted.push((source_project_id, draft.clone()));
        Ok(format!(
            "https://gitlab.com/project-{}/-/merge_requests/{}",
            draft.target_project_id,
            submitted.len()
        ))
    }

    fn create_issue(&self, project_id: u64, draft: &IssueDraft) -> anyhow::Result<String> {
        self.record(format!("create_issue {project_id}"));
        let mut issues = self.issues.borrow_mut();
        issues.push((project_id, draft.clone()));
        Ok(format!(
            "https://gitlab.com/project-{project_id}/-/issues/{}",
            issues.len()
        ))
    }

    fn current_user(&self) -> anyhow::Result<User> {
        self.record("current_user".to_string());
        self.user.clone().ok_or_else(|| {
            GitError::GlabNotAuthenticated { host: None }.into()
        })
    }

    fn namespace_id(&self, path: &str) -> anyhow::Result<Option<u64>> {
        self.record(format!("namespace_id {path}"));
        Ok(self.namespaces.get(path).copied())
    }

    fn create_project(&self, draft: &ProjectDraft) -> anyhow::Result<Project> {
        self.record("create_project".to_string());
        self.created_projects.borrow_mut().push(draft.clone());
        let namespace = draft
            .namespace_id
            .and_then(|id| {
                self.namespaces
                    .iter()
                    .find(|(_, ns)| **ns == id)
                    .map(|(path, _)| path.clone())
            })
            .or_else(|| self.user.as_ref().map(|u| u.username.clone()))
            .unwrap_or_else(|| "lab-testing".to_string());
        let path = draft
            .path
            .clone()
            .or_else(|| draft.name.clone())
            .unwrap_or_default();
        let full_path = format!("{namespace}/{path}");
        Ok(Project {
            id: 100,
            web_url: format!("https://gitlab.com/{full_path}"),
            ssh_url_to_repo: Some(format!("git@gitlab.com:{full_path}.git")),
            path_with_namespace: full_path,
            ..Default::default()
        })
    }

    fn list_projects(&self, filter: &ProjectFilter) -> anyhow::Result<Vec<Project>> {
        self.record("list_projects".to_string());
        let search = filter.search.as_deref().unwrap_or("");
        Ok(self
            .projects
            .iter()
            .filter(|p| p.path_with_namespace.contains(search))
            .take(filter.limit.unwrap_or(usize::MAX))
            .cloned()
            .collect())
    }
}
