//! [`GitLabApi`] over the `glab` CLI.
//!
//! Every request is one `glab api` invocation:
//!
//! ```text
//! glab api <endpoint> [--hostname <host>] [--method POST] [--paginate] [-f key=value]...
//! ```
//!
//! `glab` handles authentication and the HTTP transport; this module maps
//! its exit status and JSON bodies onto typed results.

use std::io::ErrorKind;
use std::process::Command;

use anyhow::Context;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use urlencoding::encode;

use super::{
    GitLabApi, IssueDraft, Label, Member, MergeRequestDraft, Milestone, Project, ProjectDraft,
    ProjectFilter, User,
};
use crate::git::GitError;
use crate::shell_exec::run;

/// Error body returned by the GitLab API.
#[derive(Debug, Deserialize)]
struct GlabApiErrorResponse {
    #[serde(default)]
    message: serde_json::Value,
    #[serde(default)]
    error: String,
}

impl GlabApiErrorResponse {
    fn text(&self) -> String {
        match &self.message {
            serde_json::Value::String(s) if !s.is_empty() => s.clone(),
            serde_json::Value::Null => self.error.clone(),
            // Validation errors come back as {"message": {"field": ["reason"]}}
            other => other.to_string(),
        }
    }
}

/// Response to the creation endpoints.
#[derive(Debug, Deserialize)]
struct Created {
    web_url: String,
}

#[derive(Debug, Deserialize)]
struct Commit {
    id: String,
}

#[derive(Debug, Deserialize)]
struct Namespace {
    id: u64,
}

/// Largest page the projects endpoint serves.
const MAX_PER_PAGE: usize = 100;

/// `projects?...` for one page of a listing.
fn projects_endpoint(filter: &ProjectFilter, per_page: usize, page: usize) -> String {
    let mut endpoint = format!("projects?order_by=id&sort=asc&per_page={per_page}&page={page}");
    if let Some(search) = filter.search.as_deref().filter(|s| !s.is_empty()) {
        endpoint.push_str(&format!("&search={}", encode(search)));
    }
    for (flag, key) in [
        (filter.owned, "owned"),
        (filter.membership, "membership"),
        (filter.starred, "starred"),
    ] {
        if flag {
            endpoint.push_str(&format!("&{key}=true"));
        }
    }
    endpoint
}

/// How a failed request should be reported.
enum Failure {
    NotFound,
    Error(anyhow::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Method {
    Get,
    Post,
}

struct Request<'a> {
    endpoint: String,
    method: Method,
    paginate: bool,
    /// String fields, sent verbatim (`--raw-field`)
    raw_fields: Vec<(&'a str, String)>,
    /// Typed fields: numbers and booleans (`--field`)
    typed_fields: Vec<(&'a str, String)>,
}

impl<'a> Request<'a> {
    fn get(endpoint: String) -> Self {
        Self {
            endpoint,
            method: Method::Get,
            paginate: false,
            raw_fields: Vec::new(),
            typed_fields: Vec::new(),
        }
    }

    fn post(endpoint: String) -> Self {
        Self {
            method: Method::Post,
            ..Self::get(endpoint)
        }
    }

    fn paginated(mut self) -> Self {
        self.paginate = true;
        self
    }

    fn raw(mut self, key: &'a str, value: impl Into<String>) -> Self {
        self.raw_fields.push((key, value.into()));
        self
    }

    fn typed(mut self, key: &'a str, value: impl ToString) -> Self {
        self.typed_fields.push((key, value.to_string()));
        self
    }
}

/// GitLab client backed by `glab api`.
#[derive(Debug, Clone, Default)]
pub struct GlabClient {
    hostname: Option<String>,
}

impl GlabClient {
    /// Client for glab's default host.
    pub fn new() -> Self {
        Self::default()
    }

    /// Client for a specific GitLab instance, e.g. the host of a remote URL.
    pub fn for_host(host: impl Into<String>) -> Self {
        Self {
            hostname: Some(host.into()),
        }
    }

    fn command(&self, request: &Request<'_>) -> Command {
        let mut cmd = Command::new("glab");
        cmd.args(["api", &request.endpoint]);
        if let Some(host) = &self.hostname {
            cmd.args(["--hostname", host]);
        }
        if request.method == Method::Post {
            cmd.args(["--method", "POST"]);
        }
        if request.paginate {
            cmd.arg("--paginate");
        }
        for (key, value) in &request.raw_fields {
            cmd.arg("--raw-field").arg(format!("{key}={value}"));
        }
        for (key, value) in &request.typed_fields {
            cmd.arg("--field").arg(format!("{key}={value}"));
        }
        cmd.env("GLAB_NO_PROMPT", "1");
        cmd
    }

    /// Run a request and return the raw response body.
    fn call(&self, request: &Request<'_>) -> Result<Vec<u8>, Failure> {
        let mut cmd = self.command(request);
        let output = match run(&mut cmd, None) {
            Ok(output) => output,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(Failure::Error(GitError::GlabNotInstalled.into()));
            }
            Err(e) => {
                return Err(Failure::Error(
                    anyhow::Error::from(e).context("Failed to run glab api"),
                ));
            }
        };

        if output.status.success() {
            return Ok(output.stdout);
        }

        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        let error_text = serde_json::from_slice::<GlabApiErrorResponse>(&output.stdout)
            .map(|r| r.text())
            .unwrap_or_default();

        if error_text.starts_with("404") || stderr.contains("HTTP 404") {
            return Err(Failure::NotFound);
        }
        if error_text.starts_with("401") || stderr.contains("HTTP 401") {
            return Err(Failure::Error(
                GitError::GlabNotAuthenticated {
                    host: self.hostname.clone(),
                }
                .into(),
            ));
        }

        let details = [error_text.as_str(), stderr.as_str()]
            .into_iter()
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join("\n");
        let message = if error_text.starts_with("403") || stderr.contains("HTTP 403") {
            format!("GitLab API access forbidden for {}", request.endpoint)
        } else {
            format!("glab api {} failed", request.endpoint)
        };
        Err(Failure::Error(
            GitError::CliApiError {
                message,
                stderr: details,
            }
            .into(),
        ))
    }

    /// Run a request and parse the JSON body. `Ok(None)` on 404.
    fn fetch<T: DeserializeOwned>(&self, request: Request<'_>) -> anyhow::Result<Option<T>> {
        match self.call(&request) {
            Ok(body) => serde_json::from_slice(&body)
                .with_context(|| format!("Failed to parse response of glab api {}", request.endpoint))
                .map(Some),
            Err(Failure::NotFound) => Ok(None),
            Err(Failure::Error(e)) => Err(e),
        }
    }

    /// Run a paginated listing. `glab --paginate` prints one JSON array per
    /// page back to back, so the body is read as a stream of arrays.
    fn fetch_all<T: DeserializeOwned>(&self, request: Request<'_>) -> anyhow::Result<Vec<T>> {
        let endpoint = request.endpoint.clone();
        let body = match self.call(&request.paginated()) {
            Ok(body) => body,
            Err(Failure::NotFound) => {
                return Err(GitError::CliApiError {
                    message: format!("glab api {endpoint} failed"),
                    stderr: "404 Not Found".into(),
                }
                .into());
            }
            Err(Failure::Error(e)) => return Err(e),
        };

        let mut items = Vec::new();
        for page in serde_json::Deserializer::from_slice(&body).into_iter::<Vec<T>>() {
            items.extend(
                page.with_context(|| format!("Failed to parse response of glab api {endpoint}"))?,
            );
        }
        Ok(items)
    }
}

impl GitLabApi for GlabClient {
    fn find_project(&self, path_with_namespace: &str) -> anyhow::Result<Project> {
        let endpoint = format!("projects/{}", encode(path_with_namespace));
        self.fetch(Request::get(endpoint))?.ok_or_else(|| {
            GitError::ProjectNotFound {
                path: path_with_namespace.to_string(),
            }
            .into()
        })
    }

    fn get_commit(&self, project_id: u64, git_ref: &str) -> anyhow::Result<Option<String>> {
        let endpoint = format!(
            "projects/{project_id}/repository/commits/{}",
            encode(git_ref)
        );
        Ok(self
            .fetch::<Commit>(Request::get(endpoint))?
            .map(|commit| commit.id))
    }

    fn labels(&self, project_id: u64) -> anyhow::Result<Vec<Label>> {
        self.fetch_all(Request::get(format!("projects/{project_id}/labels")))
    }

    fn milestone_by_title(
        &self,
        project_id: u64,
        title: &str,
    ) -> anyhow::Result<Option<Milestone>> {
        // The title filter is exact but the endpoint still returns a list
        let endpoint = format!("projects/{project_id}/milestones?title={}", encode(title));
        let milestones: Vec<Milestone> = self.fetch(Request::get(endpoint))?.unwrap_or_default();
        Ok(milestones.into_iter().find(|m| m.title == title))
    }

    fn user_id(&self, username: &str) -> anyhow::Result<Option<u64>> {
        let endpoint = format!("users?username={}", encode(username));
        let users: Vec<User> = self.fetch(Request::get(endpoint))?.unwrap_or_default();
        Ok(users
            .into_iter()
            .find(|u| u.username.eq_ignore_ascii_case(username))
            .map(|u| u.id))
    }

    fn project_members(&self, project_id: u64) -> anyhow::Result<Vec<Member>> {
        self.fetch_all(Request::get(format!("projects/{project_id}/members/all")))
    }

    fn create_merge_request(
        &self,
        source_project_id: u64,
        draft: &MergeRequestDraft,
    ) -> anyhow::Result<String> {
        let mut request = Request::post(format!("projects/{source_project_id}/merge_requests"))
            .raw("source_branch", &draft.source_branch)
            .raw("target_branch", &draft.target_branch)
            .raw("title", &draft.title)
            .raw("description", &draft.description)
            .typed("target_project_id", draft.target_project_id)
            .typed("remove_source_branch", draft.remove_source_branch)
            .typed("squash", draft.squash)
            .typed("allow_collaboration", draft.allow_collaboration);
        if !draft.labels.is_empty() {
            request = request.raw("labels", draft.labels.join(","));
        }
        if let Some(milestone_id) = draft.milestone_id {
            request = request.typed("milestone_id", milestone_id);
        }
        for id in &draft.assignee_ids {
            request = request.typed("assignee_ids[]", id);
        }

        let created: Created = self.fetch(request)?.ok_or_else(|| GitError::CliApiError {
            message: "Failed to create merge request".into(),
            stderr: format!("404 Not Found: project {source_project_id}"),
        })?;
        Ok(created.web_url)
    }

    fn create_issue(&self, project_id: u64, draft: &IssueDraft) -> anyhow::Result<String> {
        let mut request = Request::post(format!("projects/{project_id}/issues"))
            .raw("title", &draft.title)
            .raw("description", &draft.description);
        if !draft.labels.is_empty() {
            request = request.raw("labels", draft.labels.join(","));
        }
        if let Some(milestone_id) = draft.milestone_id {
            request = request.typed("milestone_id", milestone_id);
        }
        for id in &draft.assignee_ids {
            request = request.typed("assignee_ids[]", id);
        }

        let created: Created = self.fetch(request)?.ok_or_else(|| GitError::CliApiError {
            message: "Failed to create issue".into(),
            stderr: format!("404 Not Found: project {project_id}"),
        })?;
        Ok(created.web_url)
    }

    fn current_user(&self) -> anyhow::Result<User> {
        self.fetch(Request::get("user".to_string()))?.ok_or_else(|| {
            GitError::GlabNotAuthenticated {
                host: self.hostname.clone(),
            }
            .into()
        })
    }

    fn namespace_id(&self, path: &str) -> anyhow::Result<Option<u64>> {
        let endpoint = format!("namespaces/{}", encode(path));
        Ok(self
            .fetch::<Namespace>(Request::get(endpoint))?
            .map(|namespace| namespace.id))
    }

    fn create_project(&self, draft: &ProjectDraft) -> anyhow::Result<Project> {
        let mut request = Request::post("projects".to_string())
            .raw("visibility", draft.visibility.to_string());
        if let Some(path) = &draft.path {
            request = request.raw("path", path);
        }
        if let Some(name) = &draft.name {
            request = request.raw("name", name);
        }
        if let Some(description) = &draft.description {
            request = request.raw("description", description);
        }
        if let Some(namespace_id) = draft.namespace_id {
            request = request.typed("namespace_id", namespace_id);
        }

        self.fetch(request)?.ok_or_else(|| {
            GitError::CliApiError {
                message: "Failed to create project".into(),
                stderr: "404 Not Found".into(),
            }
            .into()
        })
    }

    /// Pages are requested one at a time so a limit doesn't fetch every
    /// project on the instance.
    fn list_projects(&self, filter: &ProjectFilter) -> anyhow::Result<Vec<Project>> {
        let limit = filter.limit.unwrap_or(usize::MAX);
        let per_page = limit.clamp(1, MAX_PER_PAGE);
        let mut projects = Vec::new();
        for page in 1.. {
            if projects.len() >= limit {
                break;
            }
            let endpoint = projects_endpoint(filter, per_page, page);
            let batch: Vec<Project> = self.fetch(Request::get(endpoint))?.unwrap_or_default();
            let last_page = batch.len() < per_page;
            projects.extend(batch);
            if last_page {
                break;
            }
        }
        projects.truncate(limit);
        Ok(projects)
    }
}
