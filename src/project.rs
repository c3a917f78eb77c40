//! Creating, listing and cloning projects.

use std::path::{Path, PathBuf};
use std::process::Command;

use crate::git::{GitError, GitRemoteUrl, Repository};
use crate::gitlab::{GitLabApi, Project, ProjectDraft, Visibility};
use crate::shell_exec::run_interactive;

/// Split a `[namespace/]path` argument into namespace and path.
///
/// Without an argument or a `name`, a project created from inside a working
/// tree takes the directory's name. Nested groups keep everything before the
/// last `/` as the namespace.
pub fn namespace_and_path(
    arg: Option<&str>,
    name: Option<&str>,
    worktree_root: Option<&Path>,
) -> (String, String) {
    let mut path = arg.unwrap_or_default().trim_matches('/').to_string();
    if path.is_empty()
        && name.is_none_or(str::is_empty)
        && let Some(dir) = worktree_root.and_then(Path::file_name)
    {
        path = dir.to_string_lossy().into_owned();
    }
    match path.rsplit_once('/') {
        Some((namespace, path)) => (namespace.to_string(), path.to_string()),
        None => (String::new(), path),
    }
}

/// Everything `lab project create` was asked to do.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateOptions {
    /// `[namespace/]path`
    pub path: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub visibility: Visibility,
}

/// Create a project. Inside a working tree without an `origin` remote, the
/// new project is added as `origin`.
pub fn create<A: GitLabApi + ?Sized>(
    repo: &mut Repository,
    api: &A,
    options: &CreateOptions,
) -> anyhow::Result<Project> {
    let worktree_root = repo.worktree_root().ok().map(Path::to_path_buf);
    let (namespace, path) = namespace_and_path(
        options.path.as_deref(),
        options.name.as_deref(),
        worktree_root.as_deref(),
    );
    let name = options.name.clone().filter(|n| !n.is_empty());
    if path.is_empty() && name.is_none() {
        return Err(GitError::Other {
            message: "A project path or name is required outside a git repository".into(),
        }
        .into());
    }

    let namespace_id = if namespace.is_empty() {
        None
    } else {
        let id = api
            .namespace_id(&namespace)?
            .ok_or_else(|| GitError::NamespaceNotFound {
                path: namespace.clone(),
            })?;
        Some(id)
    };

    let draft = ProjectDraft {
        path: (!path.is_empty()).then_some(path),
        name,
        namespace_id,
        description: options.description.clone().filter(|d| !d.is_empty()),
        visibility: options.visibility,
    };
    let project = api.create_project(&draft)?;
    log::debug!("Created project {}", project.path_with_namespace);

    if worktree_root.is_some() {
        if repo.is_remote("origin")? {
            log::info!("Remote origin already exists; not pointing it at the new project");
        } else if let Some(url) = project.clone_url() {
            repo.add_remote("origin", url)?;
        }
    }
    Ok(project)
}

/// Everything `lab clone` was asked to do.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CloneOptions {
    /// `project`, `namespace/project` or a project URL
    pub project: String,
    pub directory: Option<PathBuf>,
    /// Passed through to `git clone`
    pub git_args: Vec<String>,
}

/// Where a clone ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cloned {
    pub directory: PathBuf,
    /// The fork parent, added as the `upstream` remote
    pub upstream: Option<Project>,
}

/// Full path of the project to clone. A bare name is a project of the
/// authenticated user.
pub fn clone_path<A: GitLabApi + ?Sized>(api: &A, project: &str) -> anyhow::Result<String> {
    if let Some(url) = GitRemoteUrl::parse(project) {
        return Ok(url.path_with_namespace().to_string());
    }
    let project = project.trim_matches('/');
    if project.contains('/') {
        return Ok(project.to_string());
    }
    Ok(format!("{}/{project}", api.current_user()?.username))
}

/// Clone a project into `base_dir`. Forks get their parent as `upstream`,
/// fetched.
pub fn clone<A: GitLabApi + ?Sized>(
    api: &A,
    options: &CloneOptions,
    base_dir: &Path,
) -> anyhow::Result<Cloned> {
    let path = clone_path(api, &options.project)?;
    let project = api.find_project(&path)?;
    let url = project.clone_url().ok_or_else(|| GitError::Other {
        message: format!("GitLab did not report a clone URL for {path}"),
    })?;

    let directory = options.directory.clone().unwrap_or_else(|| {
        PathBuf::from(path.rsplit_once('/').map_or(path.as_str(), |(_, p)| p))
    });
    let mut cmd = Command::new("git");
    cmd.arg("clone")
        .args(&options.git_args)
        .arg(url)
        .arg(&directory)
        .current_dir(base_dir);
    let status = run_interactive(&mut cmd, Some("clone"))?;
    if !status.success() {
        return Err(GitError::Other {
            message: format!("git clone {url} failed ({status})"),
        }
        .into());
    }

    let directory = base_dir.join(directory);
    let upstream = match project.forked_from_project {
        Some(parent) => {
            let parent_url = parent.clone_url().ok_or_else(|| GitError::Other {
                message: format!(
                    "GitLab did not report a clone URL for {}",
                    parent.path_with_namespace
                ),
            })?;
            let mut repo = Repository::at(&directory);
            repo.add_remote("upstream", parent_url)?;
            repo.fetch("upstream")?;
            Some(*parent)
        }
        None => None,
    };
    Ok(Cloned {
        directory,
        upstream,
    })
}
