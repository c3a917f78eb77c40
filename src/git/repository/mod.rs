use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::OnceLock;

use anyhow::{Context, bail};
use once_cell::sync::OnceCell;

use super::{GitError, GitRemoteUrl};

/// Global base path for repository operations, set by the `-C` flag.
static BASE_PATH: OnceLock<PathBuf> = OnceLock::new();

/// Set the base path used by [`Repository::current`].
///
/// Called once from main(). When never called, the current directory is used.
pub fn set_base_path(path: PathBuf) {
    BASE_PATH.set(path).ok();
}

fn base_path() -> &'static PathBuf {
    static DEFAULT: OnceLock<PathBuf> = OnceLock::new();
    BASE_PATH
        .get()
        .unwrap_or_else(|| DEFAULT.get_or_init(|| PathBuf::from(".")))
}

/// Values that don't change during one invocation.
#[derive(Debug, Default)]
struct RepoCache {
    current_branch: OnceCell<Option<String>>,
    git_dir: OnceCell<PathBuf>,
    worktree_root: OnceCell<PathBuf>,
    remotes: OnceCell<Vec<String>>,
}

/// Repository context for git operations.
///
/// ```no_run
/// use labkit::git::Repository;
///
/// let repo = Repository::current();
/// let branch = repo.require_current_branch("create a merge request")?;
/// let count = repo.count_commits("upstream/main", &format!("origin/{branch}"))?;
/// # Ok::<(), anyhow::Error>(())
/// ```
#[derive(Debug)]
pub struct Repository {
    path: PathBuf,
    cache: RepoCache,
    /// Environment changes applied to every git command; `None` removes the
    /// variable.
    env: Vec<(&'static str, Option<&'static str>)>,
}

impl Repository {
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            cache: RepoCache::default(),
            env: Vec::new(),
        }
    }

    /// Hide the user's git config and editor variables from git commands.
    #[cfg(test)]
    pub(crate) fn isolated(mut self) -> Self {
        self.env = vec![
            ("GIT_CONFIG_GLOBAL", Some("/dev/null")),
            ("GIT_CONFIG_NOSYSTEM", Some("1")),
            ("GIT_DIR", None),
            ("GIT_WORK_TREE", None),
            ("GIT_EDITOR", None),
            ("VISUAL", None),
            ("EDITOR", None),
        ];
        self
    }

    /// Repository at the `-C` path, or the current directory.
    pub fn current() -> Self {
        Self::at(base_path().clone())
    }

    pub fn base_path(&self) -> &Path {
        &self.path
    }

    /// The checked-out branch, or `None` on a detached HEAD.
    pub fn current_branch(&self) -> anyhow::Result<Option<&str>> {
        self.cache
            .current_branch
            .get_or_try_init(|| {
                let stdout = self.run_command(&["branch", "--show-current"])?;
                let branch = stdout.trim();
                Ok(if branch.is_empty() {
                    None
                } else {
                    Some(branch.to_string())
                })
            })
            .map(|opt| opt.as_deref())
    }

    /// The checked-out branch, or [`GitError::DetachedHead`].
    ///
    /// `action` describes what requires being on a branch.
    pub fn require_current_branch(&self, action: &str) -> anyhow::Result<String> {
        self.current_branch()?.map(str::to_string).ok_or_else(|| {
            GitError::DetachedHead {
                action: Some(action.into()),
            }
            .into()
        })
    }

    /// The remote `branch` is configured to track (`branch.<name>.remote`).
    pub fn branch_remote(&self, branch: &str) -> anyhow::Result<Option<String>> {
        Ok(self
            .get_config(&format!("branch.{branch}.remote"))?
            .filter(|remote| !remote.is_empty() && remote != "."))
    }

    /// Name of the upstream branch on its remote (`branch.<name>.merge`
    /// without `refs/heads/`).
    ///
    /// This may differ from the local name: a local `fix` can track
    /// `origin/bugfix/123`.
    pub fn upstream_branch_name(&self, branch: &str) -> anyhow::Result<Option<String>> {
        Ok(self
            .get_config(&format!("branch.{branch}.merge"))?
            .map(|merge| {
                merge
                    .strip_prefix("refs/heads/")
                    .unwrap_or(&merge)
                    .to_string()
            })
            .filter(|name| !name.is_empty()))
    }

    /// Names of all configured remotes.
    pub fn remotes(&self) -> anyhow::Result<&[String]> {
        self.cache
            .remotes
            .get_or_try_init(|| {
                let stdout = self.run_command(&["remote"])?;
                Ok(stdout
                    .lines()
                    .map(str::trim)
                    .filter(|l| !l.is_empty())
                    .map(String::from)
                    .collect())
            })
            .map(Vec::as_slice)
    }

    pub fn is_remote(&self, name: &str) -> anyhow::Result<bool> {
        Ok(self.remotes()?.iter().any(|r| r == name))
    }

    /// Add a remote pointing at `url`.
    pub fn add_remote(&mut self, name: &str, url: &str) -> anyhow::Result<()> {
        self.run_command(&["remote", "add", name, url])?;
        self.cache.remotes.take();
        Ok(())
    }

    pub fn fetch(&self, remote: &str) -> anyhow::Result<()> {
        self.run_command(&["fetch", "--quiet", remote])?;
        Ok(())
    }

    /// The URL for a remote, if configured.
    pub fn remote_url(&self, remote: &str) -> Option<String> {
        self.run_command(&["remote", "get-url", remote])
            .ok()
            .map(|url| url.trim().to_string())
            .filter(|url| !url.is_empty())
    }

    /// Parse the GitLab project behind a remote.
    pub fn remote_project(&self, remote: &str) -> anyhow::Result<GitRemoteUrl> {
        if !self.is_remote(remote)? {
            return Err(GitError::InvalidRemote {
                remote: remote.to_string(),
            }
            .into());
        }
        let url = self
            .remote_url(remote)
            .ok_or_else(|| GitError::RemoteUrlMissing {
                remote: remote.to_string(),
            })?;
        GitRemoteUrl::parse(&url).ok_or_else(|| {
            GitError::RemoteUrlUnparseable {
                remote: remote.to_string(),
                url,
            }
            .into()
        })
    }

    /// Whether `rev` resolves to a commit in the local object database.
    pub fn ref_exists(&self, rev: &str) -> anyhow::Result<bool> {
        self.run_command_check(&["rev-parse", "--verify", "--quiet", &format!("{rev}^{{commit}}")])
    }

    /// Number of commits reachable from `head` but not from `base`.
    pub fn count_commits(&self, base: &str, head: &str) -> anyhow::Result<usize> {
        let range = format!("{base}..{head}");
        let stdout = self.run_command(&["rev-list", "--count", &range])?;
        stdout
            .trim()
            .parse()
            .context("Failed to parse commit count")
    }

    /// One-line summaries (`<short sha> <subject>`) of the commits in
    /// `base..head`, most recent first.
    pub fn commit_log(&self, base: &str, head: &str) -> anyhow::Result<Vec<String>> {
        let range = format!("{base}..{head}");
        let stdout = self.run_command(&["log", "--format=%h %s", &range])?;
        Ok(stdout
            .lines()
            .map(str::trim_end)
            .filter(|l| !l.is_empty())
            .map(String::from)
            .collect())
    }

    /// Full message (subject and body) of a commit, without the trailing newline.
    pub fn commit_message(&self, rev: &str) -> anyhow::Result<String> {
        let stdout = self.run_command(&["log", "-1", "--format=%B", rev])?;
        Ok(stdout.trim_end().to_string())
    }

    /// The character that starts comment lines in edited messages
    /// (`core.commentChar`, `#` when unset or `auto`).
    pub fn comment_char(&self) -> anyhow::Result<char> {
        let configured = self.get_config("core.commentChar")?;
        Ok(match configured.as_deref() {
            None | Some("") | Some("auto") => '#',
            Some(value) => value.chars().next().unwrap_or('#'),
        })
    }

    /// The user's editor as git resolves it (`GIT_EDITOR`, `core.editor`,
    /// `VISUAL`, `EDITOR`, then git's built-in default).
    pub fn editor(&self) -> anyhow::Result<String> {
        let stdout = self.run_command(&["var", "GIT_EDITOR"])?;
        Ok(stdout.trim().to_string())
    }

    /// Absolute path of the git directory.
    pub fn git_dir(&self) -> anyhow::Result<&Path> {
        self.cache
            .git_dir
            .get_or_try_init(|| {
                let stdout = self.run_command(&["rev-parse", "--absolute-git-dir"])?;
                Ok(PathBuf::from(stdout.trim()))
            })
            .map(PathBuf::as_path)
    }

    /// Top-level directory of the working tree.
    pub fn worktree_root(&self) -> anyhow::Result<&Path> {
        self.cache
            .worktree_root
            .get_or_try_init(|| {
                let stdout = self.run_command(&["rev-parse", "--show-toplevel"])?;
                Ok(PathBuf::from(stdout.trim()))
            })
            .map(PathBuf::as_path)
    }

    /// A git config value, or `None` if the key doesn't exist.
    pub fn get_config(&self, key: &str) -> anyhow::Result<Option<String>> {
        match self.run_command(&["config", key]) {
            Ok(value) => Ok(Some(value.trim().to_string())),
            Err(_) => Ok(None),
        }
    }

    /// Short name of this repository for log lines.
    fn logging_context(&self) -> String {
        if self.path.to_str() == Some(".") {
            ".".to_string()
        } else {
            self.path
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or("?")
                .to_string()
        }
    }

    fn git_command(&self, args: &[&str]) -> Command {
        let mut cmd = Command::new("git");
        cmd.args(args);
        cmd.current_dir(&self.path);
        for (key, value) in &self.env {
            match value {
                Some(value) => cmd.env(key, value),
                None => cmd.env_remove(key),
            };
        }
        cmd
    }

    /// Run a git command in this repository and return its stdout.
    ///
    /// A non-zero exit becomes an error carrying git's stderr (and stdout,
    /// since some git commands report errors there).
    pub fn run_command(&self, args: &[&str]) -> anyhow::Result<String> {
        use crate::shell_exec::run;

        let mut cmd = self.git_command(args);
        let output = run(&mut cmd, Some(&self.logging_context()))
            .with_context(|| format!("Failed to execute: git {}", args.join(" ")))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).replace('\r', "\n");
            for line in stderr.trim().lines() {
                log::debug!("  ! {}", line);
            }
            let stdout = String::from_utf8_lossy(&output.stdout);
            let error_msg = [stderr.trim(), stdout.trim()]
                .into_iter()
                .filter(|s| !s.is_empty())
                .collect::<Vec<_>>()
                .join("\n");
            bail!("{}", error_msg);
        }

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        for line in stdout.trim().lines() {
            log::debug!("  {}", line);
        }
        Ok(stdout)
    }

    /// Run a git command and report whether it exited successfully.
    pub fn run_command_check(&self, args: &[&str]) -> anyhow::Result<bool> {
        use crate::shell_exec::run;

        let mut cmd = self.git_command(args);
        let output = run(&mut cmd, Some(&self.logging_context()))
            .with_context(|| format!("Failed to execute: git {}", args.join(" ")))?;

        Ok(output.status.success())
    }
}
