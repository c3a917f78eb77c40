//! Throwaway git repositories for unit tests.

use std::path::Path;
use std::process::Command;

use tempfile::TempDir;

use crate::git::Repository;

/// A repository on `main` with one commit, isolated from the user's git config.
pub(crate) struct TempRepo {
    dir: TempDir,
}

impl TempRepo {
    pub fn new() -> Self {
        let repo = Self {
            dir: tempfile::tempdir().unwrap(),
        };
        repo.git(&["init", "-q", "-b", "main"]);
        repo.git(&["config", "user.name", "Test User"]);
        repo.git(&["config", "user.email", "test@example.com"]);
        repo.git(&["config", "commit.gpgsign", "false"]);
        repo.commit("Initial commit");
        repo
    }

    /// `feature` checked out three commits ahead of `upstream/master` and
    /// pushed to `origin/feature`, which it tracks.
    pub fn with_feature_branch() -> Self {
        let repo = Self::new();
        repo.add_remote("origin", "git@gitlab.com:zaquestion/test.git");
        repo.add_remote("upstream", "git@gitlab.com:lab-testing/test.git");
        repo.set_remote_ref("upstream", "master", "HEAD");
        repo.git(&["checkout", "-q", "-b", "feature"]);
        repo.commit("Add parser");
        repo.commit("Fix parser");
        repo.commit("Document parser");
        repo.set_remote_ref("origin", "feature", "HEAD");
        repo.track("feature", "origin", "feature");
        repo
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// A fresh `Repository` (no cached state from earlier calls) that ignores
    /// the host's git config and editor variables.
    pub fn repo(&self) -> Repository {
        Repository::at(self.path()).isolated()
    }

    pub fn git(&self, args: &[&str]) -> String {
        let output = Command::new("git")
            .args(args)
            .current_dir(self.path())
            .env("GIT_CONFIG_GLOBAL", "/dev/null")
            .env("GIT_CONFIG_NOSYSTEM", "1")
            .env_remove("GIT_DIR")
            .env_remove("GIT_WORK_TREE")
            .output()
            .unwrap();
        assert!(
            output.status.success(),
            "git {args:?} failed: {}",
            String::from_utf8_lossy(&output.stderr)
        );
        String::from_utf8_lossy(&output.stdout).into_owned()
    }

    pub fn commit(&self, message: &str) {
        self.git(&["commit", "-q", "--allow-empty", "-m", message]);
    }

    pub fn add_remote(&self, name: &str, url: &str) {
        self.git(&["remote", "add", name, url]);
    }

    /// Point `refs/remotes/<remote>/<branch>` at `rev`, as a fetch would.
    pub fn set_remote_ref(&self, remote: &str, branch: &str, rev: &str) {
        self.git(&["update-ref", &format!("refs/remotes/{remote}/{branch}"), rev]);
    }

    /// Configure `branch` to track `remote/remote_branch`.
    pub fn track(&self, branch: &str, remote: &str, remote_branch: &str) {
        self.git(&["config", &format!("branch.{branch}.remote"), remote]);
        self.git(&[
            "config",
            &format!("branch.{branch}.merge"),
            &format!("refs/heads/{remote_branch}"),
        ]);
    }
}
