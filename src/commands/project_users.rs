use labkit::config::UserConfig;
use labkit::git::Repository;
use labkit::gitlab::GitLabApi;
use labkit::merge_request::refs::{remote_project, target_remote};
use labkit::styling::println;

use super::client_for;

pub(crate) fn handle_project_users(remote: Option<String>, config: &UserConfig) -> anyhow::Result<()> {
    let repo = Repository::current();
    let remote = target_remote(&repo, config, remote.as_deref())?;
    let api = client_for(&repo, &remote)?;
    let project = remote_project(&repo, &api, &remote)?;

    for member in api.project_members(project.id)? {
        println!("{} ({}) {}", member.username, member.name, member.role());
    }
    Ok(())
}
