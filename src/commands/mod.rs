mod clone;
mod issue_create;
mod label_list;
mod mr_create;
mod project_create;
mod project_list;
mod project_users;

pub(crate) use clone::handle_clone;
pub(crate) use issue_create::handle_issue_create;
pub(crate) use label_list::handle_label_list;
pub(crate) use mr_create::handle_mr_create;
pub(crate) use project_create::handle_project_create;
pub(crate) use project_list::handle_project_list;
pub(crate) use project_users::handle_project_users;

use labkit::config::UserConfig;
use labkit::git::Repository;
use labkit::gitlab::GlabClient;

/// A GitLab client for the instance `remote` points at.
fn client_for(repo: &Repository, remote: &str) -> anyhow::Result<GlabClient> {
    let url = repo.remote_project(remote)?;
    log::debug!("Using GitLab host {} for {remote}", url.host());
    Ok(GlabClient::for_host(url.host()))
}

/// A client for the default remote's GitLab instance, or glab's default host
/// when there is no usable remote (or no repository).
fn default_client(repo: &Repository, config: &UserConfig) -> GlabClient {
    match config
        .default_remote(repo)
        .and_then(|remote| client_for(repo, &remote))
    {
        Ok(client) => client,
        Err(e) => {
            log::debug!("Using glab's default host: {e:#}");
            GlabClient::new()
        }
    }
}
