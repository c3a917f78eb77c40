use color_print::cformat;
use labkit::config::UserConfig;
use labkit::git::{GitRemoteUrl, Repository};
use labkit::gitlab::GlabClient;
use labkit::project::{self, CloneOptions};
use labkit::styling::{eprintln, success_message};

use super::default_client;
use crate::cli::CloneArgs;

/// `lab clone <project> [dir] [-- git args]`. A URL argument picks its own
/// GitLab host.
pub(crate) fn handle_clone(args: CloneArgs, config: &UserConfig) -> anyhow::Result<()> {
    let repo = Repository::current();
    let api = match GitRemoteUrl::parse(&args.project) {
        Some(url) => GlabClient::for_host(url.host()),
        None => default_client(&repo, config),
    };

    let options = CloneOptions {
        project: args.project,
        directory: args.directory,
        git_args: args.git_args,
    };
    let cloned = project::clone(&api, &options, repo.base_path())?;
    if let Some(parent) = cloned.upstream {
        eprintln!(
            "{}",
            success_message(cformat!(
                "new remote: <bold>upstream</> ({})",
                parent.path_with_namespace
            ))
        );
    }
    Ok(())
}
