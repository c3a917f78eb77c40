use labkit::config::UserConfig;
use labkit::git::Repository;
use labkit::gitlab::Visibility;
use labkit::project::{self, CreateOptions};
use labkit::styling::println;

use super::default_client;
use crate::cli::ProjectCreateArgs;

pub(crate) fn handle_project_create(
    args: ProjectCreateArgs,
    config: &UserConfig,
) -> anyhow::Result<()> {
    let mut repo = Repository::current();
    let api = default_client(&repo, config);
    let visibility = if args.public {
        Visibility::Public
    } else if args.internal {
        Visibility::Internal
    } else {
        Visibility::Private
    };

    let options = CreateOptions {
        path: args.path,
        name: args.name,
        description: args.description,
        visibility,
    };
    let project = project::create(&mut repo, &api, &options)?;
    println!("{}", project.web_url);
    Ok(())
}
