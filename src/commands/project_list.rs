use labkit::config::UserConfig;
use labkit::git::Repository;
use labkit::gitlab::{GitLabApi, ProjectFilter};
use labkit::styling::println;

use super::default_client;
use crate::cli::ProjectListArgs;

pub(crate) fn handle_project_list(args: ProjectListArgs, config: &UserConfig) -> anyhow::Result<()> {
    let repo = Repository::current();
    let api = default_client(&repo, config);
    let filter = ProjectFilter {
        search: args.search,
        owned: args.mine,
        membership: args.member,
        starred: args.starred,
        limit: (!args.all).then_some(args.number),
    };

    for project in api.list_projects(&filter)? {
        println!("{}", project.path_with_namespace);
    }
    Ok(())
}
