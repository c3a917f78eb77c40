use labkit::config::UserConfig;
use labkit::git::Repository;
use labkit::merge_request::{self, CreateOptions, MessageSource, RequestFlags};
use labkit::merge_request::refs::target_remote;
use labkit::styling::println;

use super::client_for;
use crate::cli::MrCreateArgs;

pub(crate) fn handle_mr_create(args: MrCreateArgs, config: &UserConfig) -> anyhow::Result<()> {
    let repo = Repository::current();
    let message = MessageSource::from_flags(args.message, args.file, args.cover_letter)?;
    let remote = target_remote(&repo, config, args.remote.as_deref())?;
    let api = client_for(&repo, &remote)?;

    let options = CreateOptions {
        target_remote: Some(remote),
        target_branch: args.branch,
        message,
        assignees: args.assignee,
        labels: args.label,
        milestone: args.milestone,
        flags: RequestFlags {
            draft: args.draft,
            force_linebreak: args.force_linebreak,
            remove_source_branch: args.remove_source_branch,
            squash: args.squash,
            allow_collaboration: args.allow_collaboration,
        },
    };

    let url = merge_request::create(&repo, &api, config, &options)?;
    println!("{url}/diffs");
    Ok(())
}
