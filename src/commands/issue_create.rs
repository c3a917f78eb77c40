use labkit::config::UserConfig;
use labkit::git::Repository;
use labkit::issue::{self, IssueOptions};
use labkit::merge_request::MessageSource;
use labkit::merge_request::refs::target_remote;
use labkit::styling::println;

use super::client_for;
use crate::cli::IssueCreateArgs;

pub(crate) fn handle_issue_create(
    args: IssueCreateArgs,
    config: &UserConfig,
) -> anyhow::Result<()> {
    let repo = Repository::current();
    let message = MessageSource::from_flags(args.message, args.file, false)?;
    let remote = target_remote(&repo, config, args.remote.as_deref())?;
    let api = client_for(&repo, &remote)?;

    let options = IssueOptions {
        remote: Some(remote),
        message,
        assignees: args.assignee,
        labels: args.label,
        milestone: args.milestone,
    };
    let url = issue::create(&repo, &api, config, &options)?;
    println!("{url}");
    Ok(())
}
