use labkit::config::UserConfig;
use labkit::git::Repository;
use labkit::gitlab::GitLabApi;
use labkit::merge_request::metadata::label_matches;
use labkit::merge_request::refs::{remote_project, target_remote};
use labkit::styling::println;

use super::client_for;

/// `lab label list [remote] [search]`. A lone argument that isn't a
/// configured remote is the search term.
pub(crate) fn handle_label_list(
    remote: Option<String>,
    search: Option<String>,
    config: &UserConfig,
) -> anyhow::Result<()> {
    let repo = Repository::current();
    let (remote, search) = match (remote, search) {
        (Some(arg), None) if !repo.is_remote(&arg)? => (None, Some(arg)),
        other => other,
    };

    let remote = target_remote(&repo, config, remote.as_deref())?;
    let api = client_for(&repo, &remote)?;
    let project = remote_project(&repo, &api, &remote)?;
    let search = search.unwrap_or_default().to_lowercase();

    for label in api.labels(project.id)? {
        if !search.is_empty() && !label_matches(&label, &search) {
            continue;
        }
        if label.description.is_empty() {
            println!("{}", label.name);
        } else {
            println!("{} - {}", label.name, label.description);
        }
    }
    Ok(())
}
