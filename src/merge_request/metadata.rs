//! Label, milestone and assignee resolution.
//!
//! Everything here runs before the editor opens, so a bad `-l` or
//! `--milestone` never costs the user an edited message.

use crate::git::GitError;
use crate::gitlab::{GitLabApi, Label};

/// How the user named a milestone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MilestoneRef {
    /// A positive integer, used as the ID without checking it exists
    Id(u64),
    Title(String),
}

impl MilestoneRef {
    pub fn parse(arg: &str) -> Self {
        match arg.trim().parse::<u64>() {
            Ok(id) if id > 0 => Self::Id(id),
            _ => Self::Title(arg.to_string()),
        }
    }
}

/// Whether `label` matches a lowercase search term by name or description.
pub fn label_matches(label: &Label, term: &str) -> bool {
    label.name.to_lowercase().contains(term) || label.description.to_lowercase().contains(term)
}

/// Map each term to one label name.
///
/// A case-insensitive exact name match wins; otherwise exactly one label may
/// contain the term in its name or description. The result keeps first-seen
/// order and has no duplicates.
pub fn match_labels(
    terms: &[String],
    labels: &[Label],
    project: &str,
) -> anyhow::Result<Vec<String>> {
    let mut matched: Vec<String> = Vec::new();
    for term in terms {
        let lower = term.to_lowercase();
        let name = match labels.iter().find(|l| l.name.to_lowercase() == lower) {
            Some(exact) => exact.name.clone(),
            None => {
                let candidates: Vec<&Label> =
                    labels.iter().filter(|l| label_matches(l, &lower)).collect();
                match candidates.as_slice() {
                    [only] => only.name.clone(),
                    [] => {
                        return Err(GitError::LabelNotFound {
                            term: term.clone(),
                            project: project.to_string(),
                        }
                        .into());
                    }
                    many => {
                        return Err(GitError::LabelAmbiguous {
                            term: term.clone(),
                            candidates: many.iter().map(|l| l.name.clone()).collect(),
                        }
                        .into());
                    }
                }
            }
        };
        log::debug!("Label {term} -> {name}");
        if !matched.contains(&name) {
            matched.push(name);
        }
    }
    Ok(matched)
}

/// Resolves metadata against one project.
pub struct MetadataResolver<'a, A: GitLabApi + ?Sized> {
    api: &'a A,
    project_id: u64,
    project_path: &'a str,
}

impl<'a, A: GitLabApi + ?Sized> MetadataResolver<'a, A> {
    pub fn new(api: &'a A, project_id: u64, project_path: &'a str) -> Self {
        Self {
            api,
            project_id,
            project_path,
        }
    }

    /// Label names for `terms`. Labels are only fetched when there are terms.
    pub fn labels(&self, terms: &[String]) -> anyhow::Result<Vec<String>> {
        if terms.is_empty() {
            return Ok(Vec::new());
        }
        let labels = self.api.labels(self.project_id)?;
        match_labels(terms, &labels, self.project_path)
    }

    pub fn milestone(&self, arg: Option<&str>) -> anyhow::Result<Option<u64>> {
        let Some(arg) = arg.filter(|a| !a.is_empty()) else {
            return Ok(None);
        };
        match MilestoneRef::parse(arg) {
            MilestoneRef::Id(id) => Ok(Some(id)),
            MilestoneRef::Title(title) => {
                match self.api.milestone_by_title(self.project_id, &title)? {
                    Some(milestone) => Ok(Some(milestone.id)),
                    None => Err(GitError::MilestoneNotFound {
                        title,
                        project: self.project_path.to_string(),
                    }
                    .into()),
                }
            }
        }
    }

    /// User IDs for `usernames` (a leading `@` is ignored).
    ///
    /// Users that cannot be resolved, whether unknown or because the lookup
    /// itself failed, are dropped with a log line instead of failing the
    /// command.
    pub fn assignees(&self, usernames: &[String]) -> anyhow::Result<Vec<u64>> {
        let mut ids = Vec::new();
        for username in usernames {
            let name = username.trim().trim_start_matches('@');
            if name.is_empty() {
                continue;
            }
            match self.api.user_id(name) {
                Ok(Some(id)) if !ids.contains(&id) => ids.push(id),
                Ok(Some(_)) => {}
                Ok(None) => log::info!("Ignoring unknown assignee {name}"),
                Err(e) => log::info!("Ignoring assignee {name}: {e:#}"),
            }
        }
        Ok(ids)
    }
}
