//! Title and body extraction.

use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::git::{EditorSession, GitError, MessageKind, Repository};

/// Where the title and description come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageSource {
    /// Open the composed template in the user's editor.
    Editor { cover_letter: bool },
    /// `-m` values: the first is the title, the rest are body paragraphs.
    Messages(Vec<String>),
    /// `-F`: a file parsed with the title/blank-line/body rule.
    File(PathBuf),
}

impl MessageSource {
    /// Pick the source from command-line flags, rejecting combinations that
    /// make no sense (a file together with messages or a cover letter, or
    /// messages together with a cover letter).
    pub fn from_flags(
        messages: Vec<String>,
        file: Option<PathBuf>,
        cover_letter: bool,
    ) -> anyhow::Result<Self> {
        let conflict = |message: &str| -> anyhow::Error {
            GitError::ConflictingMessageOptions {
                message: message.into(),
            }
            .into()
        };
        match file {
            Some(_) if cover_letter || !messages.is_empty() => {
                Err(conflict("option -F cannot be combined with -m/-c"))
            }
            Some(path) => Ok(Self::File(path)),
            None if messages.is_empty() => Ok(Self::Editor { cover_letter }),
            None if cover_letter => Err(conflict("option -m cannot be combined with -c/-F")),
            None => Ok(Self::Messages(messages)),
        }
    }

    pub fn cover_letter(&self) -> bool {
        matches!(self, Self::Editor { cover_letter: true })
    }
}

/// A title and a description.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComposedMessage {
    pub title: String,
    pub body: String,
}

impl ComposedMessage {
    /// `-m` values: the first is the title, the rest are joined with a blank
    /// line between them.
    pub fn from_messages(messages: &[String]) -> Self {
        match messages.split_first() {
            Some((title, rest)) => Self {
                title: title.trim().to_string(),
                body: rest.join("\n\n"),
            },
            None => Self::default(),
        }
    }

    /// Parse edited text: drop lines starting with `comment_char`, skip
    /// leading blank lines, then everything up to the first blank line is the
    /// title (joined into one line) and the rest is the body.
    pub fn parse(text: &str, comment_char: char) -> Self {
        let lines = text.lines().filter(|line| !line.starts_with(comment_char));
        Self::split(lines)
    }

    /// Read `path` and split it without stripping comments, so markdown
    /// headings in a prepared description survive.
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read message file {}", path.display()))?;
        Ok(Self::split(text.lines()))
    }

    fn split<'a>(lines: impl Iterator<Item = &'a str>) -> Self {
        let mut lines = lines.skip_while(|line| line.trim().is_empty());

        let title = lines
            .by_ref()
            .take_while(|line| !line.trim().is_empty())
            .map(str::trim)
            .collect::<Vec<_>>()
            .join(" ");

        let mut body: Vec<&str> = lines.skip_while(|line| line.trim().is_empty()).collect();
        while body.last().is_some_and(|line| line.trim().is_empty()) {
            body.pop();
        }

        Self {
            title,
            body: body.join("\n"),
        }
    }

    /// Render as editable text that parses back to the same message.
    pub fn to_text(&self) -> String {
        if self.body.is_empty() {
            self.title.clone()
        } else {
            format!("{}\n\n{}", self.title, self.body)
        }
    }

    /// Fail with [`GitError::EmptyMessage`] when there is no title.
    pub fn require_title(self, kind: MessageKind) -> anyhow::Result<Self> {
        if self.title.is_empty() {
            return Err(GitError::EmptyMessage { kind }.into());
        }
        Ok(self)
    }
}

/// Produce the message from `source`. `compose` renders the editor template
/// and is only called for [`MessageSource::Editor`].
pub fn obtain_message(
    repo: &Repository,
    kind: MessageKind,
    source: &MessageSource,
    compose: impl FnOnce(char) -> anyhow::Result<String>,
) -> anyhow::Result<ComposedMessage> {
    let message = match source {
        MessageSource::Messages(messages) => ComposedMessage::from_messages(messages),
        MessageSource::File(path) => ComposedMessage::from_file(path)?,
        MessageSource::Editor { .. } => {
            let comment_char = repo.comment_char()?;
            let seed = compose(comment_char)?;
            let edited = EditorSession::new(repo, kind, &seed)?.run()?;
            ComposedMessage::parse(&edited, comment_char)
        }
    };
    message.require_title(kind)
}
