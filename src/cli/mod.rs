use std::path::PathBuf;

use clap::builder::styling::{AnsiColor, Color, Styles};
use clap::{Args, Command, CommandFactory, Parser, Subcommand};

/// Custom styles for help output
fn help_styles() -> Styles {
    Styles::styled()
        .header(
            anstyle::Style::new()
                .bold()
                .fg_color(Some(Color::Ansi(AnsiColor::Green))),
        )
        .usage(
            anstyle::Style::new()
                .bold()
                .fg_color(Some(Color::Ansi(AnsiColor::Green))),
        )
        .literal(
            anstyle::Style::new()
                .bold()
                .fg_color(Some(Color::Ansi(AnsiColor::Cyan))),
        )
        .placeholder(anstyle::Style::new().fg_color(Some(Color::Ansi(AnsiColor::Cyan))))
        .error(
            anstyle::Style::new()
                .bold()
                .fg_color(Some(Color::Ansi(AnsiColor::Red))),
        )
        .valid(
            anstyle::Style::new()
                .bold()
                .fg_color(Some(Color::Ansi(AnsiColor::Green))),
        )
        .invalid(
            anstyle::Style::new()
                .bold()
                .fg_color(Some(Color::Ansi(AnsiColor::Yellow))),
        )
}

const DEFAULT_COMMAND_NAME: &str = "lab";

/// Help template for commands
const HELP_TEMPLATE: &str = "\
{before-help}{name} - {about-with-newline}
Usage: {usage}

{all-args}{after-help}";

/// Build a clap Command for Cli with the shared help template applied recursively.
pub(crate) fn build_command() -> Command {
    apply_help_template_recursive(Cli::command(), DEFAULT_COMMAND_NAME)
}

fn apply_help_template_recursive(mut cmd: Command, path: &str) -> Command {
    cmd = cmd.help_template(HELP_TEMPLATE).display_name(path);

    for sub in cmd.get_subcommands_mut() {
        let sub_cmd = std::mem::take(sub);
        let sub_path = format!("{} {}", path, sub_cmd.get_name());
        let sub_cmd = apply_help_template_recursive(sub_cmd, &sub_path);
        *sub = sub_cmd;
    }
    cmd
}

#[derive(Parser)]
#[command(name = "lab")]
#[command(about = "GitLab merge requests and issues from your checkout", long_about = None)]
#[command(version)]
#[command(disable_help_subcommand = true)]
#[command(styles = help_styles())]
#[command(arg_required_else_help = true)]
#[command(after_long_help = "\
Getting started

  git push -u origin feature     # Publish your branch
  lab mr create                  # Open a merge request into upstream's default branch
  lab mr create -m 'Fix parser'  # Same, without opening an editor
  lab label list bug             # Find label names for -l

Talks to GitLab through glab; run `glab auth login` once per host.")]
pub(crate) struct Cli {
    /// Working directory for this command
    #[arg(
        short = 'C',
        global = true,
        value_name = "path",
        display_order = 100,
        help_heading = "Global Options"
    )]
    pub directory: Option<PathBuf>,

    /// User config file path
    #[arg(
        long,
        global = true,
        value_name = "path",
        display_order = 101,
        help_heading = "Global Options"
    )]
    pub config: Option<PathBuf>,

    /// Log what lab does (-v), including every git and glab call (-vv)
    #[arg(
        long,
        short = 'v',
        global = true,
        action = clap::ArgAction::Count,
        display_order = 102,
        help_heading = "Global Options"
    )]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Work with merge requests
    #[command(subcommand, visible_alias = "merge-request")]
    Mr(MrCommand),

    /// Work with issues
    #[command(subcommand)]
    Issue(IssueCommand),

    /// Work with project labels
    #[command(subcommand)]
    Label(LabelCommand),

    /// Work with projects
    #[command(subcommand)]
    Project(ProjectCommand),

    /// Clone a project; forks get their parent as `upstream`
    #[command(after_long_help = "\
Examples

  lab clone test                        # Your own project named test
  lab clone lab-testing/test            # Any project by path
  lab clone lab-testing/test work -- --depth 1")]
    Clone(CloneArgs),
}

#[derive(Args, Debug)]
pub(crate) struct CloneArgs {
    /// Project path, or a name of one of your projects
    pub project: String,

    /// Directory to clone into [default: the project's path]
    pub directory: Option<PathBuf>,

    /// Extra arguments for git clone
    #[arg(last = true, value_name = "git-args")]
    pub git_args: Vec<String>,
}

#[derive(Subcommand)]
pub(crate) enum MrCommand {
    /// Open a merge request for the current branch
    ///
    /// The source is the current branch on the remote it tracks. The target
    /// defaults to the default branch of `upstream` (or `origin` when there
    /// is no `upstream` remote).
    #[command(visible_alias = "new")]
    #[command(after_long_help = "\
Examples

  lab mr create                         # Into the default remote's default branch
  lab mr create origin release          # Into origin/release
  lab mr create -m 'Fix parser' -m 'Handles empty input.'
  lab mr create -l bug -a @alice --milestone v2.0 --draft
  lab mr create -F description.md

Without -m or -F, an editor opens with the commit log as comments. The
first block of text is the title, the rest is the description.")]
    Create(MrCreateArgs),
}

#[derive(Args, Debug)]
pub(crate) struct MrCreateArgs {
    /// Remote to open the merge request against
    pub remote: Option<String>,

    /// Target branch [default: the project's default branch]
    pub branch: Option<String>,

    /// Title, then description paragraphs; skips the editor
    #[arg(short = 'm', long = "message", value_name = "msg")]
    pub message: Vec<String>,

    /// Read title and description from a file
    #[arg(
        short = 'F',
        long = "file",
        value_name = "path",
        conflicts_with_all = ["message", "cover_letter"]
    )]
    pub file: Option<PathBuf>,

    /// Keep the commit log in the description
    #[arg(short = 'c', long, conflicts_with = "message")]
    pub cover_letter: bool,

    /// Assignee username; repeatable or comma-separated
    #[arg(short = 'a', long = "assignee", value_name = "user", value_delimiter = ',')]
    pub assignee: Vec<String>,

    /// Label name or unambiguous part of one; repeatable or comma-separated
    #[arg(short = 'l', long = "label", value_name = "label", value_delimiter = ',')]
    pub label: Vec<String>,

    /// Milestone ID or title
    #[arg(long, value_name = "id|title")]
    pub milestone: Option<String>,

    /// Delete the source branch when merged
    #[arg(short = 'd', long)]
    pub remove_source_branch: bool,

    /// Squash commits when merged
    #[arg(short = 's', long)]
    pub squash: bool,

    /// Let maintainers of the target project push to the source branch
    #[arg(long)]
    pub allow_collaboration: bool,

    /// Mark the merge request as a draft
    #[arg(long)]
    pub draft: bool,

    /// Turn every newline in the description into a hard line break
    #[arg(long)]
    pub force_linebreak: bool,
}

#[derive(Subcommand)]
pub(crate) enum IssueCommand {
    /// Open an issue
    #[command(visible_alias = "new")]
    Create(IssueCreateArgs),
}

#[derive(Args, Debug)]
pub(crate) struct IssueCreateArgs {
    /// Remote whose project gets the issue
    pub remote: Option<String>,

    /// Title, then description paragraphs; skips the editor
    #[arg(short = 'm', long = "message", value_name = "msg")]
    pub message: Vec<String>,

    /// Read title and description from a file
    #[arg(short = 'F', long = "file", value_name = "path", conflicts_with = "message")]
    pub file: Option<PathBuf>,

    /// Assignee username; repeatable or comma-separated
    #[arg(short = 'a', long = "assignee", value_name = "user", value_delimiter = ',')]
    pub assignee: Vec<String>,

    /// Label name or unambiguous part of one; repeatable or comma-separated
    #[arg(short = 'l', long = "label", value_name = "label", value_delimiter = ',')]
    pub label: Vec<String>,

    /// Milestone ID or title
    #[arg(long, value_name = "id|title")]
    pub milestone: Option<String>,
}

#[derive(Subcommand)]
pub(crate) enum LabelCommand {
    /// List labels, optionally filtered by a search term
    #[command(visible_aliases = ["ls", "search"])]
    #[command(after_long_help = "\
Examples

  lab label list                   # All labels of the default remote's project
  lab label list bug               # Labels mentioning \"bug\"
  lab label list origin bug        # Same, in origin's project")]
    List {
        /// Remote, or a search term when it doesn't name a remote
        remote: Option<String>,

        /// Case-insensitive text to look for in names and descriptions
        search: Option<String>,
    },
}

#[derive(Subcommand)]
pub(crate) enum ProjectCommand {
    /// List project members
    Users {
        /// Remote whose project to inspect
        remote: Option<String>,
    },

    /// Create a project and add it as `origin`
    ///
    /// Inside a git repository without an `origin` remote, the new project
    /// is added as `origin`. The path defaults to the repository's
    /// directory name.
    #[command(visible_alias = "new")]
    #[command(after_long_help = "\
Examples

  lab project create                    # Named after the current directory
  lab project create tool --public      # In your own namespace
  lab project create company/group/tool # In a (nested) group")]
    Create(ProjectCreateArgs),

    /// List projects you can see
    #[command(visible_aliases = ["ls", "search"])]
    List(ProjectListArgs),
}

#[derive(Args, Debug)]
pub(crate) struct ProjectCreateArgs {
    /// `[namespace/]path` of the new project
    pub path: Option<String>,

    /// Display name [default: derived from the path]
    #[arg(short = 'n', long)]
    pub name: Option<String>,

    /// Project description
    #[arg(short = 'd', long)]
    pub description: Option<String>,

    /// Only members can see the project (default)
    #[arg(short = 'p', long, group = "visibility")]
    pub private: bool,

    /// Any signed-in user can see the project
    #[arg(long, group = "visibility")]
    pub internal: bool,

    /// Anyone can see the project
    #[arg(long, group = "visibility")]
    pub public: bool,
}

#[derive(Args, Debug)]
pub(crate) struct ProjectListArgs {
    /// Text to look for in project paths and names
    pub search: Option<String>,

    /// Only projects you own
    #[arg(short = 'm', long)]
    pub mine: bool,

    /// Only projects you are a member of
    #[arg(long)]
    pub member: bool,

    /// Only projects you starred
    #[arg(short = 's', long)]
    pub starred: bool,

    /// How many projects to show
    #[arg(short = 'n', long, value_name = "count", default_value_t = 100)]
    pub number: usize,

    /// Show every matching project
    #[arg(short = 'a', long, conflicts_with = "number")]
    pub all: bool,
}
