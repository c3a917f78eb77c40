use std::process;

use clap::FromArgMatches;
use color_print::cformat;
use labkit::config::UserConfig;
use labkit::git::{GitError, set_base_path};
use labkit::styling::{eprintln, error_message, warning_message};

mod cli;
mod commands;

use cli::{Cli, Commands, IssueCommand, LabelCommand, MrCommand, ProjectCommand};

/// Warnings by default, `-v` info, `-vv` debug. `RUST_LOG` takes precedence.
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        _ => log::LevelFilter::Debug,
    };
    let mut builder = env_logger::Builder::new();
    builder
        .filter_level(level)
        .format_timestamp(None)
        .format_target(false)
        .target(env_logger::Target::Stderr);
    if let Ok(filters) = std::env::var("RUST_LOG") {
        builder.parse_filters(&filters);
    }
    builder.init();
}

fn run(cli: Cli) -> anyhow::Result<()> {
    if let Some(dir) = cli.directory {
        set_base_path(dir);
    }

    let config = match &cli.config {
        Some(path) => UserConfig::load_from(path)?,
        None => UserConfig::load()?,
    };
    for key in config.unknown_keys() {
        eprintln!(
            "{}",
            warning_message(cformat!("Ignoring unknown config key <bold>{key}</>"))
        );
    }

    let Some(command) = cli.command else {
        cli::build_command().print_help()?;
        return Ok(());
    };

    match command {
        Commands::Mr(MrCommand::Create(args)) => commands::handle_mr_create(args, &config),
        Commands::Issue(IssueCommand::Create(args)) => {
            commands::handle_issue_create(args, &config)
        }
        Commands::Label(LabelCommand::List { remote, search }) => {
            commands::handle_label_list(remote, search, &config)
        }
        Commands::Project(ProjectCommand::Users { remote }) => {
            commands::handle_project_users(remote, &config)
        }
        Commands::Project(ProjectCommand::Create(args)) => {
            commands::handle_project_create(args, &config)
        }
        Commands::Project(ProjectCommand::List(args)) => {
            commands::handle_project_list(args, &config)
        }
        Commands::Clone(args) => commands::handle_clone(args, &config),
    }
}

fn main() {
    let matches = cli::build_command().get_matches();
    let cli = Cli::from_arg_matches(&matches).unwrap_or_else(|e| e.exit());
    init_logging(cli.verbose);

    if let Err(err) = run(cli) {
        match err.downcast_ref::<GitError>() {
            // Already styled, hint included
            Some(git_err) => eprintln!("{git_err}"),
            None => eprintln!("{}", error_message(format!("{err:#}"))),
        }
        process::exit(1);
    }
}
