//! Subprocess execution with logging.
//!
//! Every external program `lab` runs (`git`, `glab`, the user's editor) goes
//! through [`run`] or [`run_interactive`] so that `-vv` shows each command and
//! its timing:
//!
//! ```text
//! $ git rev-list --count upstream/main..origin/feature [repo]
//! [lab-trace] context=repo cmd="git rev-list ..." dur=3.1ms ok=true
//! ```

use std::path::PathBuf;
use std::process::{Command, ExitStatus, Output};
use std::sync::OnceLock;
use std::time::Instant;

static SHELL_CONFIG: OnceLock<ShellConfig> = OnceLock::new();

/// Shell used to interpret editor commands such as `code --wait`.
#[derive(Debug, Clone)]
pub struct ShellConfig {
    pub executable: PathBuf,
    /// Arguments before the command string (`-c` for sh)
    pub args: Vec<String>,
    pub name: String,
}

impl ShellConfig {
    /// Shell for the current platform: `sh` on Unix, Git Bash on Windows.
    pub fn get() -> &'static ShellConfig {
        SHELL_CONFIG.get_or_init(detect_shell)
    }

    /// Build a command that runs `script` in this shell, with `extra_args`
    /// bound to `$0`, `$1`, ...
    pub fn command<I, S>(&self, script: &str, extra_args: I) -> Command
    where
        I: IntoIterator<Item = S>,
        S: AsRef<std::ffi::OsStr>,
    {
        let mut cmd = Command::new(&self.executable);
        cmd.args(&self.args).arg(script).args(extra_args);
        cmd
    }
}

fn detect_shell() -> ShellConfig {
    #[cfg(windows)]
    {
        if let Some(bash) = find_git_bash() {
            return ShellConfig {
                executable: bash,
                args: vec!["-c".to_string()],
                name: "Git Bash".to_string(),
            };
        }
    }

    ShellConfig {
        executable: PathBuf::from("sh"),
        args: vec!["-c".to_string()],
        name: "sh".to_string(),
    }
}

/// Git for Windows ships bash next to git.exe; `which bash` could find the
/// WSL launcher instead.
#[cfg(windows)]
fn find_git_bash() -> Option<PathBuf> {
    let git_path = which::which("git").ok()?;
    let git_dir = git_path.parent()?.parent()?;
    [
        git_dir.join("bin").join("bash.exe"),
        git_dir.join("usr").join("bin").join("bash.exe"),
    ]
    .into_iter()
    .find(|p| p.exists())
}

fn describe(cmd: &Command) -> String {
    let program = cmd.get_program().to_string_lossy();
    let args: Vec<_> = cmd.get_args().map(|a| a.to_string_lossy()).collect();
    if args.is_empty() {
        program.into_owned()
    } else {
        format!("{} {}", program, args.join(" "))
    }
}

fn log_start(cmd_str: &str, context: Option<&str>) {
    match context {
        Some(ctx) => log::debug!("$ {} [{}]", cmd_str, ctx),
        None => log::debug!("$ {}", cmd_str),
    }
}

fn log_finish(
    cmd_str: &str,
    context: Option<&str>,
    started: Instant,
    outcome: Result<bool, &std::io::Error>,
) {
    let duration_ms = started.elapsed().as_secs_f64() * 1000.0;
    let ctx = context.map(|c| format!("context={c} ")).unwrap_or_default();
    match outcome {
        Ok(ok) => log::debug!(
            "[lab-trace] {}cmd=\"{}\" dur={:.1}ms ok={}",
            ctx,
            cmd_str,
            duration_ms,
            ok
        ),
        Err(e) => log::debug!(
            "[lab-trace] {}cmd=\"{}\" dur={:.1}ms err=\"{}\"",
            ctx,
            cmd_str,
            duration_ms,
            e
        ),
    }
}

/// Run a command capturing its output, with timing and debug logging.
///
/// `context` names what the command runs against (usually `repo` for git,
/// `None` for `glab`).
pub fn run(cmd: &mut Command, context: Option<&str>) -> std::io::Result<Output> {
    let cmd_str = describe(cmd);
    log_start(&cmd_str, context);
    let started = Instant::now();
    let result = cmd.output();
    log_finish(
        &cmd_str,
        context,
        started,
        result.as_ref().map(|o| o.status.success()),
    );
    result
}

/// Run a command attached to the terminal (stdin/stdout/stderr inherited).
///
/// Used for the editor, which needs the user's terminal.
pub fn run_interactive(cmd: &mut Command, context: Option<&str>) -> std::io::Result<ExitStatus> {
    let cmd_str = describe(cmd);
    log_start(&cmd_str, context);
    let started = Instant::now();
    let result = cmd.status();
    log_finish(
        &cmd_str,
        context,
        started,
        result.as_ref().map(|s| s.success()),
    );
    result
}
