use std::ffi::OsString;
use std::path::PathBuf;

use clap::error::{ContextKind, ContextValue, ErrorKind};
use clap::{Command, CommandFactory, Parser};

use crate::{ColorMode, LaunchError};

#[derive(Parser, Debug, Clone, Default, PartialEq, Eq)]
#[command(
    name = "codex-box",
    version,
    about = "Run the Codex CLI inside Docker with only the work, config and data directories mounted.",
    override_usage = "codex-box [OPTIONS] [-- [CODEX-ARGS]...]",
    after_long_help = "Examples:\n  codex-box\n  codex-box -w ~/src/project -- --model o3\n  codex-box --build --shell\n",
    args_override_self = true
)]
pub struct Cli {
    /// Config directory mounted into the container [default: ~/.config/codex]
    #[arg(short = 'c', long = "config", value_name = "DIR")]
    pub config_dir: Option<PathBuf>,

    /// Data directory mounted into the container [default: ~/.local/share/codex]
    #[arg(short = 'd', long = "data", value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// Working directory mounted at /workspace [default: current directory]
    #[arg(short = 'w', long = "workdir", value_name = "DIR")]
    pub work_dir: Option<PathBuf>,

    /// Rebuild the image even if it already exists
    #[arg(short = 'b', long = "build")]
    pub force_build: bool,

    /// Start an interactive shell instead of codex
    #[arg(short = 's', long = "shell")]
    pub shell: bool,

    /// Print the image, build decision and full docker invocation
    #[arg(long)]
    pub verbose: bool,

    /// Resolve paths and print what would run, but do not contact Docker
    #[arg(long)]
    pub dry_run: bool,

    /// Colorize output: auto|always|never
    #[arg(long = "color", value_enum)]
    pub color: Option<ColorMode>,

    /// Arguments passed verbatim to codex (after --)
    #[arg(last = true, value_name = "CODEX-ARGS", value_parser = clap::value_parser!(OsString))]
    pub tool_args: Vec<OsString>,
}

/// Outcome of command line parsing that does not end in an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Parsed {
    Launch(Cli),
    Help(String),
    Version(String),
}

/// Parse a full argv (program name first).
pub fn parse_args<I, T>(argv: I) -> Result<Parsed, LaunchError>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let argv: Vec<OsString> = argv.into_iter().map(Into::into).collect();
    check_flag_values(&argv)?;
    match Cli::try_parse_from(argv) {
        Ok(cli) => Ok(Parsed::Launch(cli)),
        Err(e) => from_clap_error(e),
    }
}

pub fn usage_text() -> String {
    Cli::command().render_help().to_string()
}

fn from_clap_error(err: clap::Error) -> Result<Parsed, LaunchError> {
    let invalid_arg = err
        .get(ContextKind::InvalidArg)
        .map(|v| v.to_string())
        .unwrap_or_default();
    match err.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => {
            Ok(Parsed::Help(err.render().to_string()))
        }
        ErrorKind::DisplayVersion => Ok(Parsed::Version(err.render().to_string())),
        ErrorKind::UnknownArgument => Err(LaunchError::UnknownOption {
            option: invalid_arg,
        }),
        ErrorKind::InvalidValue if !has_rejected_value(&err) => Err(LaunchError::MissingValue {
            option: invalid_arg,
        }),
        ErrorKind::NoEquals | ErrorKind::TooFewValues | ErrorKind::WrongNumberOfValues => {
            Err(LaunchError::MissingValue {
                option: invalid_arg,
            })
        }
        _ => Err(LaunchError::Usage {
            message: first_error_line(&err),
        }),
    }
}

/// clap reports an absent value as an InvalidValue with an empty value.
fn has_rejected_value(err: &clap::Error) -> bool {
    matches!(err.get(ContextKind::InvalidValue), Some(ContextValue::String(v)) if !v.is_empty())
}

fn first_error_line(err: &clap::Error) -> String {
    let rendered = err.render().to_string();
    let line = rendered.lines().next().unwrap_or_default();
    line.strip_prefix("error: ").unwrap_or(line).to_string()
}

/// A value flag never takes a value that starts with '-', nor runs off the end.
/// Stops at the first bare `--` and at the first token it does not recognize
/// so clap reports that one in command line order.
fn check_flag_values(argv: &[OsString]) -> Result<(), LaunchError> {
    let mut cmd = Cli::command();
    cmd.build();

    let mut iter = argv.iter().skip(1).peekable();
    while let Some(tok) = iter.next() {
        let tok = tok.to_string_lossy();
        if tok == "--" {
            break;
        }
        match classify_flag(&cmd, &tok) {
            Some(FlagKind::NeedsValue) => match iter.peek() {
                Some(next) if !next.to_string_lossy().starts_with('-') => {
                    iter.next();
                }
                _ => {
                    return Err(LaunchError::MissingValue {
                        option: tok.into_owned(),
                    })
                }
            },
            Some(FlagKind::Complete) => {}
            None => break,
        }
    }
    Ok(())
}

#[derive(Debug, PartialEq, Eq)]
enum FlagKind {
    /// Takes a value and none is attached; the next token must supply it.
    NeedsValue,
    /// A switch, or a value flag with its value attached.
    Complete,
}

fn classify_flag(cmd: &Command, tok: &str) -> Option<FlagKind> {
    if let Some(long) = tok.strip_prefix("--") {
        let (name, attached) = match long.split_once('=') {
            Some((name, _)) => (name, true),
            None => (long, false),
        };
        let arg = cmd.get_arguments().find(|a| a.get_long() == Some(name))?;
        return Some(if arg.get_action().takes_values() && !attached {
            FlagKind::NeedsValue
        } else {
            FlagKind::Complete
        });
    }

    let shorts = tok.strip_prefix('-')?;
    let count = shorts.chars().count();
    for (i, c) in shorts.chars().enumerate() {
        let arg = cmd.get_arguments().find(|a| a.get_short() == Some(c))?;
        if arg.get_action().takes_values() {
            return Some(if i + 1 == count {
                FlagKind::NeedsValue
            } else {
                FlagKind::Complete
            });
        }
    }
    if count == 0 {
        None
    } else {
        Some(FlagKind::Complete)
    }
}
