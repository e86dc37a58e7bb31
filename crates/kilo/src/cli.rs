#![forbid(unsafe_code)]

//! Command-line argument parsing.
//!
//! Parses args manually (no external dependencies). The log file can also be
//! set through `KILO_LOG_FILE`; an explicit `--log-file=` wins.

use std::env;
use std::ffi::OsString;
use std::fmt;
use std::path::PathBuf;
use std::process;

use crate::VERSION;

/// Environment variable naming the log file.
pub const LOG_FILE_ENV: &str = "KILO_LOG_FILE";

const HELP_TEXT: &str = "\
kilo - a minimal terminal text viewer

USAGE:
    kilo [OPTIONS] [FILE]

ARGS:
    FILE                 Show the first line of FILE

OPTIONS:
    --log-file=PATH      Write diagnostics to PATH
    --help, -h           Show this help message
    --version, -V        Show version

KEYBINDINGS:
    Arrow keys           Move the cursor
    Ctrl-Q               Quit

ENVIRONMENT VARIABLES:
    KILO_LOG_FILE        Default for --log-file
    KILO_LOG             Log filter directives (default: info)";

/// Parsed command-line options.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Opts {
    /// File whose first line is displayed.
    pub file: Option<PathBuf>,
    /// Destination for log output. Logging is off when unset.
    pub log_file: Option<PathBuf>,
}

/// What the command line asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Invocation {
    Run(Opts),
    Help,
    Version,
}

/// A command line that cannot be honored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UsageError {
    UnknownOption(String),
    UnexpectedArgument(OsString),
    EmptyLogFile,
}

impl fmt::Display for UsageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownOption(opt) => write!(f, "unknown option: {opt}"),
            Self::UnexpectedArgument(arg) => {
                write!(f, "unexpected argument: {}", arg.to_string_lossy())
            }
            Self::EmptyLogFile => write!(f, "--log-file needs a path"),
        }
    }
}

impl std::error::Error for UsageError {}

impl Opts {
    /// Parse the process's arguments and environment.
    ///
    /// Prints help or version and exits 0 when asked; prints a usage error
    /// and exits 1 on a bad command line.
    pub fn parse() -> Self {
        let env_log_file = env::var_os(LOG_FILE_ENV);
        match Self::parse_from(env::args_os().skip(1), env_log_file) {
            Ok(Invocation::Run(opts)) => opts,
            Ok(Invocation::Help) => {
                println!("{HELP_TEXT}");
                process::exit(0);
            }
            Ok(Invocation::Version) => {
                println!("kilo {VERSION}");
                process::exit(0);
            }
            Err(err) => {
                eprintln!("kilo: {err}");
                eprintln!("Run with --help for usage.");
                process::exit(1);
            }
        }
    }

    /// Parse `args` (without the program name).
    ///
    /// `env_log_file` is the value of `KILO_LOG_FILE`, if set; an empty
    /// value is ignored.
    ///
    /// # Errors
    ///
    /// Returns a [`UsageError`] for unknown options, an empty `--log-file=`,
    /// or more than one file argument.
    pub fn parse_from<I>(args: I, env_log_file: Option<OsString>) -> Result<Invocation, UsageError>
    where
        I: IntoIterator<Item = OsString>,
    {
        let mut opts = Self {
            log_file: env_log_file.filter(|v| !v.is_empty()).map(PathBuf::from),
            ..Self::default()
        };

        let mut options_done = false;
        for arg in args {
            if options_done {
                opts.set_file(arg)?;
                continue;
            }
            let Some(text) = arg.to_str() else {
                opts.set_file(arg)?;
                continue;
            };
            match text {
                "--help" | "-h" => return Ok(Invocation::Help),
                "--version" | "-V" => return Ok(Invocation::Version),
                "--" => options_done = true,
                other => {
                    if let Some(path) = other.strip_prefix("--log-file=") {
                        if path.is_empty() {
                            return Err(UsageError::EmptyLogFile);
                        }
                        opts.log_file = Some(PathBuf::from(path));
                    } else if other.starts_with('-') && other != "-" {
                        return Err(UsageError::UnknownOption(other.to_string()));
                    } else {
                        opts.set_file(arg)?;
                    }
                }
            }
        }
        Ok(Invocation::Run(opts))
    }

    fn set_file(&mut self, arg: OsString) -> Result<(), UsageError> {
        if self.file.is_some() {
            return Err(UsageError::UnexpectedArgument(arg));
        }
        self.file = Some(PathBuf::from(arg));
        Ok(())
    }
}
