#![forbid(unsafe_code)]

//! Raw-mode terminal lifecycle with exactly-once restoration.
//!
//! # Lifecycle Guarantees
//!
//! Entering raw mode saves the terminal's original attributes in a
//! process-wide slot. Every exit path restores them by *taking* the saved
//! attributes out of that slot, so restoration happens at most once no
//! matter how many paths race for it:
//!
//! | Exit path | Restores through |
//! |-----------|------------------|
//! | Explicit [`TerminalSession::restore`] | [`restore_saved_mode`] |
//! | Dropping the session | `Drop` |
//! | Panic | panic hook installed on first entry |
//! | `SIGINT` / `SIGTERM` / `SIGHUP` | signal watcher thread, then `exit(128 + signo)` |
//!
//! Only one session may be active per process. A second
//! [`TerminalSession::enter`] while one is active fails with
//! [`TerminalError::AlreadyActive`].
//!
//! # Raw Mode Attributes
//!
//! | Group | Change |
//! |-------|--------|
//! | input | clear `BRKINT`, `ICRNL`, `INPCK`, `ISTRIP`, `IXON` |
//! | output | clear `OPOST` |
//! | control | set `CS8` |
//! | local | clear `ECHO`, `ICANON`, `IEXTEN`, `ISIG` |
//! | control chars | `VMIN = 0`, `VTIME` from [`RawModeOptions::read_timeout`] |

use std::fmt;
use std::fs::File;
use std::io::{self, Write};
use std::os::fd::{AsFd, OwnedFd};
use std::sync::{Mutex, OnceLock, PoisonError};
use std::time::Duration;

use nix::errno::Errno;
use nix::sys::termios::{
    self, ControlFlags, InputFlags, LocalFlags, OutputFlags, SetArg, SpecialCharacterIndices,
    Termios,
};
use signal_hook::consts::signal::{SIGHUP, SIGINT, SIGTERM};
use signal_hook::iterator::Signals;

/// Options for entering raw mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawModeOptions {
    /// Upper bound a single read waits for input.
    ///
    /// Rounded down to tenths of a second and clamped to `0.1..=25.5` s,
    /// the range the terminal's `VTIME` can express.
    pub read_timeout: Duration,
    /// Restore the terminal and exit when `SIGINT`, `SIGTERM`, or `SIGHUP`
    /// arrives.
    pub cleanup_on_signal: bool,
}

impl Default for RawModeOptions {
    fn default() -> Self {
        Self {
            read_timeout: Duration::from_millis(100),
            cleanup_on_signal: true,
        }
    }
}

impl RawModeOptions {
    /// The `VTIME` value (deciseconds) for [`read_timeout`](Self::read_timeout).
    #[must_use]
    pub fn vtime(&self) -> u8 {
        let tenths = self.read_timeout.as_millis() / 100;
        tenths.clamp(1, u128::from(u8::MAX)) as u8
    }
}

/// Failure to enter or leave raw mode.
#[derive(Debug)]
pub enum TerminalError {
    /// A terminal attribute call failed.
    Attributes {
        /// `tcgetattr` or `tcsetattr`.
        op: &'static str,
        /// OS error.
        source: Errno,
    },
    /// Setting up the session failed outside the attribute calls.
    Io {
        op: &'static str,
        source: io::Error,
    },
    /// A session is already active in this process.
    AlreadyActive,
}

impl fmt::Display for TerminalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Attributes { op, source } => write!(f, "{op}: {}", source.desc()),
            Self::Io { op, source } => write!(f, "{op}: {source}"),
            Self::AlreadyActive => write!(f, "raw mode is already active"),
        }
    }
}

impl std::error::Error for TerminalError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Attributes { source, .. } => Some(source),
            Self::Io { source, .. } => Some(source),
            Self::AlreadyActive => None,
        }
    }
}

/// Attributes to put back, plus our own handle on the terminal.
struct SavedMode {
    tty: OwnedFd,
    original: Termios,
}

static SAVED_MODE: Mutex<Option<SavedMode>> = Mutex::new(None);

/// Apply raw-mode changes to `termios` in place.
pub fn make_raw(termios: &mut Termios, vtime: u8) {
    termios.input_flags.remove(
        InputFlags::BRKINT
            | InputFlags::ICRNL
            | InputFlags::INPCK
            | InputFlags::ISTRIP
            | InputFlags::IXON,
    );
    termios.output_flags.remove(OutputFlags::OPOST);
    termios.control_flags.insert(ControlFlags::CS8);
    termios
        .local_flags
        .remove(LocalFlags::ECHO | LocalFlags::ICANON | LocalFlags::IEXTEN | LocalFlags::ISIG);
    termios.control_chars[SpecialCharacterIndices::VMIN as usize] = 0;
    termios.control_chars[SpecialCharacterIndices::VTIME as usize] = vtime;
}

/// Restore the saved terminal attributes, if any are still saved.
///
/// Returns `Ok(true)` when this call performed the restoration and
/// `Ok(false)` when there was nothing left to restore.
///
/// # Errors
///
/// Returns the `tcsetattr` failure. The saved attributes are consumed either
/// way.
pub fn restore_saved_mode() -> Result<bool, TerminalError> {
    let saved = SAVED_MODE
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .take();
    let Some(saved) = saved else {
        return Ok(false);
    };
    termios::tcsetattr(saved.tty.as_fd(), SetArg::TCSAFLUSH, &saved.original).map_err(
        |source| TerminalError::Attributes {
            op: "tcsetattr",
            source,
        },
    )?;
    crate::debug!("terminal attributes restored");
    Ok(true)
}

/// Whether raw mode is currently active in this process.
#[must_use]
pub fn is_raw_mode_active() -> bool {
    SAVED_MODE
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .is_some()
}

/// Unbuffered handles on standard input and output.
///
/// `std::io::Stdout` is line buffered, which would split one frame into
/// several writes. Duplicating the descriptors gives plain files whose
/// `write_all` goes straight to the terminal.
///
/// # Errors
///
/// Returns the `dup` failure.
pub fn unbuffered_stdio() -> io::Result<(File, File)> {
    let input = io::stdin().as_fd().try_clone_to_owned()?;
    let output = io::stdout().as_fd().try_clone_to_owned()?;
    Ok((File::from(input), File::from(output)))
}

/// An active raw-mode session.
///
/// Dropping the session restores the terminal.
#[derive(Debug)]
pub struct TerminalSession {
    signals: Option<SignalGuard>,
}

impl TerminalSession {
    /// Put standard input's terminal into raw mode.
    ///
    /// # Errors
    ///
    /// See [`enter_on`](Self::enter_on).
    pub fn enter(options: RawModeOptions) -> Result<Self, TerminalError> {
        Self::enter_on(io::stdin(), options)
    }

    /// Put the terminal behind `fd` into raw mode.
    ///
    /// # Errors
    ///
    /// Fails if another session is active, if `fd` is not a terminal, or if
    /// the signal watcher cannot be started. On failure the terminal is left
    /// as it was found.
    pub fn enter_on<Fd: AsFd>(fd: Fd, options: RawModeOptions) -> Result<Self, TerminalError> {
        let fd = fd.as_fd();
        {
            let mut slot = SAVED_MODE.lock().unwrap_or_else(PoisonError::into_inner);
            if slot.is_some() {
                return Err(TerminalError::AlreadyActive);
            }

            let original = termios::tcgetattr(fd).map_err(|source| TerminalError::Attributes {
                op: "tcgetattr",
                source,
            })?;
            let tty = fd
                .try_clone_to_owned()
                .map_err(|source| TerminalError::Io { op: "dup", source })?;

            let mut raw = original.clone();
            make_raw(&mut raw, options.vtime());
            termios::tcsetattr(fd, SetArg::TCSAFLUSH, &raw).map_err(|source| {
                TerminalError::Attributes {
                    op: "tcsetattr",
                    source,
                }
            })?;

            *slot = Some(SavedMode { tty, original });
        }
        install_panic_hook();
        crate::info!(vtime = options.vtime(), "raw mode entered");

        let signals = if options.cleanup_on_signal {
            match SignalGuard::new() {
                Ok(guard) => Some(guard),
                Err(source) => {
                    let _ = restore_saved_mode();
                    return Err(TerminalError::Io {
                        op: "signal handler",
                        source,
                    });
                }
            }
        } else {
            None
        };

        Ok(Self { signals })
    }

    /// Restore the original terminal attributes now.
    ///
    /// Calling this more than once, or letting the session drop afterwards,
    /// is harmless.
    ///
    /// # Errors
    ///
    /// Returns the `tcsetattr` failure.
    pub fn restore(&mut self) -> Result<(), TerminalError> {
        restore_saved_mode().map(|_| ())
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        let _ = restore_saved_mode();
        self.signals.take();
    }
}

fn install_panic_hook() {
    static HOOK: OnceLock<()> = OnceLock::new();
    HOOK.get_or_init(|| {
        let previous = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            let _ = restore_saved_mode();
            previous(info);
        }));
    });
}

/// Watches termination signals on a dedicated thread.
#[derive(Debug)]
struct SignalGuard {
    handle: signal_hook::iterator::Handle,
    thread: Option<std::thread::JoinHandle<()>>,
}

impl SignalGuard {
    fn new() -> io::Result<Self> {
        let mut signals = Signals::new([SIGINT, SIGTERM, SIGHUP])?;
        let handle = signals.handle();
        let thread = std::thread::Builder::new()
            .name("kilo-signals".into())
            .spawn(move || {
                if let Some(signal) = signals.forever().next() {
                    crate::warn!(signal, "termination signal received, restoring terminal");
                    let _ = restore_saved_mode();
                    let mut stdout = io::stdout();
                    let _ = stdout.write_all(b"\x1b[?25h");
                    let _ = stdout.flush();
                    std::process::exit(128 + signal);
                }
            })?;
        Ok(Self {
            handle,
            thread: Some(thread),
        })
    }
}

impl Drop for SignalGuard {
    fn drop(&mut self) {
        self.handle.close();
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}
