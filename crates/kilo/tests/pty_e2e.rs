#![cfg(unix)]

//! End-to-end tests: run the real `kilo` binary inside a pseudo-terminal.
//!
//! Keys are only sent after the first frame has been seen. Entering raw mode
//! flushes pending input, so anything typed earlier could be discarded.

use std::io::{Read, Write};
use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use portable_pty::{Child, ChildKiller, CommandBuilder, ExitStatus, PtySize, native_pty_system};

const TIMEOUT: Duration = Duration::from_secs(10);
const FIRST_FRAME_END: &[u8] = b"\x1b[?25h";

struct KiloPty {
    child: Box<dyn Child + Send + Sync>,
    writer: Box<dyn Write + Send>,
    rx: mpsc::Receiver<Vec<u8>>,
    captured: Vec<u8>,
}

impl KiloPty {
    fn spawn(args: &[&str]) -> Self {
        let pair = native_pty_system()
            .openpty(PtySize {
                rows: 24,
                cols: 80,
                pixel_width: 0,
                pixel_height: 0,
            })
            .expect("openpty");

        let mut cmd = CommandBuilder::new(env!("CARGO_BIN_EXE_kilo"));
        cmd.args(args);
        cmd.env("TERM", "xterm-256color");
        cmd.env_remove("KILO_LOG_FILE");

        let child = pair.slave.spawn_command(cmd).expect("spawn kilo");
        drop(pair.slave);

        let mut reader = pair.master.try_clone_reader().expect("pty reader");
        let writer = pair.master.take_writer().expect("pty writer");
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            let _master = pair.master;
            let mut buf = [0u8; 4096];
            loop {
                match reader.read(&mut buf) {
                    Ok(0) | Err(_) => break,
                    Ok(n) => {
                        if tx.send(buf[..n].to_vec()).is_err() {
                            break;
                        }
                    }
                }
            }
        });

        Self {
            child,
            writer,
            rx,
            captured: Vec::new(),
        }
    }

    fn contains(&self, pattern: &[u8]) -> bool {
        self.captured
            .windows(pattern.len())
            .any(|w| w == pattern)
    }

    fn count(&self, pattern: &[u8]) -> usize {
        self.captured
            .windows(pattern.len())
            .filter(|w| *w == pattern)
            .count()
    }

    /// Read until `pattern` has been seen `occurrences` times in total.
    fn wait_for(&mut self, pattern: &[u8], occurrences: usize) {
        let deadline = Instant::now() + TIMEOUT;
        while self.count(pattern) < occurrences {
            let remaining = deadline.saturating_duration_since(Instant::now());
            assert!(
                !remaining.is_zero(),
                "timed out waiting for {:?}; captured {:?}",
                String::from_utf8_lossy(pattern),
                String::from_utf8_lossy(&self.captured)
            );
            match self.rx.recv_timeout(remaining) {
                Ok(bytes) => self.captured.extend_from_slice(&bytes),
                Err(mpsc::RecvTimeoutError::Timeout) => {}
                Err(mpsc::RecvTimeoutError::Disconnected) => panic!(
                    "kilo closed the terminal before {:?}; captured {:?}",
                    String::from_utf8_lossy(pattern),
                    String::from_utf8_lossy(&self.captured)
                ),
            }
        }
    }

    fn send(&mut self, bytes: &[u8]) {
        self.writer.write_all(bytes).expect("write to pty");
        self.writer.flush().expect("flush pty");
    }

    /// Wait for the child to exit, collecting remaining output.
    fn finish(&mut self) -> ExitStatus {
        let deadline = Instant::now() + TIMEOUT;
        loop {
            if let Some(status) = self.child.try_wait().expect("try_wait") {
                self.drain();
                return status;
            }
            if Instant::now() >= deadline {
                let _ = self.child.kill();
                panic!(
                    "kilo did not exit; captured {:?}",
                    String::from_utf8_lossy(&self.captured)
                );
            }
            if let Ok(bytes) = self.rx.recv_timeout(Duration::from_millis(20)) {
                self.captured.extend_from_slice(&bytes);
            }
        }
    }

    fn drain(&mut self) {
        while let Ok(bytes) = self.rx.recv_timeout(Duration::from_millis(200)) {
            self.captured.extend_from_slice(&bytes);
        }
    }
}

struct TempFile(PathBuf);

impl TempFile {
    fn with_contents(name: &str, contents: &[u8]) -> Self {
        let path = std::env::temp_dir().join(format!("kilo-e2e-{}-{name}", std::process::id()));
        std::fs::write(&path, contents).expect("write temp file");
        Self(path)
    }

    fn path(&self) -> &str {
        self.0.to_str().expect("utf-8 temp path")
    }
}

impl Drop for TempFile {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.0);
    }
}

#[test]
fn arrow_then_quit_exits_cleanly() {
    let mut kilo = KiloPty::spawn(&[]);
    kilo.wait_for(FIRST_FRAME_END, 1);
    assert!(kilo.contains(b"Kilo editor -- version 0.0.1"));
    assert!(kilo.contains(b"\x1b[1;1H\x1b[?25h"));

    kilo.send(b"\x1b[C");
    kilo.wait_for(b"\x1b[1;2H\x1b[?25h", 1);

    kilo.send(b"\x11");
    let status = kilo.finish();
    assert!(status.success(), "exit status {status:?}");
    assert_eq!(kilo.count(b"\x1b[2J"), 1);
    assert!(kilo.contains(b"\x1b[2J\x1b[H"));
}

#[test]
fn arrows_stop_at_the_edge() {
    let mut kilo = KiloPty::spawn(&[]);
    kilo.wait_for(FIRST_FRAME_END, 1);

    kilo.send(b"\x1b[D");
    kilo.wait_for(FIRST_FRAME_END, 2);
    kilo.send(b"\x1b[A");
    kilo.wait_for(FIRST_FRAME_END, 3);
    assert_eq!(kilo.count(b"\x1b[1;1H\x1b[?25h"), 3);

    kilo.send(b"\x11");
    assert!(kilo.finish().success());
}

#[test]
fn first_line_of_file_is_shown() {
    let file = TempFile::with_contents("first-line", b"hello\nworld\n");
    let mut kilo = KiloPty::spawn(&[file.path()]);
    kilo.wait_for(FIRST_FRAME_END, 1);
    assert!(kilo.contains(b"\x1b[?25l\x1b[Hhello\x1b[K"));
    assert!(!kilo.contains(b"world"));

    kilo.send(b"\x11");
    assert!(kilo.finish().success());
}

#[test]
fn missing_file_is_fatal() {
    let mut kilo = KiloPty::spawn(&["/definitely/not/here/kilo.txt"]);
    let status = kilo.finish();
    assert!(!status.success());
    assert_eq!(status.exit_code(), 1);
    assert!(kilo.contains(b"kilo: fopen: /definitely/not/here/kilo.txt"));
    assert!(kilo.contains(b"\x1b[2J\x1b[H"));
}

#[test]
fn unknown_option_is_a_usage_error() {
    let mut kilo = KiloPty::spawn(&["--frobnicate"]);
    let status = kilo.finish();
    assert_eq!(status.exit_code(), 1);
    assert!(kilo.contains(b"unknown option: --frobnicate"));
    assert!(!kilo.contains(b"\x1b[?25l"));
}

#[test]
fn version_flag_prints_and_exits() {
    let mut kilo = KiloPty::spawn(&["--version"]);
    let status = kilo.finish();
    assert!(status.success());
    assert!(kilo.contains(b"kilo 0.0.1"));
}
