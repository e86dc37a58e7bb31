#![forbid(unsafe_code)]

//! kilo binary entry point.

use std::process;

use kilo::cli::Opts;

#[cfg(unix)]
fn main() {
    let opts = Opts::parse();

    if let Err(err) = kilo::logging::init(opts.log_file.as_deref()) {
        eprintln!("kilo: log file: {err}");
        process::exit(1);
    }

    if let Err(err) = kilo::program::launch(&opts) {
        tracing::error!(%err, "fatal");
        let _ = kilo_core::terminal_session::restore_saved_mode();
        eprintln!("kilo: {err}");
        process::exit(1);
    }
}

#[cfg(not(unix))]
fn main() {
    let _ = Opts::parse();
    eprintln!("kilo: only Unix terminals are supported");
    process::exit(1);
}
