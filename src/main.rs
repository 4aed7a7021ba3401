//! tracetrim: clipboard watcher and filter that collapses repeated frames in
//! JavaScript and React stack traces.

use std::process::ExitCode;

use tracetrim::cli;

fn main() -> ExitCode {
    // Logging is initialized by cli::run from --log-level and --log-format
    match cli::run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e}");

            if std::env::var("RUST_BACKTRACE").is_ok() {
                if let Some(source) = std::error::Error::source(&e) {
                    eprintln!("Caused by: {source}");
                }
            }

            ExitCode::from(e.exit_code() as u8)
        }
    }
}
