//! CLI command implementations.
//!
//! Each command is implemented in its own module with a `run` function
//! that handles the command logic.

pub mod check;
pub mod clean;
pub mod config;
pub mod watch;

use std::io::Read;
use std::path::Path;

use crate::error::{Result, TraceTrimError};

/// Read all of `file`, or stdin when no file is given.
pub fn read_input(file: Option<&Path>) -> Result<Vec<u8>> {
    match file {
        Some(path) => std::fs::read(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                TraceTrimError::FileNotFound {
                    path: path.to_path_buf(),
                }
            } else {
                TraceTrimError::io(format!("Failed to read {}", path.display()), e)
            }
        }),
        None => {
            let mut buffer = Vec::new();
            std::io::stdin()
                .lock()
                .read_to_end(&mut buffer)
                .map_err(|e| TraceTrimError::io("Error reading from STDIN", e))?;
            Ok(buffer)
        }
    }
}
