//! core::files
//!
//! JSON request bodies supplied with `--file`.
//!
//! `-` reads the body from the reader the caller passes in, which is the
//! session input in practice.

use std::io::Read;
use std::path::Path;

use serde_json::Value;
use thiserror::Error;

/// Errors reading a request body.
#[derive(Debug, Error)]
pub enum FileError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("failed to parse JSON from {path}: {message}")]
    Parse { path: String, message: String },
}

/// Read and parse a JSON document from a path, or from `stdin` for `-`.
pub fn read_json_file<R: Read + ?Sized>(path: &str, stdin: &mut R) -> Result<Value, FileError> {
    let contents = if path == "-" {
        let mut buf = String::new();
        stdin
            .read_to_string(&mut buf)
            .map_err(|source| FileError::Read {
                path: "stdin".to_string(),
                source,
            })?;
        buf
    } else {
        std::fs::read_to_string(Path::new(path)).map_err(|source| FileError::Read {
            path: path.to_string(),
            source,
        })?
    };
    parse_json(path, &contents)
}

fn parse_json(path: &str, contents: &str) -> Result<Value, FileError> {
    serde_json::from_str(contents).map_err(|e| FileError::Parse {
        path: path.to_string(),
        message: e.to_string(),
    })
}
