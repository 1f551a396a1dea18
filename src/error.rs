//! Error types for suds operations.
//!
//! Sanitization itself is total and never fails; these errors cover the I/O
//! boundaries around it (reading input for the CLI, decoding bytes).

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("UTF-8 decoding error: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

pub type Result<T> = std::result::Result<T, Error>;
