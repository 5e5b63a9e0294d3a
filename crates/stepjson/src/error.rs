use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Encoding stopped at the first recoverable problem because
    /// `partial_output_on_error` was not set. The message carries the
    /// line and column of the offending value.
    #[error("{0}")]
    Aborted(String),

    /// An operation was attempted in a state that does not allow it, such as
    /// changing options mid-pass or reading from a closed stream.
    #[error("{0}")]
    InvalidState(&'static str),

    /// The operation is never supported, such as writing to a JSON stream.
    #[error("{0}")]
    Unsupported(&'static str),
}

impl From<Error> for io::Error {
    fn from(err: Error) -> io::Error {
        match err {
            Error::Io(inner) => inner,
            Error::Unsupported(message) => {
                io::Error::new(io::ErrorKind::Unsupported, message)
            }
            other => io::Error::other(other),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
