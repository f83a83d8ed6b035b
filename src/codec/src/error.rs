use std::fmt;

pub type Result<T> = std::result::Result<T, Error>;

/// The four failure classes a caller can branch on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    MalformedInput,
    OutOfBounds,
    CorruptPayload,
    UnsupportedVariant,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorKind::MalformedInput => "malformed input",
            ErrorKind::OutOfBounds => "out of bounds read",
            ErrorKind::CorruptPayload => "corrupt payload",
            ErrorKind::UnsupportedVariant => "unsupported variant",
        };
        f.write_str(s)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Input rejected before any output buffer was allocated.
    #[error("malformed input: {0}")]
    MalformedInput(String),

    /// A cursor was asked for `need` bytes at `offset` of a `len` byte range.
    #[error("out of bounds read: need {need} bytes at offset {offset}, range is {len} bytes")]
    OutOfBounds {
        offset: usize,
        len: usize,
        need: usize,
    },

    #[error("corrupt payload: {0}")]
    CorruptPayload(String),

    /// Snappy failed to decompress an inner string stream or an outer wrap.
    #[error("corrupt payload: snappy: {0}")]
    Snappy(#[source] snap::Error),

    #[error("unsupported variant: {0}")]
    UnsupportedVariant(&'static str),
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::MalformedInput(_) => ErrorKind::MalformedInput,
            Error::OutOfBounds { .. } => ErrorKind::OutOfBounds,
            Error::CorruptPayload(_) | Error::Snappy(_) => ErrorKind::CorruptPayload,
            Error::UnsupportedVariant(_) => ErrorKind::UnsupportedVariant,
        }
    }

    pub(crate) fn malformed(msg: impl Into<String>) -> Self {
        Error::MalformedInput(msg.into())
    }

    pub(crate) fn corrupt(msg: impl Into<String>) -> Self {
        Error::CorruptPayload(msg.into())
    }
}

impl From<snap::Error> for Error {
    fn from(e: snap::Error) -> Self {
        Error::Snappy(e)
    }
}
