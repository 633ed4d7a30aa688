use std::sync::{LockResult, PoisonError};

#[derive(Debug, Fail)]
pub enum Error {
    #[fail(display = "Invalid argument: {}.", _0)]
    InvalidArgument(String),
    #[fail(display = "Resource {} could not be found.", _0)]
    NotFound(String),
    #[fail(display = "Unsupported image format: {}.", _0)]
    UnsupportedFormat(String),
    #[fail(display = "Illegal state: {}.", _0)]
    IllegalState(String),
    #[fail(display = "{}", _0)]
    IO(::std::io::Error),
    #[fail(display = "{}", _0)]
    Json(::serde_json::Error),
}

pub type Result<T> = ::std::result::Result<T, Error>;

impl Error {
    /// Returns true if the caller passed something unusable. A logical name that could
    /// not be resolved is reported as an argument error as well.
    pub fn is_argument_error(&self) -> bool {
        match *self {
            Error::InvalidArgument(_) | Error::NotFound(_) => true,
            _ => false,
        }
    }

    pub fn is_illegal_state(&self) -> bool {
        match *self {
            Error::IllegalState(_) => true,
            _ => false,
        }
    }

    pub fn is_unsupported_format(&self) -> bool {
        match *self {
            Error::UnsupportedFormat(_) => true,
            _ => false,
        }
    }
}

impl From<::std::io::Error> for Error {
    fn from(err: ::std::io::Error) -> Self {
        Error::IO(err)
    }
}

impl From<::serde_json::Error> for Error {
    fn from(err: ::serde_json::Error) -> Self {
        Error::Json(err)
    }
}

/// Recovers the guard of a poisoned lock. Every critical section in this crate mutates
/// its tables only after all fallible work is done, so the data is consistent.
#[inline]
pub(crate) fn recover<T>(result: LockResult<T>) -> T {
    result.unwrap_or_else(PoisonError::into_inner)
}
