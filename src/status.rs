//! The result code of a completed operation.

use crate::error::Error;
use core::fmt;

/// HTTP status code for a successful request.
pub const OK_SUCCESS: u16 = 200;

/// Outcome of the most recently completed operation.
///
/// A `Status` is either success, an HTTP status the server returned instead of
/// `200` (for example `400` for a bad API key or `404` for an unknown
/// channel), or an [`Error`] generated locally.
///
/// # Examples
///
/// ```rust
/// use tsfeed::{Error, Status};
///
/// assert_eq!(Status::Ok.code(), 200);
/// assert_eq!(Status::from_code(404), Status::Http(404));
/// assert_eq!(Status::from_code(-304), Status::Failed(Error::Timeout));
/// assert!(!Status::Http(404).is_ok());
/// ```
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Status {
    /// The server answered `200 OK` and the operation succeeded.
    Ok,
    /// The server answered with a status other than `200`, passed through
    /// verbatim.
    Http(u16),
    /// The operation failed locally.
    Failed(Error),
}

impl Status {
    /// Returns the integer code for this status.
    pub const fn code(self) -> i32 {
        match self {
            Status::Ok => OK_SUCCESS as i32,
            Status::Http(code) => code as i32,
            Status::Failed(error) => error.code(),
        }
    }

    /// Builds a status from an integer code.
    ///
    /// Negative codes that do not name a known [`Error`] are reported as
    /// [`Error::UnexpectedFailure`].
    pub fn from_code(code: i32) -> Self {
        if code == OK_SUCCESS as i32 {
            return Status::Ok;
        }
        match u16::try_from(code) {
            Ok(http) => Status::Http(http),
            Err(_) => Status::Failed(Error::from_code(code).unwrap_or(Error::UnexpectedFailure)),
        }
    }

    /// Builds a status from an HTTP status line code.
    pub const fn from_http(code: u16) -> Self {
        if code == OK_SUCCESS {
            Status::Ok
        } else {
            Status::Http(code)
        }
    }

    /// Returns `true` when the operation succeeded.
    pub const fn is_ok(self) -> bool {
        matches!(self, Status::Ok)
    }

    /// Returns the local error, if this status carries one.
    pub const fn error(self) -> Option<Error> {
        match self {
            Status::Failed(error) => Some(error),
            _ => None,
        }
    }
}

impl Default for Status {
    fn default() -> Self {
        Status::Ok
    }
}

impl From<Error> for Status {
    fn from(error: Error) -> Self {
        Status::Failed(error)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Ok => f.write_str("OK (200)"),
            Status::Http(code) => write!(f, "HTTP status {}", code),
            Status::Failed(error) => fmt::Display::fmt(error, f),
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Status {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Status::Ok => defmt::write!(f, "Ok"),
            Status::Http(code) => defmt::write!(f, "Http({=u16})", code),
            Status::Failed(error) => defmt::write!(f, "Failed({})", error),
        }
    }
}
