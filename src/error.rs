//! Library-generated result codes.
//!
//! Every operation ends in a single integer code. Positive codes are HTTP
//! status codes returned by the server; the negative codes below are produced
//! by this crate and never appear on the wire.

use core::fmt;

/// An error produced by the client itself rather than by the server.
///
/// Each variant maps to a fixed negative code (see [`Error::code`]) so that
/// applications which log or forward the raw integer keep working unchanged.
///
/// # Examples
///
/// ```rust
/// use tsfeed::Error;
///
/// assert_eq!(Error::Timeout.code(), -304);
/// assert_eq!(Error::from_code(-401), Some(Error::NotInserted));
/// assert_eq!(Error::from_code(200), None);
/// ```
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Error {
    /// A value was out of range or a string was longer than 255 bytes.
    OutOfRange,
    /// A field number outside `1..=8` was given.
    InvalidFieldNumber,
    /// A multi-field write was requested with nothing set since the last send.
    FieldsNotSet,
    /// Another operation is still in flight; nothing was started.
    ///
    /// This code is returned directly by the operation and is never recorded
    /// as the last operation status.
    Busy,
    /// The transport failed to connect to the server.
    ConnectFailed,
    /// The transport failed while the request was being written.
    UnexpectedFailure,
    /// The response could not be parsed (missing status line, missing
    /// `Content-Length`, missing header terminator or an unusable body).
    BadResponse,
    /// The server did not answer within the response timeout.
    Timeout,
    /// The server answered `200` but rejected the point (entry id `0`),
    /// most likely because of the update rate limit.
    NotInserted,
}

impl Error {
    /// Returns the integer code reported for this error.
    pub const fn code(self) -> i32 {
        match self {
            Error::OutOfRange => -101,
            Error::InvalidFieldNumber => -201,
            Error::FieldsNotSet => -210,
            Error::Busy => -220,
            Error::ConnectFailed => -301,
            Error::UnexpectedFailure => -302,
            Error::BadResponse => -303,
            Error::Timeout => -304,
            Error::NotInserted => -401,
        }
    }

    /// Maps an integer code back to the error it stands for.
    pub const fn from_code(code: i32) -> Option<Self> {
        match code {
            -101 => Some(Error::OutOfRange),
            -201 => Some(Error::InvalidFieldNumber),
            -210 => Some(Error::FieldsNotSet),
            -220 => Some(Error::Busy),
            -301 => Some(Error::ConnectFailed),
            -302 => Some(Error::UnexpectedFailure),
            -303 => Some(Error::BadResponse),
            -304 => Some(Error::Timeout),
            -401 => Some(Error::NotInserted),
            _ => None,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Error::OutOfRange => "value out of range or longer than 255 bytes",
            Error::InvalidFieldNumber => "invalid field number",
            Error::FieldsNotSet => "no field was set before a multi-field write",
            Error::Busy => "another operation is in progress",
            Error::ConnectFailed => "failed to connect",
            Error::UnexpectedFailure => "unexpected failure while writing the request",
            Error::BadResponse => "unable to parse response",
            Error::Timeout => "timeout waiting for the server to respond",
            Error::NotInserted => "point was not inserted",
        };
        write!(f, "{} ({})", text, self.code())
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Error {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Error::OutOfRange => defmt::write!(f, "OutOfRange"),
            Error::InvalidFieldNumber => defmt::write!(f, "InvalidFieldNumber"),
            Error::FieldsNotSet => defmt::write!(f, "FieldsNotSet"),
            Error::Busy => defmt::write!(f, "Busy"),
            Error::ConnectFailed => defmt::write!(f, "ConnectFailed"),
            Error::UnexpectedFailure => defmt::write!(f, "UnexpectedFailure"),
            Error::BadResponse => defmt::write!(f, "BadResponse"),
            Error::Timeout => defmt::write!(f, "Timeout"),
            Error::NotInserted => defmt::write!(f, "NotInserted"),
        }
    }
}
