//! A transport abstraction layer for embedded systems
//!
//! The channel client never owns a socket implementation. Instead it drives
//! any type implementing the traits below, which model a single reusable
//! byte-stream connection: connect, write the request, poll for bytes that
//! are already buffered, read them, close. None of the reading methods may
//! block.
//!

#![allow(missing_docs)]
#![deny(unsafe_code)]

/// Common error types for transport operations
pub mod error;

/// Application layer protocols built on the transport traits
pub mod application;

/// Transport backed by `std::net::TcpStream`
#[cfg(feature = "std")]
pub mod tcp;

/// Re-exports of common traits
pub mod prelude {
    pub use super::{Close, Connect, Read, Transport, Write};
}

/// Non-blocking reading side of a connection.
pub trait Read {
    /// Associated error type
    type Error: core::fmt::Debug;

    /// Number of bytes that can be read right now without blocking.
    fn available(&mut self) -> usize;

    /// Read already-buffered data from the connection.
    ///
    /// Must not block; returns `Ok(0)` when nothing is buffered.
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error>;
}

/// Writing side of a connection.
pub trait Write {
    /// Associated error type
    type Error: core::fmt::Debug;

    /// Write data to the connection, returning how many bytes were accepted.
    ///
    /// Accepting fewer bytes than offered is treated as a transport failure.
    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error>;

    /// Push any buffered request bytes out to the peer.
    fn flush(&mut self) -> Result<(), Self::Error>;
}

/// Opening a connection to a remote host.
pub trait Connect {
    /// Associated error type
    type Error: core::fmt::Debug;

    /// Open a connection to `host:port`.
    fn connect(&mut self, host: &str, port: u16) -> Result<(), Self::Error>;
}

/// Closing a connection so the transport can be connected again.
pub trait Close {
    /// Associated error type
    type Error: core::fmt::Debug;

    /// Close the connection. Closing an already closed transport is not an
    /// error.
    fn close(&mut self) -> Result<(), Self::Error>;
}

/// A reusable, non-blocking byte-stream connection.
pub trait Transport: Connect + Read + Write + Close {}
