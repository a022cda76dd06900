//! HTTP/1.1 request rendering.
//!
//! Requests are never assembled in memory. The request line, headers and
//! body are written as `core::fmt` output, either straight into the
//! transport through [`WireWriter`] or into a [`ByteCount`] to learn the
//! exact `Content-Length` before anything is sent.

use crate::network::Write;
use core::fmt;

/// Content type of every form body this crate sends.
pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header<'a> {
    pub name: &'a str,
    pub value: &'a str,
}

/// Request line and headers of an outgoing request.
///
/// `form_length` is `Some` for requests that carry a form body; the content
/// type and length headers are emitted only then.
#[derive(Debug, Clone, Copy)]
pub struct RequestHead<'a, P> {
    pub method: Method,
    pub path: P,
    pub host: &'a str,
    pub user_agent: &'a str,
    pub api_key: Option<Header<'a>>,
    pub form_length: Option<usize>,
}

impl<P: fmt::Display> fmt::Display for RequestHead<'_, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} HTTP/1.1\r\n", self.method.as_str(), self.path)?;
        write!(f, "Host: {}\r\n", self.host)?;
        write!(f, "User-Agent: {}\r\n", self.user_agent)?;
        if let Some(key) = &self.api_key {
            write!(f, "{}: {}\r\n", key.name, key.value)?;
        }
        if let Some(length) = self.form_length {
            write!(f, "Content-Type: {}\r\n", FORM_CONTENT_TYPE)?;
            write!(f, "Content-Length: {}\r\n", length)?;
        }
        f.write_str("\r\n")
    }
}

/// Streams formatted output into a transport.
///
/// Any write the transport does not accept in full turns into
/// [`fmt::Error`], which aborts the surrounding `write!` immediately.
#[derive(Debug)]
pub struct WireWriter<'a, T: Write> {
    io: &'a mut T,
    written: usize,
}

impl<'a, T: Write> WireWriter<'a, T> {
    pub fn new(io: &'a mut T) -> Self {
        Self { io, written: 0 }
    }

    /// Bytes accepted by the transport so far.
    pub fn written(&self) -> usize {
        self.written
    }
}

impl<T: Write> fmt::Write for WireWriter<'_, T> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        if s.is_empty() {
            return Ok(());
        }
        match self.io.write(s.as_bytes()) {
            Ok(n) if n == s.len() => {
                self.written += n;
                Ok(())
            }
            _ => Err(fmt::Error),
        }
    }
}

/// A formatter sink that only counts bytes.
#[derive(Debug, Default, Clone, Copy)]
pub struct ByteCount(pub usize);

impl fmt::Write for ByteCount {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.0 += s.len();
        Ok(())
    }
}

/// Exact number of bytes `value` renders to.
pub fn rendered_len<D: fmt::Display + ?Sized>(value: &D) -> usize {
    let mut count = ByteCount::default();
    // Counting never fails.
    let _ = fmt::write(&mut count, format_args!("{}", value));
    count.0
}
