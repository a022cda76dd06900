//! Incremental HTTP/1.1 response reader.
//!
//! An [`Exchange`] tracks one request/response cycle after the request has
//! been written and flushed. It never waits: each `poll_*` call inspects how
//! many bytes the transport has buffered and either makes progress or
//! reports [`Poll::Pending`].
//!
//! # States
//!
//! ```text
//!  begin()            poll_head()                 poll_body()
//!    │      ┌─────────────────────────┐     ┌───────────────────┐
//!    └────▶ │ AwaitingStatusAndHeaders│ ──▶ │   AwaitingBody    │ ──▶ body()
//!           └─────────────────────────┘     └───────────────────┘
//!              │ timeout / bad response        │ timeout / bad response
//!              │ non-200 status                ▼
//!              └──────────────────────▶  Err(Status)  ──▶ drain() + close
//! ```
//!
//! The response timeout is measured per phase: the clock restarts once the
//! headers are parsed, so the body gets the full allowance again. Bytes that
//! arrive between polls are consumed as they come, so a head split across
//! several deliveries is parsed once its blank line shows up.
//!
//! # Limitations
//!
//! Only `Content-Length` framing is supported and header names are matched
//! case-sensitively. Each header line is inspected through its first
//! [`MAX_LINE_LEN`] bytes.

use crate::error::Error;
use crate::network::Read;
use crate::status::{OK_SUCCESS, Status};
use crate::time::elapsed_ms;
use core::task::Poll;
use heapless::Vec;

/// Default response timeout, applied to each waiting phase.
pub const DEFAULT_RESPONSE_TIMEOUT_MS: u64 = 5_000;

/// Largest response body that can be held.
pub const MAX_BODY_LEN: usize = 3_072;

/// Bytes of each header line kept for parsing; the rest is skipped.
pub const MAX_LINE_LEN: usize = 64;

const STATUS_TOKEN: &[u8] = b"HTTP/1.1";
const CONTENT_LENGTH_TOKEN: &[u8] = b"Content-Length:";

const DRAIN_CHUNK: usize = 64;

/// State of one response being received.
#[derive(Debug)]
pub struct Exchange {
    timeout_ms: u64,
    phase_started_at: u64,
    content_length: usize,
    status_code: Option<u16>,
    announced_length: Option<usize>,
    line: Vec<u8, MAX_LINE_LEN>,
    body: Vec<u8, MAX_BODY_LEN>,
}

impl Exchange {
    pub const fn new(timeout_ms: u64) -> Self {
        Self {
            timeout_ms,
            phase_started_at: 0,
            content_length: 0,
            status_code: None,
            announced_length: None,
            line: Vec::new(),
            body: Vec::new(),
        }
    }

    pub fn timeout_ms(&self) -> u64 {
        self.timeout_ms
    }

    /// Forgets the previous response, including its body.
    pub fn reset(&mut self) {
        self.content_length = 0;
        self.status_code = None;
        self.announced_length = None;
        self.line.clear();
        self.body.clear();
    }

    /// Starts the header phase; `now` is the moment the request was flushed.
    pub fn begin(&mut self, now: u64) {
        self.phase_started_at = now;
    }

    /// The body of the last completed exchange, or `""`.
    pub fn body(&self) -> &str {
        core::str::from_utf8(&self.body).unwrap_or("")
    }

    pub fn clear_body(&mut self) {
        self.body.clear();
    }

    /// `Content-Length` announced by the server, once the headers are parsed.
    pub fn content_length(&self) -> usize {
        self.content_length
    }

    /// Consumes whatever part of the status line and headers has arrived.
    ///
    /// Resolves to `Ok(())` when the server answered `200` with a usable
    /// `Content-Length` and the blank line ending the headers was read; any
    /// other outcome resolves to the status that ends the exchange. A non-200
    /// status resolves as soon as its line is complete, leaving the rest of
    /// the response in the transport for [`drain`].
    ///
    /// [`drain`]: Exchange::drain
    pub fn poll_head<T: Read>(&mut self, io: &mut T, now: u64) -> Poll<Result<(), Status>> {
        // One byte at a time so the body stays in the transport.
        let mut byte = [0u8; 1];
        while io.available() > 0 {
            match io.read(&mut byte) {
                Ok(1) => {}
                _ => return Poll::Ready(Err(Error::BadResponse.into())),
            }
            if byte[0] != b'\n' {
                // Only the start of a long line matters.
                let _ = self.line.push(byte[0]);
                continue;
            }
            if let Some(outcome) = self.end_of_line() {
                if outcome.is_ok() {
                    trace!("content length: {=usize}", self.content_length);
                    self.phase_started_at = now;
                }
                return Poll::Ready(outcome);
            }
        }
        self.pending_or_timeout(now)
    }

    /// Waits until the whole body is buffered, then reads exactly
    /// `Content-Length` bytes of it.
    pub fn poll_body<T: Read>(&mut self, io: &mut T, now: u64) -> Poll<Result<(), Status>> {
        if io.available() < self.content_length {
            return self.pending_or_timeout(now);
        }

        self.body.clear();
        if self.body.resize_default(self.content_length).is_err() {
            return Poll::Ready(Err(Error::BadResponse.into()));
        }
        let mut filled = 0;
        while filled < self.content_length {
            match io.read(&mut self.body[filled..]) {
                Ok(n) if n > 0 => filled += n,
                _ => {
                    self.body.clear();
                    return Poll::Ready(Err(Error::BadResponse.into()));
                }
            }
        }
        if core::str::from_utf8(&self.body).is_err() {
            self.body.clear();
            return Poll::Ready(Err(Error::BadResponse.into()));
        }
        Poll::Ready(Ok(()))
    }

    /// Discards every byte still buffered by the transport.
    pub fn drain<T: Read>(&mut self, io: &mut T) {
        let mut scratch = [0u8; DRAIN_CHUNK];
        while io.available() > 0 {
            match io.read(&mut scratch) {
                Ok(n) if n > 0 => {}
                _ => break,
            }
        }
    }

    /// Handles one complete line of the head. Returns the outcome once the
    /// head is decided.
    fn end_of_line(&mut self) -> Option<Result<(), Status>> {
        let line = self.line.strip_suffix(b"\r").unwrap_or(&self.line[..]);
        let outcome = match self.status_code {
            None => match status_code(line) {
                Some(OK_SUCCESS) => {
                    debug!("status line: {=u16}", OK_SUCCESS);
                    self.status_code = Some(OK_SUCCESS);
                    None
                }
                Some(code) => {
                    debug!("status line: {=u16}", code);
                    Some(Err(Status::from_http(code)))
                }
                None => {
                    warn!("response has no status line");
                    Some(Err(Error::BadResponse.into()))
                }
            },
            Some(_) if line.is_empty() => match self.announced_length {
                Some(length) => {
                    self.content_length = length;
                    Some(Ok(()))
                }
                None => {
                    warn!("response has no Content-Length");
                    Some(Err(Error::BadResponse.into()))
                }
            },
            Some(_) => match line.strip_prefix(CONTENT_LENGTH_TOKEN) {
                Some(value) => match leading_number(value) {
                    Some(length) if length <= MAX_BODY_LEN => {
                        self.announced_length = Some(length);
                        None
                    }
                    _ => Some(Err(Error::BadResponse.into())),
                },
                None => None,
            },
        };
        self.line.clear();
        outcome
    }

    fn pending_or_timeout(&self, now: u64) -> Poll<Result<(), Status>> {
        if elapsed_ms(now, self.phase_started_at) > self.timeout_ms {
            warn!("no response within {=u64} ms", self.timeout_ms);
            Poll::Ready(Err(Error::Timeout.into()))
        } else {
            Poll::Pending
        }
    }
}

impl Default for Exchange {
    fn default() -> Self {
        Self::new(DEFAULT_RESPONSE_TIMEOUT_MS)
    }
}

/// Three-digit code following `HTTP/1.1` anywhere in the line.
fn status_code(line: &[u8]) -> Option<u16> {
    let start = line
        .windows(STATUS_TOKEN.len())
        .position(|window| window == STATUS_TOKEN)?;
    let code = leading_number(&line[start + STATUS_TOKEN.len()..])?;
    u16::try_from(code).ok().filter(|code| *code <= 999)
}

/// Decimal number after optional spaces; the first non-digit ends it.
fn leading_number(text: &[u8]) -> Option<usize> {
    let digits = text.trim_ascii_start();
    let len = digits.iter().take_while(|byte| byte.is_ascii_digit()).count();
    if len == 0 {
        return None;
    }
    Some(digits[..len].iter().fold(0usize, |value, byte| {
        value
            .saturating_mul(10)
            .saturating_add(usize::from(byte - b'0'))
    }))
}
