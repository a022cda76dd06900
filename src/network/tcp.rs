use super::error::Error;
use super::{Close, Connect, Read, Transport, Write};
use std::io::{ErrorKind, Read as StdRead, Write as StdWrite};
use std::net::{Shutdown, TcpStream};
use std::time::{Duration, Instant};
use std::vec::Vec;

const RECV_CHUNK: usize = 512;

/// How long [`Write::write`] keeps retrying a full send buffer.
pub const DEFAULT_WRITE_TIMEOUT_MS: u64 = 5_000;

/// A [`Transport`] over a non-blocking [`TcpStream`].
///
/// Connecting blocks until the TCP handshake finishes; afterwards the stream
/// is switched to non-blocking mode and incoming bytes are staged in a local
/// buffer so [`Read::available`] can report them without blocking. A write
/// that finds the send buffer full retries until the write timeout runs out
/// and then fails with [`Error::Timeout`].
#[derive(Debug)]
pub struct TcpTransport {
    stream: Option<TcpStream>,
    staged: Vec<u8>,
    write_timeout: Duration,
}

impl TcpTransport {
    /// Creates a disconnected transport.
    pub fn new() -> Self {
        Self {
            stream: None,
            staged: Vec::new(),
            write_timeout: Duration::from_millis(DEFAULT_WRITE_TIMEOUT_MS),
        }
    }

    /// Sets how long a write may wait for room in the send buffer.
    pub fn with_write_timeout(mut self, timeout_ms: u64) -> Self {
        self.write_timeout = Duration::from_millis(timeout_ms);
        self
    }

    /// Returns `true` while a connection is open.
    pub fn is_connected(&self) -> bool {
        self.stream.is_some()
    }

    fn pull(&mut self) {
        let Some(stream) = self.stream.as_mut() else {
            return;
        };
        let mut chunk = [0u8; RECV_CHUNK];
        loop {
            match stream.read(&mut chunk) {
                Ok(0) => break,
                Ok(n) => self.staged.extend_from_slice(&chunk[..n]),
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(_) => break,
            }
        }
    }
}

impl Default for TcpTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Connect for TcpTransport {
    type Error = Error;

    fn connect(&mut self, host: &str, port: u16) -> Result<(), Self::Error> {
        let _ = self.close();
        let stream = TcpStream::connect((host, port)).map_err(|e| match e.kind() {
            ErrorKind::InvalidInput => Error::InvalidAddress,
            ErrorKind::TimedOut => Error::Timeout,
            _ => Error::ConnectionRefused,
        })?;
        stream
            .set_nonblocking(true)
            .map_err(|_| Error::ConnectionRefused)?;
        let _ = stream.set_nodelay(true);
        self.stream = Some(stream);
        Ok(())
    }
}

impl Read for TcpTransport {
    type Error = Error;

    fn available(&mut self) -> usize {
        self.pull();
        self.staged.len()
    }

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        if self.staged.is_empty() {
            self.pull();
        }
        let n = buf.len().min(self.staged.len());
        buf[..n].copy_from_slice(&self.staged[..n]);
        self.staged.drain(..n);
        Ok(n)
    }
}

impl Write for TcpTransport {
    type Error = Error;

    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        let stream = self.stream.as_mut().ok_or(Error::NotOpen)?;
        let deadline = Instant::now() + self.write_timeout;
        let mut sent = 0;
        while sent < buf.len() {
            match stream.write(&buf[sent..]) {
                Ok(0) => return Err(Error::ConnectionClosed),
                Ok(n) => sent += n,
                Err(e) if e.kind() == ErrorKind::WouldBlock => {
                    if Instant::now() >= deadline {
                        return Err(Error::Timeout);
                    }
                    std::thread::yield_now();
                }
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(_) => return Err(Error::WriteError),
            }
        }
        Ok(sent)
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        let stream = self.stream.as_mut().ok_or(Error::NotOpen)?;
        stream.flush().map_err(|_| Error::WriteError)
    }
}

impl Close for TcpTransport {
    type Error = Error;

    fn close(&mut self) -> Result<(), Self::Error> {
        self.staged.clear();
        if let Some(stream) = self.stream.take() {
            let _ = stream.shutdown(Shutdown::Both);
        }
        Ok(())
    }
}

impl Transport for TcpTransport {}
