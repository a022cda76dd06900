//! # tsfeed - non-blocking channel feed client
//!
//! A `no_std` client that lets a memory-constrained device write telemetry to
//! an HTTP channel service and read the latest entries back, without ever
//! blocking its single thread of execution.
//!
//! ## Features
//!
//! ### Channel Client
//! - Single-field, multi-field and raw updates
//! - Reads of one field (as text, float or integer), the latest status, the
//!   latest timestamp or the whole latest entry
//! - Completion callbacks fired from inside [`Client::poll`]
//!
//! ### Execution Model
//! - A cooperative continuation stack: every wait is a step that is resumed
//!   by the next poll
//! - An incremental HTTP/1.1 response reader with a per-phase timeout
//! - Fixed-size buffers only; no allocator required
//!
//! ## Usage
//!
//! Add this to your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! tsfeed = "0.1.0"
//! ```
//!
//! ### Writing Two Fields
//!
//! ```rust
//! use tsfeed::network::prelude::*;
//! use tsfeed::time::Clock;
//! use tsfeed::{Client, Status};
//! # struct Modem;
//! # impl Connect for Modem {
//! #     type Error = ();
//! #     fn connect(&mut self, _: &str, _: u16) -> Result<(), ()> { Ok(()) }
//! # }
//! # impl Read for Modem {
//! #     type Error = ();
//! #     fn available(&mut self) -> usize { 0 }
//! #     fn read(&mut self, _: &mut [u8]) -> Result<usize, ()> { Ok(0) }
//! # }
//! # impl Write for Modem {
//! #     type Error = ();
//! #     fn write(&mut self, buf: &[u8]) -> Result<usize, ()> { Ok(buf.len()) }
//! #     fn flush(&mut self) -> Result<(), ()> { Ok(()) }
//! # }
//! # impl Close for Modem {
//! #     type Error = ();
//! #     fn close(&mut self) -> Result<(), ()> { Ok(()) }
//! # }
//! # impl Transport for Modem {}
//! # struct Uptime(core::cell::Cell<u64>);
//! # impl Clock for Uptime {
//! #     fn now_ms(&self) -> u64 { let t = self.0.get() + 100; self.0.set(t); t }
//! # }
//!
//! let mut client = Client::new(Modem, Uptime(Default::default()));
//! client.set_field(1, &23.5f32).unwrap();
//! client.set_field(2, &42i32).unwrap();
//! client.write_fields(12345, "WRITEKEY").unwrap();
//!
//! // The application keeps doing its own work between polls.
//! while client.poll() {}
//!
//! // This modem never answers, so the exchange times out.
//! assert_eq!(client.last_status(), Status::Failed(tsfeed::Error::Timeout));
//! ```
//!
//! ## Platform Support
//!
//! This library is designed to work on:
//! - Embedded microcontrollers (ARM Cortex-M, RISC-V, etc.)
//! - Linux-based IoT devices (Raspberry Pi, etc.)
//! - Any platform supporting Rust's `core` library
//!
//! ## Optional Features
//!
//! - `std`: TCP transport over `std::net` and an `Instant` based clock
//! - `async`: `Client::completion` future resolving to the final status
//! - `defmt`: Enable defmt logging support for embedded debugging

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(missing_docs)]
#![warn(missing_debug_implementations)]

#[macro_use]
mod fmt;

/// Library result codes.
pub mod error;

/// Operation outcome combining HTTP and library codes.
pub mod status;

/// Millisecond clock abstraction.
pub mod time;

/// Transport traits and the protocols built on them.
///
/// Contains the byte-stream abstraction the client drives, the HTTP/1.1
/// building blocks and the channel feed client itself.
pub mod network;

/// Execution primitives for single-threaded, never-blocking firmware.
pub mod system;

pub use error::Error;
pub use network::application::thingspeak::{Client, Config, FeedRecord, FieldBuffer, Handler};
pub use status::Status;
