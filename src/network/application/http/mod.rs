//! HTTP/1.1 protocol support for embedded systems.
//!
//! This module holds the two halves of a single HTTP exchange as the feed
//! client uses it. Neither half owns a connection or a buffer for the whole
//! request; both borrow the transport for the duration of a call.
//!
//! # Features
//!
//! - Request heads and form bodies streamed through `core::fmt`
//! - Exact `Content-Length` computed without rendering into memory
//! - Non-blocking response parsing with a per-phase timeout
//! - Fixed-size body buffer for predictable memory usage
//!
//! # Usage
//!
//! ```rust
//! use core::fmt::Write as _;
//! use tsfeed::network::application::http::request::{Method, RequestHead, rendered_len};
//!
//! let body = "field1=23.5&headers=false";
//! let head = RequestHead {
//!     method: Method::Post,
//!     path: "/update",
//!     host: "api.thingspeak.com",
//!     user_agent: "tsfeed/0.1.0",
//!     api_key: None,
//!     form_length: Some(rendered_len(body)),
//! };
//!
//! let mut out: heapless::String<256> = heapless::String::new();
//! write!(out, "{}{}", head, body).unwrap();
//! assert!(out.ends_with("Content-Length: 25\r\n\r\nfield1=23.5&headers=false"));
//! ```

/// Request line, headers and the writers that stream them.
pub mod request;

/// Incremental response reader.
///
/// Contains [`Exchange`](exchange::Exchange), which parses the status line,
/// headers and body as the transport buffers them.
pub mod exchange;
