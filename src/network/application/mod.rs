//! # Application Layer Protocols
//!
//! Protocols built on top of the [`Transport`](crate::network::Transport)
//! traits.
//!
//! ## Available Protocols
//!
//! - **[`http`]**: HTTP/1.1 request rendering and a poll-driven response reader
//! - **[`thingspeak`]**: Channel feed client that writes and reads telemetry
//!
//! ## Design Principles
//!
//! - **Transport Agnostic**: Work with any type implementing
//!   [`Transport`](crate::network::Transport)
//! - **No-std Compatible**: Fixed-size buffers, no heap allocation
//! - **Never Blocking**: Every wait is expressed as a step that is polled
//!   again later

/// HTTP/1.1 building blocks.
///
/// Request heads are rendered straight into the transport and responses are
/// parsed incrementally as bytes arrive.
pub mod http;

/// Channel feed client.
///
/// Buffers field values, sends them as form-encoded updates and reads the
/// latest entries back, reporting every outcome through callbacks.
pub mod thingspeak;
