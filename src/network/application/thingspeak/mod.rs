//! Channel feed client for memory-constrained devices.
//!
//! A channel holds up to eight fields plus a location, a status text and a
//! timestamp per entry. This module writes entries and reads the latest one
//! back without ever blocking the caller: operations return as soon as the
//! request is on the wire and complete later through [`Handler`] callbacks
//! while the application keeps calling [`Client::poll`].
//!
//! # Result codes
//!
//! Every operation ends in a [`Status`](crate::Status): `200` on success,
//! another HTTP status passed through from the server (`400` bad key, `404`
//! unknown channel), or one of the library errors in [`Error`](crate::Error).
//!
//! # Usage
//!
//! ```rust,no_run
//! # #[cfg(feature = "std")]
//! # fn main() {
//! use tsfeed::network::application::thingspeak::{Client, Handler};
//! use tsfeed::network::tcp::TcpTransport;
//! use tsfeed::time::StdClock;
//! use tsfeed::Status;
//!
//! struct Print;
//!
//! impl Handler for Print {
//!     fn on_write_fields(&mut self, status: Status) {
//!         println!("update finished: {}", status);
//!     }
//! }
//!
//! let mut client = Client::with_handler(TcpTransport::new(), StdClock::new(), Print);
//! client.set_field(1, &23.5f32).unwrap();
//! client.set_field(2, "dry").unwrap();
//! client.write_fields(12345, "WRITEKEY").unwrap();
//!
//! while client.poll() {
//!     // other work
//! }
//! # }
//! # #[cfg(not(feature = "std"))]
//! # fn main() {}
//! ```

/// Form bodies and request paths.
pub mod body;

/// Client, callbacks and operation steps.
pub mod client;

/// Server endpoint and timeout settings.
pub mod config;

/// Lenient text-to-number conversions.
pub mod convert;

/// Snapshot of the latest channel entry.
pub mod feed;

/// Values queued for a multi-field update.
pub mod fields;

/// Flat JSON string lookup.
pub mod json;

pub use client::{Client, Handler, Operation, STEP_DEPTH};
#[cfg(feature = "async")]
pub use client::Completion;
pub use config::Config;
pub use feed::FeedRecord;
pub use fields::{FIELD_MAX, FIELD_MIN, FieldBuffer, FieldValue, MAX_VALUE_LEN};
