//! Poll-driven channel client.
//!
//! Every public operation does its synchronous part (validation, connect,
//! sending the request) before returning, and leaves the waiting to steps on
//! a [`Scheduler`]. The application then calls [`Client::poll`] from its main
//! loop; each call advances exactly one step and never blocks. When the last
//! step of an operation runs, the matching [`Handler`] callback fires.
//!
//! A successful write schedules three steps:
//!
//! ```text
//!   AwaitHead      headers parsed?   ──▶ AwaitBody ── body complete? ──┐
//!   FinishWrite    drain, check the entry id, close   ◀────────────────┘
//!   Complete       on_write_*(status)
//! ```
//!
//! Reads are the same with `FinishRead` in the middle. Operations that fail
//! before anything was sent only schedule `Complete`, so the callback still
//! arrives from inside a poll.

use super::body::{ChannelPath, FieldForm, FieldsForm, RawForm, ReadPath, UPDATE_PATH};
use super::config::Config;
use super::convert::{parse_float, parse_int, parse_long};
use super::feed::FeedRecord;
use super::fields::{FieldBuffer, FieldValue, valid_field};
use super::json::value_by_key;
use crate::error::Error;
use crate::network::Transport;
use crate::network::application::http::exchange::Exchange;
use crate::network::application::http::request::{
    Header, Method, RequestHead, WireWriter, rendered_len,
};
use crate::status::Status;
use crate::system::scheduler::{Resume, Scheduler};
use crate::time::Clock;
use core::fmt::{self, Write as _};
use core::task::Poll;

/// Deepest the step stack gets: completion, cleanup and one wait.
pub const STEP_DEPTH: usize = 3;

/// Completion callbacks, one per operation kind.
///
/// Every method has an empty default so an application only implements the
/// ones it cares about. Callbacks run inside [`Client::poll`] and receive no
/// handle on the client, so they cannot start another operation; do that
/// from the main loop once the client is idle.
pub trait Handler {
    fn on_write_field(&mut self, _status: Status) {}

    fn on_write_fields(&mut self, _status: Status) {}

    fn on_write_raw(&mut self, _status: Status) {}

    /// Raw response body, or `""` when the read failed.
    fn on_read_raw(&mut self, _body: &str) {}

    fn on_read_string_field(&mut self, _value: &str) {}

    fn on_read_float_field(&mut self, _value: f32) {}

    fn on_read_long_field(&mut self, _value: i64) {}

    fn on_read_int_field(&mut self, _value: i32) {}

    fn on_read_status(&mut self, _status: &str) {}

    fn on_read_created_at(&mut self, _created_at: &str) {}

    /// The snapshot is available through [`Client::feed`] when `status` is
    /// ok; it is left untouched otherwise.
    fn on_read_multiple_fields(&mut self, _status: Status) {}
}

impl Handler for () {}

impl<H: Handler + ?Sized> Handler for &mut H {
    fn on_write_field(&mut self, status: Status) {
        (**self).on_write_field(status)
    }

    fn on_write_fields(&mut self, status: Status) {
        (**self).on_write_fields(status)
    }

    fn on_write_raw(&mut self, status: Status) {
        (**self).on_write_raw(status)
    }

    fn on_read_raw(&mut self, body: &str) {
        (**self).on_read_raw(body)
    }

    fn on_read_string_field(&mut self, value: &str) {
        (**self).on_read_string_field(value)
    }

    fn on_read_float_field(&mut self, value: f32) {
        (**self).on_read_float_field(value)
    }

    fn on_read_long_field(&mut self, value: i64) {
        (**self).on_read_long_field(value)
    }

    fn on_read_int_field(&mut self, value: i32) {
        (**self).on_read_int_field(value)
    }

    fn on_read_status(&mut self, status: &str) {
        (**self).on_read_status(status)
    }

    fn on_read_created_at(&mut self, created_at: &str) {
        (**self).on_read_created_at(created_at)
    }

    fn on_read_multiple_fields(&mut self, status: Status) {
        (**self).on_read_multiple_fields(status)
    }
}

/// The public operations, as reported by [`Client::in_flight`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Operation {
    WriteField,
    WriteFields,
    WriteRaw,
    ReadRaw,
    ReadStringField,
    ReadFloatField,
    ReadLongField,
    ReadIntField,
    ReadStatus,
    ReadCreatedAt,
    ReadMultipleFields,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    AwaitHead,
    AwaitBody,
    FinishRead,
    FinishWrite,
    Complete(Operation),
}

/// Non-blocking client for one channel service.
///
/// # Examples
///
/// ```rust
/// use tsfeed::network::application::thingspeak::{Client, Handler};
/// use tsfeed::network::prelude::*;
/// use tsfeed::time::Clock;
/// use tsfeed::{Error, Status};
/// # struct Offline;
/// # impl Connect for Offline {
/// #     type Error = ();
/// #     fn connect(&mut self, _: &str, _: u16) -> Result<(), ()> { Err(()) }
/// # }
/// # impl Read for Offline {
/// #     type Error = ();
/// #     fn available(&mut self) -> usize { 0 }
/// #     fn read(&mut self, _: &mut [u8]) -> Result<usize, ()> { Ok(0) }
/// # }
/// # impl Write for Offline {
/// #     type Error = ();
/// #     fn write(&mut self, buf: &[u8]) -> Result<usize, ()> { Ok(buf.len()) }
/// #     fn flush(&mut self) -> Result<(), ()> { Ok(()) }
/// # }
/// # impl Close for Offline {
/// #     type Error = ();
/// #     fn close(&mut self) -> Result<(), ()> { Ok(()) }
/// # }
/// # impl Transport for Offline {}
/// # struct Millis;
/// # impl Clock for Millis { fn now_ms(&self) -> u64 { 0 } }
///
/// #[derive(Default)]
/// struct Report(Option<Status>);
///
/// impl Handler for Report {
///     fn on_write_fields(&mut self, status: Status) {
///         self.0 = Some(status);
///     }
/// }
///
/// let mut client = Client::with_handler(Offline, Millis, Report::default());
/// client.set_field(1, &21.5f32).unwrap();
/// client.set_status("warming up").unwrap();
/// client.write_fields(12345, "WRITEKEY").unwrap();
///
/// // A second operation is refused until the first one completes.
/// assert_eq!(client.write_fields(12345, "WRITEKEY"), Err(Error::Busy));
///
/// while client.poll() {}
/// assert_eq!(client.handler().0, Some(Status::Failed(Error::ConnectFailed)));
/// ```
#[derive(Debug)]
pub struct Client<T, K, H = ()> {
    steps: Scheduler<Step, STEP_DEPTH>,
    pending: FieldBuffer,
    inner: Inner<T, K, H>,
}

/// Everything a step can touch.
#[derive(Debug)]
struct Inner<T, K, H> {
    transport: T,
    clock: K,
    handler: H,
    config: Config,
    feed: FeedRecord,
    status: Status,
    exchange: Exchange,
}

impl<T: Transport, K: Clock> Client<T, K> {
    /// Creates a client with the default [`Config`] and no callbacks.
    pub fn new(transport: T, clock: K) -> Self {
        Self::with_handler(transport, clock, ())
    }
}

impl<T: Transport, K: Clock, H: Handler> Client<T, K, H> {
    pub fn with_handler(transport: T, clock: K, handler: H) -> Self {
        let config = Config::default();
        Self {
            steps: Scheduler::new(),
            pending: FieldBuffer::new(),
            inner: Inner {
                transport,
                clock,
                handler,
                config,
                feed: FeedRecord::default(),
                status: Status::Ok,
                exchange: Exchange::new(config.response_timeout_ms),
            },
        }
    }

    /// Replaces the configuration. Takes effect from the next operation.
    pub fn with_config(mut self, config: Config) -> Self {
        self.inner.config = config;
        self.inner.exchange = Exchange::new(config.response_timeout_ms);
        self
    }

    /// Runs one pending step.
    ///
    /// Returns `false` when there was nothing to do.
    pub fn poll(&mut self) -> bool {
        self.steps.poll(&mut self.inner)
    }

    /// Status of the most recently completed operation.
    pub fn last_status(&self) -> Status {
        self.inner.status
    }

    /// Returns `true` while an operation is in flight.
    pub fn is_busy(&self) -> bool {
        !self.steps.is_empty()
    }

    /// The operation in flight, if any.
    pub fn in_flight(&self) -> Option<Operation> {
        // The completion step is always at the bottom of the stack.
        match self.steps.bottom() {
            Some(Step::Complete(operation)) => Some(operation),
            _ => None,
        }
    }

    /// Number of steps still to run.
    pub fn pending_steps(&self) -> usize {
        self.steps.len()
    }

    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    /// Values queued for the next [`write_fields`](Client::write_fields).
    pub fn pending(&self) -> &FieldBuffer {
        &self.pending
    }

    /// Snapshot filled by the last successful
    /// [`read_multiple_fields`](Client::read_multiple_fields).
    pub fn feed(&self) -> &FeedRecord {
        &self.inner.feed
    }

    pub fn transport(&self) -> &T {
        &self.inner.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.inner.transport
    }

    pub fn clock(&self) -> &K {
        &self.inner.clock
    }

    pub fn handler(&self) -> &H {
        &self.inner.handler
    }

    pub fn handler_mut(&mut self) -> &mut H {
        &mut self.inner.handler
    }

    pub fn into_parts(self) -> (T, K, H) {
        (self.inner.transport, self.inner.clock, self.inner.handler)
    }

    /// Queues a value for field `field` (1 to 8).
    pub fn set_field<V: FieldValue + ?Sized>(&mut self, field: u8, value: &V) -> Result<(), Error> {
        self.pending.set_field(field, value)
    }

    pub fn set_latitude(&mut self, latitude: f32) {
        self.pending.set_latitude(latitude)
    }

    pub fn set_longitude(&mut self, longitude: f32) {
        self.pending.set_longitude(longitude)
    }

    pub fn set_elevation(&mut self, elevation: f32) {
        self.pending.set_elevation(elevation)
    }

    pub fn set_status(&mut self, status: &str) -> Result<(), Error> {
        self.pending.set_status(status)
    }

    pub fn set_twitter_tweet(&mut self, twitter: &str, tweet: &str) -> Result<(), Error> {
        self.pending.set_twitter_tweet(twitter, tweet)
    }

    pub fn set_created_at(&mut self, created_at: &str) -> Result<(), Error> {
        self.pending.set_created_at(created_at)
    }

    /// Writes one value to one field.
    ///
    /// Queued values are discarded once the request is attempted.
    pub fn write_field<V: FieldValue + ?Sized>(
        &mut self,
        channel: u32,
        field: u8,
        value: &V,
        write_key: &str,
    ) -> Result<(), Error> {
        self.begin()?;
        debug!("write field {=u8} of channel {=u32}", field, channel);
        if !valid_field(field) {
            self.reject(Operation::WriteField, Error::InvalidFieldNumber);
            return Ok(());
        }
        let value = match value.to_value() {
            Ok(value) => value,
            Err(error) => {
                self.reject(Operation::WriteField, error);
                return Ok(());
            }
        };
        let form = FieldForm {
            field,
            value: &value,
        };
        self.inner
            .start_write(&mut self.steps, Operation::WriteField, form, write_key);
        self.pending.clear();
        Ok(())
    }

    /// Sends every queued value as one update and clears the queue.
    pub fn write_fields(&mut self, channel: u32, write_key: &str) -> Result<(), Error> {
        self.begin()?;
        debug!("write queued fields of channel {=u32}", channel);
        if self.pending.is_empty() {
            self.reject(Operation::WriteFields, Error::FieldsNotSet);
            return Ok(());
        }
        let form = FieldsForm(&self.pending);
        self.inner
            .start_write(&mut self.steps, Operation::WriteFields, form, write_key);
        self.pending.clear();
        Ok(())
    }

    /// Posts an already URL-encoded update such as `field1=1&status=ok`.
    pub fn write_raw(&mut self, channel: u32, payload: &str, write_key: &str) -> Result<(), Error> {
        self.begin()?;
        debug!("write raw update to channel {=u32}", channel);
        self.inner
            .start_write(&mut self.steps, Operation::WriteRaw, RawForm(payload), write_key);
        self.pending.clear();
        Ok(())
    }

    /// Reads `/channels/{channel}{suffix}` and hands the body to
    /// [`Handler::on_read_raw`].
    pub fn read_raw(&mut self, channel: u32, suffix: &str, read_key: Option<&str>) -> Result<(), Error> {
        self.read(Operation::ReadRaw, channel, ReadPath::Raw(suffix), read_key)
    }

    pub fn read_string_field(&mut self, channel: u32, field: u8, read_key: Option<&str>) -> Result<(), Error> {
        self.read_field(Operation::ReadStringField, channel, field, read_key)
    }

    /// Reads a field as `f32`; text reads as `0.0`.
    pub fn read_float_field(&mut self, channel: u32, field: u8, read_key: Option<&str>) -> Result<(), Error> {
        self.read_field(Operation::ReadFloatField, channel, field, read_key)
    }

    /// Reads a field as `i64`; text reads as `0`.
    pub fn read_long_field(&mut self, channel: u32, field: u8, read_key: Option<&str>) -> Result<(), Error> {
        self.read_field(Operation::ReadLongField, channel, field, read_key)
    }

    /// Reads a field as `i32`, clamped; text reads as `0`.
    pub fn read_int_field(&mut self, channel: u32, field: u8, read_key: Option<&str>) -> Result<(), Error> {
        self.read_field(Operation::ReadIntField, channel, field, read_key)
    }

    /// Reads the status text of the latest entry.
    pub fn read_status(&mut self, channel: u32, read_key: Option<&str>) -> Result<(), Error> {
        self.read(
            Operation::ReadStatus,
            channel,
            ReadPath::FeedLastWithStatus,
            read_key,
        )
    }

    /// Reads the timestamp of the latest entry.
    pub fn read_created_at(&mut self, channel: u32, read_key: Option<&str>) -> Result<(), Error> {
        self.read(Operation::ReadCreatedAt, channel, ReadPath::FeedLast, read_key)
    }

    /// Reads the whole latest entry into [`Client::feed`] in one round trip.
    pub fn read_multiple_fields(&mut self, channel: u32, read_key: Option<&str>) -> Result<(), Error> {
        self.read(
            Operation::ReadMultipleFields,
            channel,
            ReadPath::FeedLastWithStatusAndLocation,
            read_key,
        )
    }

    /// Resolves to the final status once the operation in flight completes.
    ///
    /// The future drives [`poll`](Client::poll) itself and asks to be woken
    /// again after every step.
    #[cfg(feature = "async")]
    pub fn completion(&mut self) -> Completion<'_, T, K, H> {
        Completion { client: self }
    }

    fn read_field(
        &mut self,
        operation: Operation,
        channel: u32,
        field: u8,
        read_key: Option<&str>,
    ) -> Result<(), Error> {
        if !valid_field(field) {
            self.begin()?;
            self.reject(operation, Error::InvalidFieldNumber);
            return Ok(());
        }
        self.read(operation, channel, ReadPath::FieldLast(field), read_key)
    }

    fn read(
        &mut self,
        operation: Operation,
        channel: u32,
        read: ReadPath<'_>,
        read_key: Option<&str>,
    ) -> Result<(), Error> {
        self.begin()?;
        debug!("read from channel {=u32}", channel);
        let path = ChannelPath { channel, read };
        self.inner
            .start_read(&mut self.steps, operation, path, read_key);
        Ok(())
    }

    fn begin(&mut self) -> Result<(), Error> {
        if self.is_busy() {
            warn!("operation refused, another one is in flight");
            return Err(Error::Busy);
        }
        self.inner.exchange.reset();
        Ok(())
    }

    fn reject(&mut self, operation: Operation, error: Error) {
        debug!("operation rejected: {}", error);
        self.inner.status = error.into();
        schedule(&mut self.steps, &[Step::Complete(operation)]);
    }
}

fn schedule(steps: &mut Scheduler<Step, STEP_DEPTH>, chain: &[Step]) {
    for step in chain {
        // Chains start on an empty stack and never exceed STEP_DEPTH.
        let _ = steps.push(*step);
    }
}

impl<T: Transport, K: Clock, H: Handler> Inner<T, K, H> {
    fn start_write<B: fmt::Display>(
        &mut self,
        steps: &mut Scheduler<Step, STEP_DEPTH>,
        operation: Operation,
        form: B,
        write_key: &str,
    ) {
        match self.send(Method::Post, UPDATE_PATH, Some(write_key), Some(form)) {
            Ok(()) => schedule(
                steps,
                &[Step::Complete(operation), Step::FinishWrite, Step::AwaitHead],
            ),
            Err(error) => {
                self.status = error.into();
                schedule(steps, &[Step::Complete(operation)]);
            }
        }
    }

    fn start_read(
        &mut self,
        steps: &mut Scheduler<Step, STEP_DEPTH>,
        operation: Operation,
        path: ChannelPath<'_>,
        read_key: Option<&str>,
    ) {
        match self.send(Method::Get, path, read_key, None::<&str>) {
            Ok(()) => schedule(
                steps,
                &[Step::Complete(operation), Step::FinishRead, Step::AwaitHead],
            ),
            Err(error) => {
                self.status = error.into();
                schedule(steps, &[Step::Complete(operation)]);
            }
        }
    }

    /// Connects, streams the request and starts the response clock.
    fn send<P: fmt::Display, B: fmt::Display>(
        &mut self,
        method: Method,
        path: P,
        api_key: Option<&str>,
        form: Option<B>,
    ) -> Result<(), Error> {
        if self
            .transport
            .connect(self.config.host, self.config.port)
            .is_err()
        {
            warn!("failed to connect to {=str}", self.config.host);
            return Err(Error::ConnectFailed);
        }

        let head = RequestHead {
            method,
            path,
            host: self.config.host,
            user_agent: self.config.user_agent,
            api_key: api_key.map(|value| Header {
                name: self.config.api_key_header,
                value,
            }),
            form_length: form.as_ref().map(rendered_len),
        };
        let mut wire = WireWriter::new(&mut self.transport);
        let sent = match &form {
            Some(form) => write!(wire, "{}{}", head, form),
            None => write!(wire, "{}", head),
        };
        trace!("request of {=usize} bytes written", wire.written());
        if sent.is_err() || self.transport.flush().is_err() {
            error!("transport failed while sending the request");
            self.exchange.drain(&mut self.transport);
            self.close();
            return Err(Error::UnexpectedFailure);
        }

        self.exchange.begin(self.clock.now_ms());
        Ok(())
    }

    fn close(&mut self) {
        if self.transport.close().is_err() {
            warn!("transport failed to close");
        }
    }

    fn complete(&mut self, operation: Operation) {
        let ok = self.status.is_ok();
        let body = self.exchange.body();
        let handler = &mut self.handler;
        match operation {
            Operation::WriteField => handler.on_write_field(self.status),
            Operation::WriteFields => handler.on_write_fields(self.status),
            Operation::WriteRaw => handler.on_write_raw(self.status),
            Operation::ReadRaw => handler.on_read_raw(body),
            Operation::ReadStringField => handler.on_read_string_field(body),
            Operation::ReadFloatField => handler.on_read_float_field(parse_float(body)),
            Operation::ReadLongField => handler.on_read_long_field(parse_long(body)),
            Operation::ReadIntField => handler.on_read_int_field(parse_int(body)),
            Operation::ReadStatus => {
                let status = if ok { value_by_key(body, "status") } else { "" };
                handler.on_read_status(status);
            }
            Operation::ReadCreatedAt => {
                let created_at = if ok { value_by_key(body, "created_at") } else { "" };
                handler.on_read_created_at(created_at);
            }
            Operation::ReadMultipleFields => {
                if ok {
                    self.feed = FeedRecord::from_json(body);
                }
                handler.on_read_multiple_fields(self.status);
            }
        }
    }
}

impl<T: Transport, K: Clock, H: Handler> Resume<Step, STEP_DEPTH> for Inner<T, K, H> {
    fn resume(&mut self, step: Step, steps: &mut Scheduler<Step, STEP_DEPTH>) {
        match step {
            Step::AwaitHead => {
                let now = self.clock.now_ms();
                match self.exchange.poll_head(&mut self.transport, now) {
                    Poll::Pending => {}
                    Poll::Ready(Ok(())) => {
                        self.status = Status::Ok;
                        steps.replace(Step::AwaitBody);
                    }
                    Poll::Ready(Err(status)) => {
                        debug!("exchange ended early: {}", status);
                        self.status = status;
                        steps.pop();
                    }
                }
            }
            Step::AwaitBody => {
                let now = self.clock.now_ms();
                match self.exchange.poll_body(&mut self.transport, now) {
                    Poll::Pending => {}
                    Poll::Ready(result) => {
                        if let Err(status) = result {
                            self.status = status;
                        }
                        steps.pop();
                    }
                }
            }
            Step::FinishRead => {
                self.exchange.drain(&mut self.transport);
                self.close();
                if !self.status.is_ok() {
                    self.exchange.clear_body();
                }
                steps.pop();
            }
            Step::FinishWrite => {
                self.exchange.drain(&mut self.transport);
                if self.status.is_ok() && parse_long(self.exchange.body()) == 0 {
                    warn!("server did not insert the point");
                    self.status = Error::NotInserted.into();
                }
                self.close();
                steps.pop();
            }
            Step::Complete(operation) => {
                steps.pop();
                trace!("operation complete: {}", operation);
                self.complete(operation);
            }
        }
    }
}

/// Future returned by [`Client::completion`].
#[cfg(feature = "async")]
#[derive(Debug)]
pub struct Completion<'a, T, K, H> {
    client: &'a mut Client<T, K, H>,
}

#[cfg(feature = "async")]
impl<T: Transport, K: Clock, H: Handler> core::future::Future for Completion<'_, T, K, H> {
    type Output = Status;

    fn poll(
        self: core::pin::Pin<&mut Self>,
        cx: &mut core::task::Context<'_>,
    ) -> Poll<Self::Output> {
        let this = self.get_mut();
        this.client.poll();
        if this.client.is_busy() {
            cx.waker().wake_by_ref();
            Poll::Pending
        } else {
            Poll::Ready(this.client.last_status())
        }
    }
}
