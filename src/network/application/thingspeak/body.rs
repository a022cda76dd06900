//! Form bodies and request paths for the channel endpoints.
//!
//! Everything here implements [`Display`](core::fmt::Display) so it can be
//! measured with [`rendered_len`] and then streamed into the transport
//! without an intermediate buffer. Values are sent exactly as given; callers
//! that need URL encoding must apply it themselves.

use super::fields::FieldBuffer;
use crate::network::application::http::request::rendered_len;
use core::fmt;

/// Appended to every update so the server answers with the bare entry id.
pub const HEADERS_SUFFIX: &str = "&headers=false";

/// Path every update is posted to.
pub const UPDATE_PATH: &str = "/update";

/// Form body of a multi-field update.
///
/// ```rust
/// use tsfeed::network::application::thingspeak::{FieldBuffer, body::FieldsForm};
///
/// let mut pending = FieldBuffer::new();
/// pending.set_field(1, "10").unwrap();
/// pending.set_field(3, "20").unwrap();
/// pending.set_latitude(51.5);
///
/// let form = FieldsForm(&pending);
/// assert_eq!(form.to_string(), "field1=10&field3=20&lat=51.50&headers=false");
/// assert_eq!(form.content_length(), 43);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct FieldsForm<'a>(pub &'a FieldBuffer);

impl FieldsForm<'_> {
    /// Exact body length; `0` when nothing is set.
    pub fn content_length(&self) -> usize {
        if self.0.is_empty() {
            0
        } else {
            rendered_len(self)
        }
    }
}

impl fmt::Display for FieldsForm<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let pending = self.0;
        let mut pairs = Pairs::new(f);
        for (field, value) in pending.iter_set() {
            pairs.next()?;
            write!(pairs.f, "field{}={}", field, value)?;
        }
        if let Some(latitude) = pending.latitude() {
            pairs.next()?;
            write!(pairs.f, "lat={:.2}", latitude)?;
        }
        if let Some(longitude) = pending.longitude() {
            pairs.next()?;
            write!(pairs.f, "long={:.2}", longitude)?;
        }
        if let Some(elevation) = pending.elevation() {
            pairs.next()?;
            write!(pairs.f, "elevation={:.2}", elevation)?;
        }
        if let Some(status) = pending.status() {
            pairs.next()?;
            write!(pairs.f, "status={}", status)?;
        }
        if let Some(twitter) = pending.twitter() {
            pairs.next()?;
            write!(pairs.f, "twitter={}", twitter)?;
        }
        if let Some(tweet) = pending.tweet() {
            pairs.next()?;
            write!(pairs.f, "tweet={}", tweet)?;
        }
        if let Some(created_at) = pending.created_at() {
            pairs.next()?;
            write!(pairs.f, "created_at={}", created_at)?;
        }
        pairs.f.write_str(HEADERS_SUFFIX)
    }
}

/// Writes the `&` between pairs, but not before the first one.
struct Pairs<'a, 'b> {
    f: &'a mut fmt::Formatter<'b>,
    first: bool,
}

impl<'a, 'b> Pairs<'a, 'b> {
    fn new(f: &'a mut fmt::Formatter<'b>) -> Self {
        Self { f, first: true }
    }

    fn next(&mut self) -> fmt::Result {
        if self.first {
            self.first = false;
            Ok(())
        } else {
            self.f.write_str("&")
        }
    }
}

/// Form body of a single-field update, the value already rendered.
#[derive(Debug, Clone, Copy)]
pub struct FieldForm<'a> {
    pub field: u8,
    pub value: &'a str,
}

impl fmt::Display for FieldForm<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "field{}={}{}", self.field, self.value, HEADERS_SUFFIX)
    }
}

/// A caller-supplied, already URL-encoded update body.
#[derive(Debug, Clone, Copy)]
pub struct RawForm<'a>(pub &'a str);

impl fmt::Display for RawForm<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)?;
        f.write_str(HEADERS_SUFFIX)
    }
}

/// What a read asks for, relative to the channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadPath<'a> {
    /// Latest value of one field.
    FieldLast(u8),
    /// Latest entry.
    FeedLast,
    /// Latest entry including its status.
    FeedLastWithStatus,
    /// Latest entry including its status and location.
    FeedLastWithStatusAndLocation,
    /// Anything else, starting with `/`.
    Raw(&'a str),
}

impl fmt::Display for ReadPath<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReadPath::FieldLast(field) => write!(f, "/fields/{}/last", field),
            ReadPath::FeedLast => f.write_str("/feeds/last.txt"),
            ReadPath::FeedLastWithStatus => f.write_str("/feeds/last.txt?status=true"),
            ReadPath::FeedLastWithStatusAndLocation => {
                f.write_str("/feeds/last.txt?status=true&location=true")
            }
            ReadPath::Raw(suffix) => f.write_str(suffix),
        }
    }
}

/// Full path of a read request.
#[derive(Debug, Clone, Copy)]
pub struct ChannelPath<'a> {
    pub channel: u32,
    pub read: ReadPath<'a>,
}

impl fmt::Display for ChannelPath<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/channels/{}{}", self.channel, self.read)
    }
}
