//! Values waiting to be sent by the next multi-field update.

use crate::error::Error;
use core::fmt::Write as _;
use heapless::String;

/// Lowest valid field number.
pub const FIELD_MIN: u8 = 1;

/// Highest valid field number.
pub const FIELD_MAX: u8 = 8;

/// Number of fields in a channel.
pub const FIELD_COUNT: usize = FIELD_MAX as usize;

/// Longest value the server accepts for one field, in UTF-8 bytes.
pub const MAX_VALUE_LEN: usize = 255;

/// Largest magnitude a finite float may have before it is rejected.
pub const FLOAT_LIMIT: f64 = 999_999_000_000.0;

/// A field value as it goes on the wire.
pub type Value = String<MAX_VALUE_LEN>;

/// Something that can be written into a channel field.
///
/// Strings are taken as is. Integers are rendered in decimal and floats with
/// five decimals, after a range check against [`FLOAT_LIMIT`].
///
/// ```rust
/// use tsfeed::Error;
/// use tsfeed::network::application::thingspeak::FieldValue;
///
/// assert_eq!(23.5f32.to_value().unwrap().as_str(), "23.50000");
/// assert_eq!((-7i32).to_value().unwrap().as_str(), "-7");
/// assert_eq!(1.0e13f64.to_value(), Err(Error::OutOfRange));
/// ```
pub trait FieldValue {
    /// Renders the value, or fails with [`Error::OutOfRange`].
    fn to_value(&self) -> Result<Value, Error>;
}

impl FieldValue for str {
    fn to_value(&self) -> Result<Value, Error> {
        bounded(self)
    }
}

impl<V: FieldValue + ?Sized> FieldValue for &V {
    fn to_value(&self) -> Result<Value, Error> {
        (**self).to_value()
    }
}

impl<const N: usize> FieldValue for String<N> {
    fn to_value(&self) -> Result<Value, Error> {
        bounded(self.as_str())
    }
}

macro_rules! integer_field_value {
    ($($ty:ty),*) => {
        $(
            impl FieldValue for $ty {
                fn to_value(&self) -> Result<Value, Error> {
                    let mut value = Value::new();
                    write!(value, "{}", self).map_err(|_| Error::OutOfRange)?;
                    Ok(value)
                }
            }
        )*
    };
}

integer_field_value!(i16, i32, i64, u8, u16, u32, u64);

impl FieldValue for f64 {
    fn to_value(&self) -> Result<Value, Error> {
        if self.is_finite() && (*self > FLOAT_LIMIT || *self < -FLOAT_LIMIT) {
            return Err(Error::OutOfRange);
        }
        let mut value = Value::new();
        write!(value, "{:.5}", self).map_err(|_| Error::OutOfRange)?;
        Ok(value)
    }
}

impl FieldValue for f32 {
    fn to_value(&self) -> Result<Value, Error> {
        f64::from(*self).to_value()
    }
}

/// Copies `text` into a [`Value`] if it fits.
pub(crate) fn bounded(text: &str) -> Result<Value, Error> {
    let mut value = Value::new();
    value.push_str(text).map_err(|_| Error::OutOfRange)?;
    Ok(value)
}

pub(crate) const fn valid_field(field: u8) -> bool {
    field >= FIELD_MIN && field <= FIELD_MAX
}

/// Pending values for the next multi-field update.
///
/// An empty string counts as "not set" and a NaN coordinate is omitted.
/// Every setter validates before touching the buffer, so a failed call leaves
/// it exactly as it was.
#[derive(Debug, Clone)]
pub struct FieldBuffer {
    fields: [Value; FIELD_COUNT],
    latitude: f32,
    longitude: f32,
    elevation: f32,
    status: Value,
    twitter: Value,
    tweet: Value,
    created_at: Value,
}

impl FieldBuffer {
    pub const fn new() -> Self {
        Self {
            fields: [const { Value::new() }; FIELD_COUNT],
            latitude: f32::NAN,
            longitude: f32::NAN,
            elevation: f32::NAN,
            status: Value::new(),
            twitter: Value::new(),
            tweet: Value::new(),
            created_at: Value::new(),
        }
    }

    /// Sets field `field` (1 to 8).
    pub fn set_field<V: FieldValue + ?Sized>(&mut self, field: u8, value: &V) -> Result<(), Error> {
        if !valid_field(field) {
            return Err(Error::InvalidFieldNumber);
        }
        let value = value.to_value()?;
        self.fields[usize::from(field - FIELD_MIN)] = value;
        Ok(())
    }

    /// Degrees north; negative values are south.
    pub fn set_latitude(&mut self, latitude: f32) {
        self.latitude = latitude;
    }

    /// Degrees east; negative values are west.
    pub fn set_longitude(&mut self, longitude: f32) {
        self.longitude = longitude;
    }

    /// Meters above sea level.
    pub fn set_elevation(&mut self, elevation: f32) {
        self.elevation = elevation;
    }

    pub fn set_status(&mut self, status: &str) -> Result<(), Error> {
        self.status = bounded(status)?;
        Ok(())
    }

    /// Sets the account and message of a post published alongside the update.
    ///
    /// Neither value is stored unless both fit.
    pub fn set_twitter_tweet(&mut self, twitter: &str, tweet: &str) -> Result<(), Error> {
        let twitter = bounded(twitter)?;
        let tweet = bounded(tweet)?;
        self.twitter = twitter;
        self.tweet = tweet;
        Ok(())
    }

    /// Overrides the server-side timestamp of the update (ISO 8601).
    pub fn set_created_at(&mut self, created_at: &str) -> Result<(), Error> {
        self.created_at = bounded(created_at)?;
        Ok(())
    }

    /// The value set for `field`, or `""`.
    pub fn field(&self, field: u8) -> &str {
        if valid_field(field) {
            self.fields[usize::from(field - FIELD_MIN)].as_str()
        } else {
            ""
        }
    }

    /// Fields that are set, as `(number, value)` pairs in ascending order.
    pub fn iter_set(&self) -> impl Iterator<Item = (u8, &str)> + '_ {
        (FIELD_MIN..=FIELD_MAX)
            .zip(self.fields.iter())
            .filter(|(_, value)| !value.is_empty())
            .map(|(field, value)| (field, value.as_str()))
    }

    pub fn latitude(&self) -> Option<f32> {
        coordinate(self.latitude)
    }

    pub fn longitude(&self) -> Option<f32> {
        coordinate(self.longitude)
    }

    pub fn elevation(&self) -> Option<f32> {
        coordinate(self.elevation)
    }

    pub fn status(&self) -> Option<&str> {
        non_empty(&self.status)
    }

    pub fn twitter(&self) -> Option<&str> {
        non_empty(&self.twitter)
    }

    pub fn tweet(&self) -> Option<&str> {
        non_empty(&self.tweet)
    }

    pub fn created_at(&self) -> Option<&str> {
        non_empty(&self.created_at)
    }

    /// Returns `true` when a multi-field update would have nothing to send.
    pub fn is_empty(&self) -> bool {
        self.iter_set().next().is_none()
            && self.latitude().is_none()
            && self.longitude().is_none()
            && self.elevation().is_none()
            && self.status().is_none()
            && self.twitter().is_none()
            && self.tweet().is_none()
            && self.created_at().is_none()
    }

    pub fn clear(&mut self) {
        *self = Self::new();
    }
}

impl Default for FieldBuffer {
    fn default() -> Self {
        Self::new()
    }
}

fn coordinate(value: f32) -> Option<f32> {
    if value.is_nan() { None } else { Some(value) }
}

fn non_empty(value: &Value) -> Option<&str> {
    if value.is_empty() {
        None
    } else {
        Some(value.as_str())
    }
}
