//! SMPTE ST 12-1 timecode values.
//!
//! A [`Timecode`] is a non-negative duration at nanosecond precision tagged
//! with the [`Rate`] used to assign its address labels. It provides:
//! - Parsing and formatting of `hh:mm:ss:ff` / `hh:mm:ss;ff` with an
//!   optional `@rate` suffix
//! - Frame number, second and millisecond conversion
//! - Arithmetic that clips to zero instead of going negative
//! - The packed 64-bit form used for storage and fast comparison
//!
//! A timecode parsed without a rate keeps its literal `h:m:s` and stores the
//! frame number in the nanosecond part. Frame and duration math is
//! meaningless for such values until a rate is assigned with
//! [`Timecode::set_rate`].

use crate::dropframe;
use crate::error::{Result, TimecodeError};
use crate::packed;
use crate::rate::{Rate, ID_UNKNOWN, ID_UNKNOWN_DF, ID_USER, NANOS_PER_SECOND};
use crate::smpte::SmpteTimecode;
#[cfg(feature = "serde")]
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::{Add, Sub};
use std::str::FromStr;
use std::time::Duration;
use tracing::warn;

/// Text form of the zero timecode.
pub const ORIGIN: &str = "00:00:00:00";

/// A timecode: a duration tagged with an edit rate.
#[derive(Debug, Clone, Copy)]
pub struct Timecode {
    rate: Rate,
    nanos: u64,
}

impl Timecode {
    /// Zero duration without a rate.
    pub const ZERO: Self = Self {
        rate: Rate::IDENTITY,
        nanos: 0,
    };

    /// Packed value marking an invalid timecode.
    pub const INVALID: u64 = packed::INVALID;

    /// Largest storable duration in nanoseconds.
    pub const MASK: u64 = packed::TIME_MASK;

    /// Create a timecode from a duration and a rate.
    ///
    /// The duration is clipped to the rate's frame interval before storage.
    #[must_use]
    pub fn new(duration: Duration, rate: Rate) -> Self {
        Self::from_nanos(i64::try_from(duration.as_nanos()).unwrap_or(i64::MAX), rate)
    }

    fn from_nanos(nanos: i64, rate: Rate) -> Self {
        let limit = packed::TIME_MASK as i64;
        let nanos = if nanos > limit {
            warn!("Duration of {} ns exceeds the timecode range, saturating", nanos);
            limit
        } else {
            nanos
        };
        let nanos = rate.truncate_nanos(nanos, 2).clamp(0, limit);
        Self {
            rate,
            nanos: nanos as u64,
        }
    }

    /// Parse a timecode of form `hh:mm:ss:ff[@rate]`.
    ///
    /// A `;` anywhere in the text marks a drop-frame timecode. Without a rate
    /// suffix the frame number is kept as a raw nanosecond value until
    /// [`Timecode::set_rate`] is called. With a suffix the segments count
    /// nominal frames at the rate, and drop-frame labels are mapped back to
    /// the true frame number. Empty text parses as [`ORIGIN`].
    ///
    /// Fewer than four segments are accepted and fill from the hours side.
    pub fn parse(text: &str) -> Result<Self> {
        let text = if text.is_empty() { ORIGIN } else { text };
        let is_drop = text.contains(';');

        let (body, rate) = match text.split_once('@') {
            Some((body, rate)) => (body, Some(Rate::parse(rate)?)),
            None => (text, None),
        };

        let mut parts = [0u64; 4];
        for (i, segment) in body.split([':', ';']).enumerate() {
            let value = segment
                .parse::<u64>()
                .map_err(|_| TimecodeError::timecode_syntax(body))?;
            match parts.get_mut(i) {
                Some(part) => *part = value,
                None => return Err(TimecodeError::timecode_syntax(body)),
            }
        }
        let [hours, minutes, seconds, frames] = parts;

        match rate {
            Some(rate) => {
                let fps = rate.fps() as u64;
                let label = hours
                    .saturating_mul(3600)
                    .saturating_add(minutes.saturating_mul(60))
                    .saturating_add(seconds)
                    .saturating_mul(fps)
                    .saturating_add(frames);
                let frame = if is_drop {
                    dropframe::true_frame(label, &rate)
                } else {
                    label
                };
                Ok(Self::at_frame(frame, rate))
            }
            None => {
                let nanos = hours
                    .saturating_mul(3600)
                    .saturating_add(minutes.saturating_mul(60))
                    .saturating_add(seconds)
                    .saturating_mul(NANOS_PER_SECOND as u64)
                    .saturating_add(frames);
                let rate = if is_drop {
                    Rate::IDENTITY_DF
                } else {
                    Rate::IDENTITY
                };
                Ok(Self::from_nanos(
                    i64::try_from(nanos).unwrap_or(i64::MAX),
                    rate,
                ))
            }
        }
    }

    fn at_frame(frame: u64, rate: Rate) -> Self {
        let nanos = rate.frame_start(frame);
        Self::from_nanos(i64::try_from(nanos).unwrap_or(i64::MAX), rate)
    }

    /// Rebuild a timecode from its packed form.
    ///
    /// Returns `None` for [`Timecode::INVALID`]. A user-defined rate cannot
    /// be recovered from its tag, so such values come back with
    /// [`Rate::INVALID`] and keep their duration until a rate is assigned.
    #[must_use]
    pub fn from_bits(bits: u64) -> Option<Self> {
        let (id, nanos) = packed::unpack(bits)?;
        let rate = match id {
            ID_USER => Rate::INVALID,
            id => Rate::lookup(id).unwrap_or(Rate::IDENTITY),
        };
        Some(Self { rate, nanos })
    }

    /// The packed 64-bit form: rate tag in the top 5 bits, duration below.
    #[must_use]
    pub fn to_bits(&self) -> u64 {
        packed::pack(self.rate.id(), self.nanos)
    }

    /// Unpack an SMPTE BCD word. The result carries no rate yet.
    ///
    /// User bits are accepted but not interpreted.
    #[must_use]
    pub fn from_smpte(word: u32, user_bits: u32) -> Self {
        SmpteTimecode::new(word, user_bits).to_timecode()
    }

    /// Unpack an SMPTE BCD word and assign a rate given as frames per
    /// second. A zero, negative or NaN `fps` leaves the rate unset.
    #[must_use]
    pub fn from_smpte_with_rate(word: u32, user_bits: u32, fps: f32) -> Self {
        let tc = Self::from_smpte(word, user_bits);
        if fps.is_nan() || fps <= 0.0 {
            return tc;
        }
        tc.with_rate(Rate::from_float(fps))
    }

    /// Pack into an SMPTE BCD word with empty user bits.
    #[must_use]
    pub fn to_smpte(&self) -> SmpteTimecode {
        SmpteTimecode::from_timecode(self)
    }

    /// The timecode's edit rate.
    #[must_use]
    pub fn rate(&self) -> Rate {
        self.rate
    }

    /// The duration part of the timecode.
    #[must_use]
    pub fn duration(&self) -> Duration {
        Duration::from_nanos(self.nanos)
    }

    /// Whether the duration part is zero. The rate is not considered.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.nanos == 0
    }

    /// Assign a new rate.
    ///
    /// A timecode without a rate has its literal `h:m:s` and frame value
    /// read as a label at the new rate, with drop-frame labels mapped to the
    /// true frame number. A timecode that already has a rate keeps its
    /// frame number, so its duration changes with the rate.
    pub fn set_rate(&mut self, rate: Rate) {
        *self = match self.rate.id() {
            ID_UNKNOWN | ID_UNKNOWN_DF => {
                let seconds = self.nanos / NANOS_PER_SECOND as u64;
                let frames = self.nanos % NANOS_PER_SECOND as u64;
                let label = seconds
                    .saturating_mul(rate.fps() as u64)
                    .saturating_add(frames);
                Self::at_frame(dropframe::true_frame(label, &rate), rate)
            }
            _ if !self.rate.is_valid() => {
                Self::from_nanos(self.nanos as i64, rate)
            }
            _ => Self::at_frame(self.frame(), rate),
        };
    }

    /// Like [`Timecode::set_rate`], consuming and returning the value.
    #[must_use]
    pub fn with_rate(mut self, rate: Rate) -> Self {
        self.set_rate(rate);
        self
    }

    /// Move to frame number `frame`, keeping the current rate.
    pub fn set_frame(&mut self, frame: u64) {
        *self = Self::at_frame(frame, self.rate);
    }

    /// Like [`Timecode::set_frame`], consuming and returning the value.
    #[must_use]
    pub fn with_frame(mut self, frame: u64) -> Self {
        self.set_frame(frame);
        self
    }

    /// Frame number at the timecode's own rate.
    ///
    /// This is not a real frame count for a timecode without a rate.
    #[must_use]
    pub fn frame(&self) -> u64 {
        self.frame_at_rate(&self.rate)
    }

    /// Frame number of the timecode's duration at `rate`.
    ///
    /// A rate with a zero numerator counts one frame per nanosecond.
    #[must_use]
    pub fn frame_at_rate(&self, rate: &Rate) -> u64 {
        match rate.id() {
            // the frame within the current second is stored as nanoseconds
            ID_UNKNOWN | ID_UNKNOWN_DF => (rate.fps() as u64)
                .saturating_mul(self.nanos / NANOS_PER_SECOND as u64)
                .saturating_add(self.nanos % NANOS_PER_SECOND as u64),
            _ => rate.frame_at(self.nanos),
        }
    }

    /// Whole seconds covered by the timecode.
    ///
    /// Nearly all frame durations are periodic fractions (33.3666... ms at
    /// 29.97 fps) so durations carried in from elsewhere may fall a few
    /// nanoseconds short of the second. A 1 ms bias absorbs that.
    #[must_use]
    pub fn second(&self) -> u64 {
        (self.nanos as f64 / NANOS_PER_SECOND as f64 + 0.001).floor() as u64
    }

    /// Whole milliseconds covered by the timecode.
    #[must_use]
    pub fn millisecond(&self) -> u64 {
        self.nanos / 1_000_000
    }

    /// Shift by `delta` nanoseconds. Results below zero clip to zero.
    #[must_use]
    pub fn add_nanos(&self, delta: i64) -> Self {
        Self::from_nanos((self.nanos as i64).saturating_add(delta), self.rate)
    }

    /// Shift by `frames` frames at the current rate. Results below zero clip
    /// to zero.
    ///
    /// The offset into the current frame is carried over to the new frame.
    #[must_use]
    pub fn add_frames(&self, frames: i64) -> Self {
        let frame = self.rate.frame_at(self.nanos);
        let offset = self.nanos.saturating_sub(self.rate.frame_start(frame));
        let target = i64::try_from(frame)
            .unwrap_or(i64::MAX)
            .saturating_add(frames);
        match u64::try_from(target) {
            Ok(target) => {
                let nanos = self.rate.frame_start(target).saturating_add(offset);
                Self::from_nanos(i64::try_from(nanos).unwrap_or(i64::MAX), self.rate)
            }
            Err(_) => Self::from_nanos(0, self.rate),
        }
    }

    /// Signed difference `self - other` in nanoseconds.
    #[must_use]
    pub fn difference(&self, other: &Self) -> i64 {
        self.nanos as i64 - other.nanos as i64
    }

    /// Label fields `(hh, mm, ss, ff)` after drop-frame adjustment.
    ///
    /// A timecode whose rate is not usable is labelled like one without a
    /// rate, so the frame field holds the nanoseconds within the second.
    pub(crate) fn label_fields(&self) -> (u64, u64, u64, u64) {
        let rate = if self.rate.is_valid() {
            self.rate
        } else {
            Rate::IDENTITY
        };
        let fps = rate.fps() as u64;
        let label = dropframe::display_frame(self.frame_at_rate(&rate), &rate);
        (
            label / (fps * 3600),
            label / (fps * 60) % 60,
            label / fps % 60,
            label % fps,
        )
    }

    /// The timecode as text, followed by `@rate` when a usable rate is set.
    #[must_use]
    pub fn to_string_with_rate(&self) -> String {
        match self.rate.id() {
            ID_UNKNOWN | ID_UNKNOWN_DF => self.to_string(),
            _ if !self.rate.is_valid() => self.to_string(),
            _ => format!("{}@{}", self, self.rate.float_string()),
        }
    }
}

impl Default for Timecode {
    fn default() -> Self {
        Self::ZERO
    }
}

impl fmt::Display for Timecode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (hh, mm, ss, ff) = self.label_fields();
        let separator = if self.rate.is_drop() { ';' } else { ':' };
        write!(f, "{:02}:{:02}:{:02}{}{:02}", hh, mm, ss, separator, ff)
    }
}

impl FromStr for Timecode {
    type Err = TimecodeError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl PartialEq for Timecode {
    fn eq(&self, other: &Self) -> bool {
        self.nanos == other.nanos && self.rate.id() == other.rate.id() && self.rate == other.rate
    }
}

impl Eq for Timecode {}

impl Hash for Timecode {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.nanos.hash(state);
        self.rate.id().hash(state);
        self.rate.hash(state);
    }
}

impl PartialOrd for Timecode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Timecode {
    fn cmp(&self, other: &Self) -> Ordering {
        self.nanos
            .cmp(&other.nanos)
            .then_with(|| self.rate.id().cmp(&other.rate.id()))
            .then_with(|| other.rate.frame_nanos().cmp(&self.rate.frame_nanos()))
    }
}

impl Add<Duration> for Timecode {
    type Output = Self;

    fn add(self, rhs: Duration) -> Self {
        self.add_nanos(i64::try_from(rhs.as_nanos()).unwrap_or(i64::MAX))
    }
}

impl Sub<Duration> for Timecode {
    type Output = Self;

    fn sub(self, rhs: Duration) -> Self {
        self.add_nanos(i64::try_from(rhs.as_nanos()).map_or(i64::MIN, |n| -n))
    }
}

#[cfg(feature = "serde")]
impl Serialize for Timecode {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string_with_rate())
    }
}

#[cfg(feature = "serde")]
impl<'de> Deserialize<'de> for Timecode {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::Error;

        // text form, or the packed form as kept in an integer column
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Text(String),
            Bits(u64),
        }

        match Option::<Repr>::deserialize(deserializer)? {
            None => Ok(Self::ZERO),
            Some(Repr::Text(text)) => Self::parse(&text).map_err(D::Error::custom),
            Some(Repr::Bits(bits)) => {
                Self::from_bits(bits).ok_or_else(|| D::Error::custom("invalid packed timecode"))
            }
        }
    }
}
