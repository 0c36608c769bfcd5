//! Edit rates and the standard rate catalog.
//!
//! A [`Rate`] identifies the frame rate a timecode uses to assign address
//! labels. Standard film, video and television rates live in a static catalog
//! and are addressed by a small integer id that fits the 5-bit tag of the
//! packed timecode form. Any other rate is user-defined and keeps its exact
//! numerator and denominator.
//!
//! Rates compare by frame duration, so `30/1` and `60000/2000` are the same
//! rate even though their fractions differ.

use crate::error::{Result, TimecodeError};
#[cfg(feature = "serde")]
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, trace};

pub(crate) const NANOS_PER_SECOND: i64 = 1_000_000_000;

/// Marker bit set in the id of every drop-frame rate.
pub const DROP_FRAME_FLAG: u8 = 0x10;

/// Id of the unknown rate. Timecodes tagged with it hold a literal `h:m:s`
/// plus a frame number stored as nanoseconds.
pub const ID_UNKNOWN: u8 = 0;
/// 24000/1001, non-drop.
pub const ID_23976: u8 = 1;
/// 24/1.
pub const ID_24: u8 = 2;
/// 25/1.
pub const ID_25: u8 = 3;
/// 30/1.
pub const ID_30: u8 = 4;
/// 48/1.
pub const ID_48: u8 = 5;
/// 50/1.
pub const ID_50: u8 = 6;
/// 60/1.
pub const ID_60: u8 = 7;
/// 96/1.
pub const ID_96: u8 = 8;
/// 100/1.
pub const ID_100: u8 = 9;
/// 120/1.
pub const ID_120: u8 = 10;
/// Id shared by all user-defined rates.
pub const ID_USER: u8 = 15;
/// Unknown rate with the drop-frame flag set.
pub const ID_UNKNOWN_DF: u8 = DROP_FRAME_FLAG;
/// 30000/1001 drop-frame.
pub const ID_30DF: u8 = DROP_FRAME_FLAG + 4;
/// 60000/1001 drop-frame.
pub const ID_60DF: u8 = DROP_FRAME_FLAG + 7;

/// An edit rate.
///
/// Rates are immutable. Obtain one from the catalog constants, by id through
/// [`Rate::lookup`], or through [`Rate::from_fraction`], [`Rate::from_float`]
/// and [`Rate::parse`], which snap near-standard input onto catalog entries.
#[derive(Debug, Clone, Copy)]
pub struct Rate {
    /// Catalog id, [`ID_USER`] for user-defined rates.
    id: u8,
    /// Nominal label count per second.
    fps: u32,
    /// Numerator of the real-time advance rate.
    num: u32,
    /// Denominator of the real-time advance rate.
    den: u32,
    /// Labels skipped at every minute except each tenth.
    drop_frames: u32,
    /// Actual frames per 10 minute compensation cycle.
    frames_per_10min: u64,
}

impl Rate {
    const fn standard(
        id: u8,
        fps: u32,
        num: u32,
        den: u32,
        drop_frames: u32,
        frames_per_10min: u64,
    ) -> Self {
        Self {
            id,
            fps,
            num,
            den,
            drop_frames,
            frames_per_10min,
        }
    }

    /// Unset rate. Frame math runs at one nanosecond per frame.
    pub const IDENTITY: Self =
        Self::standard(ID_UNKNOWN, 1_000_000_000, 1_000_000_000, 1, 0, 600_000_000_000);
    /// Unset rate of a timecode that was written with a drop-frame separator.
    pub const IDENTITY_DF: Self =
        Self::standard(ID_UNKNOWN_DF, 1_000_000_000, 1_000_000_000, 1, 0, 600_000_000_000);
    /// One frame per second.
    pub const ONE_FPS: Self = Self::standard(ID_UNKNOWN, 1, 1, 1, 0, 600);
    /// Placeholder for a user-defined rate whose fraction is not known.
    pub const INVALID: Self = Self::standard(ID_USER, 0, 0, 0, 0, 0);

    /// 23.976 fps. This is NOT a drop-frame rate.
    pub const RATE_23976: Self = Self::standard(ID_23976, 24, 24000, 1001, 0, 24 * 600);
    /// 24 fps.
    pub const RATE_24: Self = Self::standard(ID_24, 24, 24, 1, 0, 24 * 600);
    /// 25 fps.
    pub const RATE_25: Self = Self::standard(ID_25, 25, 25, 1, 0, 25 * 600);
    /// 30 fps.
    pub const RATE_30: Self = Self::standard(ID_30, 30, 30, 1, 0, 30 * 600);
    /// 29.97 fps drop-frame.
    pub const RATE_30DF: Self = Self::standard(ID_30DF, 30, 30000, 1001, 2, 17982);
    /// 48 fps.
    pub const RATE_48: Self = Self::standard(ID_48, 48, 48, 1, 0, 48 * 600);
    /// 50 fps.
    pub const RATE_50: Self = Self::standard(ID_50, 50, 50, 1, 0, 50 * 600);
    /// 60 fps.
    pub const RATE_60: Self = Self::standard(ID_60, 60, 60, 1, 0, 60 * 600);
    /// 59.94 fps drop-frame.
    pub const RATE_60DF: Self = Self::standard(ID_60DF, 60, 60000, 1001, 4, 35964);
    /// 96 fps.
    pub const RATE_96: Self = Self::standard(ID_96, 96, 96, 1, 0, 96 * 600);
    /// 100 fps.
    pub const RATE_100: Self = Self::standard(ID_100, 100, 100, 1, 0, 100 * 600);
    /// 120 fps.
    pub const RATE_120: Self = Self::standard(ID_120, 120, 120, 1, 0, 120 * 600);

    /// Look up a catalog entry by id.
    #[must_use]
    pub fn lookup(id: u8) -> Option<Self> {
        CATALOG.iter().find(|rate| rate.id == id).copied()
    }

    fn user(fps: u32, num: u32, den: u32, frames_per_10min: u64) -> Self {
        Self {
            id: ID_USER,
            fps: fps.max(1),
            num,
            den,
            drop_frames: 0,
            frames_per_10min,
        }
    }

    /// Create a rate from numerator `num` and denominator `den`.
    ///
    /// Zero values are treated as one. If the rate is close to a standard
    /// rate, the catalog entry is returned. Otherwise the result is a
    /// user-defined rate that keeps the exact fraction.
    #[must_use]
    pub fn from_fraction(num: u32, den: u32) -> Self {
        let num = num.max(1);
        let den = den.max(1);
        let fps = num as f32 / den as f32;
        let rate = Self::from_float(fps);
        if rate.id != ID_USER {
            return rate;
        }
        trace!("Synthesizing user-defined rate {}/{}", num, den);
        Self::user(fps.ceil() as u32, num, den, (fps * 600.0) as u64)
    }

    /// Create a rate from a floating point frame rate.
    ///
    /// Values inside a standard rate's snap window return the catalog entry.
    /// Anything else becomes a user-defined rate of `round(f * 1000) / 1000`.
    #[must_use]
    pub fn from_float(f: f32) -> Self {
        match f {
            f if (23.975..23.997).contains(&f) => Self::RATE_23976,
            f if f == 24.0 => Self::RATE_24,
            f if f == 25.0 => Self::RATE_25,
            f if f > 29.96 && f < 29.98 => Self::RATE_30DF,
            f if f == 30.0 => Self::RATE_30,
            f if f == 48.0 => Self::RATE_48,
            f if f == 50.0 => Self::RATE_50,
            f if f > 59.93 && f < 59.95 => Self::RATE_60DF,
            f if f == 60.0 => Self::RATE_60,
            f if f == 96.0 => Self::RATE_96,
            f if f == 100.0 => Self::RATE_100,
            f if f == 120.0 => Self::RATE_120,
            f => {
                trace!("Synthesizing user-defined rate {} fps", f);
                Self::user(
                    f.ceil() as u32,
                    (f * 1000.0).round() as u32,
                    1000,
                    (f * 600.0).floor() as u64,
                )
            }
        }
    }

    /// Parse a rate from text.
    ///
    /// Integers are catalog ids (including the drop-frame ids 16, 20 and 23),
    /// except that integers above 15 which are not catalog ids are read as a
    /// frame rate. Positive decimals go through [`Rate::from_float`] and
    /// `num/den` with both parts non-zero through [`Rate::from_fraction`].
    pub fn parse(text: &str) -> Result<Self> {
        if let Ok(index) = text.parse::<i64>() {
            return Self::from_index(index).ok_or_else(|| {
                debug!("Rejecting unknown rate index {}", index);
                TimecodeError::rate_syntax(text)
            });
        }

        if let Ok(fps) = text.parse::<f32>() {
            if fps.is_finite() && fps > 0.0 {
                return Ok(Self::from_float(fps));
            }
        }

        if let Some((num, den)) = text.split_once('/') {
            if let (Ok(num), Ok(den)) = (num.parse::<u32>(), den.parse::<u32>()) {
                if num > 0 && den > 0 {
                    return Ok(Self::from_fraction(num, den));
                }
            }
        }

        debug!("Rejecting rate text {:?}", text);
        Err(TimecodeError::rate_syntax(text))
    }

    fn from_index(index: i64) -> Option<Self> {
        match u8::try_from(index) {
            Ok(id) if id <= ID_UNKNOWN_DF || id == ID_30DF || id == ID_60DF => Self::lookup(id),
            Ok(_) | Err(_) if index > ID_USER as i64 => Some(Self::from_float(index as f32)),
            _ => None,
        }
    }

    /// Catalog id of the rate.
    #[must_use]
    pub fn id(&self) -> u8 {
        self.id
    }

    /// Nominal label count per second.
    #[must_use]
    pub fn fps(&self) -> u32 {
        self.fps
    }

    /// The rate's numerator and denominator.
    #[must_use]
    pub fn fraction(&self) -> (u32, u32) {
        (self.num, self.den)
    }

    /// Labels skipped once per minute, zero for non-drop rates.
    #[must_use]
    pub fn drop_frames(&self) -> u32 {
        self.drop_frames
    }

    /// Actual frame count per 10 minutes.
    #[must_use]
    pub fn frames_per_10min(&self) -> u64 {
        self.frames_per_10min
    }

    /// Whether the rate equals [`Rate::IDENTITY`].
    ///
    /// Use `timecode.rate().is_zero()` to check if a timecode has no rate.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.is_equal(&Self::IDENTITY)
    }

    /// Whether the rate may be used in calculations.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.num > 0 && self.den > 0
    }

    /// Whether the rate refers to a drop-frame timecode.
    #[must_use]
    pub fn is_drop(&self) -> bool {
        self.id & DROP_FRAME_FLAG != 0
    }

    /// The catalog id as text.
    #[must_use]
    pub fn index_string(&self) -> String {
        self.id.to_string()
    }

    /// The rate as `numerator/denominator`.
    #[must_use]
    pub fn rational_string(&self) -> String {
        format!("{}/{}", self.num, self.den)
    }

    /// The rate as a floating point number.
    #[must_use]
    pub fn as_f32(&self) -> f32 {
        match self.den {
            0 => 0.0,
            1 => self.num as f32,
            den => self.num as f32 / den as f32,
        }
    }

    /// The rate as decimal text with at most three fraction digits.
    #[must_use]
    pub fn float_string(&self) -> String {
        match self.den {
            0 => "0.0".to_string(),
            1 => format!("{:.1}", self.num as f32),
            den => format!("{:.3}", (self.num as f64 / den as f64) as f32),
        }
    }

    pub(crate) fn frame_nanos(&self) -> i64 {
        if self.num == 0 {
            return 1;
        }
        let nanos = (NANOS_PER_SECOND as f64 * self.den as f64 / self.num as f64) as i64;
        nanos.max(1)
    }

    /// Start of `frame`, rounded up to the next whole nanosecond so that
    /// [`Rate::frame_at`] maps it back to the same frame.
    pub(crate) fn frame_start(&self, frame: u64) -> u64 {
        if self.num == 0 || self.den == 0 {
            return frame;
        }
        let scaled = u128::from(frame) * NANOS_PER_SECOND as u128 * u128::from(self.den);
        let num = u128::from(self.num);
        u64::try_from((scaled + num - 1) / num).unwrap_or(u64::MAX)
    }

    /// Index of the frame covering `nanos`.
    pub(crate) fn frame_at(&self, nanos: u64) -> u64 {
        if self.num == 0 || self.den == 0 {
            return nanos;
        }
        let scaled = u128::from(nanos) * u128::from(self.num);
        let frame = scaled / (NANOS_PER_SECOND as u128 * u128::from(self.den));
        u64::try_from(frame).unwrap_or(u64::MAX)
    }

    pub(crate) fn truncate_nanos(&self, nanos: i64, precision: u32) -> i64 {
        let Ok(value) = u64::try_from(nanos) else {
            return nanos;
        };
        let frame = self.frame_at(value);
        let start = self.frame_start(frame);
        let next = self.frame_start(frame.saturating_add(1));
        let n = next.saturating_sub(start);
        let x = value.saturating_sub(start);
        let snapped = if x > n / 2 {
            next
        } else if x > n / u64::from(precision.max(1)) {
            start
        } else {
            value
        };
        i64::try_from(snapped).unwrap_or(i64::MAX)
    }

    /// Duration of a single frame.
    ///
    /// Rates with a zero numerator report one nanosecond.
    #[must_use]
    pub fn frame_duration(&self) -> Duration {
        Duration::from_nanos(self.frame_nanos() as u64)
    }

    /// Duration of `frames` frames.
    ///
    /// The exact rational is rounded up to whole nanoseconds, so
    /// `rate.frames(rate.duration(n)) == n` at any position.
    #[must_use]
    pub fn duration(&self, frames: u64) -> Duration {
        Duration::from_nanos(self.frame_start(frames))
    }

    /// Number of whole frames covered by `duration`.
    #[must_use]
    pub fn frames(&self, duration: Duration) -> u64 {
        self.frame_at(u64::try_from(duration.as_nanos()).unwrap_or(u64::MAX))
    }

    /// Clip `duration` to the frame interval.
    ///
    /// Frame boundaries are the values of [`Rate::duration`]. A remainder
    /// above half a frame rounds up to the next boundary and a remainder
    /// above `1/precision` of a frame rounds down. Anything smaller is left
    /// untouched.
    #[must_use]
    pub fn truncate(&self, duration: Duration, precision: u32) -> Duration {
        let nanos = i64::try_from(duration.as_nanos()).unwrap_or(i64::MAX);
        Duration::from_nanos(self.truncate_nanos(nanos, precision).max(0) as u64)
    }

    /// Snap a fractional nanosecond value onto whole frames.
    ///
    /// The value is first rounded half away from zero at `10^precision`
    /// sub-frame resolution, then cut to whole frames.
    #[must_use]
    pub fn truncate_float(&self, nanos: f64, precision: i32) -> i64 {
        let pow = 10f64.powi(precision);
        let n = self.frame_nanos();
        let scaled = (pow * nanos / n as f64).round();
        (scaled / pow).trunc() as i64 * n
    }

    /// Whether this rate's frame duration is shorter than `other`'s.
    #[must_use]
    pub fn is_smaller(&self, other: &Self) -> bool {
        self.frame_nanos() < other.frame_nanos()
    }

    /// Whether both rates have the same frame duration.
    #[must_use]
    pub fn is_equal(&self, other: &Self) -> bool {
        self.frame_nanos() == other.frame_nanos()
    }
}

static CATALOG: [Rate; 14] = [
    Rate::IDENTITY,
    Rate::IDENTITY_DF,
    Rate::RATE_23976,
    Rate::RATE_24,
    Rate::RATE_25,
    Rate::RATE_30,
    Rate::RATE_30DF,
    Rate::RATE_48,
    Rate::RATE_50,
    Rate::RATE_60,
    Rate::RATE_60DF,
    Rate::RATE_96,
    Rate::RATE_100,
    Rate::RATE_120,
];

/// The slower of two rates, i.e. the one with the longer frame duration.
#[must_use]
pub fn min_rate(a: Rate, b: Rate) -> Rate {
    if a.frame_nanos() > b.frame_nanos() {
        a
    } else {
        b
    }
}

/// The faster of two rates, i.e. the one with the shorter frame duration.
#[must_use]
pub fn max_rate(a: Rate, b: Rate) -> Rate {
    if a.frame_nanos() < b.frame_nanos() {
        a
    } else {
        b
    }
}

impl Default for Rate {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl PartialEq for Rate {
    fn eq(&self, other: &Self) -> bool {
        self.is_equal(other)
    }
}

impl Eq for Rate {}

impl Hash for Rate {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.frame_nanos().hash(state);
    }
}

impl fmt::Display for Rate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.float_string())
    }
}

impl FromStr for Rate {
    type Err = TimecodeError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

#[cfg(feature = "serde")]
impl Serialize for Rate {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.float_string())
    }
}

#[cfg(feature = "serde")]
impl<'de> Deserialize<'de> for Rate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        match text.as_str() {
            "" | "-" | "--" | "NaN" | "unknown" => Ok(Self::IDENTITY),
            "0.0" => Ok(Self::INVALID),
            other => Self::parse(other).map_err(serde::de::Error::custom),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_min_max_rate() {
        // (a, b, a is the slower rate)
        let cases = [
            ((25, 1), (24, 1), false),
            ((25, 1), (1, 1), false),
            ((25, 1), (1000, 1000), false),
            ((25, 1), (30000, 1001), true),
            ((30000, 1001), (25, 1), false),
            ((60000, 1001), (30000, 1001), false),
            ((30000, 1001), (60000, 1001), true),
        ];

        for (i, ((an, ad), (bn, bd), a_is_lower)) in cases.into_iter().enumerate() {
            let a = Rate::from_fraction(an, ad);
            let b = Rate::from_fraction(bn, bd);
            let (lower, higher) = if a_is_lower { (a, b) } else { (b, a) };
            assert!(min_rate(a, b).is_equal(&lower), "case {} min", i);
            assert!(max_rate(a, b).is_equal(&higher), "case {} max", i);
        }
    }

    #[test]
    fn test_equality_by_frame_duration() {
        assert!(Rate::from_fraction(30, 1).is_equal(&Rate::from_fraction(60000, 2000)));
        assert_eq!(Rate::from_fraction(30, 1), Rate::RATE_30);
        assert_ne!(Rate::RATE_30, Rate::RATE_30DF);
        assert!(Rate::RATE_60.is_smaller(&Rate::RATE_30));
        assert!(!Rate::RATE_30.is_smaller(&Rate::RATE_30));
    }

    #[test]
    fn test_from_fraction_snaps_to_catalog() {
        assert_eq!(Rate::from_fraction(24000, 1001).id(), ID_23976);
        assert_eq!(Rate::from_fraction(30000, 1001).id(), ID_30DF);
        assert_eq!(Rate::from_fraction(60000, 1001).id(), ID_60DF);
        assert_eq!(Rate::from_fraction(50, 1).id(), ID_50);
        assert_eq!(Rate::from_fraction(0, 0).fraction(), (1, 1));
    }

    #[test]
    fn test_from_fraction_user_defined() {
        let rate = Rate::from_fraction(48000, 1001);
        assert_eq!(rate.id(), ID_USER);
        assert_eq!(rate.fps(), 48);
        assert_eq!(rate.fraction(), (48000, 1001));
        assert_eq!(rate.frames_per_10min(), 28771);
        assert!(!rate.is_drop());
    }

    #[test]
    fn test_from_float_windows() {
        assert_eq!(Rate::from_float(23.976).id(), ID_23976);
        assert_eq!(Rate::from_float(23.975).id(), ID_23976);
        assert_eq!(Rate::from_float(23.997).id(), ID_USER);
        assert_eq!(Rate::from_float(29.97).id(), ID_30DF);
        assert_eq!(Rate::from_float(59.94).id(), ID_60DF);
        assert_eq!(Rate::from_float(96.0).id(), ID_96);
        assert_eq!(Rate::from_float(120.0).id(), ID_120);

        let rate = Rate::from_float(12.5);
        assert_eq!(rate.id(), ID_USER);
        assert_eq!(rate.fraction(), (12500, 1000));
        assert_eq!(rate.fps(), 13);
    }

    #[test]
    fn test_parse_index() {
        assert_eq!(Rate::parse("0").unwrap().id(), ID_UNKNOWN);
        assert_eq!(Rate::parse("2").unwrap().id(), ID_24);
        assert_eq!(Rate::parse("16").unwrap().id(), ID_UNKNOWN_DF);
        assert_eq!(Rate::parse("20").unwrap().id(), ID_30DF);
        assert_eq!(Rate::parse("23").unwrap().id(), ID_60DF);
        // integers above the id range are frame rates
        assert_eq!(Rate::parse("25").unwrap().id(), ID_25);
        assert_eq!(Rate::parse("60").unwrap().id(), ID_60);
        assert!(Rate::parse("12").is_err());
        assert!(Rate::parse("15").is_err());
        assert!(Rate::parse("-1").is_err());
    }

    #[test]
    fn test_parse_decimal_and_fraction() {
        assert_eq!(Rate::parse("29.970").unwrap().id(), ID_30DF);
        assert_eq!(Rate::parse("24.0").unwrap().id(), ID_24);
        assert_eq!(Rate::parse("60000/1001").unwrap().id(), ID_60DF);
        assert_eq!(
            Rate::parse("48000/1001").unwrap().fraction(),
            (48000, 1001)
        );
    }

    #[test]
    fn test_parse_errors() {
        let cases = [
            "", "abc", "30/0", "0/1", "30/x", "1/2/3", "NaN", "inf", "0.0", "-25.0", "-0.5",
        ];
        for text in cases {
            let err = Rate::parse(text).unwrap_err();
            assert_eq!(err, TimecodeError::rate_syntax(text));
        }
    }

    #[test]
    fn test_text_forms() {
        assert_eq!(Rate::RATE_24.float_string(), "24.0");
        assert_eq!(Rate::RATE_30DF.float_string(), "29.970");
        assert_eq!(Rate::RATE_23976.float_string(), "23.976");
        assert_eq!(Rate::RATE_60DF.float_string(), "59.940");
        assert_eq!(Rate::INVALID.float_string(), "0.0");
        assert_eq!(Rate::RATE_30DF.rational_string(), "30000/1001");
        assert_eq!(Rate::RATE_30DF.index_string(), "20");
        assert_eq!(Rate::RATE_25.to_string(), "25.0");
        assert_eq!(Rate::INVALID.as_f32(), 0.0);
        assert!((Rate::RATE_30DF.as_f32() - 29.97).abs() < 0.001);
    }

    #[test]
    fn test_flags() {
        assert!(Rate::RATE_30DF.is_drop());
        assert!(Rate::IDENTITY_DF.is_drop());
        assert!(!Rate::RATE_30.is_drop());
        assert!(Rate::IDENTITY.is_zero());
        assert!(Rate::IDENTITY_DF.is_zero());
        assert!(!Rate::RATE_24.is_zero());
        assert!(Rate::RATE_24.is_valid());
        assert!(!Rate::INVALID.is_valid());
    }

    #[test]
    fn test_lookup() {
        assert_eq!(Rate::lookup(ID_50), Some(Rate::RATE_50));
        assert_eq!(Rate::lookup(ID_USER), None);
        assert_eq!(Rate::lookup(11), None);
    }

    #[test]
    fn test_frame_duration() {
        assert_eq!(Rate::RATE_25.frame_duration(), Duration::from_millis(40));
        assert_eq!(Rate::RATE_30DF.frame_duration(), Duration::from_nanos(33_366_666));
        assert_eq!(Rate::INVALID.frame_duration(), Duration::from_nanos(1));
        assert_eq!(Rate::IDENTITY.frame_duration(), Duration::from_nanos(1));
    }

    #[test]
    fn test_duration_and_frames() {
        assert_eq!(Rate::RATE_25.duration(25), Duration::from_secs(1));
        assert_eq!(Rate::INVALID.duration(25), Duration::from_nanos(25));
        assert_eq!(Rate::RATE_30DF.duration(1), Duration::from_nanos(33_366_667));
        assert_eq!(Rate::RATE_30DF.duration(30), Duration::from_millis(1001));
        for rate in CATALOG.iter().skip(2) {
            for frames in [0, 1, 29, 1799, 1800, 17982, 86400] {
                assert_eq!(rate.frames(rate.duration(frames)), frames, "{}", rate);
            }
        }
    }

    #[test]
    fn test_frames_exact_over_long_runs() {
        let cases = [
            (Rate::RATE_96, 7_813_489),
            (Rate::RATE_120, 12_500_386),
            (Rate::RATE_30DF, 25_025_697),
            (Rate::RATE_23976, 7 * 24 * 3600 * 24),
            (Rate::from_fraction(48000, 1001), 300_000_000),
        ];
        for (rate, frame) in cases {
            for n in frame - 2..frame + 2 {
                let duration = rate.duration(n);
                assert_eq!(rate.frames(duration), n, "{} frame {}", rate, n);
                assert_eq!(rate.truncate(duration, 2), duration, "{} frame {}", rate, n);
            }
        }
        // the last nanosecond of a frame still belongs to it
        let end = Rate::RATE_30DF.duration(25_025_698) - Duration::from_nanos(1);
        assert_eq!(Rate::RATE_30DF.frames(end), 25_025_697);
    }

    #[test]
    fn test_truncate() {
        let rate = Rate::RATE_25;
        let frame = 40_000_000;
        // above half a frame rounds up
        assert_eq!(
            rate.truncate(Duration::from_nanos(frame + 30_000_000), 2),
            Duration::from_nanos(2 * frame)
        );
        // above 1/precision rounds down
        assert_eq!(
            rate.truncate(Duration::from_nanos(frame + 15_000_000), 4),
            Duration::from_nanos(frame)
        );
        // small noise is left alone
        assert_eq!(
            rate.truncate(Duration::from_nanos(frame + 5), 2),
            Duration::from_nanos(frame + 5)
        );
    }

    #[test]
    fn test_truncate_float() {
        let rate = Rate::RATE_25;
        assert_eq!(rate.truncate_float(79_999_999.7, 2), 80_000_000);
        assert_eq!(rate.truncate_float(70_000_000.0, 0), 80_000_000);
        assert_eq!(rate.truncate_float(50_000_000.0, 2), 40_000_000);
        assert_eq!(rate.truncate_float(-79_999_999.7, 2), -80_000_000);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_rate_serialization() {
        let json = serde_json::to_string(&Rate::RATE_30DF).unwrap();
        assert_eq!(json, "\"29.970\"");
        let decoded: Rate = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded.id(), ID_30DF);

        for text in ["\"\"", "\"-\"", "\"unknown\"", "\"NaN\""] {
            let decoded: Rate = serde_json::from_str(text).unwrap();
            assert_eq!(decoded.id(), ID_UNKNOWN);
        }
        assert!(serde_json::from_str::<Rate>("\"bogus\"").is_err());
        assert!(serde_json::from_str::<Rate>("\"-25.0\"").is_err());

        let json = serde_json::to_string(&Rate::INVALID).unwrap();
        let decoded: Rate = serde_json::from_str(&json).unwrap();
        assert!(!decoded.is_valid());
    }
}
