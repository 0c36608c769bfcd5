//! SMPTE ST 12-1 binary coded decimal timecode words.
//!
//! The 32-bit word carries one BCD digit pair per field:
//!
//! | Bits  | Field                              |
//! |-------|------------------------------------|
//! | 0-3   | Frame units                        |
//! | 4-5   | Frame tens                         |
//! | 6     | Drop-frame flag                    |
//! | 8-11  | Seconds units                      |
//! | 12-14 | Seconds tens                       |
//! | 16-19 | Minutes units                      |
//! | 20-22 | Minutes tens                       |
//! | 24-27 | Hours units                        |
//! | 28-29 | Hours tens                         |
//!
//! User bits travel next to the word and are not interpreted.

use crate::rate::{Rate, NANOS_PER_SECOND};
use crate::timecode::Timecode;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::fmt;

/// Drop-frame flag in the timecode word.
pub const DROP_FRAME_BIT: u32 = 0x40;

/// A packed SMPTE timecode word plus its user bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SmpteTimecode {
    /// BCD timecode word.
    pub word: u32,
    /// User bits, 8 nibbles.
    pub user_bits: u32,
}

#[inline]
fn bcd(word: u32, shift: u32, tens_mask: u32) -> u32 {
    (word >> (shift + 4) & tens_mask) * 10 + (word >> shift & 0x0F)
}

#[inline]
fn to_bcd(value: u64, shift: u32, tens_mask: u64) -> u32 {
    (((value / 10 & tens_mask) << 4 | value % 10) as u32) << shift
}

impl SmpteTimecode {
    /// Wrap a timecode word and its user bits.
    #[must_use]
    pub fn new(word: u32, user_bits: u32) -> Self {
        Self { word, user_bits }
    }

    /// Pack the display label of `tc` into a word with empty user bits.
    ///
    /// Drop-frame rates set [`DROP_FRAME_BIT`].
    #[must_use]
    pub fn from_timecode(tc: &Timecode) -> Self {
        let (hh, mm, ss, ff) = tc.label_fields();
        let mut word = to_bcd(hh, 24, 0x03)
            | to_bcd(mm, 16, 0x07)
            | to_bcd(ss, 8, 0x07)
            | to_bcd(ff, 0, 0x03);
        if tc.rate().is_drop() {
            word |= DROP_FRAME_BIT;
        }
        Self { word, user_bits: 0 }
    }

    /// Unpack into a timecode without a rate.
    ///
    /// Like a parsed timecode without a rate suffix, the frame number is
    /// held as nanoseconds until [`Timecode::set_rate`] is called.
    #[must_use]
    pub fn to_timecode(&self) -> Timecode {
        let seconds =
            u64::from(self.hours()) * 3600 + u64::from(self.minutes()) * 60 + u64::from(self.seconds());
        let nanos = seconds * NANOS_PER_SECOND as u64 + u64::from(self.frames());
        let rate = if self.is_drop_frame() {
            Rate::IDENTITY_DF
        } else {
            Rate::IDENTITY
        };
        Timecode::new(std::time::Duration::from_nanos(nanos), rate)
    }

    /// Hours field.
    #[must_use]
    pub fn hours(&self) -> u32 {
        bcd(self.word, 24, 0x03)
    }

    /// Minutes field.
    #[must_use]
    pub fn minutes(&self) -> u32 {
        bcd(self.word, 16, 0x07)
    }

    /// Seconds field.
    #[must_use]
    pub fn seconds(&self) -> u32 {
        bcd(self.word, 8, 0x07)
    }

    /// Frames field.
    #[must_use]
    pub fn frames(&self) -> u32 {
        bcd(self.word, 0, 0x03)
    }

    /// Whether the drop-frame flag is set.
    #[must_use]
    pub fn is_drop_frame(&self) -> bool {
        self.word & DROP_FRAME_BIT != 0
    }
}

impl fmt::Display for SmpteTimecode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let separator = if self.is_drop_frame() { ';' } else { ':' };
        write!(
            f,
            "{:02}:{:02}:{:02}{}{:02}",
            self.hours(),
            self.minutes(),
            self.seconds(),
            separator,
            self.frames()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_smpte_fields() {
        let smpte = SmpteTimecode::new(0x1234_5618, 0xDEAD_BEEF);
        assert_eq!(smpte.hours(), 12);
        assert_eq!(smpte.minutes(), 34);
        assert_eq!(smpte.seconds(), 56);
        assert_eq!(smpte.frames(), 18);
        assert!(!smpte.is_drop_frame());
        assert_eq!(smpte.to_string(), "12:34:56:18");
    }

    #[test]
    fn test_smpte_drop_flag() {
        let smpte = SmpteTimecode::new(0x0001_0002 | DROP_FRAME_BIT, 0);
        assert!(smpte.is_drop_frame());
        assert_eq!(smpte.frames(), 2);
        assert_eq!(smpte.to_string(), "00:01:00;02");
    }

    #[test]
    fn test_from_timecode() {
        let tc = Timecode::parse("01:02:03:04@25").unwrap();
        let smpte = SmpteTimecode::from_timecode(&tc);
        assert_eq!(smpte.word, 0x0102_0304);
        assert_eq!(smpte.user_bits, 0);

        let tc = Timecode::new(Rate::RATE_30DF.duration(1800), Rate::RATE_30DF);
        let smpte = SmpteTimecode::from_timecode(&tc);
        assert_eq!(smpte.word, 0x0001_0002 | DROP_FRAME_BIT);
    }

    #[test]
    fn test_to_timecode_has_no_rate() {
        let tc = SmpteTimecode::new(0x0102_0304, 0).to_timecode();
        assert!(tc.rate().is_zero());
        assert!(!tc.rate().is_drop());
        assert_eq!(tc.to_string(), "01:02:03:04");

        let tc = tc.with_rate(Rate::RATE_25);
        assert_eq!(tc.frame(), 3723 * 25 + 4);
    }

    #[test]
    fn test_tens_are_masked() {
        // stray bits above each tens field do not leak into the value
        let smpte = SmpteTimecode::new(0xFFFF_FFFF, 0);
        assert_eq!(smpte.hours(), 3 * 10 + 15);
        assert_eq!(smpte.minutes(), 7 * 10 + 15);
        assert_eq!(smpte.frames(), 3 * 10 + 15);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_smpte_serialization() {
        let smpte = SmpteTimecode::new(0x0102_0304, 7);
        let json = serde_json::to_string(&smpte).unwrap();
        let decoded: SmpteTimecode = serde_json::from_str(&json).unwrap();
        assert_eq!(smpte, decoded);
    }
}
