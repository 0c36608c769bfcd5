//! Packed 64-bit timecode form.
//!
//! ```text
//!  63      59 58                                                    0
//! +----------+------------------------------------------------------+
//! | rate tag |              duration in nanoseconds                 |
//! +----------+------------------------------------------------------+
//! ```
//!
//! Five tag bits hold 16 non-drop and 16 drop-frame rate ids. 59 duration
//! bits cover roughly 9 years at one nanosecond granularity. The value with
//! all bits set marks an invalid timecode.

/// Width of the rate tag.
pub const RATE_BITS: u32 = 5;

/// Width of the duration field.
pub const TIME_BITS: u32 = 59;

/// Mask selecting the duration field.
pub const TIME_MASK: u64 = (1 << TIME_BITS) - 1;

/// Packed value of an invalid timecode.
pub const INVALID: u64 = u64::MAX;

const RATE_MASK: u8 = (1 << RATE_BITS) - 1;

/// Pack a rate tag and a duration. Bits outside the field widths are dropped.
#[must_use]
pub const fn pack(rate_id: u8, nanos: u64) -> u64 {
    ((rate_id & RATE_MASK) as u64) << TIME_BITS | (nanos & TIME_MASK)
}

/// Split a packed value into rate tag and duration.
///
/// Returns `None` for [`INVALID`].
#[must_use]
pub const fn unpack(bits: u64) -> Option<(u8, u64)> {
    if bits == INVALID {
        return None;
    }
    Some(((bits >> TIME_BITS) as u8, bits & TIME_MASK))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_pack_layout() {
        assert_eq!(pack(0, 0), 0);
        assert_eq!(pack(1, 0), 1 << 59);
        assert_eq!(pack(20, 5), 20 << 59 | 5);
        assert_eq!(pack(31, TIME_MASK), INVALID);
    }

    #[test]
    fn test_pack_masks_fields() {
        assert_eq!(pack(0x21, 0), 1 << 59);
        assert_eq!(pack(0, TIME_MASK + 1), 0);
    }

    #[test]
    fn test_unpack() {
        assert_eq!(unpack(pack(23, 1_000_000_000)), Some((23, 1_000_000_000)));
        assert_eq!(unpack(INVALID), None);
        assert_eq!(unpack(pack(31, 7)), Some((31, 7)));
    }
}
