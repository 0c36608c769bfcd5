//! Drop-frame label compensation for 29.97 and 59.94 fps.
//!
//! Drop-frame timecode keeps its labels in step with wall-clock time by
//! skipping label numbers at specific intervals:
//! - Skip labels 0 and 1 (0-3 at 59.94) at the start of each minute
//! - Except for minutes 0, 10, 20, 30, 40, 50
//!
//! No frames are discarded. Only the label assigned to a frame changes, so
//! a true frame number maps to a "display" label index that counts in
//! nominal frames per second, and back.

use crate::rate::Rate;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Drop-frame parameters of a rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DropFrameConfig {
    /// Labels dropped per minute (except every 10th minute)
    pub drop_frames: u32,
    /// Nominal labels per second
    pub nominal_fps: u32,
    /// Actual frames per 10 minutes
    pub frames_per_10min: u64,
}

impl DropFrameConfig {
    /// Get the configuration for a rate, if it skips labels.
    #[must_use]
    pub fn for_rate(rate: &Rate) -> Option<Self> {
        if !rate.is_drop() || rate.drop_frames() == 0 || rate.frames_per_10min() < 10 {
            return None;
        }
        Some(Self {
            drop_frames: rate.drop_frames(),
            nominal_fps: rate.fps(),
            frames_per_10min: rate.frames_per_10min(),
        })
    }

    /// Actual frames in a minute that drops labels.
    #[must_use]
    pub fn frames_per_minute(&self) -> u64 {
        self.frames_per_10min / 10
    }
}

/// Convert a true frame number to the label index shown for it.
///
/// Non-drop rates show the frame number unchanged.
#[must_use]
pub fn display_frame(frame: u64, rate: &Rate) -> u64 {
    let Some(config) = DropFrameConfig::for_rate(rate) else {
        return frame;
    };

    let f = frame as i64;
    let k = config.drop_frames as i64;
    let d = f / config.frames_per_10min as i64;
    let m = f % config.frames_per_10min as i64;
    // the first minute of every 10 minute block keeps all labels
    (f + 9 * k * d + k * ((m - k) / config.frames_per_minute() as i64)) as u64
}

/// Convert a label index back to the true frame number.
///
/// `label` counts nominal frames, e.g. `h*3600*fps + m*60*fps + s*fps + f`.
/// Labels that the scheme never emits resolve to an earlier frame.
#[must_use]
pub fn true_frame(label: u64, rate: &Rate) -> u64 {
    let Some(config) = DropFrameConfig::for_rate(rate) else {
        return label;
    };

    let minutes = label / (config.nominal_fps as u64 * 60);
    let dropped = config.drop_frames as u64 * (minutes - minutes / 10);
    label.saturating_sub(dropped)
}

/// Check if a label is one the drop-frame scheme skips.
#[must_use]
pub fn is_dropped_label(minutes: u32, seconds: u32, frames: u32, rate: &Rate) -> bool {
    match DropFrameConfig::for_rate(rate) {
        Some(config) => seconds == 0 && minutes % 10 != 0 && frames < config.drop_frames,
        None => false,
    }
}
