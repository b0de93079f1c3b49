mod smpte;
pub use smpte::*;

use crate::reader::{ReadResult, Reader, ReaderErrorKind};
use core::fmt;

/// The header timing type.
///
/// This is either the number of ticks per quarter note or
/// the alternative SMPTE format, selected by bit 15 of the division field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Timing {
    /// The file's delta times are defined using a tick rate per quarter note
    TicksPerQuarterNote(u16),

    /// The file's delta times are defined using SMPTE frames
    Smpte {
        /// Frames per second
        fps: SmpteFps,
        /// Ticks in each frame
        ticks_per_frame: u8,
    },
}

impl Timing {
    pub(crate) fn read(reader: &mut Reader<'_>) -> ReadResult<Self> {
        let raw = reader.read_fixed(2)? as u16;
        Self::from_division(raw).map_err(|kind| reader.error(kind))
    }

    /// Interpret the raw 16-bit division field of the header.
    pub fn from_division(raw: u16) -> Result<Self, ReaderErrorKind> {
        let [msb, lsb] = raw.to_be_bytes();
        match msb >> 7 {
            0 => Ok(Timing::TicksPerQuarterNote(raw & 0x7FFF)),
            _ => {
                // bits 14 thru 8 hold -24, -25, -29 or -30
                let fps = SmpteFps::from_negative(msb as i8)
                    .ok_or(ReaderErrorKind::BadSmpteRate(msb as i8))?;
                Ok(Timing::Smpte {
                    fps,
                    ticks_per_frame: lsb,
                })
            }
        }
    }

    /// The division field as the header stores it, read as signed.
    ///
    /// SMPTE divisions come out negative.
    pub const fn raw_division(&self) -> i16 {
        match self {
            Self::TicksPerQuarterNote(t) => *t as i16,
            Self::Smpte {
                fps,
                ticks_per_frame,
            } => i16::from_be_bytes([fps.to_negative() as u8, *ticks_per_frame]),
        }
    }

    /// Number of ticks in one time unit.
    ///
    /// The unit is a quarter note for musical timing and one second for
    /// SMPTE timing. Never zero, so it is always safe to divide by.
    pub fn unit_ticks(&self) -> u64 {
        let ticks = match self {
            Self::TicksPerQuarterNote(t) => *t as u64,
            Self::Smpte {
                fps,
                ticks_per_frame,
            } => fps.as_division() as u64 * *ticks_per_frame as u64,
        };
        ticks.max(1)
    }

    /// Duration of one time unit in microseconds.
    ///
    /// `tempo` is the track's (speed scaled) microseconds per quarter note.
    /// SMPTE time ignores tempo but still honours the speed factor.
    pub fn unit_micros(&self, tempo: u64, speed_factor: u32) -> u64 {
        match self {
            Self::TicksPerQuarterNote(_) => tempo,
            Self::Smpte { .. } => 10_000 * speed_factor as u64,
        }
    }
}

impl fmt::Display for Timing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw_division())
    }
}
