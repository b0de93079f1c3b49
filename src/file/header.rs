use crate::prelude::*;
use core::fmt;

#[doc = r#"
Information from the `MThd` chunk of a MIDI file
"#]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    format: FormatType,
    track_count: u16,
    timing: Timing,
}

impl Header {
    /// Create a new header
    pub const fn new(format: FormatType, track_count: u16, timing: Timing) -> Self {
        Self {
            format,
            track_count,
            timing,
        }
    }
    /// The file format
    pub const fn format(&self) -> FormatType {
        self.format
    }
    /// Number of `MTrk` chunks the header declares
    pub const fn track_count(&self) -> u16 {
        self.track_count
    }
    /// Get the timing props
    pub const fn timing(&self) -> &Timing {
        &self.timing
    }
}

impl fmt::Display for Header {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Format {}, division {}",
            u16::from(self.format),
            self.timing
        )
    }
}
