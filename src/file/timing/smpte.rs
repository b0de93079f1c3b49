#![doc = r#"
SMPTE frame rates for files whose division counts frames rather than beats.

Playback treats such files as `fps × ticks_per_frame` ticks per second.
The 29.97 drop-frame rate counts as 30 frames, as the file format does for
its division arithmetic.
"#]

/// The possible FPS (Frames Per Second) of a SMPTE division
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SmpteFps {
    /// 24 frames per second
    TwentyFour,
    /// 25 frames per second
    TwentyFive,
    /// 29.97 frames per second, drop frame
    TwentyNine,
    /// 30 frames per second
    Thirty,
}

impl SmpteFps {
    /// Decode the two's complement rate stored in the division high byte.
    pub const fn from_negative(byte: i8) -> Option<Self> {
        match byte {
            -24 => Some(Self::TwentyFour),
            -25 => Some(Self::TwentyFive),
            -29 => Some(Self::TwentyNine),
            -30 => Some(Self::Thirty),
            _ => None,
        }
    }

    /// The two's complement rate as stored in the division high byte.
    pub const fn to_negative(&self) -> i8 {
        match self {
            Self::TwentyFour => -24,
            Self::TwentyFive => -25,
            Self::TwentyNine => -29,
            Self::Thirty => -30,
        }
    }

    /// Get the nominal frame rate as an integer division value.
    ///
    /// Drop-frame 29.97 fps returns 30 here.
    pub const fn as_division(&self) -> u8 {
        match self {
            Self::TwentyFour => 24,
            Self::TwentyFive => 25,
            Self::TwentyNine => 30,
            Self::Thirty => 30,
        }
    }
}

#[test]
fn decodes_all_standard_rates() {
    assert_eq!(SmpteFps::from_negative(-24), Some(SmpteFps::TwentyFour));
    assert_eq!(SmpteFps::from_negative(-25), Some(SmpteFps::TwentyFive));
    assert_eq!(SmpteFps::from_negative(-29), Some(SmpteFps::TwentyNine));
    assert_eq!(SmpteFps::from_negative(-30), Some(SmpteFps::Thirty));
    assert_eq!(SmpteFps::from_negative(-31), None);
    assert_eq!(SmpteFps::TwentyNine.as_division(), 30);
    assert_eq!(SmpteFps::TwentyNine.to_negative(), -29);
}
