use num_enum::{IntoPrimitive, TryFromPrimitive};

#[doc = r#"
How the tracks of a file relate to each other

The format only changes playback in one way: a Set Tempo meta-event in a
[`FormatType::Simultaneous`] file drives every track, while in the other
formats it only affects the track that holds it.
"#]
#[derive(Debug, Clone, Copy, PartialEq, Eq, TryFromPrimitive, IntoPrimitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u16)]
pub enum FormatType {
    /// Format 0: one track holding every channel
    SingleMultiChannel = 0,
    /// Format 1: tracks played together, sharing the tempo map
    Simultaneous = 1,
    /// Format 2: independent single-track patterns
    SequentiallyIndependent = 2,
}

impl FormatType {
    /// Returns true when Set Tempo applies to every track.
    pub const fn shares_tempo(&self) -> bool {
        matches!(self, Self::Simultaneous)
    }
}

#[test]
fn converts_from_header_field() {
    assert_eq!(FormatType::try_from(1u16).ok(), Some(FormatType::Simultaneous));
    assert!(FormatType::try_from(3u16).is_err());
    assert_eq!(u16::from(FormatType::SequentiallyIndependent), 2);
}
