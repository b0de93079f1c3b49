use core::fmt;
use thiserror::Error;

#[doc = r#"
A malformed or truncated Standard MIDI File.

Every error remembers the absolute byte offset in the file buffer and the
chunk it happened in, so a diagnostic can point at the exact byte.
"#]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("byte {position} ({}): {kind}", chunk_label(.track))]
pub struct ReaderError {
    position: usize,
    track: u16,
    pub(crate) kind: ReaderErrorKind,
}

/// The condition a [`ReaderError`] violated.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReaderErrorKind {
    /// A read would cross the end of the chunk or of the file.
    #[error("truncated data")]
    Truncated,
    /// A data byte had its high bit set.
    #[error("unexpected high bit in data byte {0:#04x}")]
    UnexpectedHighBit(u8),
    /// The file does not start with `MThd`.
    #[error("missing MThd header tag")]
    BadHeaderTag,
    /// The header chunk does not hold exactly six bytes.
    #[error("header length is {0}, expected 6")]
    BadHeaderLength(u32),
    /// The header format is not 0, 1 or 2.
    #[error("unsupported file format {0}")]
    BadFormat(u16),
    /// The SMPTE division names an unknown frame rate.
    #[error("invalid SMPTE frame rate {0}")]
    BadSmpteRate(i8),
    /// A track chunk does not start with `MTrk`.
    #[error("expected MTrk tag, found {0:02x?}")]
    BadTrackTag([u8; 4]),
    /// The declared tracks do not cover the file exactly.
    #[error("declared tracks end at byte {expected}, file holds {actual} bytes")]
    TrailingOrMissingData {
        /// Where the last declared track ends.
        expected: usize,
        /// The buffer length.
        actual: usize,
    },
    /// A variable length quantity ran past four bytes.
    #[error("variable length quantity longer than 4 bytes")]
    VarintOverflow,
    /// A data byte appeared where a status byte was required.
    #[error("data byte without running status")]
    MissingRunningStatus,
    /// An End of Track meta-event carried a payload.
    #[error("End of Track length is {0}, expected 0")]
    EndOfTrackLength(u32),
    /// A Set Tempo meta-event did not carry three bytes.
    #[error("Set Tempo length is {0}, expected 3")]
    TempoLength(u32),
}

impl ReaderError {
    /// Create a reader error from a position, a track index and kind
    pub const fn new(position: usize, track: u16, kind: ReaderErrorKind) -> Self {
        Self {
            position,
            track,
            kind,
        }
    }
    /// True if the input ended early
    pub const fn is_truncated(&self) -> bool {
        matches!(self.kind, ReaderErrorKind::Truncated)
    }
    /// Returns the error kind of the reader.
    pub fn error_kind(&self) -> &ReaderErrorKind {
        &self.kind
    }
    /// Returns the absolute position where the read error occurred.
    pub fn position(&self) -> usize {
        self.position
    }
    /// Returns the chunk index: 0 for the header, 1..N for tracks.
    pub fn track(&self) -> u16 {
        self.track
    }

    /// Create a new truncation error
    pub const fn truncated(position: usize, track: u16) -> Self {
        Self::new(position, track, ReaderErrorKind::Truncated)
    }
}

/// The Read Result type (see [`ReaderError`])
pub type ReadResult<T> = Result<T, ReaderError>;

struct ChunkLabel(u16);

fn chunk_label(track: &u16) -> ChunkLabel {
    ChunkLabel(*track)
}

impl fmt::Display for ChunkLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            0 => f.write_str("header"),
            n => write!(f, "trk{n}"),
        }
    }
}

#[test]
fn diagnostic_names_offset_track_and_condition() {
    use pretty_assertions::assert_eq;
    let err = ReaderError::new(42, 3, ReaderErrorKind::MissingRunningStatus);
    assert_eq!(
        err.to_string(),
        "byte 42 (trk3): data byte without running status"
    );

    let err = ReaderError::new(0, 0, ReaderErrorKind::BadHeaderTag);
    assert_eq!(err.to_string(), "byte 0 (header): missing MThd header tag");
}
