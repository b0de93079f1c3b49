#![doc = r#"
Rusty representation of a [`MidiFile`]

Parsing only frames the chunks. Events are decoded lazily, one at a time,
by whoever walks a [`Chunk`] (the analyzer or the player).
"#]

mod chunk;
pub use chunk::*;

mod format;
pub use format::*;

mod header;
pub use header::*;

mod timing;
pub use timing::*;

use crate::reader::{ReadResult, ReaderError, ReaderErrorKind};
use alloc::vec::Vec;
use log::debug;

#[doc = r#"
A complete, already loaded Standard MIDI File.

Holds the header and one [`Chunk`] per declared track. The chunks borrow
the buffer; nothing is copied and nothing is reallocated after parsing.
"#]
#[derive(Debug, Clone)]
pub struct MidiFile<'a> {
    buffer: &'a [u8],
    header: Header,
    header_chunk: Chunk<'a>,
    tracks: Vec<Chunk<'a>>,
}

impl<'a> MidiFile<'a> {
    /// Frame the header and every declared track of `buffer`.
    ///
    /// The declared tracks must end exactly at the end of the buffer.
    pub fn parse(buffer: &'a [u8]) -> ReadResult<Self> {
        let (header, header_chunk) = read_header(buffer)?;
        debug!("{header}, {} track(s) declared", header.track_count());

        let mut cursor = header_chunk.limit();
        let mut tracks = Vec::with_capacity(header.track_count() as usize);
        for index in 1..=header.track_count() {
            let chunk = read_next_track(buffer, cursor, index)?;
            debug!(
                "trk{index}: bytes {}..{} ({} data bytes)",
                chunk.start(),
                chunk.limit(),
                chunk.limit() - chunk.data_start()
            );
            cursor = chunk.limit();
            tracks.push(chunk);
        }

        if cursor != buffer.len() {
            return Err(ReaderError::new(
                cursor,
                header.track_count(),
                ReaderErrorKind::TrailingOrMissingData {
                    expected: cursor,
                    actual: buffer.len(),
                },
            ));
        }

        Ok(Self {
            buffer,
            header,
            header_chunk,
            tracks,
        })
    }

    /// Returns header info
    pub fn header(&self) -> &Header {
        &self.header
    }

    /// The `MThd` chunk itself
    pub fn header_chunk(&self) -> &Chunk<'a> {
        &self.header_chunk
    }

    /// The whole file
    pub fn buffer(&self) -> &'a [u8] {
        self.buffer
    }

    /// Returns the track list
    pub fn tracks(&self) -> &[Chunk<'a>] {
        &self.tracks
    }

    /// Mutable access to the track list, for players
    pub fn tracks_mut(&mut self) -> &mut [Chunk<'a>] {
        &mut self.tracks
    }

    /// Returns the track with the given 1-based number
    pub fn track(&self, number: u16) -> Option<&Chunk<'a>> {
        let index = (number as usize).checked_sub(1)?;
        self.tracks.get(index)
    }

    /// Mutable access to the track with the given 1-based number
    pub fn track_mut(&mut self, number: u16) -> Option<&mut Chunk<'a>> {
        let index = (number as usize).checked_sub(1)?;
        self.tracks.get_mut(index)
    }
}
