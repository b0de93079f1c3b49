#![doc = r#"
Chunk framing and the per-track playback state

# Overview

A MIDI file is a sequence of chunks, each a 4-byte ASCII tag followed by a
32-bit big-endian length and that many bytes of data:

```text
[Header Chunk: "MThd" len=6 format:2 tracks:2 division:2]
[Track Chunk 1: "MTrk" len=N  delta/event pairs...]
...
[Track Chunk N: "MTrk" ...]
```

A [`Chunk`] never copies its bytes. It is a window `[start, limit)` into the
file buffer plus the mutable state a player needs while walking a track:
the cursor, the running status, the tempo, the pending delta-time and the
absolute tick of the next event.
"#]

use crate::prelude::*;
use crate::reader::{ReadResult, Reader, ReaderError, ReaderErrorKind};
use core::ops::Range;

/// Tag of the header chunk.
pub const HEADER_TAG: &[u8; 4] = b"MThd";
/// Tag of every track chunk.
pub const TRACK_TAG: &[u8; 4] = b"MTrk";

const FRAME_LEN: usize = 8;

/// A view of one chunk plus its playback state.
#[derive(Debug, Clone)]
pub struct Chunk<'a> {
    pub(crate) reader: Reader<'a>,
    start: usize,
    pub(crate) running_status: Option<u8>,
    pub(crate) tempo: u64,
    pub(crate) delta_time: u32,
    pub(crate) time_next: u64,
}

impl<'a> Chunk<'a> {
    fn framed(buffer: &'a [u8], start: usize, limit: usize, track: u16) -> Self {
        Self {
            reader: Reader::window(buffer, start + FRAME_LEN, limit, track),
            start,
            running_status: None,
            tempo: 0,
            delta_time: 0,
            time_next: 0,
        }
    }

    /// Offset of the chunk tag in the file.
    pub const fn start(&self) -> usize {
        self.start
    }
    /// Offset of the first byte after the length field.
    pub const fn data_start(&self) -> usize {
        self.start + FRAME_LEN
    }
    /// One byte past the end of the chunk.
    pub const fn limit(&self) -> usize {
        self.reader.limit()
    }
    /// Current read position.
    pub const fn cursor(&self) -> usize {
        self.reader.buffer_position()
    }
    /// 0 for the header, 1..N for tracks.
    pub const fn track_index(&self) -> u16 {
        self.reader.track()
    }
    /// True while events remain to be decoded.
    pub const fn has_remaining(&self) -> bool {
        !self.reader.is_at_end()
    }
    /// Last channel-voice status seen, if any.
    pub const fn running_status(&self) -> Option<u8> {
        self.running_status
    }
    /// Microseconds per quarter note, speed factor included.
    pub const fn tempo(&self) -> u64 {
        self.tempo
    }
    /// Overwrite the tempo, as a Set Tempo meta-event does.
    pub fn set_tempo(&mut self, tempo: u64) {
        self.tempo = tempo;
    }
    /// Delta-time preceding the pending event.
    pub const fn delta_time(&self) -> u32 {
        self.delta_time
    }
    /// Absolute tick of the pending event.
    pub const fn time_next(&self) -> u64 {
        self.time_next
    }
    /// The chunk data, without tag and length.
    pub fn data(&self) -> &'a [u8] {
        &self.reader.buffer()[self.data_start()..self.limit()]
    }
    /// Original bytes of a span reported by the decoder.
    pub fn bytes(&self, span: Range<usize>) -> &'a [u8] {
        &self.reader.buffer()[span]
    }

    /// Put the cursor back on the first delta-time and reset the state.
    ///
    /// The first delta is decoded immediately, so `time_next` holds the
    /// tick of the first event. An empty track is left exhausted.
    pub fn rewind(&mut self, tempo: u64) -> ReadResult<()> {
        self.reader.seek(self.data_start())?;
        self.running_status = None;
        self.tempo = tempo;
        self.delta_time = 0;
        self.time_next = 0;
        if self.has_remaining() {
            self.delta_time = self.reader.read_varint()?;
            self.time_next = self.delta_time as u64;
        }
        Ok(())
    }
}

fn read_frame(buffer: &[u8], cursor: usize, track: u16) -> ReadResult<([u8; 4], usize)> {
    let mut reader = Reader::window(buffer, cursor, buffer.len(), track);
    if reader.remaining() < FRAME_LEN {
        return Err(ReaderError::truncated(buffer.len(), track));
    }
    let tag = reader.read_bytes(4)?;
    let tag = [tag[0], tag[1], tag[2], tag[3]];
    let length = reader.read_fixed(4)? as usize;
    Ok((tag, length))
}

/// Read the `MThd` chunk at the start of `buffer`.
pub fn read_header(buffer: &[u8]) -> ReadResult<(Header, Chunk<'_>)> {
    let (tag, length) = read_frame(buffer, 0, 0)?;
    if &tag != HEADER_TAG {
        return Err(ReaderError::new(0, 0, ReaderErrorKind::BadHeaderTag));
    }
    if length != 6 {
        return Err(ReaderError::new(
            4,
            0,
            ReaderErrorKind::BadHeaderLength(length as u32),
        ));
    }
    let limit = FRAME_LEN + length;
    if limit > buffer.len() {
        return Err(ReaderError::truncated(buffer.len(), 0));
    }

    let mut chunk = Chunk::framed(buffer, 0, limit, 0);
    let reader = &mut chunk.reader;

    let raw_format = reader.read_fixed(2)? as u16;
    let format = FormatType::try_from(raw_format)
        .map_err(|_| ReaderError::new(FRAME_LEN, 0, ReaderErrorKind::BadFormat(raw_format)))?;
    let track_count = reader.read_fixed(2)? as u16;
    let timing = Timing::read(reader)?;

    Ok((Header::new(format, track_count, timing), chunk))
}

/// Read the `MTrk` chunk starting at `cursor`.
///
/// `track` is the 1-based index used in diagnostics.
pub fn read_next_track(buffer: &[u8], cursor: usize, track: u16) -> ReadResult<Chunk<'_>> {
    let (tag, length) = read_frame(buffer, cursor, track)?;
    if &tag != TRACK_TAG {
        return Err(ReaderError::new(
            cursor,
            track,
            ReaderErrorKind::BadTrackTag(tag),
        ));
    }
    let limit = cursor + FRAME_LEN + length;
    if limit > buffer.len() {
        return Err(ReaderError::truncated(buffer.len(), track));
    }
    Ok(Chunk::framed(buffer, cursor, limit, track))
}
