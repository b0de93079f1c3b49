#![doc = r#"
Bounds-checked reading of MIDI file bytes

A [`Reader`] is a cursor over a window `[position, limit)` of the immutable
file buffer. It never copies: [`Reader::read_bytes`] hands out slices that
borrow the buffer for its whole lifetime.

# Integer encodings

| Operation                  | Width           | Restriction                     |
|----------------------------|-----------------|---------------------------------|
| [`Reader::read_u7`]        | 1 byte          | high bit clear                  |
| [`Reader::read_u14`]       | 2 bytes         | high bit clear in both, MSB 1st |
| [`Reader::read_fixed`]     | `n` bytes       | none, big-endian                |
| [`Reader::read_varint`]    | 1.. bytes       | continuation flag in bit 7      |
"#]

mod error;
pub use error::*;

mod varint;
pub use varint::*;

/// A cursor over a window of the file buffer.
#[derive(Debug, Clone)]
pub struct Reader<'a> {
    buffer: &'a [u8],
    position: usize,
    limit: usize,
    track: u16,
}

impl<'a> Reader<'a> {
    /// Read the whole buffer, attributing errors to the header chunk.
    pub const fn from_byte_slice(buffer: &'a [u8]) -> Self {
        Self {
            buffer,
            position: 0,
            limit: buffer.len(),
            track: 0,
        }
    }

    /// Read `[position, limit)` of `buffer`; errors name `track`.
    ///
    /// `limit` is clamped to the buffer length.
    pub fn window(buffer: &'a [u8], position: usize, limit: usize, track: u16) -> Self {
        let limit = limit.min(buffer.len());
        Self {
            buffer,
            position: position.min(limit),
            limit,
            track,
        }
    }

    /// Absolute offset of the next byte to be read.
    #[inline]
    pub const fn buffer_position(&self) -> usize {
        self.position
    }

    /// One byte past the readable window.
    #[inline]
    pub const fn limit(&self) -> usize {
        self.limit
    }

    /// The chunk this reader belongs to.
    #[inline]
    pub const fn track(&self) -> u16 {
        self.track
    }

    /// Bytes left before `limit`.
    #[inline]
    pub const fn remaining(&self) -> usize {
        self.limit - self.position
    }

    /// True when the cursor has reached `limit`.
    #[inline]
    pub const fn is_at_end(&self) -> bool {
        self.position >= self.limit
    }

    /// The whole underlying buffer.
    pub const fn buffer(&self) -> &'a [u8] {
        self.buffer
    }

    /// Move the cursor to an absolute position inside the window.
    pub(crate) fn seek(&mut self, position: usize) -> ReadResult<()> {
        if position > self.limit {
            return Err(self.truncated());
        }
        self.position = position;
        Ok(())
    }

    /// Create an error at the current position.
    pub(crate) fn error(&self, kind: ReaderErrorKind) -> ReaderError {
        ReaderError::new(self.position, self.track, kind)
    }

    fn truncated(&self) -> ReaderError {
        ReaderError::truncated(self.position, self.track)
    }

    /// Look at the next byte without consuming it.
    pub fn peek(&self) -> ReadResult<u8> {
        if self.is_at_end() {
            return Err(self.truncated());
        }
        Ok(self.buffer[self.position])
    }

    /// Consume one raw byte.
    pub fn read_u8(&mut self) -> ReadResult<u8> {
        let byte = self.peek()?;
        self.position += 1;
        Ok(byte)
    }

    /// Consume one data byte, which must have its high bit clear.
    pub fn read_u7(&mut self) -> ReadResult<u8> {
        let byte = self.peek()?;
        if byte & 0x80 != 0 {
            return Err(self.error(ReaderErrorKind::UnexpectedHighBit(byte)));
        }
        self.position += 1;
        Ok(byte)
    }

    /// Consume two data bytes as one 14-bit big-endian value.
    ///
    /// This is a fixed width field (pitch wheel), not a continuation
    /// encoded one.
    pub fn read_u14(&mut self) -> ReadResult<u16> {
        if self.remaining() < 2 {
            return Err(self.truncated());
        }
        let msb = self.read_u7()? as u16;
        let lsb = self.read_u7()? as u16;
        Ok((msb << 7) | lsb)
    }

    /// Consume `n` raw bytes as a big-endian unsigned integer.
    ///
    /// `n` is at most 4; header fields, chunk lengths and tempo use this.
    pub fn read_fixed(&mut self, n: usize) -> ReadResult<u32> {
        debug_assert!(n <= 4);
        let bytes = self.read_bytes(n)?;
        Ok(bytes.iter().fold(0, |acc, &b| (acc << 8) | b as u32))
    }

    /// Consume a variable length quantity.
    ///
    /// Each byte contributes its low seven bits, most significant group
    /// first; the first byte with bit 7 clear ends the value. At most four
    /// bytes are accepted.
    pub fn read_varint(&mut self) -> ReadResult<u32> {
        let start = self.position;
        let mut value: u32 = 0;
        for _ in 0..4 {
            let byte = self.read_u8()?;
            value = (value << 7) | (byte & 0x7F) as u32;
            if byte & 0x80 == 0 {
                return Ok(value);
            }
        }
        Err(ReaderError::new(start, self.track, ReaderErrorKind::VarintOverflow))
    }

    /// Borrow the next `n` bytes of the buffer.
    pub fn read_bytes(&mut self, n: usize) -> ReadResult<&'a [u8]> {
        if n > self.remaining() {
            return Err(self.truncated());
        }
        let start = self.position;
        self.position += n;
        Ok(&self.buffer[start..self.position])
    }

    /// Borrow bytes up to, not including, the next byte with bit 7 set.
    pub fn read_data_run(&mut self) -> &'a [u8] {
        let start = self.position;
        while self.position < self.limit && self.buffer[self.position] & 0x80 == 0 {
            self.position += 1;
        }
        &self.buffer[start..self.position]
    }
}
