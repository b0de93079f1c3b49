#![allow(dead_code)]

use smfplay::reader::encode_varint;

/// Assembles Standard MIDI File bytes in memory.
pub struct SmfBuilder {
    format: u16,
    division: u16,
    tracks: Vec<Vec<u8>>,
}

impl SmfBuilder {
    pub fn new(format: u16, division: u16) -> Self {
        Self {
            format,
            division,
            tracks: Vec::new(),
        }
    }

    /// Add a track, End of Track appended.
    pub fn track(mut self, track: Track) -> Self {
        let mut data = track.data;
        data.extend_from_slice(&[0x00, 0xFF, 0x2F, 0x00]);
        self.tracks.push(data);
        self
    }

    /// Add a track chunk holding exactly `data`.
    pub fn raw_track(mut self, data: &[u8]) -> Self {
        self.tracks.push(data.to_vec());
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let mut bytes = b"MThd\0\0\0\x06".to_vec();
        bytes.extend_from_slice(&self.format.to_be_bytes());
        bytes.extend_from_slice(&(self.tracks.len() as u16).to_be_bytes());
        bytes.extend_from_slice(&self.division.to_be_bytes());
        for data in &self.tracks {
            bytes.extend_from_slice(b"MTrk");
            bytes.extend_from_slice(&(data.len() as u32).to_be_bytes());
            bytes.extend_from_slice(data);
        }
        bytes
    }
}

/// Delta-time and event pairs of one track.
#[derive(Default)]
pub struct Track {
    data: Vec<u8>,
}

impl Track {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn event(mut self, delta: u32, bytes: &[u8]) -> Self {
        encode_varint(delta, &mut self.data);
        self.data.extend_from_slice(bytes);
        self
    }
}

pub const SIMPLE: &[u8] = include_bytes!("../assets/simple.mid");
