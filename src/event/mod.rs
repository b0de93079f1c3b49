#![doc = r#"
Decoded track events

# Hierarchy
```text
                     |-------|
                     | Event |
                     |-------|
          /              |              \
|---------------|  |-----------|  |-----------|
| Channel Voice |  | SysEx (F0 |  | Meta (FF) |
| 0x80..=0xEF   |  | and F7)   |  |           |
|---------------|  |-----------|  |-----------|
```

Channel-voice events carry their channel (0..=15). Everything else borrows
its payload straight from the file buffer.
"#]

mod decoder;
pub use decoder::*;

mod display;

use alloc::vec::Vec;
use core::ops::Range;
use num_enum::{IntoPrimitive, TryFromPrimitive};

/// A decoded event from a track chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event<'a> {
    /// `0x8n`
    NoteOff {
        /// 0..=15
        channel: u8,
        /// Key number
        pitch: u8,
        /// Release velocity
        velocity: u8,
    },
    /// `0x9n`. Velocity 0 means note off, see [`Event::is_note_off`].
    NoteOn {
        /// 0..=15
        channel: u8,
        /// Key number
        pitch: u8,
        /// Attack velocity
        velocity: u8,
    },
    /// `0xAn` polyphonic aftertouch
    KeyPressure {
        /// 0..=15
        channel: u8,
        /// Key number
        pitch: u8,
        /// Pressure amount
        pressure: u8,
    },
    /// `0xBn`
    ControlChange {
        /// 0..=15
        channel: u8,
        /// Controller number
        controller: u8,
        /// Controller setting
        value: u8,
    },
    /// `0xCn`
    ProgramChange {
        /// 0..=15
        channel: u8,
        /// Program number
        program: u8,
    },
    /// `0xDn` channel aftertouch
    ChannelPressure {
        /// 0..=15
        channel: u8,
        /// Pressure amount
        pressure: u8,
    },
    /// `0xEn`, centered on zero: -8192..=8191
    PitchWheel {
        /// 0..=15
        channel: u8,
        /// Signed bend
        value: i16,
    },
    /// `F0 <len> <bytes>`, the bytes following the `F0` status
    SysEx(&'a [u8]),
    /// `F7 <len> <bytes>`, a continuation packet or an escape
    SysExContinuation(&'a [u8]),
    /// `FF <type> <len> <bytes>`
    Meta(MetaEvent<'a>),
    /// Any other `0xF?` status followed by stray data bytes
    Unrecognized {
        /// The status byte
        status: u8,
        /// Data bytes up to the next status byte
        data: &'a [u8],
    },
}

impl Event<'_> {
    /// The channel of a channel-voice event.
    pub const fn channel(&self) -> Option<u8> {
        match *self {
            Self::NoteOff { channel, .. }
            | Self::NoteOn { channel, .. }
            | Self::KeyPressure { channel, .. }
            | Self::ControlChange { channel, .. }
            | Self::ProgramChange { channel, .. }
            | Self::ChannelPressure { channel, .. }
            | Self::PitchWheel { channel, .. } => Some(channel),
            _ => None,
        }
    }

    /// The status byte of a channel-voice event.
    pub const fn status(&self) -> Option<u8> {
        let kind = match self {
            Self::NoteOff { .. } => 0x80,
            Self::NoteOn { .. } => 0x90,
            Self::KeyPressure { .. } => 0xA0,
            Self::ControlChange { .. } => 0xB0,
            Self::ProgramChange { .. } => 0xC0,
            Self::ChannelPressure { .. } => 0xD0,
            Self::PitchWheel { .. } => 0xE0,
            _ => return None,
        };
        match self.channel() {
            Some(channel) => Some(kind | (channel & 0x0F)),
            None => None,
        }
    }

    /// True for events addressed to a channel.
    pub const fn is_channel_voice(&self) -> bool {
        self.channel().is_some()
    }

    /// True for note offs, including note ons with velocity 0.
    pub const fn is_note_off(&self) -> bool {
        matches!(
            self,
            Self::NoteOff { .. } | Self::NoteOn { velocity: 0, .. }
        )
    }

    /// True for note ons with a non-zero velocity.
    pub const fn is_note_on(&self) -> bool {
        matches!(self, Self::NoteOn { velocity, .. } if *velocity > 0)
    }

    /// True for events changing the sounding notes.
    pub const fn is_note(&self) -> bool {
        matches!(self, Self::NoteOff { .. } | Self::NoteOn { .. })
    }

    /// Returns the microseconds per quarter note of a Set Tempo meta-event.
    pub const fn tempo(&self) -> Option<u32> {
        match self {
            Self::Meta(MetaEvent::SetTempo(tempo)) => Some(*tempo),
            _ => None,
        }
    }

    /// Append the wire encoding of channel-voice and sysex events.
    ///
    /// `include_status` is ignored for sysex, which always needs its
    /// status. Meta-events and unrecognized events have no wire form and
    /// append nothing.
    pub fn encode(&self, out: &mut Vec<u8>, include_status: bool) {
        if let Some(status) = self.status() {
            if include_status {
                out.push(status);
            }
        }
        match *self {
            Self::NoteOff {
                pitch, velocity, ..
            }
            | Self::NoteOn {
                pitch, velocity, ..
            } => out.extend_from_slice(&[pitch, velocity]),
            Self::KeyPressure {
                pitch, pressure, ..
            } => out.extend_from_slice(&[pitch, pressure]),
            Self::ControlChange {
                controller, value, ..
            } => out.extend_from_slice(&[controller, value]),
            Self::ProgramChange { program, .. } => out.push(program),
            Self::ChannelPressure { pressure, .. } => out.push(pressure),
            Self::PitchWheel { value, .. } => {
                let raw = (value as i32 + 0x2000).clamp(0, 0x3FFF) as u16;
                out.extend_from_slice(&[(raw >> 7) as u8, (raw & 0x7F) as u8]);
            }
            Self::SysEx(data) => {
                out.push(0xF0);
                out.extend_from_slice(data);
            }
            Self::SysExContinuation(data) => out.extend_from_slice(data),
            Self::Meta(_) | Self::Unrecognized { .. } => {}
        }
    }
}

/// Meta-event type codes with a known meaning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, TryFromPrimitive, IntoPrimitive)]
#[repr(u8)]
#[allow(missing_docs)]
pub enum MetaKind {
    Text = 0x01,
    Copyright = 0x02,
    SequenceName = 0x03,
    InstrumentName = 0x04,
    Lyric = 0x05,
    Marker = 0x06,
    CueText = 0x07,
    EndOfTrack = 0x2F,
    SetTempo = 0x51,
    SmpteOffset = 0x54,
    TimeSignature = 0x58,
    KeySignature = 0x59,
    SequencerSpecific = 0x7F,
}

/// A meta-event. Payloads are kept as raw bytes except for Set Tempo.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum MetaEvent<'a> {
    Text(&'a [u8]),
    Copyright(&'a [u8]),
    SequenceName(&'a [u8]),
    InstrumentName(&'a [u8]),
    Lyric(&'a [u8]),
    Marker(&'a [u8]),
    CueText(&'a [u8]),
    EndOfTrack,
    /// Microseconds per quarter note
    SetTempo(u32),
    SmpteOffset(&'a [u8]),
    TimeSignature(&'a [u8]),
    KeySignature(&'a [u8]),
    SequencerSpecific(&'a [u8]),
    /// A type code without a known meaning
    Unrecognized {
        kind: u8,
        data: &'a [u8],
    },
}

impl<'a> MetaEvent<'a> {
    /// The raw type byte.
    pub fn kind(&self) -> u8 {
        let kind = match self {
            Self::Text(_) => MetaKind::Text,
            Self::Copyright(_) => MetaKind::Copyright,
            Self::SequenceName(_) => MetaKind::SequenceName,
            Self::InstrumentName(_) => MetaKind::InstrumentName,
            Self::Lyric(_) => MetaKind::Lyric,
            Self::Marker(_) => MetaKind::Marker,
            Self::CueText(_) => MetaKind::CueText,
            Self::EndOfTrack => MetaKind::EndOfTrack,
            Self::SetTempo(_) => MetaKind::SetTempo,
            Self::SmpteOffset(_) => MetaKind::SmpteOffset,
            Self::TimeSignature(_) => MetaKind::TimeSignature,
            Self::KeySignature(_) => MetaKind::KeySignature,
            Self::SequencerSpecific(_) => MetaKind::SequencerSpecific,
            Self::Unrecognized { kind, .. } => return *kind,
        };
        kind.into()
    }

    /// The text of textual meta-events.
    pub const fn text(&self) -> Option<&'a [u8]> {
        match *self {
            Self::Text(t)
            | Self::Copyright(t)
            | Self::SequenceName(t)
            | Self::InstrumentName(t)
            | Self::Lyric(t)
            | Self::Marker(t)
            | Self::CueText(t) => Some(t),
            _ => None,
        }
    }
}

/// An event as it was found in the file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedEvent<'a> {
    /// The decoded event
    pub event: Event<'a>,
    /// Absolute offsets of the encoded event, delta-time excluded
    pub span: Range<usize>,
    /// True when the event reused the running status instead of
    /// carrying its own status byte
    pub running: bool,
}
