//! Per-event rewrites applied before rendering and forwarding.

use crate::event::Event;

/// Channel and pitch rewrites chosen on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Transform {
    /// Semitones added to note pitches
    pub transpose: i8,
    /// Channel whose notes are never transposed, 0..=15
    pub drum_channel: u8,
    /// Send every channel-voice event on channel 0
    pub channel_zero: bool,
    /// Drop program changes so the receiver keeps its instruments
    pub freeze_channel: bool,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            transpose: 0,
            drum_channel: 9,
            channel_zero: false,
            freeze_channel: false,
        }
    }
}

impl Transform {
    /// Rewrite `event`, or return `None` when it must be dropped.
    ///
    /// Only note pitches and channels change. A transposition leaving
    /// `1..=127` keeps the original pitch, and pitch 0 is never moved.
    pub fn apply<'a>(&self, event: Event<'a>) -> Option<Event<'a>> {
        if self.freeze_channel && matches!(event, Event::ProgramChange { .. }) {
            return None;
        }

        let mut event = event;
        match &mut event {
            Event::NoteOn { channel, pitch, .. } | Event::NoteOff { channel, pitch, .. } => {
                if *channel != self.drum_channel {
                    *pitch = self.transposed(*pitch);
                }
            }
            _ => {}
        }

        if self.channel_zero {
            event = with_channel_zero(event);
        }
        Some(event)
    }

    fn transposed(&self, pitch: u8) -> u8 {
        if pitch == 0 || self.transpose == 0 {
            return pitch;
        }
        let moved = pitch as i16 + self.transpose as i16;
        if (1..=127).contains(&moved) {
            moved as u8
        } else {
            pitch
        }
    }
}

fn with_channel_zero(event: Event<'_>) -> Event<'_> {
    let mut event = event;
    match &mut event {
        Event::NoteOff { channel, .. }
        | Event::NoteOn { channel, .. }
        | Event::KeyPressure { channel, .. }
        | Event::ControlChange { channel, .. }
        | Event::ProgramChange { channel, .. }
        | Event::ChannelPressure { channel, .. }
        | Event::PitchWheel { channel, .. } => *channel = 0,
        _ => {}
    }
    event
}
