use super::{DecodedEvent, Event, MetaEvent, MetaKind};
use crate::file::Chunk;
use crate::reader::{ReadResult, ReaderErrorKind};
use log::warn;

impl<'a> Chunk<'a> {
    /// Decode the delta-time in front of the next event.
    ///
    /// A delta-time must be followed by an event.
    pub fn read_delta(&mut self) -> ReadResult<u32> {
        let delta = self.reader.read_varint()?;
        if !self.has_remaining() {
            return Err(self.reader.error(ReaderErrorKind::Truncated));
        }
        self.delta_time = delta;
        Ok(delta)
    }

    /// Decode one event at the cursor.
    ///
    /// A byte with bit 7 set is a new status; channel-voice statuses
    /// become the running status. A data byte reuses the running status,
    /// which must be set. SysEx and meta-events clear the running status.
    pub fn read_event(&mut self) -> ReadResult<DecodedEvent<'a>> {
        let start = self.reader.buffer_position();
        let first = self.reader.peek()?;

        let (status, running) = if first & 0x80 != 0 {
            self.reader.read_u8()?;
            if first < 0xF0 {
                self.running_status = Some(first);
            }
            (first, false)
        } else {
            let status = self
                .running_status
                .ok_or_else(|| self.reader.error(ReaderErrorKind::MissingRunningStatus))?;
            (status, true)
        };

        let channel = status & 0x0F;
        let event = match status & 0xF0 {
            0x80 => Event::NoteOff {
                channel,
                pitch: self.reader.read_u7()?,
                velocity: self.reader.read_u7()?,
            },
            0x90 => Event::NoteOn {
                channel,
                pitch: self.reader.read_u7()?,
                velocity: self.reader.read_u7()?,
            },
            0xA0 => Event::KeyPressure {
                channel,
                pitch: self.reader.read_u7()?,
                pressure: self.reader.read_u7()?,
            },
            0xB0 => Event::ControlChange {
                channel,
                controller: self.reader.read_u7()?,
                value: self.reader.read_u7()?,
            },
            0xC0 => Event::ProgramChange {
                channel,
                program: self.reader.read_u7()?,
            },
            0xD0 => Event::ChannelPressure {
                channel,
                pressure: self.reader.read_u7()?,
            },
            0xE0 => Event::PitchWheel {
                channel,
                value: self.reader.read_u14()? as i16 - 0x2000,
            },
            _ => {
                self.running_status = None;
                self.read_system(status)?
            }
        };

        Ok(DecodedEvent {
            event,
            span: start..self.reader.buffer_position(),
            running,
        })
    }

    fn read_system(&mut self, status: u8) -> ReadResult<Event<'a>> {
        let event = match status {
            0xF0 => {
                let length = self.reader.read_varint()?;
                Event::SysEx(self.reader.read_bytes(length as usize)?)
            }
            0xF7 => {
                let length = self.reader.read_varint()?;
                Event::SysExContinuation(self.reader.read_bytes(length as usize)?)
            }
            0xFF => Event::Meta(self.read_meta()?),
            _ => {
                let data = self.reader.read_data_run();
                warn!(
                    "trk{}: undefined status {status:#04x} with {} data byte(s) at byte {}",
                    self.track_index(),
                    data.len(),
                    self.reader.buffer_position() - data.len() - 1
                );
                Event::Unrecognized { status, data }
            }
        };
        Ok(event)
    }

    fn read_meta(&mut self) -> ReadResult<MetaEvent<'a>> {
        let kind = self.reader.read_u7()?;
        let length = self.reader.read_varint()?;

        let Ok(known) = MetaKind::try_from(kind) else {
            let data = self.payload(length)?;
            return Ok(MetaEvent::Unrecognized { kind, data });
        };

        let meta = match known {
            MetaKind::EndOfTrack => {
                if length != 0 {
                    return Err(self
                        .reader
                        .error(ReaderErrorKind::EndOfTrackLength(length)));
                }
                MetaEvent::EndOfTrack
            }
            MetaKind::SetTempo => {
                if length != 3 {
                    return Err(self.reader.error(ReaderErrorKind::TempoLength(length)));
                }
                MetaEvent::SetTempo(self.reader.read_fixed(3)?)
            }
            MetaKind::Text => MetaEvent::Text(self.payload(length)?),
            MetaKind::Copyright => MetaEvent::Copyright(self.payload(length)?),
            MetaKind::SequenceName => MetaEvent::SequenceName(self.payload(length)?),
            MetaKind::InstrumentName => MetaEvent::InstrumentName(self.payload(length)?),
            MetaKind::Lyric => MetaEvent::Lyric(self.payload(length)?),
            MetaKind::Marker => MetaEvent::Marker(self.payload(length)?),
            MetaKind::CueText => MetaEvent::CueText(self.payload(length)?),
            MetaKind::SmpteOffset => MetaEvent::SmpteOffset(self.payload(length)?),
            MetaKind::TimeSignature => MetaEvent::TimeSignature(self.payload(length)?),
            MetaKind::KeySignature => MetaEvent::KeySignature(self.payload(length)?),
            MetaKind::SequencerSpecific => MetaEvent::SequencerSpecific(self.payload(length)?),
        };
        Ok(meta)
    }

    fn payload(&mut self, length: u32) -> ReadResult<&'a [u8]> {
        self.reader.read_bytes(length as usize)
    }

    /// Walk the track from its first event, rewinding it first.
    pub fn events(&mut self) -> TrackEvents<'_, 'a> {
        TrackEvents {
            chunk: self,
            started: false,
            done: false,
        }
    }
}

/// An event with its timing inside the track.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticked<'a> {
    /// Ticks since the previous event of the track
    pub delta: u32,
    /// Ticks since the start of the track
    pub accumulated_ticks: u64,
    /// The event and where it was found
    pub decoded: DecodedEvent<'a>,
}

impl<'a> Ticked<'a> {
    /// The decoded event
    pub fn event(&self) -> &Event<'a> {
        &self.decoded.event
    }
}

/// An iterator returned from [`Chunk::events`].
///
/// Stops after the first error.
pub struct TrackEvents<'c, 'a> {
    chunk: &'c mut Chunk<'a>,
    started: bool,
    done: bool,
}

impl<'a> TrackEvents<'_, 'a> {
    fn step(&mut self) -> ReadResult<Option<Ticked<'a>>> {
        if self.started {
            if !self.chunk.has_remaining() {
                return Ok(None);
            }
            let delta = self.chunk.read_delta()?;
            self.chunk.time_next += delta as u64;
        } else {
            self.started = true;
            let tempo = self.chunk.tempo();
            self.chunk.rewind(tempo)?;
            if self.chunk.data().is_empty() {
                return Ok(None);
            }
        }
        let delta = self.chunk.delta_time();
        let accumulated_ticks = self.chunk.time_next();
        let decoded = self.chunk.read_event()?;
        Ok(Some(Ticked {
            delta,
            accumulated_ticks,
            decoded,
        }))
    }
}

impl<'a> Iterator for TrackEvents<'_, 'a> {
    type Item = ReadResult<Ticked<'a>>;
    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.step() {
            Ok(Some(ticked)) => Some(Ok(ticked)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}
