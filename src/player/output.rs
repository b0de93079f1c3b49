use super::sink::{OutputError, OutputSink};
use crate::event::Event;
use log::{debug, trace};
use std::collections::BTreeSet;

/// Encodes events toward a sink.
///
/// Tracks the last status byte the sink received, to omit repeated ones
/// where the sink allows it, and the notes left sounding, to silence them
/// when playback stops.
pub struct Output<S> {
    sink: S,
    forward_sysex: bool,
    last_status: Option<u8>,
    sounding: BTreeSet<(u8, u8)>,
    scratch: Vec<u8>,
}

impl<S: OutputSink> Output<S> {
    /// Forward channel-voice events into `sink`.
    pub fn new(sink: S) -> Self {
        Self {
            sink,
            forward_sysex: false,
            last_status: None,
            sounding: BTreeSet::new(),
            scratch: Vec::with_capacity(8),
        }
    }

    /// Also forward sysex events.
    pub fn with_sysex(mut self, forward_sysex: bool) -> Self {
        self.forward_sysex = forward_sysex;
        self
    }

    /// The wrapped sink
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Give back the sink.
    pub fn into_sink(self) -> S {
        self.sink
    }

    /// `(channel, pitch)` of every note currently on
    pub fn sounding(&self) -> impl Iterator<Item = (u8, u8)> + '_ {
        self.sounding.iter().copied()
    }

    /// Send `event` if its class is forwarded. Returns whether it was sent.
    ///
    /// `running` tells that the event had no status byte in the file. The
    /// status is left out only when the sink allows running status and the
    /// sink received the same status last.
    pub fn forward(&mut self, event: &Event<'_>, running: bool) -> Result<bool, OutputError> {
        self.scratch.clear();
        match event.status() {
            Some(status) => {
                let omit = running
                    && self.sink.accepts_running_status()
                    && self.last_status == Some(status);
                event.encode(&mut self.scratch, !omit);
                self.last_status = Some(status);
                self.track_note(event);
            }
            None => match event {
                Event::SysEx(_) | Event::SysExContinuation(_) if self.forward_sysex => {
                    event.encode(&mut self.scratch, true);
                    self.last_status = None;
                }
                _ => return Ok(false),
            },
        }
        trace!("forward {:02x?}", self.scratch);
        self.sink.send(&self.scratch)?;
        Ok(true)
    }

    fn track_note(&mut self, event: &Event<'_>) {
        match *event {
            Event::NoteOn {
                channel,
                pitch,
                velocity,
            } if velocity > 0 => {
                self.sounding.insert((channel, pitch));
            }
            Event::NoteOn { channel, pitch, .. } | Event::NoteOff { channel, pitch, .. } => {
                self.sounding.remove(&(channel, pitch));
            }
            _ => {}
        }
    }

    /// Send a note off for every sounding note, then flush the sink.
    ///
    /// Returns how many notes were silenced.
    pub fn silence(&mut self) -> Result<usize, OutputError> {
        let notes = core::mem::take(&mut self.sounding);
        for (channel, pitch) in &notes {
            let event = Event::NoteOff {
                channel: *channel,
                pitch: *pitch,
                velocity: 127,
            };
            self.forward(&event, false)?;
        }
        if !notes.is_empty() {
            debug!("silenced {} sounding note(s)", notes.len());
        }
        self.sink.flush()?;
        Ok(notes.len())
    }

    /// Flush the sink.
    pub fn flush(&mut self) -> Result<(), OutputError> {
        self.sink.flush()
    }
}
