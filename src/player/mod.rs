#![doc = r#"
Real-time playback of all tracks at once

# Overview

The [`Scheduler`] interleaves the tracks of a [`MidiFile`] in tick order.
Each round it picks the track whose next event is due first, waits until
that event's wall-clock time, fires it and reads the delta-time that
follows.

```text
loop:
    select  track with the smallest time_next
    pace    sleep(wanted - real) when more than the slack ahead
    warp    drop whole time units from every track, move the reference
    fire    decode, transform, dump, forward
    advance time_next = current tick + next delta
```

Waiting compares the wanted time of the event, measured from a reference
instant, against the real time elapsed since that instant, so lateness
from decoding or from the OS does not accumulate. Whole units of ticks
(a quarter note, or a second for SMPTE files) are regularly subtracted
from every track and added to the reference instant, so tick counts stay
small on long files without losing precision.
"#]

mod clock;
pub use clock::*;

mod output;
pub use output::*;

mod sink;
pub use sink::*;

use crate::dump::Dumper;
use crate::error::Result;
use crate::event::Event;
use crate::file::{Chunk, MidiFile};
use crate::micros::{Micros, UMicros};
use crate::options::PlayOptions;
use log::{debug, info, trace};
use std::io::Write;

/// Lateness tolerated before a wait is worth a sleep.
pub const SLACK: UMicros = UMicros::new(1_000);

/// What a run did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PlaybackReport {
    /// Events decoded and processed
    pub events_fired: usize,
    /// Events sent to the output
    pub events_forwarded: usize,
    /// Ticks from the start to the last event
    pub final_tick: u64,
    /// Notes still sounding at the end, then turned off
    pub notes_silenced: usize,
}

/// Index of the track with data whose next event comes first.
///
/// On equal ticks the first track in order wins.
pub fn select_next(tracks: &[Chunk<'_>], active: &[bool]) -> Option<usize> {
    let mut earliest: Option<usize> = None;
    for (index, chunk) in tracks.iter().enumerate() {
        if !active.get(index).copied().unwrap_or(false) || !chunk.has_remaining() {
            continue;
        }
        match earliest {
            Some(best) if tracks[best].time_next() <= chunk.time_next() => {}
            _ => earliest = Some(index),
        }
    }
    earliest
}

/// Time of `ticks` after the reference instant.
pub fn ticks_to_micros(ticks: u64, unit_micros: u64, unit_ticks: u64) -> UMicros {
    UMicros::new(ticks * unit_micros / unit_ticks.max(1))
}

/// Subtract the whole units held by `time_next` from every track with data.
///
/// Returns the number of units removed; the caller moves its reference
/// instant forward by as many units of time.
pub fn warp(tracks: &mut [Chunk<'_>], active: &[bool], time_next: u64, unit_ticks: u64) -> u64 {
    if time_next <= unit_ticks {
        return 0;
    }
    let leaps = time_next / unit_ticks;
    let shift = leaps * unit_ticks;
    for (chunk, _) in tracks
        .iter_mut()
        .zip(active)
        .filter(|(chunk, on)| **on && chunk.has_remaining())
    {
        chunk.time_next -= shift;
    }
    leaps
}

/// Paces and fires the events of a [`MidiFile`].
pub struct Scheduler<'o, C> {
    options: &'o PlayOptions,
    clock: C,
}

impl<'o, C: Clock> Scheduler<'o, C> {
    /// Schedule with `options` against `clock`.
    pub fn new(options: &'o PlayOptions, clock: C) -> Self {
        Self { options, clock }
    }

    /// Decode every event in tick order without waiting or output.
    pub fn analyze<W: Write>(
        &mut self,
        file: &mut MidiFile<'_>,
        dumper: &mut Dumper<W>,
    ) -> Result<PlaybackReport> {
        self.run::<NullSink, W>(file, dumper, None)
    }

    /// Play in real time into `output`, then silence what still sounds.
    pub fn play<S: OutputSink, W: Write>(
        &mut self,
        file: &mut MidiFile<'_>,
        output: &mut Output<S>,
        dumper: &mut Dumper<W>,
    ) -> Result<PlaybackReport> {
        info!("playing {} track(s), {}", file.tracks().len(), file.header());
        let mut report = self.run(file, dumper, Some(&mut *output))?;
        report.notes_silenced = output.silence()?;
        info!(
            "played {} event(s), forwarded {}",
            report.events_fired, report.events_forwarded
        );
        Ok(report)
    }

    fn run<S: OutputSink, W: Write>(
        &mut self,
        file: &mut MidiFile<'_>,
        dumper: &mut Dumper<W>,
        mut output: Option<&mut Output<S>>,
    ) -> Result<PlaybackReport> {
        let options = self.options;
        let header = *file.header();
        let timing = *header.timing();
        let shares_tempo = header.format().shares_tempo();
        let unit_ticks = timing.unit_ticks();
        let paced = output.is_some();

        let tracks = file.tracks_mut();
        let active: Vec<bool> = tracks
            .iter()
            .map(|chunk| options.selects_track(chunk.track_index()))
            .collect();
        for (chunk, _) in tracks.iter_mut().zip(&active).filter(|(_, on)| **on) {
            chunk.rewind(options.initial_tempo())?;
        }

        let ticks_per_bar = options
            .excerpt
            .map(|excerpt| unit_ticks * excerpt.beats_per_bar as u64);

        let mut reference = self.clock.now();
        let mut current_tick: u64 = 0;
        let mut elapsed_ticks: u64 = 0;
        let mut muted = options.excerpt.is_some_and(|excerpt| excerpt.mutes(0));
        let mut report = PlaybackReport::default();

        while let Some(index) = select_next(tracks, &active) {
            let time_next = tracks[index].time_next();

            if current_tick < time_next {
                elapsed_ticks += time_next - current_tick;
                if let (Some(excerpt), Some(ticks_per_bar)) = (options.excerpt, ticks_per_bar) {
                    let bar = elapsed_ticks / ticks_per_bar;
                    muted = excerpt.mutes(bar);
                }

                let unit_micros = timing.unit_micros(tracks[index].tempo(), options.speed_factor);
                if paced {
                    let wanted = ticks_to_micros(time_next, unit_micros, unit_ticks);
                    if muted {
                        reference = self.clock.now() - wanted;
                    } else {
                        self.pace(reference, wanted, dumper)?;
                    }
                }

                if paced {
                    let leaps = warp(tracks, &active, time_next, unit_ticks);
                    if leaps > 0 {
                        reference += UMicros::new(leaps * unit_micros);
                    }
                }
                current_tick = tracks[index].time_next();
            }

            let chunk = &mut tracks[index];
            let track = chunk.track_index();
            let delta = chunk.delta_time();
            let decoded = chunk.read_event()?;
            trace!("trk{track}: {} at tick {elapsed_ticks}", decoded.event);

            if let Some(raw) = decoded.event.tempo() {
                let tempo = options.scaled_tempo(raw);
                debug!("trk{track}: tempo {raw} -> {tempo} us per quarter note");
                if shares_tempo {
                    for (chunk, _) in tracks.iter_mut().zip(&active).filter(|(_, on)| **on) {
                        chunk.set_tempo(tempo);
                    }
                } else {
                    tracks[index].set_tempo(tempo);
                }
            }

            report.events_fired += 1;
            if let Some(event) = options.transform.apply(decoded.event) {
                dumper.event(track, delta, &event)?;
                if let Some(output) = output.as_deref_mut() {
                    if Self::audible(&event, muted) && output.forward(&event, decoded.running)? {
                        report.events_forwarded += 1;
                    }
                }
            }

            let chunk = &mut tracks[index];
            if chunk.has_remaining() {
                let delta = chunk.read_delta()?;
                chunk.time_next = current_tick + delta as u64;
            }
        }

        dumper.flush()?;
        report.final_tick = elapsed_ticks;
        Ok(report)
    }

    fn audible(event: &Event<'_>, muted: bool) -> bool {
        !(muted && event.is_note())
    }

    fn pace<W: Write>(
        &mut self,
        reference: Micros,
        wanted: UMicros,
        dumper: &mut Dumper<W>,
    ) -> Result<()> {
        let real = self.clock.now() - reference;
        let Some(ahead) = (wanted.to_micros() - real).to_unsigned() else {
            return Ok(());
        };
        if ahead > SLACK {
            dumper.flush()?;
            self.clock.sleep(ahead);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests;
