#![doc = r#"
Human readable event listing

One line per event, selected by [`DumpFlags`]:

```text
   0  trk1  ch0  on 60 100
  96  trk1  ch0  off 60
   0  trk1  End of Track
```

The delta column is only present with [`DumpFlags::DELTAS`].
"#]

use crate::event::Event;
use core::ops::BitOr;
use std::io::{self, Write};

/// Which event classes the [`Dumper`] prints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DumpFlags(u8);

impl DumpFlags {
    /// Nothing at all
    pub const NONE: Self = Self(0);
    /// Prefix every line with the delta-time
    pub const DELTAS: Self = Self(1 << 0);
    /// Note ons and note offs
    pub const NOTES: Self = Self(1 << 1);
    /// Other channel-voice events, sysex and undefined statuses
    pub const EVENTS: Self = Self(1 << 2);
    /// Meta-events
    pub const METAS: Self = Self(1 << 3);

    /// Keep the known bits of `bits`, drop the others.
    pub const fn from_bits_truncate(bits: u8) -> Self {
        Self(bits & 0x0F)
    }

    /// The raw bits
    pub const fn bits(&self) -> u8 {
        self.0
    }

    /// True when every bit of `other` is set.
    pub const fn contains(&self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// The class bit `event` falls under.
    pub const fn class_of(event: &Event<'_>) -> Self {
        match event {
            Event::NoteOff { .. } | Event::NoteOn { .. } => Self::NOTES,
            Event::Meta(_) => Self::METAS,
            _ => Self::EVENTS,
        }
    }

    /// True when `event` should be printed.
    pub const fn selects(&self, event: &Event<'_>) -> bool {
        self.contains(Self::class_of(event))
    }
}

impl Default for DumpFlags {
    fn default() -> Self {
        Self::METAS
    }
}

impl BitOr for DumpFlags {
    type Output = Self;
    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

/// Writes selected events, one per line.
pub struct Dumper<W> {
    out: W,
    flags: DumpFlags,
}

impl<W: Write> Dumper<W> {
    /// Dump into `out`.
    pub fn new(out: W, flags: DumpFlags) -> Self {
        Self { out, flags }
    }

    /// The active selection
    pub fn flags(&self) -> DumpFlags {
        self.flags
    }

    /// Print `event` of `track` if its class is selected.
    pub fn event(&mut self, track: u16, delta: u32, event: &Event<'_>) -> io::Result<()> {
        if !self.flags.selects(event) {
            return Ok(());
        }
        if self.flags.contains(DumpFlags::DELTAS) {
            write!(self.out, "{delta:4}  ")?;
        }
        writeln!(self.out, "trk{track:<2} {event}")
    }

    /// Push buffered lines out, before sleeping for instance.
    pub fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }

    /// Give back the writer.
    pub fn into_inner(self) -> W {
        self.out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::MetaEvent;
    use pretty_assertions::assert_eq;

    fn dump(flags: DumpFlags, events: &[(u32, Event<'_>)]) -> String {
        let mut dumper = Dumper::new(Vec::new(), flags);
        for (delta, event) in events {
            dumper.event(1, *delta, event).unwrap();
        }
        String::from_utf8(dumper.into_inner()).unwrap()
    }

    const ON: Event<'static> = Event::NoteOn {
        channel: 0,
        pitch: 60,
        velocity: 100,
    };
    const VOLUME: Event<'static> = Event::ControlChange {
        channel: 0,
        controller: 7,
        value: 100,
    };
    const END: Event<'static> = Event::Meta(MetaEvent::EndOfTrack);

    #[test]
    fn default_prints_only_metas() {
        let text = dump(DumpFlags::default(), &[(0, ON), (0, VOLUME), (96, END)]);
        assert_eq!(text, "trk1  End of Track\n");
    }

    #[test]
    fn deltas_prefix_every_line() {
        let flags = DumpFlags::DELTAS | DumpFlags::NOTES | DumpFlags::EVENTS;
        let text = dump(flags, &[(0, ON), (96, VOLUME), (96, END)]);
        assert_eq!(
            text,
            "   0  trk1  ch0  on 60 100\n  96  trk1  ch0  parameter 7 100\n"
        );
    }

    #[test]
    fn unknown_bits_are_dropped() {
        let flags = DumpFlags::from_bits_truncate(0xFF);
        assert_eq!(flags.bits(), 0x0F);
        assert!(flags.contains(DumpFlags::METAS | DumpFlags::DELTAS));
        assert!(!DumpFlags::NONE.selects(&END));
    }
}
