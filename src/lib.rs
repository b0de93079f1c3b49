#![warn(missing_docs)]
#![doc = r#"
Standard MIDI File decoding and real-time multi-track playback

# Overview

```text
bytes ──▶ MidiFile::parse ──▶ Chunk per track
                                   │
                     Scheduler (tick order, pacing)
                                   │
             read_event ──▶ Transform ──▶ Dumper / Output ──▶ sink
```

The whole file is held in one buffer. [`MidiFile`](crate::file::MidiFile)
only frames its chunks; events are decoded one at a time while the
[`Scheduler`](crate::player::Scheduler) walks the tracks.

```rust
use smfplay::prelude::*;

let bytes = [
    b'M', b'T', b'h', b'd', 0, 0, 0, 6, 0, 0, 0, 1, 0, 96,
    b'M', b'T', b'r', b'k', 0, 0, 0, 4, 0x00, 0xFF, 0x2F, 0x00,
];
let mut file = MidiFile::parse(&bytes).unwrap();
let options = PlayOptions::default();
let mut dumper = Dumper::new(Vec::new(), options.dump);
let report = Scheduler::new(&options, ManualClock::new())
    .analyze(&mut file, &mut dumper)
    .unwrap();
assert_eq!(report.events_fired, 1);
```
"#]

extern crate alloc;

pub mod cli;
pub mod dump;
pub mod error;
pub mod event;
pub mod file;
pub mod logging;
pub mod micros;
pub mod options;
pub mod player;
pub mod reader;
pub mod transform;

#[doc = r#"
Everything needed to analyze or play a file
"#]
pub mod prelude {
    pub use crate::{
        dump::{DumpFlags, Dumper},
        event::{DecodedEvent, Event, MetaEvent, MetaKind, Ticked},
        file::{Chunk, FormatType, Header, MidiFile, SmpteFps, Timing},
        micros::{Micros, UMicros},
        options::{Excerpt, PlayOptions},
        player::{
            Clock, ManualClock, NullSink, Output, OutputError, OutputSink, PlaybackReport,
            RecordingSink, Scheduler, SystemClock, WriterSink,
        },
        reader::{ReadResult, ReaderError, ReaderErrorKind},
        transform::Transform,
    };

    #[cfg(feature = "midir")]
    pub use crate::player::MidirSink;
}
