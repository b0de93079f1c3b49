use super::*;
use crate::dump::DumpFlags;
use crate::error::Error;
use crate::options::Excerpt;
use crate::transform::Transform;
use pretty_assertions::assert_eq;

const END: [u8; 4] = [0x00, 0xFF, 0x2F, 0x00];

fn smf(format: u16, division: u16, tracks: &[&[u8]]) -> Vec<u8> {
    let mut bytes = b"MThd\0\0\0\x06".to_vec();
    bytes.extend_from_slice(&format.to_be_bytes());
    bytes.extend_from_slice(&(tracks.len() as u16).to_be_bytes());
    bytes.extend_from_slice(&division.to_be_bytes());
    for data in tracks {
        bytes.extend_from_slice(b"MTrk");
        bytes.extend_from_slice(&(data.len() as u32).to_be_bytes());
        bytes.extend_from_slice(data);
    }
    bytes
}

fn silent_dumper() -> Dumper<std::io::Sink> {
    Dumper::new(std::io::sink(), DumpFlags::NONE)
}

fn play_with(
    options: &PlayOptions,
    bytes: &[u8],
    clock: &mut ManualClock,
    sink: RecordingSink,
) -> (PlaybackReport, RecordingSink) {
    let mut file = MidiFile::parse(bytes).unwrap();
    let mut output = Output::new(sink).with_sysex(options.forward_sysex);
    let report = Scheduler::new(options, clock)
        .play(&mut file, &mut output, &mut silent_dumper())
        .unwrap();
    (report, output.into_sink())
}

fn single_delta_tracks(deltas: &[u8]) -> Vec<u8> {
    let tracks: Vec<Vec<u8>> = deltas
        .iter()
        .map(|delta| vec![*delta, 0xFF, 0x2F, 0x00])
        .collect();
    let tracks: Vec<&[u8]> = tracks.iter().map(Vec::as_slice).collect();
    smf(1, 96, &tracks)
}

fn rewound(file: &mut MidiFile<'_>) -> Vec<bool> {
    for chunk in file.tracks_mut() {
        chunk.rewind(500_000).unwrap();
    }
    vec![true; file.tracks().len()]
}

#[test]
fn selects_earliest_track_whatever_the_order() {
    for (deltas, expected) in [([40, 10, 25], 1), ([10, 40, 25], 0), ([25, 40, 10], 2)] {
        let bytes = single_delta_tracks(&deltas);
        let mut file = MidiFile::parse(&bytes).unwrap();
        let active = rewound(&mut file);
        assert_eq!(select_next(file.tracks(), &active), Some(expected));
    }
}

#[test]
fn selection_skips_exhausted_and_inactive_tracks() {
    let bytes = single_delta_tracks(&[40, 10, 10]);
    let mut file = MidiFile::parse(&bytes).unwrap();
    let mut active = rewound(&mut file);
    // ties go to the first track in order
    assert_eq!(select_next(file.tracks(), &active), Some(1));

    active[1] = false;
    assert_eq!(select_next(file.tracks(), &active), Some(2));

    file.tracks_mut()[2].read_event().unwrap();
    assert_eq!(select_next(file.tracks(), &active), Some(0));

    active[0] = false;
    assert_eq!(select_next(file.tracks(), &active), None);
}

#[test]
fn warp_keeps_relative_offsets_and_wall_time() {
    let bytes = smf(
        1,
        96,
        &[&[0x83, 0x74, 0xFF, 0x2F, 0x00], &[0x84, 0x58, 0xFF, 0x2F, 0x00]],
    );
    let mut file = MidiFile::parse(&bytes).unwrap();
    let active = rewound(&mut file);
    assert_eq!(file.tracks()[0].time_next(), 500);
    assert_eq!(file.tracks()[1].time_next(), 600);

    let tempo = 500_000;
    let before = ticks_to_micros(500, tempo, 96);
    let leaps = warp(file.tracks_mut(), &active, 500, 96);
    assert_eq!(leaps, 5);
    assert_eq!(file.tracks()[0].time_next(), 20);
    assert_eq!(file.tracks()[1].time_next(), 120);

    let after = UMicros::new(leaps * tempo).to_micros() + ticks_to_micros(20, tempo, 96);
    assert!((after - before.to_micros()).us().abs() < 1);

    // less than a whole unit: nothing moves
    assert_eq!(warp(file.tracks_mut(), &active, 20, 96), 0);
    assert_eq!(file.tracks()[0].time_next(), 20);
}

const NOTE_PAIR: [u8; 12] = [
    0x00, 0x90, 60, 100, //
    0x60, 0x80, 60, 64, //
    0x00, 0xFF, 0x2F, 0x00,
];

#[test]
fn fires_every_event_exactly_once() {
    let melody: &[u8] = &[
        0x00, 0x90, 60, 100, //
        0x30, 62, 100, //
        0x30, 0x80, 60, 0, //
        0x10, 62, 0, //
        0x00, 0xFF, 0x2F, 0x00,
    ];
    let chords: &[u8] = &[
        0x00, 0xC1, 5, //
        0x30, 0x91, 48, 90, //
        0x60, 0x81, 48, 0, //
        0x00, 0xFF, 0x2F, 0x00,
    ];
    let bytes = smf(1, 96, &[&END, melody, chords]);
    let total: usize = {
        let mut file = MidiFile::parse(&bytes).unwrap();
        file.tracks_mut()
            .iter_mut()
            .map(|chunk| chunk.events().count())
            .sum()
    };
    assert_eq!(total, 10);

    let options = PlayOptions::default();
    let mut file = MidiFile::parse(&bytes).unwrap();
    let report = Scheduler::new(&options, ManualClock::new())
        .analyze(&mut file, &mut silent_dumper())
        .unwrap();
    assert_eq!(report.events_fired, total);
    assert_eq!(report.events_forwarded, 0);
    assert_eq!(report.final_tick, 0x90);

    let mut clock = ManualClock::new();
    let (report, sink) = play_with(&options, &bytes, &mut clock, RecordingSink::new());
    assert_eq!(report.events_fired, total);
    assert_eq!(report.events_forwarded, 7);
    assert_eq!(sink.messages().len(), 7);
    assert_eq!(report.notes_silenced, 0);
}

#[test]
fn waits_for_each_event() {
    let bytes = smf(0, 96, &[&NOTE_PAIR]);
    let mut clock = ManualClock::new();
    play_with(&PlayOptions::default(), &bytes, &mut clock, RecordingSink::new());
    // one quarter note at the default 120 beats per minute
    assert_eq!(clock.sleeps(), [UMicros::new(500_000)]);

    let slower = PlayOptions {
        speed_factor: 200,
        ..Default::default()
    };
    let mut clock = ManualClock::new();
    play_with(&slower, &bytes, &mut clock, RecordingSink::new());
    assert_eq!(clock.slept(), UMicros::new(1_000_000));
}

#[test]
fn lateness_shortens_the_next_wait() {
    let bytes = smf(0, 96, &[&NOTE_PAIR]);
    let mut clock = ManualClock::with_lag(UMicros::new(300));
    play_with(&PlayOptions::default(), &bytes, &mut clock, RecordingSink::new());
    assert_eq!(clock.sleeps(), [UMicros::new(500_000 - 300)]);
}

#[test]
fn waits_within_slack_are_skipped() {
    let track: &[u8] = &[
        0x00, 0x90, 60, 100, //
        0x01, 0x80, 60, 64, //
        0x00, 0xFF, 0x2F, 0x00,
    ];
    // one tick at division 960 is about 520 us
    let bytes = smf(0, 960, &[track]);
    let mut clock = ManualClock::new();
    let (report, _) = play_with(&PlayOptions::default(), &bytes, &mut clock, RecordingSink::new());
    assert!(clock.sleeps().is_empty());
    assert_eq!(report.events_forwarded, 2);
}

fn tempo_then_note(format: u16) -> Vec<u8> {
    let tempo_track: &[u8] = &[
        0x00, 0xFF, 0x51, 0x03, 0x03, 0xD0, 0x90, // 250000
        0x00, 0xFF, 0x2F, 0x00,
    ];
    let note_track: &[u8] = &[
        0x60, 0x90, 60, 100, //
        0x00, 0x80, 60, 64, //
        0x00, 0xFF, 0x2F, 0x00,
    ];
    smf(format, 96, &[tempo_track, note_track])
}

#[test]
fn format_one_shares_tempo_across_tracks() {
    let mut clock = ManualClock::new();
    play_with(
        &PlayOptions::default(),
        &tempo_then_note(1),
        &mut clock,
        RecordingSink::new(),
    );
    assert_eq!(clock.slept(), UMicros::new(250_000));
}

#[test]
fn other_formats_keep_tempo_per_track() {
    let mut clock = ManualClock::new();
    play_with(
        &PlayOptions::default(),
        &tempo_then_note(2),
        &mut clock,
        RecordingSink::new(),
    );
    assert_eq!(clock.slept(), UMicros::new(500_000));
}

#[test]
fn set_tempo_is_scaled_by_speed() {
    let options = PlayOptions {
        speed_factor: 50,
        ..Default::default()
    };
    let mut clock = ManualClock::new();
    play_with(&options, &tempo_then_note(1), &mut clock, RecordingSink::new());
    assert_eq!(clock.slept(), UMicros::new(125_000));
}

#[test]
fn excerpt_mutes_notes_outside_the_bars() {
    let track: &[u8] = &[
        0x00, 0x90, 60, 100, // bar 1
        0x30, 0x80, 60, 64, //
        0x30, 0x90, 62, 100, // bar 2
        0x30, 0x80, 62, 64, //
        0x30, 0x90, 64, 100, // bar 3
        0x30, 0x80, 64, 64, //
        0x00, 0xC0, 5, //
        0x00, 0xFF, 0x2F, 0x00,
    ];
    let bytes = smf(0, 96, &[track]);
    let options = PlayOptions {
        excerpt: Some("2".parse::<Excerpt>().unwrap()),
        ..Default::default()
    };
    let mut clock = ManualClock::new();
    let (report, sink) = play_with(&options, &bytes, &mut clock, RecordingSink::new());

    assert_eq!(
        sink.messages(),
        [vec![0x90, 62, 100], vec![0x80, 62, 64], vec![0xC0, 5]]
    );
    assert_eq!(report.events_fired, 8);
    assert_eq!(report.events_forwarded, 3);
    // only the second bar is paced
    assert_eq!(clock.slept(), UMicros::new(500_000));
}

#[test]
fn running_status_reaches_a_raw_device() {
    let track: &[u8] = &[
        0x00, 0x90, 60, 100, //
        0x00, 64, 100, //
        0x00, 0xB0, 7, 90, //
        0x00, 0xFF, 0x2F, 0x00,
    ];
    let bytes = smf(0, 96, &[track]);
    let options = PlayOptions::default();
    let mut file = MidiFile::parse(&bytes).unwrap();
    let mut output = Output::new(WriterSink::new(Vec::new()));
    let report = Scheduler::new(&options, ManualClock::new())
        .play(&mut file, &mut output, &mut silent_dumper())
        .unwrap();

    assert_eq!(report.notes_silenced, 2);
    assert_eq!(
        output.into_sink().into_inner(),
        [
            0x90, 60, 100, 64, 100, 0xB0, 7, 90, //
            0x80, 60, 127, 0x80, 64, 127,
        ]
    );
}

#[test]
fn transforms_reach_output_and_dump() {
    let track: &[u8] = &[
        0x00, 0xC3, 10, //
        0x00, 0x93, 60, 100, //
        0x00, 0x99, 36, 100, //
        0x00, 0xFF, 0x2F, 0x00,
    ];
    let bytes = smf(0, 96, &[track]);
    let options = PlayOptions {
        transform: Transform {
            transpose: 2,
            channel_zero: true,
            freeze_channel: true,
            ..Default::default()
        },
        dump: DumpFlags::NOTES | DumpFlags::EVENTS,
        ..Default::default()
    };
    let mut file = MidiFile::parse(&bytes).unwrap();
    let mut output = Output::new(RecordingSink::new());
    let mut dumper = Dumper::new(Vec::new(), options.dump);
    Scheduler::new(&options, ManualClock::new())
        .play(&mut file, &mut output, &mut dumper)
        .unwrap();

    assert_eq!(
        String::from_utf8(dumper.into_inner()).unwrap(),
        "trk1  ch0  on 62 100\ntrk1  ch0  on 36 100\n"
    );
    assert_eq!(&output.sink().messages()[..2], [vec![0x90, 62, 100], vec![0x90, 36, 100]]);
}

#[test]
fn analysis_interleaves_tracks_by_tick() {
    let first: &[u8] = &[
        0x00, 0x90, 60, 100, //
        0x60, 0x80, 60, 64, //
        0x00, 0xFF, 0x2F, 0x00,
    ];
    let second: &[u8] = &[
        0x30, 0x91, 67, 100, //
        0x30, 0x81, 67, 64, //
        0x00, 0xFF, 0x2F, 0x00,
    ];
    let bytes = smf(1, 96, &[first, second]);
    let options = PlayOptions {
        dump: DumpFlags::DELTAS | DumpFlags::NOTES,
        ..Default::default()
    };
    let mut file = MidiFile::parse(&bytes).unwrap();
    let mut dumper = Dumper::new(Vec::new(), options.dump);
    Scheduler::new(&options, ManualClock::new())
        .analyze(&mut file, &mut dumper)
        .unwrap();

    assert_eq!(
        String::from_utf8(dumper.into_inner()).unwrap(),
        concat!(
            "   0  trk1  ch0  on 60 100\n",
            "  48  trk2  ch1  on 67 100\n",
            "  96  trk1  ch0  off 60 64\n",
            "  48  trk2  ch1  off 67 64\n",
        )
    );
}

#[test]
fn extraction_plays_one_track() {
    let bytes = tempo_then_note(1);
    let options = PlayOptions {
        extract: Some(2),
        ..Default::default()
    };
    let mut clock = ManualClock::new();
    let (report, _) = play_with(&options, &bytes, &mut clock, RecordingSink::new());
    assert_eq!(report.events_fired, 3);
    // the tempo track did not run
    assert_eq!(clock.slept(), UMicros::new(500_000));
}

#[test]
fn analysis_keeps_absolute_ticks() {
    let bytes = smf(0, 96, &[&[0x83, 0x74, 0xFF, 0x2F, 0x00]]);
    let options = PlayOptions::default();

    let mut file = MidiFile::parse(&bytes).unwrap();
    let report = Scheduler::new(&options, ManualClock::new())
        .analyze(&mut file, &mut silent_dumper())
        .unwrap();
    assert_eq!(report.final_tick, 500);
    assert_eq!(file.tracks()[0].time_next(), 500);

    let mut file = MidiFile::parse(&bytes).unwrap();
    let mut output = Output::new(RecordingSink::new());
    Scheduler::new(&options, ManualClock::new())
        .play(&mut file, &mut output, &mut silent_dumper())
        .unwrap();
    assert_eq!(file.tracks()[0].time_next(), 20);
}

#[test]
fn trailing_delta_is_truncated() {
    let track: &[u8] = &[0x00, 0x90, 60, 100, 0x10];
    let bytes = smf(0, 96, &[track]);
    let mut file = MidiFile::parse(&bytes).unwrap();
    let err = Scheduler::new(&PlayOptions::default(), ManualClock::new())
        .analyze(&mut file, &mut silent_dumper())
        .unwrap_err();
    let Error::Format(err) = err else {
        panic!("expected a format error, got {err:?}");
    };
    assert!(err.is_truncated());
    assert_eq!(err.position(), 27);
}
