//! Command line arguments

use crate::dump::DumpFlags;
use crate::error::{Error, Result};
use crate::options::{Excerpt, PlayOptions};
use crate::transform::Transform;
use clap::Parser;
use std::path::PathBuf;

/// Play a Standard MIDI File, or check and list its events.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(after_help = "\
BITS are 1 deltas, 2 MIDI notes, 4 other MIDI events, 8 meta-events.
EXCERPT is [FACTORx][[FIRST]-][LAST], bars counted from 1 with LAST
included. FACTOR is the number of beats per bar, 1 by default.")]
pub struct Args {
    /// MIDI file to read, `-` for standard input
    #[arg(default_value = "-")]
    pub file: PathBuf,

    /// Check the MIDI file without performing it
    #[arg(short, long)]
    pub check: bool,

    /// Adjust speed, bigger is slower
    #[arg(short, long, default_value_t = 100, value_name = "FACTOR")]
    pub speed: u32,

    /// Inhibit all program changes
    #[arg(short, long)]
    pub freeze_channel: bool,

    /// Force all events on channel zero
    #[arg(short = 'z', long)]
    pub channel_zero: bool,

    /// Number of semitones of transposition
    #[arg(short, long, default_value_t = 0, allow_negative_numbers = true)]
    pub transpose: i8,

    /// Drum channel, never transposed
    #[arg(short, long, default_value_t = 9, value_name = "CHANNEL")]
    pub drum: u8,

    /// Only use this track, counted from 1
    #[arg(short = 'x', long, value_name = "TRACK")]
    pub extract: Option<u16>,

    /// Select what gets listed
    #[arg(short = 'D', long, default_value_t = 8, value_name = "BITS")]
    pub debug: u8,

    /// Play only some bars
    #[arg(short, long, value_name = "EXCERPT")]
    pub bars: Option<String>,

    /// Raw MIDI device to write to
    #[arg(long, default_value = "/dev/midi00", value_name = "PATH")]
    pub device: PathBuf,

    /// Play through the MIDI port whose name contains NAME
    #[arg(long, value_name = "NAME")]
    pub port: Option<String>,

    /// List available MIDI output ports
    #[arg(long)]
    pub list_ports: bool,

    /// Also send system exclusive events
    #[arg(long)]
    pub forward_sysex: bool,

    /// More log output, repeat for more
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Also log into this file
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

impl Args {
    /// True when the input is standard input.
    pub fn reads_stdin(&self) -> bool {
        self.file.as_os_str() == "-"
    }

    /// The validated options handed to the scheduler.
    pub fn play_options(&self) -> Result<PlayOptions> {
        let excerpt = self
            .bars
            .as_deref()
            .map(str::parse::<Excerpt>)
            .transpose()?;
        if self.debug > 0x0F {
            return Err(Error::InvalidOption(format!(
                "debug bits {} outside 0..=15",
                self.debug
            )));
        }
        PlayOptions {
            speed_factor: self.speed,
            transform: Transform {
                transpose: self.transpose,
                drum_channel: self.drum,
                channel_zero: self.channel_zero,
                freeze_channel: self.freeze_channel,
            },
            extract: self.extract,
            dump: DumpFlags::from_bits_truncate(self.debug),
            excerpt,
            forward_sysex: self.forward_sysex,
            check: self.check,
        }
        .validate()
    }
}
