use super::{Event, MetaEvent};
use core::fmt;

struct Hex<'a>(&'a [u8]);

impl fmt::Display for Hex<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in self.0 {
            write!(f, " {byte:02x}")?;
        }
        Ok(())
    }
}

impl fmt::Display for Event<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::NoteOff {
                channel,
                pitch,
                velocity,
            } => write!(f, "ch{channel:<2} off {pitch} {velocity}"),
            Self::NoteOn {
                channel, pitch, ..
            } if self.is_note_off() => write!(f, "ch{channel:<2} off {pitch}"),
            Self::NoteOn {
                channel,
                pitch,
                velocity,
            } => write!(f, "ch{channel:<2} on {pitch} {velocity}"),
            Self::KeyPressure {
                channel,
                pitch,
                pressure,
            } => write!(f, "ch{channel:<2} key-pressure {pitch} {pressure}"),
            Self::ControlChange {
                channel,
                controller,
                value,
            } => write!(f, "ch{channel:<2} parameter {controller} {value}"),
            Self::ProgramChange { channel, program } => {
                write!(f, "ch{channel:<2} program {program}")
            }
            Self::ChannelPressure { channel, pressure } => {
                write!(f, "ch{channel:<2} channel-pressure {pressure}")
            }
            Self::PitchWheel { channel, value } => write!(f, "ch{channel:<2} pitch-wheel {value}"),
            Self::SysEx(data) => write!(f, "sysex:{}", Hex(data)),
            Self::SysExContinuation(data) => write!(f, "sysex-cont:{}", Hex(data)),
            Self::Meta(meta) => fmt::Display::fmt(&meta, f),
            Self::Unrecognized { status, data } => {
                write!(f, "Undefined {status:02x}:{}", Hex(data))
            }
        }
    }
}

impl fmt::Display for MetaEvent<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Text(_) => "Text",
            Self::Copyright(_) => "Copyright",
            Self::SequenceName(_) => "Sequence/Track",
            Self::InstrumentName(_) => "Instrument",
            Self::Lyric(_) => "Lyric",
            Self::Marker(_) => "Marker",
            Self::CueText(_) => "Cue",
            Self::EndOfTrack => return f.write_str("End of Track"),
            Self::SetTempo(tempo) => return write!(f, "Set Tempo {tempo}"),
            Self::SmpteOffset(data) => return write!(f, "SMPTE Offset:{}", Hex(data)),
            Self::TimeSignature(data) => return write!(f, "Time Signature:{}", Hex(data)),
            Self::KeySignature(data) => return write!(f, "Key Signature:{}", Hex(data)),
            Self::SequencerSpecific(data) => {
                return write!(f, "Sequencer-Specific:{}", Hex(data));
            }
            Self::Unrecognized { kind, data } => {
                return write!(f, "Meta Event {kind:02x}:{}", Hex(data));
            }
        };
        let text = self.text().unwrap_or_default();
        write!(f, "{label}: {}", alloc::string::String::from_utf8_lossy(text))
    }
}
