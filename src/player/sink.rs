#![doc = r#"
Destinations for encoded MIDI bytes

| Sink              | Running status | Destination                       |
|-------------------|----------------|-----------------------------------|
| [`WriterSink`]    | honoured       | any `Write`, e.g. `/dev/midi00`   |
| `MidirSink`       | never          | a midir output port (`midir`)     |
| [`NullSink`]      | never          | nowhere                           |
| [`RecordingSink`] | configurable   | memory, for inspection            |
"#]

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use thiserror::Error;

/// A destination refused or lost an event.
#[derive(Debug, Error)]
pub enum OutputError {
    /// The device node could not be opened.
    #[error("cannot open {path}: {source}")]
    Open {
        /// The device path
        path: String,
        /// The system error
        source: io::Error,
    },
    /// Writing to the device failed.
    #[error(transparent)]
    Io(#[from] io::Error),
    /// The MIDI port layer failed.
    #[error("MIDI port: {0}")]
    Port(String),
}

/// Accepts one encoded event at a time, blocking until delivered.
pub trait OutputSink {
    /// Deliver the bytes of one event.
    fn send(&mut self, bytes: &[u8]) -> Result<(), OutputError>;

    /// True when an event may go out without its status byte.
    fn accepts_running_status(&self) -> bool {
        false
    }

    /// Push out anything buffered.
    fn flush(&mut self) -> Result<(), OutputError> {
        Ok(())
    }
}

/// Raw byte stream output, like a MIDI device node.
#[derive(Debug)]
pub struct WriterSink<W> {
    writer: W,
}

impl<W: Write> WriterSink<W> {
    /// Write events into `writer`.
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Give back the writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl WriterSink<File> {
    /// Open a device node for writing.
    pub fn open_device(path: impl AsRef<Path>) -> Result<Self, OutputError> {
        let path = path.as_ref();
        let file = OpenOptions::new()
            .write(true)
            .open(path)
            .map_err(|source| OutputError::Open {
                path: path.display().to_string(),
                source,
            })?;
        Ok(Self::new(file))
    }
}

impl<W: Write> OutputSink for WriterSink<W> {
    fn send(&mut self, bytes: &[u8]) -> Result<(), OutputError> {
        self.writer.write_all(bytes)?;
        Ok(())
    }

    fn accepts_running_status(&self) -> bool {
        true
    }

    fn flush(&mut self) -> Result<(), OutputError> {
        self.writer.flush()?;
        Ok(())
    }
}

/// Drops everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl OutputSink for NullSink {
    fn send(&mut self, _bytes: &[u8]) -> Result<(), OutputError> {
        Ok(())
    }
}

/// Keeps every message it receives.
#[derive(Debug, Default, Clone)]
pub struct RecordingSink {
    messages: Vec<Vec<u8>>,
    running_status: bool,
}

impl RecordingSink {
    /// Records full messages only.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records messages, letting the sender omit repeated status bytes.
    pub fn with_running_status() -> Self {
        Self {
            messages: Vec::new(),
            running_status: true,
        }
    }

    /// Messages in arrival order
    pub fn messages(&self) -> &[Vec<u8>] {
        &self.messages
    }

    /// All messages as one byte stream
    pub fn bytes(&self) -> Vec<u8> {
        self.messages.concat()
    }
}

impl OutputSink for RecordingSink {
    fn send(&mut self, bytes: &[u8]) -> Result<(), OutputError> {
        self.messages.push(bytes.to_vec());
        Ok(())
    }

    fn accepts_running_status(&self) -> bool {
        self.running_status
    }
}

#[cfg(feature = "midir")]
mod port {
    use super::{OutputError, OutputSink};
    use log::info;
    use midir::{MidiOutput, MidiOutputConnection};

    const CLIENT_NAME: &str = "smfplay";

    /// Output through a midir port.
    ///
    /// Port layers want whole messages, so running status is never used.
    pub struct MidirSink {
        connection: MidiOutputConnection,
    }

    impl MidirSink {
        /// Names of the output ports currently available.
        pub fn list_ports() -> Result<Vec<String>, OutputError> {
            let midi_out =
                MidiOutput::new(CLIENT_NAME).map_err(|e| OutputError::Port(e.to_string()))?;
            let names = midi_out
                .ports()
                .iter()
                .filter_map(|p| midi_out.port_name(p).ok())
                .collect();
            Ok(names)
        }

        /// Connect to the first port whose name contains `name`, or to the
        /// first port at all.
        pub fn connect(name: Option<&str>) -> Result<Self, OutputError> {
            let midi_out =
                MidiOutput::new(CLIENT_NAME).map_err(|e| OutputError::Port(e.to_string()))?;
            let ports = midi_out.ports();
            let port = match name {
                Some(name) => ports.iter().find(|p| {
                    midi_out
                        .port_name(p)
                        .is_ok_and(|port_name| port_name.contains(name))
                }),
                None => ports.first(),
            }
            .ok_or_else(|| {
                OutputError::Port(format!("no output port matching {:?}", name.unwrap_or("*")))
            })?;

            let port_name = midi_out
                .port_name(port)
                .map_err(|e| OutputError::Port(e.to_string()))?;
            info!("Connecting to MIDI output port: {port_name}");
            let connection = midi_out
                .connect(port, "smfplay-output")
                .map_err(|e| OutputError::Port(e.to_string()))?;
            Ok(Self { connection })
        }
    }

    impl OutputSink for MidirSink {
        fn send(&mut self, bytes: &[u8]) -> Result<(), OutputError> {
            self.connection
                .send(bytes)
                .map_err(|e| OutputError::Port(e.to_string()))
        }
    }
}

#[cfg(feature = "midir")]
pub use port::MidirSink;

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn writer_sink_concatenates() {
        let mut sink = WriterSink::new(Vec::new());
        sink.send(&[0x90, 60, 100]).unwrap();
        sink.send(&[62, 100]).unwrap();
        sink.flush().unwrap();
        assert!(sink.accepts_running_status());
        assert_eq!(sink.into_inner(), [0x90, 60, 100, 62, 100]);
    }

    #[test]
    fn recording_sink_keeps_message_boundaries() {
        let mut sink = RecordingSink::new();
        sink.send(&[0xC0, 5]).unwrap();
        sink.send(&[0x90, 60, 100]).unwrap();
        assert!(!sink.accepts_running_status());
        assert_eq!(sink.messages().len(), 2);
        assert_eq!(sink.bytes(), [0xC0, 5, 0x90, 60, 100]);
    }

    #[test]
    fn opening_a_missing_device_names_it() {
        let err = WriterSink::open_device("/nonexistent/midi00").unwrap_err();
        assert!(err.to_string().contains("/nonexistent/midi00"));
    }
}
