//! Crate level errors

use crate::player::OutputError;
use crate::reader::ReaderError;
use thiserror::Error;

/// Anything that stops an analysis or a playback.
#[derive(Debug, Error)]
pub enum Error {
    /// The file is not a well formed Standard MIDI File.
    #[error("invalid MIDI file: {0}")]
    Format(#[from] ReaderError),
    /// Reading the input failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),
    /// The destination refused an event.
    #[error("output: {0}")]
    Output(#[from] OutputError),
    /// A command line value the player cannot use.
    #[error("invalid option: {0}")]
    InvalidOption(String),
}

/// Result with the crate [`Error`].
pub type Result<T, E = Error> = core::result::Result<T, E>;
