//! Log output set up

use simplelog::*;
use std::fs::OpenOptions;
use std::io::Error;
use std::path::Path;

/// Level for a count of `-v` flags.
pub fn level_for(verbosity: u8) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

/// Log to standard error, and also into `log_file` when given.
///
/// Standard output stays free for the header banner and the event listing.
pub fn init_logger(verbosity: u8, log_file: Option<&Path>) -> Result<(), Error> {
    let level = level_for(verbosity);
    let config = ConfigBuilder::new()
        .set_time_level(LevelFilter::Debug)
        .build();

    let mut loggers: Vec<Box<dyn SharedLogger>> = vec![TermLogger::new(
        level,
        config.clone(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )];

    if let Some(path) = log_file {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        loggers.push(WriteLogger::new(level.max(LevelFilter::Debug), config, file));
    }

    CombinedLogger::init(loggers).map_err(Error::other)
}

#[test]
fn more_flags_log_more() {
    assert_eq!(level_for(0), LevelFilter::Warn);
    assert_eq!(level_for(2), LevelFilter::Debug);
    assert_eq!(level_for(9), LevelFilter::Trace);
}
