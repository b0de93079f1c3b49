use clap::Parser;
use log::{error, info, warn};
use smfplay::cli::Args;
use smfplay::error::{Error, Result};
use smfplay::logging;
use smfplay::prelude::*;
use std::io::{self, Read};
use std::process::ExitCode;

fn read_input(args: &Args) -> Result<Vec<u8>> {
    if args.reads_stdin() {
        let mut buffer = Vec::new();
        io::stdin().lock().read_to_end(&mut buffer)?;
        return Ok(buffer);
    }
    std::fs::read(&args.file).map_err(|e| {
        error!("cannot read {}", args.file.display());
        Error::Io(e)
    })
}

fn play_into<S: OutputSink>(
    options: &PlayOptions,
    file: &mut MidiFile<'_>,
    sink: S,
) -> Result<PlaybackReport> {
    let mut output = Output::new(sink).with_sysex(options.forward_sysex);
    let mut dumper = Dumper::new(io::stdout().lock(), options.dump);
    Scheduler::new(options, SystemClock::new()).play(file, &mut output, &mut dumper)
}

#[cfg(feature = "midir")]
fn list_ports() -> Result<()> {
    for name in MidirSink::list_ports()? {
        println!("{name}");
    }
    Ok(())
}

#[cfg(not(feature = "midir"))]
fn list_ports() -> Result<()> {
    Err(Error::InvalidOption(
        "built without midir support, no ports to list".into(),
    ))
}

#[cfg(feature = "midir")]
fn play_port(options: &PlayOptions, file: &mut MidiFile<'_>, name: &str) -> Result<PlaybackReport> {
    play_into(options, file, MidirSink::connect(Some(name))?)
}

#[cfg(not(feature = "midir"))]
fn play_port(_: &PlayOptions, _: &mut MidiFile<'_>, name: &str) -> Result<PlaybackReport> {
    Err(Error::InvalidOption(format!(
        "built without midir support, cannot open port {name:?}"
    )))
}

fn run(args: &Args) -> Result<()> {
    if args.list_ports {
        return list_ports();
    }
    let options = args.play_options()?;
    let bytes = read_input(args)?;
    let mut file = MidiFile::parse(&bytes)?;
    println!("{}", file.header());

    let report = if options.check {
        let mut dumper = Dumper::new(io::stdout().lock(), options.dump);
        Scheduler::new(&options, SystemClock::new()).analyze(&mut file, &mut dumper)?
    } else if let Some(name) = &args.port {
        play_port(&options, &mut file, name)?
    } else {
        play_into(&options, &mut file, WriterSink::open_device(&args.device)?)?
    };
    info!(
        "{} event(s), {} forwarded, last at tick {}",
        report.events_fired, report.events_forwarded, report.final_tick
    );
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();
    if let Err(e) = logging::init_logger(args.verbose, args.log_file.as_deref()) {
        eprintln!("smfplay: logging disabled: {e}");
    }

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if matches!(e, Error::InvalidOption(_)) {
                warn!("see --help for the accepted values");
            }
            eprintln!("smfplay: {e}");
            ExitCode::FAILURE
        }
    }
}
