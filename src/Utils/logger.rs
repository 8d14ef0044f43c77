use log::LevelFilter;
use simplelog::{
    ColorChoice, CombinedLogger, Config, SharedLogger, TermLogger, TerminalMode, WriteLogger,
};
use std::fs::File;
use std::io;

/// Console logger, plus a file logger when `log_file` is given.
///
/// `LevelFilter::Off` installs nothing. A second call in the same process is a
/// no-op: the global logger can be set only once.
pub fn init_logger(level: LevelFilter, log_file: Option<&str>) -> io::Result<()> {
    if level == LevelFilter::Off {
        return Ok(());
    }
    let mut loggers: Vec<Box<dyn SharedLogger>> = Vec::new();

    // Console logger
    loggers.push(TermLogger::new(
        level,
        Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    ));

    // File logger
    if let Some(filename) = log_file {
        let file = File::create(filename)?;
        loggers.push(WriteLogger::new(level, Config::default(), file));
    }

    let _ = CombinedLogger::init(loggers);
    Ok(())
}
