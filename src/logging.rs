use log::{LevelFilter, Metadata, Record};

// Writes every enabled record to stderr as `[LEVEL] message`
struct StderrLogger;

impl log::Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            eprintln!("[{}] {}", record.level(), record.args());
        }
    }

    fn flush(&self) {}
}

static STDERR_LOGGER: StderrLogger = StderrLogger;

pub fn level_for(verbosity: u8) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

pub fn init(verbosity: u8) {
    // set_logger fails if a logger is already installed, which happens when
    // tests call this more than once
    if log::set_logger(&STDERR_LOGGER).is_err() {
        return;
    }
    log::set_max_level(level_for(verbosity));
    log::debug!("logging at {}", level_for(verbosity));
}
