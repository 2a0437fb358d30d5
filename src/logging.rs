use tracing::level_filters::LevelFilter;

/// Verbosity selected with `--debug=<n>`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum DebugLevel {
    Off = 0,
    Error = 1,
    Info = 2,
    Debug = 3,
    Trace = 4,
}

impl DebugLevel {
    /// Levels above `Trace` saturate.
    pub fn from_u8(level: u8) -> Self {
        match level {
            0 => DebugLevel::Off,
            1 => DebugLevel::Error,
            2 => DebugLevel::Info,
            3 => DebugLevel::Debug,
            _ => DebugLevel::Trace,
        }
    }

    pub fn filter(self) -> LevelFilter {
        match self {
            DebugLevel::Off => LevelFilter::OFF,
            // warnings are the loader's per-row reports; keep them with errors
            DebugLevel::Error => LevelFilter::WARN,
            DebugLevel::Info => LevelFilter::INFO,
            DebugLevel::Debug => LevelFilter::DEBUG,
            DebugLevel::Trace => LevelFilter::TRACE,
        }
    }
}

/// Installs a stderr subscriber. Returns false when one was already installed.
pub fn init(level: DebugLevel) -> bool {
    tracing_subscriber::fmt()
        .with_max_level(level.filter())
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
        .is_ok()
}
