use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use log::{LevelFilter, SetLoggerError};
use log4rs::{
    append::console::{ConsoleAppender, Target},
    config::{Appender, Config as LogConfig, Root},
    encode::pattern::PatternEncoder,
};
use thiserror::Error;

/// A unique identifier for a particular state-changing service call.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd)]
pub struct OperationId(pub usize);

impl Display for OperationId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl OperationId {
    /// Atomically get the next ID. This wraps around back to zero if you somehow exceed a usize.
    pub fn next() -> OperationId {
        static OPERATION_ID_COUNTER: AtomicUsize = AtomicUsize::new(0);
        OperationId(OPERATION_ID_COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

/// Pattern used when no log4rs file is available.
const FALLBACK_PATTERN: &str = "{d(%Y-%m-%d %H:%M:%S)} {h({l:<5})} {t} - {m}{n}";

/// Failure to set up the global logger.
#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("Failed to initialise logging from {}: {message}", .path.display())]
    File { path: PathBuf, message: String },
    #[error("Invalid fallback logging config: {0}")]
    Config(String),
    #[error("Failed to initialise logging: {0}")]
    Logger(#[from] SetLoggerError),
}

/// Initialise logging from the given log4rs file, or fall back to logging
/// warnings and above to stderr if the file does not exist.
pub fn init(log_config: &Path) -> Result<(), LoggingError> {
    if log_config.exists() {
        return log4rs::init_file(log_config, Default::default()).map_err(|err| {
            LoggingError::File {
                path: log_config.to_path_buf(),
                message: err.to_string(),
            }
        });
    }

    let stderr = ConsoleAppender::builder()
        .target(Target::Stderr)
        .encoder(Box::new(PatternEncoder::new(FALLBACK_PATTERN)))
        .build();
    let config = LogConfig::builder()
        .appender(Appender::builder().build("stderr", Box::new(stderr)))
        .build(Root::builder().appender("stderr").build(LevelFilter::Warn))
        .map_err(|errs| LoggingError::Config(format!("{errs:?}")))?;
    log4rs::init_config(config)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_increase() {
        let first = OperationId::next();
        let second = OperationId::next();
        assert!(second > first);
        assert_eq!(OperationId(42).to_string(), "42");
    }
}
