//! Serialised access to the global log capture.

use std::sync::{Mutex, MutexGuard, OnceLock, PoisonError};

use logtest::{Logger, Record};
use rstest::fixture;

/// Handle to the global logger with exclusive access.
///
/// `logtest` installs a process-wide logger, so tests that assert on log
/// output hold this guard to keep their records apart.
pub struct LoggerHandle {
    guard: MutexGuard<'static, Logger>,
}

impl LoggerHandle {
    /// Acquire the global [`Logger`] and discard records left by earlier
    /// tests.
    pub fn new() -> Self {
        static LOGGER: OnceLock<Mutex<Logger>> = OnceLock::new();

        let logger = LOGGER.get_or_init(|| Mutex::new(Logger::start()));
        let mut guard = logger.lock().unwrap_or_else(PoisonError::into_inner);
        while guard.pop().is_some() {}

        Self { guard }
    }

    /// Drain captured records and return those at `level` whose message
    /// contains `needle`.
    pub fn take_matching(&mut self, level: log::Level, needle: &str) -> Vec<String> {
        let mut found = Vec::new();
        while let Some(record) = self.guard.pop() {
            if record_matches(&record, level, needle) {
                found.push(record.args().to_owned());
            }
        }
        found
    }
}

impl Default for LoggerHandle {
    fn default() -> Self { Self::new() }
}

fn record_matches(record: &Record, level: log::Level, needle: &str) -> bool {
    record.level() == level && record.args().contains(needle)
}

impl std::ops::Deref for LoggerHandle {
    type Target = Logger;

    fn deref(&self) -> &Self::Target { &self.guard }
}

impl std::ops::DerefMut for LoggerHandle {
    fn deref_mut(&mut self) -> &mut Self::Target { &mut self.guard }
}

#[allow(
    unused_braces,
    reason = "rustc false positive for single line rstest fixtures"
)]
#[fixture]
pub fn logger() -> LoggerHandle { LoggerHandle::new() }
