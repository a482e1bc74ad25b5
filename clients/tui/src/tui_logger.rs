use log::{Level, Log, Metadata, Record};
use std::sync::{Arc, Mutex};

/// Messages the buffer holds before the oldest is dropped.
const BUFFER_CAPACITY: usize = 100;

/// Shared handle to the captured messages. The UI drains it every frame.
pub type LogBuffer = Arc<Mutex<Vec<String>>>;

/// `log::Log` sink that captures messages into a [`LogBuffer`] instead of
/// writing to stdout, which would tear the alternate screen mid-frame.
/// Warnings and errors get a level prefix; info and below pass through
/// verbatim since the log panel is part of normal gameplay output.
pub struct TuiLogger {
    log_buffer: LogBuffer,
}

impl TuiLogger {
    /// The logger to install plus the buffer handle to hand to the UI.
    pub fn new() -> (Self, LogBuffer) {
        let log_buffer: LogBuffer = Arc::new(Mutex::new(Vec::new()));
        (
            TuiLogger {
                log_buffer: log_buffer.clone(),
            },
            log_buffer,
        )
    }
}

impl Log for TuiLogger {
    /// Always true; level filtering is left to `log::set_max_level`.
    fn enabled(&self, _metadata: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let msg = match record.level() {
                Level::Error => format!("error: {}", record.args()),
                Level::Warn => format!("warn: {}", record.args()),
                _ => format!("{}", record.args()),
            };
            if let Ok(mut buffer) = self.log_buffer.lock() {
                buffer.push(msg);
                if buffer.len() > BUFFER_CAPACITY {
                    buffer.remove(0);
                }
            }
        }
    }

    /// Messages sit in the Vec until the UI drains them; nothing to flush.
    fn flush(&self) {}
}
