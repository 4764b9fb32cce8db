use crate::event::Event;
use chrono::Utc;
use log::{Log, Metadata, Record};
use std::io::Write;
use std::sync::mpsc::SyncSender;

/// Forwards log records into the dashboard event channel; they end up in
/// the toggleable log panel instead of corrupting the terminal.
pub struct TuiLogger {
    sender: SyncSender<Event>,
}

impl TuiLogger {
    pub fn new(sender: SyncSender<Event>) -> Self {
        TuiLogger { sender }
    }
}

impl Log for TuiLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.target().starts_with("startrack")
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let message = format!("{}", record.args());
            let _ = self.sender.send(Event::Log((record.level(), message)));
        }
    }

    fn flush(&self) {}
}

/// Plain stdout logger for the sampling subcommand. This is also the
/// sampler's observability sink: every appended row is echoed through it.
pub struct ConsoleLogger;

impl Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.target().starts_with("startrack")
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            println!(
                "{} {:<5} {}",
                Utc::now().format("%H:%M:%S"),
                record.level(),
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stdout().flush();
    }
}
