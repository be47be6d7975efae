//! Report sinks: where per-fixture outcomes go.
//!
//! The runner never decides what a failure looks like to a human or to CI;
//! it emits outcome signals through a [`ReportSink`] and moves on. Two
//! sinks are provided: [`ConsoleReport`] for colored terminal output and
//! [`Recorder`] for programmatic capture.
//!
//! The two error tiers stay distinct all the way through the sink:
//! `fail` is assertion-level (a mismatch or a unit business error, siblings
//! keep running), `fatal` is infrastructure-level (broken environment or
//! misconfiguration).

use std::error::Error as _;
use std::io::Write;
use std::path::{Path, PathBuf};

use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

use crate::errors::RunnerError;

/// Receives per-fixture outcomes and run-level progress messages.
pub trait ReportSink {
    /// Progress or informational message.
    fn log(&mut self, message: &str);

    /// The fixture's output matched its reference exactly.
    fn pass(&mut self, path: &Path);

    /// Assertion-level failure: mismatch or unit error. Recoverable;
    /// remaining fixtures are still processed.
    fn fail(&mut self, path: &Path, detail: &str);

    /// Infrastructure-level failure. Aborts the affected fixture, or the
    /// whole run when `path` is `None`.
    fn fatal(&mut self, path: Option<&Path>, error: &RunnerError);
}

/// Terminal sink with colored PASS/FAIL/FATAL tags.
pub struct ConsoleReport {
    stream: StandardStream,
    passed: usize,
    failed: usize,
    fatal: usize,
}

impl ConsoleReport {
    pub fn new() -> Self {
        let choice = if atty::is(atty::Stream::Stderr) {
            ColorChoice::Auto
        } else {
            ColorChoice::Never
        };
        Self {
            stream: StandardStream::stderr(choice),
            passed: 0,
            failed: 0,
            fatal: 0,
        }
    }

    /// True when any fixture failed or hit a fatal condition. Callers
    /// embedding the runner in a test typically assert this is false.
    pub fn has_failures(&self) -> bool {
        self.failed + self.fatal > 0
    }

    /// `(passed, failed, fatal)` counts for this run so far.
    pub fn counts(&self) -> (usize, usize, usize) {
        (self.passed, self.failed, self.fatal)
    }

    fn tag(&mut self, color: Color, text: &str) {
        let _ = self
            .stream
            .set_color(ColorSpec::new().set_fg(Some(color)).set_bold(true));
        let _ = write!(self.stream, "{}", text);
        let _ = self.stream.reset();
    }
}

impl Default for ConsoleReport {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportSink for ConsoleReport {
    fn log(&mut self, message: &str) {
        let _ = writeln!(self.stream, "{}", message);
    }

    fn pass(&mut self, path: &Path) {
        self.passed += 1;
        self.tag(Color::Green, "PASS");
        let _ = writeln!(self.stream, ": {}", path.display());
    }

    fn fail(&mut self, path: &Path, detail: &str) {
        self.failed += 1;
        self.tag(Color::Red, "FAIL");
        let _ = writeln!(self.stream, ": {}\n{}", path.display(), detail);
    }

    fn fatal(&mut self, path: Option<&Path>, error: &RunnerError) {
        self.fatal += 1;
        self.tag(Color::Yellow, "FATAL");
        match path {
            Some(p) => {
                let _ = writeln!(self.stream, ": {}: {}", p.display(), error);
            }
            None => {
                let _ = writeln!(self.stream, ": {}", error);
            }
        }
        let mut cause = error.source();
        while let Some(c) = cause {
            let _ = writeln!(self.stream, "  caused by: {}", c);
            cause = c.source();
        }
        if let Some(help) = error.help_text() {
            let _ = writeln!(self.stream, "  help: {}", help);
        }
    }
}

/// One recorded sink event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Log(String),
    Pass(PathBuf),
    Fail { path: PathBuf, detail: String },
    Fatal {
        path: Option<PathBuf>,
        message: String,
        help: Option<String>,
    },
}

/// Sink that records every event for later inspection.
#[derive(Debug, Default)]
pub struct Recorder {
    pub events: Vec<Event>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn passed(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, Event::Pass(_)))
            .count()
    }

    pub fn failed(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, Event::Fail { .. }))
            .count()
    }

    pub fn fatals(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, Event::Fatal { .. }))
            .count()
    }

    /// Details of every assertion-level failure, in emission order.
    pub fn failure_details(&self) -> Vec<&str> {
        self.events
            .iter()
            .filter_map(|e| match e {
                Event::Fail { detail, .. } => Some(detail.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Messages of every fatal event, in emission order.
    pub fn fatal_messages(&self) -> Vec<&str> {
        self.events
            .iter()
            .filter_map(|e| match e {
                Event::Fatal { message, .. } => Some(message.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl ReportSink for Recorder {
    fn log(&mut self, message: &str) {
        self.events.push(Event::Log(message.to_string()));
    }

    fn pass(&mut self, path: &Path) {
        self.events.push(Event::Pass(path.to_path_buf()));
    }

    fn fail(&mut self, path: &Path, detail: &str) {
        self.events.push(Event::Fail {
            path: path.to_path_buf(),
            detail: detail.to_string(),
        });
    }

    fn fatal(&mut self, path: Option<&Path>, error: &RunnerError) {
        self.events.push(Event::Fatal {
            path: path.map(Path::to_path_buf),
            message: error.to_string(),
            help: error.help_text(),
        });
    }
}
