//! Infrastructure error type for the snapshot runner.
//!
//! Everything in this enum is fatal-tier: it signals a broken environment or
//! caller misconfiguration, not a behavioral regression in the code under
//! test. Assertion-tier outcomes (byte mismatches, unit business errors) are
//! never represented here; they flow through [`crate::report::ReportSink`]
//! as recoverable failures instead.
//!
//! Remediation hints ride along as `miette` help text so that every fatal
//! condition tells the user what to do next, not just what went wrong.

use std::io;
use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

/// A fatal, infrastructure-level failure of the snapshot runner.
#[derive(Debug, Error, Diagnostic)]
pub enum RunnerError {
    /// The snapshot directory is missing and the run is in regular mode.
    #[error("snapshot directory '{dir}' doesn't exist")]
    #[diagnostic(help(
        "initialize the snapshots first by running in init mode \
         (set SNAPDIR_INIT=1 or pass the init_mode option)"
    ))]
    MissingDirectory { dir: PathBuf },

    /// Creating the snapshot directory in init mode failed.
    #[error("can't create the snapshot directory '{dir}'")]
    CreateDirectory {
        dir: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Listing the snapshot directory failed.
    #[error("can't read the contents of directory '{dir}'")]
    ListDirectory {
        dir: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    /// Regular mode found nothing to test.
    #[error("no files ending with '{suffix}' found in '{dir}'")]
    #[diagnostic(help(
        "add fixture files to the directory, or check the file suffix option"
    ))]
    EmptyFixtureSet { suffix: String, dir: PathBuf },

    /// A fixture file could not be read.
    #[error("can't read the fixture file '{path}'")]
    ReadFixture {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Regular mode requires a reference file that was never written.
    #[error("reference file '{path}' doesn't exist")]
    #[diagnostic(help(
        "initialize the snapshots first by running in init mode \
         (set SNAPDIR_INIT=1 or pass the init_mode option)"
    ))]
    MissingReference { path: PathBuf },

    /// A reference file exists but could not be read.
    #[error("can't read the reference file '{path}'")]
    ReadReference {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Writing a reference file in init mode failed.
    #[error("can't write the reference file '{path}'")]
    WriteReference {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// An option resolved to an empty suffix.
    #[error("the {which} suffix must not be empty")]
    EmptySuffix { which: &'static str },

    /// File suffix and result suffix collide, so a fixture would be
    /// mistaken for its own reference.
    #[error("result suffix '{suffix}' must differ from the file suffix")]
    #[diagnostic(help(
        "pick a distinct result suffix so reference files are never \
         discovered as fixtures"
    ))]
    SuffixCollision { suffix: String },
}

impl RunnerError {
    /// The remediation hint attached to this error, if any.
    pub fn help_text(&self) -> Option<String> {
        self.help().map(|h| h.to_string())
    }
}
