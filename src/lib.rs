//! Snapdir: directory-driven golden-file testing.
//!
//! Snapdir runs a test computation against every fixture file in a
//! directory. In init mode it persists each computed output next to its
//! fixture as the new reference file; in regular mode it compares the
//! output byte-for-byte against the stored reference and reports a unified
//! diff on mismatch. All payloads are opaque byte sequences; the burden of
//! canonical, stable serialization sits with the test unit, in exchange
//! for a trivially unambiguous comparison rule.
//!
//! # Architecture
//!
//! - [`options`]: resolves the immutable option set for a run from
//!   defaults plus ordered overrides.
//! - [`mode`]: the ambient init-vs-regular signal, behind an injectable
//!   provider.
//! - [`unit`]: the polymorphic test unit, as a plain closure or a staged
//!   parse/execute/serialize value.
//! - [`runner`]: fixture discovery and the per-fixture load → compute →
//!   reconcile pipeline.
//! - [`report`]: sinks that receive pass/fail/fatal outcomes.
//! - [`serialize`]: text serializers used only for diff display.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::path::Path;
//! use snapdir::{run, ConsoleReport, UnitError};
//!
//! let mut report = ConsoleReport::new();
//! run(
//!     &mut report,
//!     "testdata/uppercase",
//!     |_path: &Path, input: &[u8]| -> Result<Vec<u8>, UnitError> {
//!         Ok(input.to_ascii_uppercase())
//!     },
//!     vec![snapdir::options::file_suffix(".txt")],
//! );
//! assert!(!report.has_failures());
//! ```
//!
//! Run once with `SNAPDIR_INIT=1` to write the reference files, commit
//! them, then run normally to verify.

pub mod errors;
pub mod mode;
pub mod options;
pub mod report;
pub mod runner;
pub mod serialize;
pub mod unit;

pub use errors::RunnerError;
pub use mode::{AmbientMode, FixedMode, ModeProvider};
pub use options::{OptionFn, Options};
pub use report::{ConsoleReport, Event, Recorder, ReportSink};
pub use runner::{run, run_with_mode};
pub use serialize::{SerializeError, SerializeFn};
pub use unit::{serializable_error, Staged, StagedUnit, TestUnit, UnitError, UnitFailure};
