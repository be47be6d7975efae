//! Configuration resolver for a snapshot run.
//!
//! An [`Options`] value is built once per [`crate::runner::run`] call from
//! defaults overlaid with caller-supplied option functions, applied in
//! order with last-write-wins semantics. The resolved value is immutable
//! for the rest of the run.

use crate::errors::RunnerError;
use crate::serialize::{self, SerializeError, SerializeFn};
use std::fmt;
use std::sync::Arc;

/// Default suffix that marks a file as a fixture.
pub const DEFAULT_FILE_SUFFIX: &str = ".json";

/// Default suffix appended to a fixture path to locate its reference file.
pub const DEFAULT_RESULT_SUFFIX: &str = ".result";

/// The resolved option set for one snapshot run.
#[derive(Clone)]
pub struct Options {
    pub(crate) file_suffix: String,
    pub(crate) result_suffix: String,
    pub(crate) init_mode: bool,
    pub(crate) serializer: Option<SerializeFn>,
}

// The serializer is an opaque callable; its presence is all Debug can say.
impl fmt::Debug for Options {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Options")
            .field("file_suffix", &self.file_suffix)
            .field("result_suffix", &self.result_suffix)
            .field("init_mode", &self.init_mode)
            .field("serializer", &self.serializer.is_some())
            .finish()
    }
}

/// A single option override. Overrides are applied in the order given;
/// later overrides win on conflicting fields.
pub type OptionFn = Box<dyn FnOnce(&mut Options)>;

impl Options {
    fn defaults(init_mode: bool) -> Self {
        Self {
            file_suffix: DEFAULT_FILE_SUFFIX.to_string(),
            result_suffix: DEFAULT_RESULT_SUFFIX.to_string(),
            init_mode,
            serializer: Some(Arc::new(serialize::utf8)),
        }
    }

    /// Overlays `overrides` onto the defaults and validates the result.
    ///
    /// Validation rejects empty suffixes and a result suffix equal to the
    /// file suffix; either would let a fixture be mistaken for its own
    /// reference file.
    pub fn resolve(init_default: bool, overrides: Vec<OptionFn>) -> Result<Self, RunnerError> {
        let mut opt = Self::defaults(init_default);
        for apply in overrides {
            apply(&mut opt);
        }
        if opt.file_suffix.is_empty() {
            return Err(RunnerError::EmptySuffix { which: "file" });
        }
        if opt.result_suffix.is_empty() {
            return Err(RunnerError::EmptySuffix { which: "result" });
        }
        if opt.file_suffix == opt.result_suffix {
            return Err(RunnerError::SuffixCollision {
                suffix: opt.result_suffix,
            });
        }
        Ok(opt)
    }

    /// True when this run writes reference files instead of checking them.
    pub fn init_mode(&self) -> bool {
        self.init_mode
    }

    /// The suffix a file name must end with to count as a fixture.
    pub fn file_suffix(&self) -> &str {
        &self.file_suffix
    }

    /// The suffix appended to a fixture path to name its reference file.
    pub fn result_suffix(&self) -> &str {
        &self.result_suffix
    }
}

/// Only files whose name ends with `suffix` are treated as fixtures.
pub fn file_suffix(suffix: impl Into<String>) -> OptionFn {
    let suffix = suffix.into();
    Box::new(move |o| o.file_suffix = suffix)
}

/// Appended to a fixture's path to locate or create its reference file.
pub fn result_suffix(suffix: impl Into<String>) -> OptionFn {
    let suffix = suffix.into();
    Box::new(move |o| o.result_suffix = suffix)
}

/// Forces init or regular mode regardless of the ambient run-mode signal.
pub fn init_mode(enabled: bool) -> OptionFn {
    Box::new(move |o| o.init_mode = enabled)
}

/// Sets the text serializer used to render payload bytes when displaying
/// a diff. Never affects comparison semantics.
pub fn serializer<F>(f: F) -> OptionFn
where
    F: Fn(&[u8]) -> Result<String, SerializeError> + Send + Sync + 'static,
{
    Box::new(move |o| o.serializer = Some(Arc::new(f)))
}

/// Shortcut for the strict UTF-8 serializer. This is the default; the
/// option exists for completeness and for undoing an earlier override.
pub fn utf8_serializer() -> OptionFn {
    serializer(serialize::utf8)
}

/// Shortcut for the hex-dump serializer, for fixtures with binary output.
pub fn binary_serializer() -> OptionFn {
    serializer(serialize::hex_dump)
}

/// Disables diff rendering entirely; mismatches are reported with a plain
/// message instead.
pub fn no_serializer() -> OptionFn {
    Box::new(|o| o.serializer = None)
}
