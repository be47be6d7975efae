//! The polymorphic test unit: the computation a snapshot run exercises.
//!
//! A unit maps raw fixture bytes to raw output bytes. Two variants exist
//! behind the one [`TestUnit`] capability:
//!
//! - a plain closure `FnMut(&Path, &[u8]) -> Result<Vec<u8>, E>` for tests
//!   that parse, compute, and serialize in one step;
//! - a [`StagedUnit`] with separate parse / execute / serialize phases,
//!   adapted via [`Staged`], for tests that keep state between phases.
//!
//! A unit error is an assertion-tier failure, not an infrastructure one:
//! it marks the fixture as failed but reconciliation still runs with
//! whatever output bytes the unit produced. Units are therefore encouraged
//! to encode expected business errors into their serialized output (see
//! [`serializable_error`]) so that error behavior is itself snapshot-tested.

use std::path::Path;

/// A business-level error reported by a test unit.
pub type UnitError = Box<dyn std::error::Error + Send + Sync>;

/// A failed computation, carrying whatever output the unit still produced.
///
/// The output travels with the error so the runner can reconcile it
/// against the stored reference; the error and a byte mismatch are
/// independent failure signals.
#[derive(Debug)]
pub struct UnitFailure {
    pub output: Vec<u8>,
    pub error: UnitError,
}

impl UnitFailure {
    /// A failure that produced no output; reconciliation sees empty bytes.
    pub fn new(error: impl Into<UnitError>) -> Self {
        Self {
            output: Vec::new(),
            error: error.into(),
        }
    }

    /// A failure that still produced serialized output.
    pub fn with_output(output: Vec<u8>, error: impl Into<UnitError>) -> Self {
        Self {
            output,
            error: error.into(),
        }
    }
}

/// A test computation over opaque fixture bytes.
pub trait TestUnit {
    /// Runs the computation for one fixture.
    ///
    /// `path` identifies the fixture for units that vary behavior by file;
    /// most units ignore it. Must be deterministic for the golden-file
    /// model to be meaningful (a caller responsibility, not enforced).
    fn compute(&mut self, path: &Path, input: &[u8]) -> Result<Vec<u8>, UnitFailure>;
}

impl<F, E> TestUnit for F
where
    F: FnMut(&Path, &[u8]) -> Result<Vec<u8>, E>,
    E: Into<UnitError>,
{
    fn compute(&mut self, path: &Path, input: &[u8]) -> Result<Vec<u8>, UnitFailure> {
        (self)(path, input).map_err(UnitFailure::new)
    }
}

/// A test unit with distinct lifecycle phases over a persistent value.
pub trait StagedUnit {
    /// Deserializes the fixture bytes into the unit's input state.
    fn parse(&mut self, input: &[u8]) -> Result<(), UnitError>;

    /// Runs the computation. Implementations should reset any output
    /// state left over from a previous fixture before filling it.
    fn execute(&mut self) -> Result<(), UnitError>;

    /// Serializes the unit's output state.
    fn serialize(&mut self) -> Result<Vec<u8>, UnitError>;
}

/// Adapts a [`StagedUnit`] to the [`TestUnit`] capability.
///
/// An `execute` error does not skip `serialize`: the serialized output is
/// attached to the failure so it still reaches reconciliation.
pub struct Staged<U>(pub U);

impl<U: StagedUnit> TestUnit for Staged<U> {
    fn compute(&mut self, _path: &Path, input: &[u8]) -> Result<Vec<u8>, UnitFailure> {
        self.0.parse(input).map_err(UnitFailure::new)?;
        let run_error = self.0.execute().err();
        let output = match self.0.serialize() {
            Ok(output) => output,
            Err(e) => {
                return Err(match run_error {
                    Some(run) => UnitFailure::new(format!("{}; also, serializing failed: {}", run, e)),
                    None => UnitFailure::new(e),
                })
            }
        };
        match run_error {
            Some(e) => Err(UnitFailure::with_output(output, e)),
            None => Ok(output),
        }
    }
}

/// Renders an optional error as an `Option<String>` suitable for embedding
/// in a unit's serialized output, so expected business errors become part
/// of the snapshot instead of failing the run.
pub fn serializable_error<E: std::fmt::Display>(err: Option<&E>) -> Option<String> {
    err.map(|e| e.to_string())
}
