//! Ambient run-mode detection.
//!
//! Whether a run initializes snapshots or verifies against them is an
//! ambient signal from the environment, but the orchestrator itself must
//! stay a pure function of its explicit options. This module isolates the
//! ambient lookup behind a single injectable provider; the `init_mode`
//! option always wins over whatever a provider reports.

/// Environment variable that switches runs into init mode when set to
/// anything other than empty or `0`.
pub const INIT_ENV_VAR: &str = "SNAPDIR_INIT";

/// Supplies the default execution mode when the caller does not pass an
/// explicit `init_mode` option.
pub trait ModeProvider {
    /// True when the run should (re)initialize reference files.
    fn init_mode(&self) -> bool;
}

/// The standard provider: reads the `SNAPDIR_INIT` environment variable.
///
/// Process arguments are deliberately not consulted: test binaries
/// receive arbitrary name-filter arguments (`cargo test init` passes a
/// bare `init`), and a filter must never overwrite reference files.
#[derive(Debug, Default, Clone, Copy)]
pub struct AmbientMode;

impl ModeProvider for AmbientMode {
    fn init_mode(&self) -> bool {
        match std::env::var(INIT_ENV_VAR) {
            Ok(v) => !v.is_empty() && v != "0",
            Err(_) => false,
        }
    }
}

/// A fixed mode, independent of the process environment. Useful in tests
/// and for callers that resolve the mode themselves.
#[derive(Debug, Clone, Copy)]
pub struct FixedMode(pub bool);

impl ModeProvider for FixedMode {
    fn init_mode(&self) -> bool {
        self.0
    }
}
