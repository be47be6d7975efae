//! The snapshot-test orchestrator.
//!
//! [`run`] discovers fixture files in a directory and drives each one
//! through a three-phase pipeline: load the fixture bytes, run the test
//! unit, then reconcile the output against the stored reference (regular
//! mode) or persist it as the new reference (init mode).
//!
//! Fixtures are processed one at a time in lexicographic order, fully
//! independently: an infrastructure failure inside one fixture stops that
//! fixture's pipeline and is reported as fatal, but the remaining fixtures
//! still run, so a single broken fixture cannot hide failures in others.
//! Only directory-level conditions abort the whole run.

use std::fs;
use std::path::{Path, PathBuf};

use similar::TextDiff;
use walkdir::WalkDir;

use crate::errors::RunnerError;
use crate::mode::{AmbientMode, ModeProvider};
use crate::options::{OptionFn, Options};
use crate::report::ReportSink;
use crate::unit::{TestUnit, UnitError, UnitFailure};

/// Diff context shown around each changed hunk.
const DIFF_CONTEXT: usize = 3;

/// Runs the unit against every fixture in `dir`, resolving the execution
/// mode from the ambient signal (see [`crate::mode::AmbientMode`]) unless
/// an explicit `init_mode` option is given.
///
/// Synchronous; returns only after every fixture has been processed. All
/// outcomes, fatal and recoverable alike, are delivered through `sink`.
pub fn run<S, U>(sink: &mut S, dir: impl AsRef<Path>, unit: U, options: Vec<OptionFn>)
where
    S: ReportSink,
    U: TestUnit,
{
    run_with_mode(sink, dir, unit, options, &AmbientMode)
}

/// Like [`run`], but with an injected default-mode provider.
pub fn run_with_mode<S, U>(
    sink: &mut S,
    dir: impl AsRef<Path>,
    mut unit: U,
    options: Vec<OptionFn>,
    mode: &dyn ModeProvider,
) where
    S: ReportSink,
    U: TestUnit,
{
    let dir = dir.as_ref();

    let opt = match Options::resolve(mode.init_mode(), options) {
        Ok(opt) => opt,
        Err(e) => {
            sink.fatal(None, &e);
            return;
        }
    };

    if opt.init_mode() {
        sink.log(&format!(
            "initializing snapshots for directory '{}'",
            dir.display()
        ));
    } else {
        sink.log(&format!(
            "running snapshot tests for directory '{}'",
            dir.display()
        ));
    }

    if let Err(e) = ensure_directory(sink, dir, &opt) {
        sink.fatal(None, &e);
        return;
    }

    let fixtures = match discover_fixtures(dir, opt.file_suffix()) {
        Ok(fixtures) => fixtures,
        Err(e) => {
            sink.fatal(None, &e);
            return;
        }
    };

    // An empty fixture set in regular mode signals misconfiguration, not a
    // vacuously passing test. In init mode the directory may simply be
    // awaiting its first fixtures.
    if fixtures.is_empty() && !opt.init_mode() {
        sink.fatal(
            None,
            &RunnerError::EmptyFixtureSet {
                suffix: opt.file_suffix().to_string(),
                dir: dir.to_path_buf(),
            },
        );
        return;
    }

    for path in fixtures {
        if let Err(e) = process_fixture(sink, &path, &mut unit, &opt) {
            sink.fatal(Some(&path), &e);
        }
    }
}

/// Creates the snapshot directory in init mode; in regular mode a missing
/// directory is fatal, since it implies the fixture set was never
/// initialized.
fn ensure_directory<S: ReportSink>(
    sink: &mut S,
    dir: &Path,
    opt: &Options,
) -> Result<(), RunnerError> {
    if dir.exists() {
        return Ok(());
    }
    if !opt.init_mode() {
        return Err(RunnerError::MissingDirectory {
            dir: dir.to_path_buf(),
        });
    }
    sink.log(&format!("creating directory '{}'", dir.display()));
    fs::create_dir_all(dir).map_err(|source| RunnerError::CreateDirectory {
        dir: dir.to_path_buf(),
        source,
    })
}

/// Lists the direct entries of `dir`, keeping only files whose name ends
/// with `suffix`, sorted lexicographically for reproducible runs.
fn discover_fixtures(dir: &Path, suffix: &str) -> Result<Vec<PathBuf>, RunnerError> {
    let mut fixtures = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
        let entry = entry.map_err(|source| RunnerError::ListDirectory {
            dir: dir.to_path_buf(),
            source,
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        if !entry.file_name().to_string_lossy().ends_with(suffix) {
            continue;
        }
        fixtures.push(entry.into_path());
    }
    fixtures.sort();
    Ok(fixtures)
}

/// Transient record of one fixture's reconciliation, reduced to sink
/// signals at the end of the pipeline.
struct Outcome {
    reference: Option<Vec<u8>>,
    computed: Vec<u8>,
    error: Option<UnitError>,
    matched: bool,
}

/// The three-phase pipeline for a single fixture: load, compute,
/// reconcile. Infrastructure failures abort this fixture only.
fn process_fixture<S, U>(
    sink: &mut S,
    path: &Path,
    unit: &mut U,
    opt: &Options,
) -> Result<(), RunnerError>
where
    S: ReportSink,
    U: TestUnit,
{
    let reference_path = reference_path(path, opt);

    sink.log(&path.display().to_string());
    let input = fs::read(path).map_err(|source| RunnerError::ReadFixture {
        path: path.to_path_buf(),
        source,
    })?;

    // Regular mode loads the reference up front so a missing or unreadable
    // reference is surfaced before the unit runs at all.
    let reference = if opt.init_mode() {
        None
    } else {
        if !reference_path.exists() {
            return Err(RunnerError::MissingReference {
                path: reference_path,
            });
        }
        Some(
            fs::read(&reference_path).map_err(|source| RunnerError::ReadReference {
                path: reference_path.clone(),
                source,
            })?,
        )
    };

    // A unit error is an assertion-level signal, independent of the byte
    // comparison. The pipeline continues with whatever bytes the unit
    // returned, so units can encode expected business errors into their
    // serialized output and have that behavior snapshot-tested.
    let (computed, error) = match unit.compute(path, &input) {
        Ok(output) => (output, None),
        Err(UnitFailure { output, error }) => (output, Some(error)),
    };
    if let Some(error) = &error {
        sink.fail(path, &format!("error during unit computation: {}", error));
    }

    if opt.init_mode() {
        sink.log(&format!("writing file '{}'", reference_path.display()));
        fs::write(&reference_path, &computed).map_err(|source| RunnerError::WriteReference {
            path: reference_path.clone(),
            source,
        })?;
        return Ok(());
    }

    let outcome = Outcome {
        matched: reference.as_deref() == Some(computed.as_slice()),
        reference,
        computed,
        error,
    };
    report_outcome(sink, path, &reference_path, outcome, opt);
    Ok(())
}

/// Reduces an [`Outcome`] to pass/fail signals. The unit error (already
/// reported) and a mismatch are independent: a pass is emitted only when
/// the bytes matched and the unit reported no error.
fn report_outcome<S: ReportSink>(
    sink: &mut S,
    path: &Path,
    reference_path: &Path,
    outcome: Outcome,
    opt: &Options,
) {
    if !outcome.matched {
        let reference = outcome.reference.as_deref().unwrap_or_default();
        let detail = render_mismatch(reference_path, reference, &outcome.computed, opt);
        sink.fail(path, &detail);
    } else if outcome.error.is_none() {
        sink.pass(path);
    }
}

/// Formats a mismatch as a unified diff when a serializer is available,
/// degrading to a plain message when it is absent or fails. The original
/// mismatch is surfaced in every case.
fn render_mismatch(
    reference_path: &Path,
    reference: &[u8],
    generated: &[u8],
    opt: &Options,
) -> String {
    let main = format!(
        "reference '{}' contents don't match the generated output",
        reference_path.display()
    );

    let Some(serializer) = &opt.serializer else {
        return format!("{}; no serializer configured, can't render a diff", main);
    };

    let serialize = &**serializer;
    let reference_text = match serialize(reference) {
        Ok(text) => text,
        Err(e) => {
            return format!(
                "{}; also, rendering the reference output failed: {}",
                main, e
            )
        }
    };
    let generated_text = match serialize(generated) {
        Ok(text) => text,
        Err(e) => {
            return format!(
                "{}; also, rendering the generated output failed: {}",
                main, e
            )
        }
    };

    let diff = TextDiff::from_lines(&reference_text, &generated_text);
    let rendered = diff
        .unified_diff()
        .context_radius(DIFF_CONTEXT)
        .header(
            &format!("{} (reference)", reference_path.display()),
            &format!("{} (generated)", reference_path.display()),
        )
        .to_string();

    format!("{}; here's the diff:\n\n{}", main, rendered)
}

/// The reference file sits next to its fixture, named by appending the
/// result suffix to the full fixture file name.
fn reference_path(path: &Path, opt: &Options) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(opt.result_suffix());
    PathBuf::from(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::Options;

    #[test]
    fn reference_path_appends_the_result_suffix() {
        let opt = Options::resolve(false, vec![]).unwrap();
        assert_eq!(
            reference_path(Path::new("testdata/sum/1.json"), &opt),
            PathBuf::from("testdata/sum/1.json.result")
        );
    }

    #[test]
    fn discovery_is_sorted_and_non_recursive() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b.json"), b"{}").unwrap();
        fs::write(dir.path().join("a.json"), b"{}").unwrap();
        fs::write(dir.path().join("notes.txt"), b"x").unwrap();
        fs::create_dir(dir.path().join("nested.json")).unwrap();
        fs::write(dir.path().join("nested.json").join("c.json"), b"{}").unwrap();

        let found = discover_fixtures(dir.path(), ".json").unwrap();
        let names: Vec<_> = found
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.json", "b.json"]);
    }

    #[test]
    fn discovery_fails_on_unreadable_directory() {
        let err = discover_fixtures(Path::new("no/such/dir"), ".json").unwrap_err();
        assert!(matches!(err, RunnerError::ListDirectory { .. }));
    }
}
