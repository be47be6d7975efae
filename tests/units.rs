//! Test-unit contract: error propagation, partial output reconciliation,
//! and the staged parse/execute/serialize variant.

mod common;

use std::path::Path;

use serde::Serialize;
use snapdir::{
    run_with_mode, serializable_error, FixedMode, Recorder, Staged, StagedUnit, TestUnit,
    UnitError, UnitFailure,
};

/// A unit that always reports a business error but still returns the
/// given output bytes.
struct ErrorWithOutput(Vec<u8>);

impl TestUnit for ErrorWithOutput {
    fn compute(&mut self, _path: &Path, _input: &[u8]) -> Result<Vec<u8>, UnitFailure> {
        Err(UnitFailure::with_output(self.0.clone(), "unit exploded"))
    }
}

#[test]
fn unit_error_fails_even_when_bytes_match() {
    let dir = common::fixture_dir();
    common::write_fixture(dir.path(), "1.json", br#"{"a":1,"b":2}"#);
    common::write_fixture(dir.path(), "1.json.result", b"payload");

    let mut rec = Recorder::new();
    run_with_mode(
        &mut rec,
        dir.path(),
        ErrorWithOutput(b"payload".to_vec()),
        vec![],
        &FixedMode(false),
    );

    // Error and mismatch are independent signals: the bytes matched, so
    // the only failure is the reported unit error, and there is no pass.
    assert_eq!(rec.failed(), 1);
    assert_eq!(rec.passed(), 0);
    assert!(rec.failure_details()[0].contains("unit exploded"));
}

#[test]
fn unit_error_with_empty_output_also_mismatches() {
    let dir = common::fixture_dir();
    common::write_fixture(dir.path(), "1.json", br#"{"a":1,"b":2}"#);
    common::write_fixture(dir.path(), "1.json.result", b"payload");

    let failing = |_: &Path, _: &[u8]| -> Result<Vec<u8>, UnitError> { Err("boom".into()) };

    let mut rec = Recorder::new();
    run_with_mode(&mut rec, dir.path(), failing, vec![], &FixedMode(false));

    let details = rec.failure_details();
    assert_eq!(details.len(), 2);
    assert!(details[0].contains("boom"));
    assert!(details[1].contains("don't match"));
}

#[test]
fn unit_error_output_is_persisted_in_init_mode() {
    let dir = common::fixture_dir();
    common::write_fixture(dir.path(), "1.json", br#"{"a":1,"b":2}"#);

    let mut rec = Recorder::new();
    run_with_mode(
        &mut rec,
        dir.path(),
        ErrorWithOutput(b"partial".to_vec()),
        vec![],
        &FixedMode(true),
    );

    // The error is reported, but reconciliation still ran and wrote the
    // returned bytes as the reference.
    assert_eq!(rec.failed(), 1);
    assert_eq!(
        std::fs::read(dir.path().join("1.json.result")).unwrap(),
        b"partial"
    );
}

/// Staged arithmetic unit: divides `a / b`, encoding the division-by-zero
/// business error into its own serialized output.
#[derive(Default)]
struct DivUnit {
    input: Option<common::Pair>,
    result: i64,
    error: Option<String>,
}

#[derive(Serialize)]
struct DivOutput {
    result: i64,
    error: Option<String>,
}

impl StagedUnit for DivUnit {
    fn parse(&mut self, input: &[u8]) -> Result<(), UnitError> {
        self.input = Some(serde_json::from_slice(input)?);
        Ok(())
    }

    fn execute(&mut self) -> Result<(), UnitError> {
        // Reset output state between fixtures.
        self.result = 0;
        self.error = None;

        let input = self.input.as_ref().ok_or("execute called before parse")?;
        if input.b == 0 {
            self.error = serializable_error(Some(&"can't divide: b is zero"));
        } else {
            self.result = input.a / input.b;
        }
        Ok(())
    }

    fn serialize(&mut self) -> Result<Vec<u8>, UnitError> {
        Ok(serde_json::to_vec(&DivOutput {
            result: self.result,
            error: self.error.clone(),
        })?)
    }
}

#[test]
fn staged_unit_round_trips_across_fixtures() {
    let dir = common::fixture_dir();
    common::write_fixture(dir.path(), "1.json", br#"{"a":8,"b":2}"#);
    common::write_fixture(dir.path(), "2.json", br#"{"a":8,"b":0}"#);

    let mut rec = Recorder::new();
    run_with_mode(
        &mut rec,
        dir.path(),
        Staged(DivUnit::default()),
        vec![],
        &FixedMode(true),
    );
    assert_eq!(rec.fatals(), 0);
    assert_eq!(rec.failed(), 0);

    // The business error became part of the snapshot, not a run failure.
    let zero_case = std::fs::read_to_string(dir.path().join("2.json.result")).unwrap();
    assert!(zero_case.contains("b is zero"));

    let mut rec = Recorder::new();
    run_with_mode(
        &mut rec,
        dir.path(),
        Staged(DivUnit::default()),
        vec![],
        &FixedMode(false),
    );
    assert_eq!(rec.passed(), 2);
    assert_eq!(rec.failed(), 0);
}

#[test]
fn staged_parse_error_fails_the_fixture() {
    let dir = common::fixture_dir();
    common::write_fixture(dir.path(), "1.json", b"not json at all");
    common::write_fixture(dir.path(), "1.json.result", b"");

    let mut rec = Recorder::new();
    run_with_mode(
        &mut rec,
        dir.path(),
        Staged(DivUnit::default()),
        vec![],
        &FixedMode(false),
    );

    // Parse failure yields empty output, which happens to match the empty
    // reference; the error signal alone fails the fixture.
    assert_eq!(rec.failed(), 1);
    assert_eq!(rec.passed(), 0);
}
