//! Shared helpers for the integration tests: temporary fixture
//! directories and small arithmetic units over JSON payloads.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use snapdir::UnitError;
use tempfile::TempDir;

#[derive(Deserialize)]
pub struct Pair {
    pub a: i64,
    pub b: i64,
}

#[derive(Serialize)]
pub struct Answer {
    pub result: i64,
}

/// An isolated directory for one test's fixtures and references.
pub fn fixture_dir() -> TempDir {
    tempfile::tempdir().unwrap()
}

pub fn write_fixture(dir: &Path, name: &str, contents: &[u8]) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).unwrap();
    path
}

/// `{"a":..,"b":..}` in, `{"result":a+b}` out.
pub fn sum_unit(_path: &Path, data: &[u8]) -> Result<Vec<u8>, UnitError> {
    let input: Pair = serde_json::from_slice(data)?;
    let output = Answer {
        result: input.a + input.b,
    };
    Ok(serde_json::to_vec(&output)?)
}

/// `{"a":..,"b":..}` in, `{"result":a*b}` out.
pub fn mul_unit(_path: &Path, data: &[u8]) -> Result<Vec<u8>, UnitError> {
    let input: Pair = serde_json::from_slice(data)?;
    let output = Answer {
        result: input.a * input.b,
    };
    Ok(serde_json::to_vec(&output)?)
}
