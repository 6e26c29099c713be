//! JSON persistence helpers shared by the region and calibration stores.

use log::{debug, warn};
use serde::{de::DeserializeOwned, Serialize};
use std::{fs, io, path::Path};

#[derive(thiserror::Error, Debug)]
pub enum StoreIoError {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error("calibration is incomplete ({got} of 4 points)")]
    IncompleteCalibration { got: usize },
}

/// How a `load` call resolved. Loading never fails: the two non-`Loaded`
/// outcomes both leave the store empty.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LoadOutcome {
    /// File parsed and validated; `count` items loaded.
    Loaded { count: usize },
    /// No file at the path.
    Missing,
    /// File present but unreadable, unparsable or failing validation.
    Corrupt { reason: String },
}

impl LoadOutcome {
    pub fn is_loaded(&self) -> bool {
        matches!(self, LoadOutcome::Loaded { .. })
    }
}

/// Write `value` as pretty JSON.
pub(crate) fn write_json<T: Serialize + ?Sized>(
    path: &Path,
    value: &T,
) -> Result<(), StoreIoError> {
    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json)?;
    Ok(())
}

/// Read and parse JSON, then run `validate`. Missing files and every kind of
/// corruption are logged and reported through [`LoadOutcome`].
pub(crate) fn read_json_lenient<T, F>(
    path: &Path,
    what: &str,
    validate: F,
) -> (Option<T>, LoadOutcome)
where
    T: DeserializeOwned,
    F: FnOnce(&T) -> Result<usize, String>,
{
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            debug!("no {what} file at {}, starting empty", path.display());
            return (None, LoadOutcome::Missing);
        }
        Err(err) => return corrupt(path, what, err.to_string()),
    };

    let value: T = match serde_json::from_str(&raw) {
        Ok(v) => v,
        Err(err) => return corrupt(path, what, err.to_string()),
    };

    match validate(&value) {
        Ok(count) => {
            debug!("loaded {count} {what} item(s) from {}", path.display());
            (Some(value), LoadOutcome::Loaded { count })
        }
        Err(reason) => corrupt(path, what, reason),
    }
}

fn corrupt<T>(path: &Path, what: &str, reason: String) -> (Option<T>, LoadOutcome) {
    warn!(
        "{what} file {} is corrupt ({reason}), starting empty",
        path.display()
    );
    (None, LoadOutcome::Corrupt { reason })
}
