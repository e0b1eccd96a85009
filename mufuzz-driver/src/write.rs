use std::fs;
use std::path::{Path, PathBuf};

use mufuzz_runtime::MutantRegistry;

use crate::DriverError;

pub fn read_file(path: &Path) -> Result<Vec<u8>, DriverError> {
    fs::read(path).map_err(|source| DriverError::Io { path: path.to_owned(), source })
}

pub fn write_file(path: &Path, bytes: &[u8]) -> Result<(), DriverError> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| DriverError::Io { path: parent.to_owned(), source })?;
    }
    fs::write(path, bytes).map_err(|source| DriverError::Io { path: path.to_owned(), source })
}

/// Folds the snapshots into a single registry, in order.
///
/// Also returns, for each snapshot, whether merging it grew the caught set.
pub fn merge_snapshots(paths: &[PathBuf]) -> Result<(MutantRegistry, Vec<bool>), DriverError> {
    let mut registry = MutantRegistry::new();
    let mut grown = Vec::with_capacity(paths.len());

    for path in paths {
        let snapshot = MutantRegistry::read_json(&read_file(path)?)
            .map_err(|source| DriverError::Snapshot { path: path.to_owned(), source })?;
        grown.push(registry.merge(&snapshot));
    }

    Ok((registry, grown))
}
