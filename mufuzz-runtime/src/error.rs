use std::io;
use std::path::PathBuf;

use mufuzz_emit::codec::CodecError;
use thiserror::Error;

use crate::guard::TimeoutFault;
use crate::mutant::MutantId;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("unit `{unit}` not found")]
    NotFound { unit: String },
    #[error("cannot read unit `{unit}` from `{path}`")]
    Io {
        unit: String,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("malformed instruction stream in unit `{unit}`")]
    MalformedInput {
        unit: String,
        #[source]
        source: CodecError,
    },
    #[error("operator `{operator}` failed while rewriting for {mutant}: {message}")]
    Operator {
        operator: &'static str,
        mutant: MutantId,
        message: String,
    },
}

#[derive(Debug, Error)]
pub enum GuardError {
    #[error("no mutant registered as {0}")]
    UnknownMutant(MutantId),
    #[error(transparent)]
    Timeout(#[from] TimeoutFault),
}

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("cannot parse registry snapshot")]
    Json(#[from] serde_json::Error),
    #[error("registry snapshot has format version {found}, expected {expected}")]
    FormatVersion { found: u32, expected: u32 },
}
