//! Mutant-aware unit loading.
//!
//! A load request for a mutant's target unit reads the original bytes once, rewrites the
//! requested opportunity, and defines the result in the mutant's own namespace. Every other
//! unit is defined from its original bytes, untouched by the operator.

use std::any::Any;
use std::fs;
use std::io;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{self, AtomicUsize};

use mufuzz_emit::codec::{Codec, JsonCodec};
use mufuzz_emit::codegen::rewrite::{self, Rewrite};
use rustc_hash::FxHashMap;
use tracing::{debug, warn};

use crate::error::LoadError;
use crate::mutant::Mutant;
use crate::namespace::LoadedUnit;

pub trait UnitSource: Send + Sync {
    /// Reads the original bytes of the named unit.
    fn request_bytes(&self, name: &str) -> Result<Vec<u8>, LoadError>;
}

/// Units stored as `<root>/<name>.json`, with `.` separators in unit names mapped to path
/// separators.
#[derive(Clone, Debug)]
pub struct DirSource {
    root: PathBuf,
}

impl DirSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn unit_path(&self, name: &str) -> PathBuf {
        self.root.join(format!("{}.json", name.replace('.', "/")))
    }
}

impl UnitSource for DirSource {
    fn request_bytes(&self, name: &str) -> Result<Vec<u8>, LoadError> {
        let path = self.unit_path(name);
        match fs::read(&path) {
            Ok(bytes) => Ok(bytes),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Err(LoadError::NotFound { unit: name.to_owned() }),
            Err(err) => Err(LoadError::Io { unit: name.to_owned(), path, source: err }),
        }
    }
}

/// Units held in memory. Counts every request it serves.
#[derive(Debug, Default)]
pub struct MemorySource {
    units: FxHashMap<String, Vec<u8>>,
    requests: AtomicUsize,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: &str, bytes: Vec<u8>) {
        self.units.insert(name.to_owned(), bytes);
    }

    pub fn with_unit(mut self, name: &str, bytes: Vec<u8>) -> Self {
        self.insert(name, bytes);
        self
    }

    pub fn requests_count(&self) -> usize {
        self.requests.load(atomic::Ordering::SeqCst)
    }
}

impl UnitSource for MemorySource {
    fn request_bytes(&self, name: &str) -> Result<Vec<u8>, LoadError> {
        self.requests.fetch_add(1, atomic::Ordering::SeqCst);
        self.units.get(name).cloned().ok_or_else(|| LoadError::NotFound { unit: name.to_owned() })
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() { return (*message).to_owned(); }
    if let Some(message) = payload.downcast_ref::<String>() { return message.clone(); }
    "operator panicked".to_owned()
}

pub struct MutantLoader<S: UnitSource, C: Codec = JsonCodec> {
    source: S,
    codec: C,
}

impl<S: UnitSource> MutantLoader<S, JsonCodec> {
    pub fn with_json_codec(source: S) -> Self {
        Self::new(source, JsonCodec)
    }
}

impl<S: UnitSource, C: Codec> MutantLoader<S, C> {
    pub fn new(source: S, codec: C) -> Self {
        Self { source, codec }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Loads the named unit into the namespace of `mutant`.
    ///
    /// A unit already defined in the namespace is returned as is, without reading anything. When
    /// two threads race to load the same unit for one mutant, both get the first definition.
    pub fn load(&self, mutant: &Mutant, name: &str) -> Result<Arc<LoadedUnit>, LoadError> {
        if let Some(loaded_unit) = mutant.namespace().get(name) { return Ok(loaded_unit); }

        let bytes = self.source.request_bytes(name)?;

        // Units other than the target are never decoded.
        if name != mutant.unit_name() {
            debug!(unit = name, mutant = %mutant.id(), "defining unit verbatim");
            return Ok(mutant.namespace().define_unit(LoadedUnit {
                name: name.to_owned(),
                namespace: mutant.id().clone(),
                bytes,
                unit: None,
                mutation: None,
                opportunities: None,
            }));
        }

        let malformed = |source| LoadError::MalformedInput { unit: name.to_owned(), source };
        let unit = self.codec.decode(&bytes).map_err(malformed)?;

        let operator = mutant.operator();
        let rewrite_result = panic::catch_unwind(AssertUnwindSafe(|| rewrite::rewrite(&unit, operator, mutant.ordinal())));
        let Rewrite { unit: rewritten_unit, opportunities, mutation } = match rewrite_result {
            Ok(rewrite) => rewrite,
            Err(payload) => {
                return Err(LoadError::Operator {
                    operator: operator.name(),
                    mutant: mutant.id().clone(),
                    message: panic_message(payload.as_ref()),
                });
            }
        };

        match &mutation {
            Some(mutation) => debug!(mutant = %mutant.id(), opportunities, "rewrote {mutation}"),
            None => warn!(mutant = %mutant.id(), opportunities, "ordinal is past the last opportunity; unit is left unmutated"),
        }

        let rewritten_bytes = self.codec.encode(&rewritten_unit).map_err(malformed)?;

        Ok(mutant.namespace().define_unit(LoadedUnit {
            name: name.to_owned(),
            namespace: mutant.id().clone(),
            bytes: rewritten_bytes,
            unit: Some(rewritten_unit),
            mutation,
            opportunities: Some(opportunities),
        }))
    }
}
