pub mod config;
pub mod print;
pub mod write;

use std::io;
use std::path::PathBuf;

use mufuzz_emit::codec::{Codec, CodecError, JsonCodec};
use mufuzz_emit::insn::Unit;
use mufuzz_runtime::config::Options as RuntimeOptions;
use mufuzz_runtime::{DirSource, LoadError, Mutant, MutantLoader, SnapshotError, UnitSource};
use thiserror::Error;
use tracing::{info, warn};

use crate::config::{Config, Mode};

#[derive(Debug, Error)]
pub enum DriverError {
    #[error("unknown mutation operator `{0}`")]
    UnknownOperator(String),
    #[error("unknown subcommand `{0}`")]
    UnknownSubcommand(String),
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error("malformed instruction stream")]
    Codec(#[from] CodecError),
    #[error("invalid registry snapshot `{path}`")]
    Snapshot {
        path: PathBuf,
        #[source]
        source: SnapshotError,
    },
    #[error("cannot access `{path}`")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

fn read_unit(source: &impl UnitSource, name: &str) -> Result<Unit, DriverError> {
    let bytes = source.request_bytes(name)?;
    Ok(JsonCodec.decode(&bytes)?)
}

pub fn run(config: &Config) -> Result<(), DriverError> {
    let source = DirSource::new(&config.unit_path);

    match &config.opts.mode {
        Mode::PrintOpportunities { unit } => {
            let unit = read_unit(&source, unit)?;
            print::print_opportunities(&unit, &config.opts.operators);
        }

        Mode::PrintMutants { unit } => {
            let unit = read_unit(&source, unit)?;
            print::print_mutants(&unit, &config.opts.operators);
        }

        Mode::Mutate { unit, operator, ordinal, out, diff } => {
            let mutant = Mutant::new(*operator, *ordinal, unit, &RuntimeOptions::default());
            let loader = MutantLoader::with_json_codec(source);
            let loaded_unit = loader.load(&mutant, unit)?;

            match &loaded_unit.mutation {
                Some(mutation) => info!("{mutation}"),
                None => warn!("{mutant} has no opportunity to rewrite; {opportunities} found",
                    mutant = mutant.id(),
                    opportunities = loaded_unit.opportunities.unwrap_or_default(),
                ),
            }

            if *diff {
                if let Some(rewritten_unit) = &loaded_unit.unit {
                    let original_unit = read_unit(loader.source(), unit)?;
                    print!("{}", print::listing_diff(&original_unit, rewritten_unit));
                }
            }

            match out {
                Some(out) => {
                    write::write_file(out, &loaded_unit.bytes)?;
                    info!("wrote rewritten unit to `{}`", out.display());
                }
                None if !*diff => println!("{}", String::from_utf8_lossy(&loaded_unit.bytes)),
                None => {}
            }
        }

        Mode::Merge { snapshots, out } => {
            let (registry, grown) = write::merge_snapshots(snapshots)?;

            for (path, grown) in snapshots.iter().zip(grown) {
                println!("{path}: {status}",
                    path = path.display(),
                    status = match grown {
                        true => "new kills",
                        false => "no new kills",
                    },
                );
            }

            let bytes = registry.write_json().map_err(|source| DriverError::Snapshot { path: out.clone(), source })?;
            write::write_file(out, &bytes)?;

            println!();
            println!("registry: {caught} caught; {seen} seen",
                caught = registry.caught_count(),
                seen = registry.seen_count(),
            );
        }
    }

    Ok(())
}
