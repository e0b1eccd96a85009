use std::path::PathBuf;

use mufuzz_emit::Operator;

use crate::DriverError;

pub enum Mode {
    PrintOpportunities { unit: String },
    PrintMutants { unit: String },
    Mutate {
        unit: String,
        operator: &'static dyn Operator,
        ordinal: u64,
        out: Option<PathBuf>,
        diff: bool,
    },
    Merge { snapshots: Vec<PathBuf>, out: PathBuf },
}

pub struct Options {
    pub mode: Mode,
    pub verbosity: u8,
    /// Operators considered by the inspection commands, in catalog order.
    pub operators: Vec<&'static dyn Operator>,
}

pub struct Config {
    pub unit_path: PathBuf,
    pub opts: Options,
}

fn resolve_operator(name: &str) -> Result<&'static dyn Operator, DriverError> {
    mufuzz_operators::operator_by_name(name).ok_or_else(|| DriverError::UnknownOperator(name.to_owned()))
}

fn selected_operators(matches: &clap::ArgMatches) -> Result<Vec<&'static dyn Operator>, DriverError> {
    let names = matches.get_many::<String>("mutation-operators")
        .map(|names| names.map(String::as_str).collect::<Vec<_>>())
        .unwrap_or_default();

    if names.is_empty() || names.contains(&"all") {
        return Ok(mufuzz_operators::ALL.to_vec());
    }

    // Keep catalog order regardless of the order given on the command line.
    let operators = mufuzz_operators::ALL.iter().copied()
        .filter(|operator| names.contains(&operator.name()))
        .collect::<Vec<_>>();

    if let Some(unknown) = names.iter().find(|name| !operators.iter().any(|operator| operator.name() == **name)) {
        return Err(DriverError::UnknownOperator((*unknown).to_owned()));
    }

    Ok(operators)
}

fn unit_arg(matches: &clap::ArgMatches) -> String {
    matches.get_one::<String>("UNIT").cloned().unwrap_or_default()
}

impl Config {
    pub fn from_matches(matches: &clap::ArgMatches) -> Result<Self, DriverError> {
        let unit_path = matches.get_one::<PathBuf>("unit-path").cloned().unwrap_or_else(|| PathBuf::from("."));
        let verbosity = matches.get_count("verbose");

        let (mode, operators) = match matches.subcommand() {
            Some(("print-opportunities", matches)) => {
                (Mode::PrintOpportunities { unit: unit_arg(matches) }, selected_operators(matches)?)
            }
            Some(("print-mutants", matches)) => {
                (Mode::PrintMutants { unit: unit_arg(matches) }, selected_operators(matches)?)
            }
            Some(("mutate", matches)) => {
                let operator_name = matches.get_one::<String>("operator").map(String::as_str).unwrap_or_default();
                let operator = resolve_operator(operator_name)?;
                let mode = Mode::Mutate {
                    unit: unit_arg(matches),
                    operator,
                    ordinal: matches.get_one::<u64>("ordinal").copied().unwrap_or_default(),
                    out: matches.get_one::<PathBuf>("out").cloned(),
                    diff: matches.get_flag("diff"),
                };
                (mode, vec![operator])
            }
            Some(("merge", matches)) => {
                let mode = Mode::Merge {
                    snapshots: matches.get_many::<PathBuf>("SNAPSHOTS").map(|paths| paths.cloned().collect()).unwrap_or_default(),
                    out: matches.get_one::<PathBuf>("out").cloned().unwrap_or_default(),
                };
                (mode, vec![])
            }
            Some((subcommand, _)) => { return Err(DriverError::UnknownSubcommand(subcommand.to_owned())); }
            None => { return Err(DriverError::UnknownSubcommand(String::new())); }
        };

        Ok(Self { unit_path, opts: Options { mode, verbosity, operators } })
    }
}
