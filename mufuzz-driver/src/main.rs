use std::error::Error;
use std::process::ExitCode;

use mufuzz_driver::config::Config;
use tracing_subscriber::EnvFilter;

fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).with_writer(std::io::stderr).init();
}

fn report(err: &dyn Error) {
    eprintln!("error: {err}");

    let mut source = err.source();
    while let Some(err) = source {
        eprintln!("  caused by: {err}");
        source = err.source();
    }
}

pub fn main() -> ExitCode {
    let matches = mufuzz_driver_cli::command().get_matches();

    let config = match Config::from_matches(&matches) {
        Ok(config) => config,
        Err(err) => {
            report(&err);
            return ExitCode::FAILURE;
        }
    };

    init_logging(config.opts.verbosity);

    if let Err(err) = mufuzz_driver::run(&config) {
        report(&err);
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
