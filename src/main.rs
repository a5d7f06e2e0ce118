#![deny(clippy::all)]
#![warn(clippy::cargo, clippy::pedantic)]
#![allow(
    clippy::cargo_common_metadata,
    clippy::module_name_repetitions,
    clippy::multiple_crate_versions,
    clippy::needless_pass_by_value,
    clippy::unnecessary_wraps
)]

use std::process::ExitCode;

#[cfg(feature = "cli")]
pub(crate) mod cli;

use console::style;

fn main() -> ExitCode {
    // NOTE: Logs go to stderr so that they never mix
    // with mapped traces and reports written to stdout
    tracing_subscriber::fmt()
        .compact()
        .with_env_filter(tracing_subscriber::filter::EnvFilter::from_default_env())
        .with_target(true)
        .with_timer(tracing_subscriber::fmt::time::uptime())
        .with_level(true)
        .with_writer(std::io::stderr)
        .init();

    #[cfg(feature = "cli")]
    {
        use clap::Parser;

        match cli::Cli::parse().run() {
            Ok(code) => code,
            Err(err) => {
                eprintln!(
                    "{}{}{}\n{err:?}",
                    style("[").dim(),
                    style("ERROR").red(),
                    style("]").dim(),
                );
                ExitCode::FAILURE
            }
        }
    }

    #[cfg(not(feature = "cli"))]
    {
        eprintln!(
            "{}{}{}\nCLI feature is disabled",
            style("[").dim(),
            style("ERROR").red(),
            style("]").dim(),
        );
        ExitCode::FAILURE
    }
}
