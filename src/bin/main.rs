//! Checks a TOML scenario against its information-flow or
//! differential-privacy policy.

#![warn(clippy::all, clippy::cargo, clippy::pedantic)]

use std::{path::PathBuf, process::ExitCode};

use clap::Parser;
use ifc_taint::{Error, driver::Driver};
use tracing_forest::ForestLayer;
use tracing_subscriber::{EnvFilter, Registry, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Clone, Debug, Parser)]
pub struct ProgramOptions {
    /// The scenario file describing the program and its policy.
    #[arg(long, value_name = "PATH")]
    pub scenario: PathBuf,

    /// Print the lowered IR before checking it.
    #[arg(long, action = clap::ArgAction::SetTrue)]
    pub print_ir: bool,
}

/// The main function for the CLI utility, responsible for parsing program
/// options and handing them off to the actual execution of the tool.
fn main() -> ExitCode {
    // Parse args and hand-off immediately.
    let args = ProgramOptions::parse();

    Registry::default().with(ForestLayer::default()).with(EnvFilter::from_default_env()).init();

    run(&args).unwrap_or_else(|err| {
        eprintln!("Error Encountered: {err}");
        ExitCode::FAILURE
    })
}

/// Loads, lowers and checks the scenario. Succeeds only when the module
/// complies with the policy.
///
/// # Errors
///
/// - [`Error`] if the scenario cannot be read, decoded or lowered.
pub fn run(args: &ProgramOptions) -> Result<ExitCode, Error> {
    let mut driver = Driver::load(&args.scenario)?;
    driver.build_ir()?;
    if args.print_ir {
        print!("{}", driver.ir_to_string());
    }

    if driver.check_policy()? {
        println!("compliant");
        Ok(ExitCode::SUCCESS)
    } else {
        println!("non-compliant");
        Ok(ExitCode::FAILURE)
    }
}
