//! # dhtstep
//!
//! Command-line front end for recording sensor runs and analyzing their
//! step response.
//!
//! ## Usage
//!
//! ```bash
//! # Record 10 minutes from an external reader program
//! dhtstep -v record step.csv --sensor command --command "python3 read_dht22.py"
//!
//! # Analyze the run
//! dhtstep analyze step.csv --baseline-window 120
//!
//! # Generate a simulated run on virtual time
//! dhtstep simulate demo.csv --analyze
//! ```

use anyhow::Result;
use clap::Parser;

mod cli;

use cli::Cli;

fn main() -> Result<()> {
    let cli = Cli::parse();
    cli::init_logging(cli.verbosity());
    cli::dispatch(cli)
}
