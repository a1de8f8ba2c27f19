use clap::Parser;
use perfpanel::cli::{run, Cli};
use perfpanel::init_logging;

fn main() -> anyhow::Result<()> {
    // Initialize logging
    init_logging()?;

    run(Cli::parse())
}
