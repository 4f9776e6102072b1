use clap::Parser;
use salescope::cli::Cli;
use salescope::logging::init_logging;

fn main() -> anyhow::Result<()> {
    init_logging();
    let cli = Cli::parse();
    cli.run()
}
