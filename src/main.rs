use clap::Parser;

use gcodetexture::cli::{self, Cli};
use gcodetexture::init_logging;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose)?;
    cli::run(&cli)?;
    Ok(())
}
