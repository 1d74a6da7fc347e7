//! Command-line driver for the quarterturn pipeline.

mod cli;
mod replay;

fn main() -> eyre::Result<()> {
    use clap::Parser;

    color_eyre::install()?;
    env_logger::builder().init();

    let args = cli::Args::parse();
    cli::exec(args)
}
