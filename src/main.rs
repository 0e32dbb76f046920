//! Graypipe CLI: convert a directory of images to grayscale PNGs.

use anyhow::Result;
use clap::Parser;
use graypipe::engine::arg_parser::Cli;
use graypipe::engine::handle_run;
use std::time::Instant;

fn main() -> Result<()> {
    let start_time = Instant::now();
    let cli = Cli::parse();
    handle_run(&cli)?;
    log::debug!("Total time: {:?}", start_time.elapsed());
    Ok(())
}
