use anyhow::Result;
use clap::Parser;
use jpegsort::jpegsort_core::{Cli, OutputFormat, report, sorter};
use simplelog::{CombinedLogger, Config, LevelFilter, SharedLogger, TermLogger, WriteLogger};
use std::fs::File;
use std::io;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize loggers
    let mut loggers: Vec<Box<dyn SharedLogger>> = vec![TermLogger::new(
        LevelFilter::Warn,
        Config::default(),
        simplelog::TerminalMode::Stderr,
        simplelog::ColorChoice::Auto,
    )];

    if cli.log {
        loggers.push(WriteLogger::new(
            cli.log_level,
            Config::default(),
            File::create("jpegsort.log")?,
        ));
    }

    CombinedLogger::init(loggers)?;

    let options = cli.sort_options();
    let result = sorter::run(&options)?;

    match cli.format {
        OutputFormat::Text => report::write_text(&result, io::stdout().lock(), io::stderr().lock())?,
        OutputFormat::Json => println!("{}", report::to_json(&result)?),
    }

    Ok(())
}
