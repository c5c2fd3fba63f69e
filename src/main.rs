use std::path::Path;

use anyhow::{Context, bail};
use clap::Parser;
use log::info;

use tableload::conf::Config;
use tableload::core::{CliArgs, setup_logging};
use tableload::plan::explain_text;

fn main() -> anyhow::Result<()> {
    setup_logging();
    let args = CliArgs::parse();
    info!(args = &args; "tableload started.");

    let Some(path) = args.config.as_deref() else {
        bail!("no load config given, pass --config <file>");
    };
    let config = Config::from_file(Path::new(path))
        .with_context(|| format!("failed to read load config {path}"))?;
    let desc = config
        .load
        .to_descriptor()
        .context("failed to build load descriptor")?;

    if args.json {
        println!("{}", desc.to_json()?);
    } else {
        print!("{}", explain_text(&desc, args.level));
    }
    Ok(())
}
