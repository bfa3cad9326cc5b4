use anyhow::Result;
use pcodes::{Allocator, PCode, TableSource};

use crate::cli::{Cli, NextCodeArgs};

pub fn run(cli: &Cli, args: &NextCodeArgs) -> Result<()> {
    let config = super::config(cli)?;
    let reference = config.reference_tables()?;
    let dataset = config.dataset_store().load()?;
    let staging = config.staging_store().load()?;

    let parent = PCode::new(args.level.into(), args.parent.trim());
    let code = Allocator::new(&dataset)
        .with_snapshot(&staging)
        .with_reference(&reference)
        .next(&parent)?;
    println!("{code}");
    Ok(())
}
