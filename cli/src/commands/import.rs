use anyhow::Result;
use pcodes::{read_import_sheet, Batch, Destination, TableSource};

use crate::cli::{Cli, ImportArgs};

pub fn run(cli: &Cli, args: &ImportArgs) -> Result<()> {
    let config = super::config(cli)?;
    let date = super::date(cli)?;
    let reference = config.reference_tables()?;
    let dataset = config.dataset_store().load()?;
    let staging = config.staging_store().load()?;
    let destination = if args.stage { Destination::Staging } else { Destination::Dataset };

    let sheet = read_import_sheet(&args.sheet)?;
    let report = Batch::new(&dataset, &reference, &date)
        .with_staging(&staging)
        .with_destination(destination)
        .import(&sheet);

    for skipped in &report.skipped {
        eprintln!("[import] row {} ('{}') skipped: {}", skipped.row, skipped.village, skipped.reason);
    }
    if report.rows.is_empty() {
        eprintln!("[import] no valid villages were imported");
        return Ok(());
    }

    super::print_added(&report.rows);
    eprintln!("[import] imported {} village(s), skipped {}", report.rows.len(), report.skipped.len());
    super::add::commit(&config, dataset, staging, destination, report.rows)
}
