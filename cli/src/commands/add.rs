use anyhow::Result;
use pcodes::{
    merge, AdminLevel, AdminUnit, Batch, Destination, NewUnit, PCode, Register, RegisterConfig, TableSink, TableSource,
    UnitPath,
};

use crate::cli::{AddUnitArgs, AddVillagesArgs, Cli};

fn destination(stage: bool) -> Destination {
    if stage { Destination::Staging } else { Destination::Dataset }
}

/// Merges the new rows into their destination and saves it.
pub(crate) fn commit(
    config: &RegisterConfig,
    dataset: Register,
    staging: Register,
    destination: Destination,
    rows: Vec<AdminUnit>,
) -> Result<()> {
    let added = rows.len();
    match destination {
        Destination::Dataset => config.dataset_store().save(&merge(dataset, rows)?)?,
        Destination::Staging => config.staging_store().save(&merge(staging, rows)?)?,
    }
    tracing::info!(added, ?destination, "committed new villages");
    Ok(())
}

pub fn villages(cli: &Cli, args: &AddVillagesArgs) -> Result<()> {
    let config = super::config(cli)?;
    let date = super::date(cli)?;
    let reference = config.reference_tables()?;
    let dataset = config.dataset_store().load()?;
    let staging = config.staging_store().load()?;
    let destination = destination(args.villages.stage);

    let villages = super::villages(&args.villages)?;
    let uc = PCode::new(AdminLevel::Uc, args.uc.trim());
    let rows = Batch::new(&dataset, &reference, &date)
        .with_staging(&staging)
        .with_destination(destination)
        .add_villages(&uc, &villages)?;

    super::print_added(&rows);
    commit(&config, dataset, staging, destination, rows)
}

pub fn unit(cli: &Cli, args: &AddUnitArgs) -> Result<()> {
    let config = super::config(cli)?;
    let date = super::date(cli)?;
    let reference = config.reference_tables()?;
    let dataset = config.dataset_store().load()?;
    let staging = config.staging_store().load()?;
    let destination = destination(args.villages.stage);

    let unit = NewUnit {
        level: args.level.into(),
        path: UnitPath::new(&args.province, &args.district, &args.tehsil, &args.uc),
        villages: super::villages(&args.villages)?,
    };
    let rows = Batch::new(&dataset, &reference, &date)
        .with_staging(&staging)
        .with_destination(destination)
        .add_unit(&unit)?;

    if let Some(first) = rows.first() {
        println!("{}: {} / {} / {}", unit.level, first.district_pcode, first.tehsil_pcode, first.uc_pcode);
    }
    super::print_added(&rows);
    commit(&config, dataset, staging, destination, rows)
}
