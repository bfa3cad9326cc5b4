use std::path::PathBuf;

use anyhow::Result;
use pcodes::{duplicate_coordinates, export_by_district, validate, write_table, Filter, Register, TableSink, TableSource};

use crate::cli::{Cli, ExportArgs, ListArgs, OutputArgs, ValidateArgs};

fn emit(register: &Register, output: &OutputArgs) -> Result<()> {
    match &output.output {
        Some(path) => {
            write_table(register, path)?;
            eprintln!("wrote {} row(s) to {}", register.len(), path.display());
        }
        None => super::print_rows(register),
    }
    Ok(())
}

pub fn list(cli: &Cli, args: &ListArgs) -> Result<()> {
    let config = super::config(cli)?;
    let register = if args.pending { config.staging_store().load()? } else { config.dataset_store().load()? };

    let filter = Filter {
        enumerator: args.enumerator.clone(),
        province: args.province.clone(),
        district: args.district.clone(),
        tehsil: args.tehsil.clone(),
        uc: args.uc.clone(),
        status: args.status.map(Into::into),
        village_name: args.village.clone(),
        code: args.code.clone(),
    };
    emit(&filter.apply(&register), &args.output)
}

pub fn export(cli: &Cli, args: &ExportArgs) -> Result<()> {
    let config = super::config(cli)?;
    let register = config.dataset_store().load()?;
    let dir = args.dir.clone().unwrap_or_else(|| PathBuf::from("./export"));

    for path in export_by_district(&register, &dir)? {
        println!("{}", path.display());
    }
    Ok(())
}

pub fn duplicates(cli: &Cli, args: &OutputArgs) -> Result<()> {
    let config = super::config(cli)?;
    let register = config.dataset_store().load()?;
    emit(&duplicate_coordinates(&register), args)
}

pub fn check(args: &ValidateArgs) -> Result<()> {
    let (latitude, longitude) = validate(&args.latitude, &args.longitude)?;
    println!("ok: {latitude}, {longitude}");
    Ok(())
}

pub fn normalize(cli: &Cli) -> Result<()> {
    let config = super::config(cli)?;
    let mut store = config.dataset_store();
    let mut register = store.load()?;
    register.normalize_codes();
    store.save(&register)?;
    eprintln!("normalized {} row(s)", register.len());
    Ok(())
}
