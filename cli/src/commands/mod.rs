pub mod add;
pub mod import;
pub mod lifecycle;
pub mod next_code;
pub mod view;

use std::path::Path;

use anyhow::{bail, Context, Result};
use pcodes::{split_list, AdminUnit, Register, RegisterConfig, VillageInput};

use crate::cli::{Cli, VillageListArgs};

/// Table locations from the config file, with command-line overrides applied.
pub fn config(cli: &Cli) -> Result<RegisterConfig> {
    let mut config = RegisterConfig::load(cli.config.as_deref())?;
    if let Some(path) = &cli.dataset { config = config.with_dataset(path); }
    if let Some(path) = &cli.staging { config = config.with_staging(path); }
    if let Some(path) = &cli.rejected { config = config.with_rejected(path); }
    if let Some(path) = &cli.reference { config = config.with_reference(path); }
    tracing::debug!(?config, "resolved configuration");
    Ok(config)
}

/// The date recorded on changes.
pub fn date(cli: &Cli) -> Result<String> {
    match &cli.date {
        Some(date) => {
            chrono::NaiveDate::parse_from_str(date, "%Y-%m-%d")
                .with_context(|| format!("Invalid date '{date}', expected YYYY-MM-DD"))?;
            Ok(date.clone())
        }
        None => Ok(chrono::Local::now().date_naive().format("%Y-%m-%d").to_string()),
    }
}

/// Codes given on the command line and/or in a file, one per entry.
pub fn codes(args: &[String], file: Option<&Path>) -> Result<Vec<String>> {
    let mut codes: Vec<String> = args.iter().flat_map(|arg| split_list(arg)).collect();
    if let Some(file) = file {
        let text = std::fs::read_to_string(file)
            .with_context(|| format!("Failed to read codes from {}", file.display()))?;
        codes.extend(split_list(&text));
    }
    if codes.is_empty() {
        bail!("no village P-codes given");
    }
    Ok(codes)
}

pub fn villages(args: &VillageListArgs) -> Result<Vec<VillageInput>> {
    let names = split_list(&args.names);
    Ok(VillageInput::zip(&names, &split_list(&args.lat), &split_list(&args.lon))?)
}

pub fn print_added(rows: &[AdminUnit]) {
    for row in rows {
        println!("{} -> {}", row.village_name, row.village_pcode_new);
    }
}

/// Prints rows as `code<TAB>village<TAB>uc<TAB>status`.
pub fn print_rows(register: &Register) {
    for row in register.rows() {
        println!("{}\t{}\t{}\t{}", row.village_pcode_new, row.village_name, row.uc, row.status);
    }
    eprintln!("{} row(s)", register.len());
}
