use anyhow::{bail, Result};
use pcodes::{approve, mark, reject, AdminIdentity, MarkReport, Status, TableSink, TableSource, ADMIN_PASSWORD_VAR, ADMIN_USERNAME_VAR};

use crate::cli::{Cli, DeleteArgs, ReviewArgs};

fn print_report(action: &str, report: &MarkReport) {
    for code in &report.affected {
        println!("{code}");
    }
    for skipped in &report.skipped {
        eprintln!("[{action}] {skipped}");
    }
    eprintln!("[{action}] {} affected, {} skipped", report.affected.len(), report.skipped.len());
}

pub fn delete(cli: &Cli, args: &DeleteArgs) -> Result<()> {
    let config = super::config(cli)?;
    let date = super::date(cli)?;
    let codes = super::codes(&args.codes, args.file.as_deref())?;

    let mut store = config.dataset_store();
    let mut dataset = store.load()?;
    let report = mark(&mut dataset, &codes, Status::MarkedForDeletion, &args.reason, &date);
    print_report("delete", &report);

    if !report.affected.is_empty() {
        store.save(&dataset)?;
    }
    Ok(())
}

fn authorize(args: &ReviewArgs) -> Result<()> {
    let Some(identity) = AdminIdentity::from_env() else {
        bail!("admin credentials are not configured (set {ADMIN_USERNAME_VAR} and {ADMIN_PASSWORD_VAR})");
    };
    if !identity.verify(&args.username, &args.password) {
        bail!("invalid admin credentials");
    }
    tracing::info!(user = identity.username(), "admin authorized");
    Ok(())
}

pub fn approve_staged(cli: &Cli, args: &ReviewArgs) -> Result<()> {
    authorize(args)?;
    let config = super::config(cli)?;
    let date = super::date(cli)?;
    let codes = super::codes(&args.codes, None)?;

    let dataset = config.dataset_store().load()?;
    let staging = config.staging_store().load()?;
    let transfer = approve(dataset, staging, &codes, &date)?;
    print_report("approve", &transfer.report);

    if !transfer.report.affected.is_empty() {
        config.dataset_store().save(&transfer.target)?;
        config.staging_store().save(&transfer.source)?;
    }
    Ok(())
}

pub fn reject_staged(cli: &Cli, args: &ReviewArgs) -> Result<()> {
    authorize(args)?;
    let config = super::config(cli)?;
    let date = super::date(cli)?;
    let codes = super::codes(&args.codes, None)?;

    let rejected = config.rejected_store().load()?;
    let staging = config.staging_store().load()?;
    let transfer = reject(rejected, staging, &codes, &date);
    print_report("reject", &transfer.report);

    if !transfer.report.affected.is_empty() {
        config.rejected_store().save(&transfer.target)?;
        config.staging_store().save(&transfer.source)?;
    }
    Ok(())
}
