use ahash::AHashSet;

use super::{merge::merge, Skipped};
use crate::error::{RegisterError, Result};
use crate::register::{AdminUnit, Register, Status};

/// Outcome of a lifecycle operation over a batch of codes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MarkReport {
    /// Codes whose rows were updated.
    pub affected: Vec<String>,
    /// Codes that were not applied, with the reason.
    pub skipped: Vec<Skipped>,
}

impl MarkReport {
    pub fn affected_count(&self) -> usize { self.affected.len() }

    /// Codes reported as not present in the collection.
    pub fn not_found(&self) -> Vec<&str> {
        self.skipped.iter()
            .filter(|s| matches!(s.reason, RegisterError::NotFound { .. }))
            .map(|s| s.item.as_str())
            .collect()
    }
}

/// Remark written when a row is marked for deletion.
pub fn deletion_remark(justification: &str, date: &str) -> String {
    let justification = justification.trim();
    let justification = if justification.is_empty() { "no reason" } else { justification };
    format!("to be deleted: {justification} on {date}")
}

fn annotate(remarks: &str, note: &str) -> String {
    if remarks.trim().is_empty() {
        note.to_string()
    } else {
        format!("{}; {note}", remarks.trim())
    }
}

/// Distinct, non-blank codes in first-seen order.
fn distinct<S: AsRef<str>>(codes: &[S]) -> Vec<&str> {
    let mut seen = AHashSet::new();
    codes.iter()
        .map(|c| c.as_ref().trim())
        .filter(|c| !c.is_empty() && seen.insert(*c))
        .collect()
}

/// Moves every row carrying one of `codes` to `status`, in place.
///
/// Codes are handled independently: a code that is missing or whose rows
/// cannot make the transition is reported in `skipped` and leaves its rows
/// untouched. Marking for deletion overwrites `remarks` with the
/// justification and date; other transitions append a dated note. Repeating
/// the same call leaves the table unchanged.
pub fn mark<S: AsRef<str>>(
    register: &mut Register,
    codes: &[S],
    status: Status,
    justification: &str,
    date: &str,
) -> MarkReport {
    let mut report = MarkReport::default();

    for code in distinct(codes) {
        let positions: Vec<usize> = register.rows().iter()
            .enumerate()
            .filter(|(_, row)| row.village_pcode_new == code)
            .map(|(i, _)| i)
            .collect();

        if positions.is_empty() {
            report.skipped.push(Skipped::new(code, RegisterError::NotFound { code: code.to_string() }));
            continue;
        }
        if let Some(row) = positions.iter().map(|i| &register.rows()[*i]).find(|row| !row.status.can_transition(status)) {
            let reason = RegisterError::InvalidTransition { code: code.to_string(), from: row.status, to: status };
            report.skipped.push(Skipped::new(code, reason));
            continue;
        }

        for i in positions {
            let row = &mut register.rows_mut()[i];
            let remarks = match status {
                Status::MarkedForDeletion => deletion_remark(justification, date),
                _ if justification.trim().is_empty() => annotate(&row.remarks, &format!("{status} on {date}")),
                _ => annotate(&row.remarks, &format!("{status} on {date}: {}", justification.trim())),
            };
            row.set_status(status, date, remarks);
        }
        report.affected.push(code.to_string());
    }

    tracing::info!(
        status = %status,
        affected = report.affected.len(),
        skipped = report.skipped.len(),
        "applied lifecycle change"
    );
    report
}

/// Result of moving staged rows between two collections.
#[derive(Debug, Clone, PartialEq)]
pub struct Transfer {
    /// The collection rows were moved into.
    pub target: Register,
    /// The collection rows were moved out of.
    pub source: Register,
    pub report: MarkReport,
}

/// Selects the staged rows for `codes` that may move to `status`, removing
/// them from `staging`. `blocked` reports codes that must stay staged.
fn take_staged<S: AsRef<str>>(
    staging: &mut Register,
    codes: &[S],
    status: Status,
    blocked: impl Fn(&str) -> Option<RegisterError>,
) -> (Vec<String>, Vec<Skipped>) {
    let mut selected = Vec::new();
    let mut skipped = Vec::new();

    for code in distinct(codes) {
        let Some(row) = staging.find(code) else {
            skipped.push(Skipped::new(code, RegisterError::NotFound { code: code.to_string() }));
            continue;
        };
        if !row.status.can_transition(status) {
            let reason = RegisterError::InvalidTransition { code: code.to_string(), from: row.status, to: status };
            skipped.push(Skipped::new(code, reason));
            continue;
        }
        if let Some(reason) = blocked(code) {
            skipped.push(Skipped::new(code, reason));
            continue;
        }
        selected.push(code.to_string());
    }
    (selected, skipped)
}

fn move_rows(staging: &mut Register, selected: &[String], status: Status, date: &str) -> Vec<AdminUnit> {
    let mut moved = staging.drain_where(|row| selected.iter().any(|c| *c == row.village_pcode_new));
    for row in &mut moved {
        let remarks = annotate(&row.remarks, &format!("{status} on {date}"));
        row.set_status(status, date, remarks);
    }
    moved
}

/// Approves staged rows: they leave `staging` and are merged into `dataset`
/// with status `approved`. Codes already present in the dataset are reported
/// as duplicates and stay staged.
pub fn approve<S: AsRef<str>>(dataset: Register, mut staging: Register, codes: &[S], date: &str) -> Result<Transfer> {
    let (selected, skipped) = take_staged(&mut staging, codes, Status::Approved, |code| {
        dataset.contains_code(code).then(|| RegisterError::DuplicateCode { code: code.to_string() })
    });
    let moved = move_rows(&mut staging, &selected, Status::Approved, date);
    let target = merge(dataset, moved)?;

    tracing::info!(approved = selected.len(), skipped = skipped.len(), "approved staged rows");
    Ok(Transfer { target, source: staging, report: MarkReport { affected: selected, skipped } })
}

/// Rejects staged rows: they leave `staging` and are appended to `rejected`
/// with status `rejected`.
pub fn reject<S: AsRef<str>>(rejected: Register, mut staging: Register, codes: &[S], date: &str) -> Transfer {
    let (selected, skipped) = take_staged(&mut staging, codes, Status::Rejected, |_| None);
    let moved = move_rows(&mut staging, &selected, Status::Rejected, date);

    let mut target = rejected;
    target.extend(moved);

    tracing::info!(rejected = selected.len(), skipped = skipped.len(), "rejected staged rows");
    Transfer { target, source: staging, report: MarkReport { affected: selected, skipped } }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(code: &str, status: Status) -> AdminUnit {
        AdminUnit {
            village_pcode_new: code.into(),
            village_settlement_code: code[code.len() - 3..].into(),
            status,
            remarks: "newly added on 2024-05-01".into(),
            ..Default::default()
        }
    }

    #[test]
    fn marking_unknown_code_changes_nothing() {
        let mut register = Register::from_rows([row("PK0101001001", Status::Active)]);
        let before = register.clone();
        let report = mark(&mut register, &["PK0101001999"], Status::MarkedForDeletion, "dup", "2024-06-01");

        assert_eq!(report.affected_count(), 0);
        assert_eq!(report.not_found(), vec!["PK0101001999"]);
        assert_eq!(register, before);
    }

    #[test]
    fn marking_is_idempotent() {
        let mut register = Register::from_rows([row("PK0101001001", Status::Active), row("PK0101001002", Status::Active)]);
        let codes = ["PK0101001001", "PK0101001999"];

        let report = mark(&mut register, &codes, Status::MarkedForDeletion, "duplicate entry", "2024-06-01");
        assert_eq!(report.affected, vec!["PK0101001001"]);
        assert_eq!(report.not_found(), vec!["PK0101001999"]);

        let marked = &register.rows()[0];
        assert_eq!(marked.status, Status::MarkedForDeletion);
        assert!(marked.remarks.contains("duplicate entry"));
        assert_eq!(marked.status_date, "2024-06-01");
        assert_eq!(register.rows()[1].status, Status::Active);

        let once = register.clone();
        mark(&mut register, &codes, Status::MarkedForDeletion, "duplicate entry", "2024-06-01");
        assert_eq!(register, once);
    }

    #[test]
    fn blank_justification() {
        assert_eq!(deletion_remark("  ", "2024-06-01"), "to be deleted: no reason on 2024-06-01");
    }

    #[test]
    fn invalid_transitions_are_skipped() {
        let mut register = Register::from_rows([row("PK0101001001", Status::Pending)]);
        let report = mark(&mut register, &["PK0101001001"], Status::MarkedForDeletion, "x", "2024-06-01");
        assert!(report.affected.is_empty());
        assert!(matches!(report.skipped[0].reason, RegisterError::InvalidTransition { .. }));
        assert_eq!(register.rows()[0].status, Status::Pending);
    }

    #[test]
    fn approve_moves_staged_rows() {
        let dataset = Register::from_rows([row("PK0101001001", Status::Active)]);
        let staging = Register::from_rows([
            row("PK0101001002", Status::Pending),
            row("PK0101001003", Status::Pending),
            row("PK0101001001", Status::Pending),
        ]);
        let transfer = approve(dataset, staging, &["PK0101001002", "PK0101001001", "PK0101001404"], "2024-06-02").unwrap();

        assert_eq!(transfer.report.affected, vec!["PK0101001002"]);
        assert_eq!(transfer.report.not_found(), vec!["PK0101001404"]);
        assert!(transfer.report.skipped.iter().any(|s| matches!(s.reason, RegisterError::DuplicateCode { .. })));

        let approved = transfer.target.find("PK0101001002").unwrap();
        assert_eq!(approved.status, Status::Approved);
        assert_eq!(approved.remarks, "newly added on 2024-05-01; approved on 2024-06-02");
        assert_eq!(transfer.target.len(), 2);

        let left: Vec<_> = transfer.source.rows().iter().map(|r| r.village_pcode_new.as_str()).collect();
        assert_eq!(left, vec!["PK0101001003", "PK0101001001"]);
    }

    #[test]
    fn reject_moves_to_rejected_collection() {
        let staging = Register::from_rows([row("PK0101001002", Status::Pending), row("PK0101001003", Status::Pending)]);
        let transfer = reject(Register::new(), staging, &["PK0101001003"], "2024-06-03");

        assert_eq!(transfer.report.affected_count(), 1);
        assert_eq!(transfer.source.len(), 1);
        let rejected = &transfer.target.rows()[0];
        assert_eq!(rejected.status, Status::Rejected);
        assert_eq!(rejected.status_date, "2024-06-03");
        assert!(rejected.remarks.ends_with("rejected on 2024-06-03"));
    }

    #[test]
    fn rejected_rows_cannot_be_approved() {
        let staging = Register::from_rows([row("PK0101001002", Status::Rejected)]);
        let transfer = approve(Register::new(), staging, &["PK0101001002"], "2024-06-03").unwrap();
        assert!(transfer.report.affected.is_empty());
        assert_eq!(transfer.source.len(), 1);
    }
}
