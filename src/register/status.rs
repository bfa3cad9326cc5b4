use std::{fmt, str::FromStr};

use crate::error::RegisterError;

/// Lifecycle state of a register row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Status {
    #[default]
    Active,
    Pending,
    Approved,
    Rejected,
    MarkedForDeletion,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Active => "active",
            Status::Pending => "pending",
            Status::Approved => "approved",
            Status::Rejected => "rejected",
            Status::MarkedForDeletion => "marked_for_deletion",
        }
    }

    /// Whether a row in this state may move to `to`.
    ///
    /// `active -> pending -> {approved, rejected}` and
    /// `active | approved -> marked_for_deletion`. Re-marking a row for
    /// deletion is allowed so the justification can be overwritten.
    pub fn can_transition(&self, to: Status) -> bool {
        use Status::*;
        matches!(
            (self, to),
            (Active, Pending)
                | (Pending, Approved)
                | (Pending, Rejected)
                | (Active, MarkedForDeletion)
                | (Approved, MarkedForDeletion)
                | (MarkedForDeletion, MarkedForDeletion)
        )
    }

    /// Recover a status from a legacy free-text remark, for tables written
    /// before the `status` column existed.
    pub fn infer_from_remarks(remarks: &str) -> Status {
        let remarks = remarks.trim().to_lowercase();
        if remarks.starts_with("to be deleted") {
            Status::MarkedForDeletion
        } else if remarks.starts_with("rejected") {
            Status::Rejected
        } else if remarks.starts_with("approved") {
            Status::Approved
        } else {
            Status::Active
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Status {
    type Err = RegisterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "" | "active" => Ok(Status::Active),
            "pending" => Ok(Status::Pending),
            "approved" => Ok(Status::Approved),
            "rejected" => Ok(Status::Rejected),
            "marked_for_deletion" => Ok(Status::MarkedForDeletion),
            other => Err(RegisterError::InvalidInput(format!("unknown status '{other}'"))),
        }
    }
}
