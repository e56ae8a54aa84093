//! Cascading faculty deletion.
//!
//! A deletion runs as a small state machine:
//! `Validating -> DeletingRecords -> DeletingAccounts -> Done`, with any
//! persistence failure moving it to `Failed`. The steps are independent
//! writes, so `Failed` keeps the counts of everything already committed.

use crate::domain::faculties::{RecordCounts, RecordKind};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeletionScope {
    /// Remove faculty records, keep every account.
    RecordsOnly,
    /// Additionally remove the faculty's lecturer accounts.
    PurgeLecturerAccounts,
}

impl DeletionScope {
    /// Parses the `deleteAccounts` flag. Absent means `RecordsOnly`.
    pub fn from_delete_accounts_flag(flag: Option<&str>) -> Result<Self, DeletionError> {
        match flag.map(str::trim) {
            None | Some("") | Some("false") | Some("0") => Ok(DeletionScope::RecordsOnly),
            Some("true") | Some("1") => Ok(DeletionScope::PurgeLecturerAccounts),
            Some(other) => Err(DeletionError::InvalidScope(other.to_string())),
        }
    }

    pub fn purges_accounts(&self) -> bool {
        matches!(self, DeletionScope::PurgeLecturerAccounts)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DeletionScope::RecordsOnly => "records_only",
            DeletionScope::PurgeLecturerAccounts => "purge_lecturer_accounts",
        }
    }
}

impl fmt::Display for DeletionScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DeletionScope {
    type Err = DeletionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "records_only" => Ok(DeletionScope::RecordsOnly),
            "purge_lecturer_accounts" => Ok(DeletionScope::PurgeLecturerAccounts),
            _ => Err(DeletionError::InvalidScope(s.to_string())),
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DeletionError {
    #[error("invalid deletion scope: {0:?}")]
    InvalidScope(String),
    #[error("invalid state transition: {from} -> {to}")]
    InvalidTransition { from: String, to: String },
}

/// Non-terminal stages, used to report where a cascade stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeletionStage {
    Validating,
    DeletingRecords,
    DeletingAccounts,
}

impl fmt::Display for DeletionStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DeletionStage::Validating => "validating the request",
            DeletionStage::DeletingRecords => "deleting faculty records",
            DeletionStage::DeletingAccounts => "deleting lecturer accounts",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeletionState {
    Validating,
    DeletingRecords,
    DeletingAccounts,
    Done,
    Failed { stage: DeletionStage, reason: String },
}

impl DeletionState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, DeletionState::Done | DeletionState::Failed { .. })
    }

    fn stage(&self) -> Option<DeletionStage> {
        match self {
            DeletionState::Validating => Some(DeletionStage::Validating),
            DeletionState::DeletingRecords => Some(DeletionStage::DeletingRecords),
            DeletionState::DeletingAccounts => Some(DeletionStage::DeletingAccounts),
            _ => None,
        }
    }

    fn name(&self) -> &'static str {
        match self {
            DeletionState::Validating => "validating",
            DeletionState::DeletingRecords => "deleting_records",
            DeletionState::DeletingAccounts => "deleting_accounts",
            DeletionState::Done => "done",
            DeletionState::Failed { .. } => "failed",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemovedCounts {
    pub records: RecordCounts,
    pub accounts: u64,
}

impl RemovedCounts {
    pub fn records_total(&self) -> u64 {
        self.records.total()
    }

    pub fn is_empty(&self) -> bool {
        self.records_total() == 0 && self.accounts == 0
    }
}

/// Structured result of a deletion; produced for success and failure alike.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeletionOutcome {
    pub faculty: String,
    pub scope: DeletionScope,
    pub success: bool,
    pub message: String,
    pub removed: RemovedCounts,
    pub failed_stage: Option<DeletionStage>,
}

#[derive(Debug, Clone)]
pub struct FacultyDeletion {
    faculty: String,
    scope: DeletionScope,
    state: DeletionState,
    removed: RemovedCounts,
}

impl FacultyDeletion {
    pub fn new(faculty: impl Into<String>, scope: DeletionScope) -> Self {
        Self {
            faculty: faculty.into(),
            scope,
            state: DeletionState::Validating,
            removed: RemovedCounts::default(),
        }
    }

    pub fn faculty(&self) -> &str {
        &self.faculty
    }

    pub fn scope(&self) -> DeletionScope {
        self.scope
    }

    pub fn state(&self) -> &DeletionState {
        &self.state
    }

    pub fn removed(&self) -> RemovedCounts {
        self.removed
    }

    /// Moves to the next stage. The account stage is skipped unless the
    /// scope purges accounts.
    pub fn advance(&mut self) -> Result<&DeletionState, DeletionError> {
        let next = match self.state {
            DeletionState::Validating => DeletionState::DeletingRecords,
            DeletionState::DeletingRecords if self.scope.purges_accounts() => {
                DeletionState::DeletingAccounts
            }
            DeletionState::DeletingRecords | DeletionState::DeletingAccounts => {
                DeletionState::Done
            }
            DeletionState::Done | DeletionState::Failed { .. } => {
                return Err(DeletionError::InvalidTransition {
                    from: self.state.name().to_string(),
                    to: "next".to_string(),
                });
            }
        };
        self.state = next;
        Ok(&self.state)
    }

    pub fn record_removed(&mut self, kind: RecordKind, n: u64) -> Result<(), DeletionError> {
        self.expect_state(DeletionState::DeletingRecords)?;
        self.removed.records.add(kind, n);
        Ok(())
    }

    pub fn accounts_removed(&mut self, n: u64) -> Result<(), DeletionError> {
        self.expect_state(DeletionState::DeletingAccounts)?;
        self.removed.accounts += n;
        Ok(())
    }

    /// Moves a running deletion to `Failed`, keeping the counts committed so far.
    pub fn fail(&mut self, reason: impl Into<String>) -> Result<(), DeletionError> {
        let stage = self
            .state
            .stage()
            .ok_or_else(|| DeletionError::InvalidTransition {
                from: self.state.name().to_string(),
                to: "failed".to_string(),
            })?;
        self.state = DeletionState::Failed {
            stage,
            reason: reason.into(),
        };
        Ok(())
    }

    pub fn into_outcome(self) -> DeletionOutcome {
        let records = self.removed.records_total();
        let accounts = self.removed.accounts;

        let (success, message, failed_stage) = match &self.state {
            DeletionState::Done if self.removed.is_empty() => (
                true,
                format!("Faculty '{}' has no data to delete", self.faculty),
                None,
            ),
            DeletionState::Done => {
                let message = match self.scope {
                    DeletionScope::RecordsOnly => format!(
                        "Deleted faculty '{}': removed {} records, accounts kept",
                        self.faculty, records
                    ),
                    DeletionScope::PurgeLecturerAccounts => format!(
                        "Deleted faculty '{}': removed {} records and {} lecturer accounts",
                        self.faculty, records, accounts
                    ),
                };
                (true, message, None)
            }
            DeletionState::Failed { stage, reason } => (
                false,
                format!(
                    "Failed to delete faculty '{}' while {}: {}. Already removed {} records and {} lecturer accounts; they were not restored",
                    self.faculty, stage, reason, records, accounts
                ),
                Some(*stage),
            ),
            running => (
                false,
                format!(
                    "Deletion of faculty '{}' stopped before completion ({})",
                    self.faculty,
                    running.name()
                ),
                running.stage(),
            ),
        };

        DeletionOutcome {
            faculty: self.faculty,
            scope: self.scope,
            success,
            message,
            removed: self.removed,
            failed_stage,
        }
    }

    fn expect_state(&self, expected: DeletionState) -> Result<(), DeletionError> {
        if self.state != expected {
            return Err(DeletionError::InvalidTransition {
                from: self.state.name().to_string(),
                to: expected.name().to_string(),
            });
        }
        Ok(())
    }
}
