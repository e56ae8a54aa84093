use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Faculty-scoped record collections, in the order a cascade removes them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    Department,
    Major,
    LecturerAssignment,
    CnbmDesignation,
}

impl RecordKind {
    pub const ALL: [RecordKind; 4] = [
        RecordKind::Department,
        RecordKind::Major,
        RecordKind::LecturerAssignment,
        RecordKind::CnbmDesignation,
    ];

    /// Backing table. Every table carries a `faculty` column.
    pub fn table(&self) -> &'static str {
        match self {
            RecordKind::Department => "departments",
            RecordKind::Major => "majors",
            RecordKind::LecturerAssignment => "lecturer_assignments",
            RecordKind::CnbmDesignation => "cnbm_designations",
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RecordKind::Department => "department",
            RecordKind::Major => "major",
            RecordKind::LecturerAssignment => "lecturer assignment",
            RecordKind::CnbmDesignation => "CNBM designation",
        };
        write!(f, "{}", s)
    }
}

/// Per-kind record tallies, used both for counting and for removals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordCounts {
    pub departments: u64,
    pub majors: u64,
    pub lecturer_assignments: u64,
    pub cnbm_designations: u64,
}

impl RecordCounts {
    pub fn get(&self, kind: RecordKind) -> u64 {
        match kind {
            RecordKind::Department => self.departments,
            RecordKind::Major => self.majors,
            RecordKind::LecturerAssignment => self.lecturer_assignments,
            RecordKind::CnbmDesignation => self.cnbm_designations,
        }
    }

    pub fn add(&mut self, kind: RecordKind, n: u64) {
        match kind {
            RecordKind::Department => self.departments += n,
            RecordKind::Major => self.majors += n,
            RecordKind::LecturerAssignment => self.lecturer_assignments += n,
            RecordKind::CnbmDesignation => self.cnbm_designations += n,
        }
    }

    pub fn total(&self) -> u64 {
        self.departments + self.majors + self.lecturer_assignments + self.cnbm_designations
    }
}

/// Detail view of a faculty, assembled from everything that references it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FacultySummary {
    pub name: String,
    pub records: RecordCounts,
    pub lecturers: u64,
    pub accounts: u64,
}

impl FacultySummary {
    pub fn is_empty(&self) -> bool {
        self.records.total() == 0 && self.accounts == 0
    }
}

#[async_trait]
pub trait FacultyRecordRepository: Send + Sync {
    /// Distinct faculty names referenced by any record.
    async fn referenced_faculties(&self) -> Result<Vec<String>, anyhow::Error>;
    async fn count(&self, faculty: &str) -> Result<RecordCounts, anyhow::Error>;
    /// Deletes every row of `kind` whose faculty equals `faculty` at the time
    /// of the call. Returns the number of rows actually removed.
    async fn delete(&self, kind: RecordKind, faculty: &str) -> Result<u64, anyhow::Error>;
}
