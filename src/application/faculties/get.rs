use crate::application::faculties::validate_not_blank;
use crate::domain::accounts::AccountRepository;
use crate::domain::faculties::{FacultyRecordRepository, FacultySummary};
use crate::shared::error::AppError;
use std::sync::Arc;

pub struct GetFacultySummaryUseCase {
    records: Arc<dyn FacultyRecordRepository>,
    accounts: Arc<dyn AccountRepository>,
}

impl GetFacultySummaryUseCase {
    pub fn new(
        records: Arc<dyn FacultyRecordRepository>,
        accounts: Arc<dyn AccountRepository>,
    ) -> Self {
        Self { records, accounts }
    }

    /// Returns `None` when nothing references the faculty.
    #[tracing::instrument(skip(self))]
    pub async fn execute(&self, faculty: &str) -> Result<Option<FacultySummary>, AppError> {
        validate_not_blank(faculty).map_err(|e| {
            AppError::ValidationError(
                e.message
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| "Invalid faculty name".to_string()),
            )
        })?;

        let records = self.records.count(faculty).await?;
        let accounts = self.accounts.find_by_faculty(faculty).await?;

        let summary = FacultySummary {
            name: faculty.to_string(),
            records,
            lecturers: accounts.iter().filter(|a| a.is_lecturer()).count() as u64,
            accounts: accounts.len() as u64,
        };

        Ok((!summary.is_empty()).then_some(summary))
    }
}
