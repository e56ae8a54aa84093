use crate::domain::accounts::AccountRepository;
use crate::domain::faculties::FacultyRecordRepository;
use crate::shared::error::AppError;
use std::collections::BTreeSet;
use std::sync::Arc;

/// Lists every faculty name that at least one record or account references.
pub struct ListFacultiesUseCase {
    records: Arc<dyn FacultyRecordRepository>,
    accounts: Arc<dyn AccountRepository>,
}

impl ListFacultiesUseCase {
    pub fn new(
        records: Arc<dyn FacultyRecordRepository>,
        accounts: Arc<dyn AccountRepository>,
    ) -> Self {
        Self { records, accounts }
    }

    #[tracing::instrument(skip(self))]
    pub async fn execute(&self) -> Result<Vec<String>, AppError> {
        let mut names: BTreeSet<String> = self
            .records
            .referenced_faculties()
            .await?
            .into_iter()
            .collect();
        names.extend(self.accounts.referenced_faculties().await?);

        Ok(names.into_iter().collect())
    }
}
