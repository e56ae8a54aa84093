use crate::application::faculties::validate_not_blank;
use crate::domain::accounts::AccountRepository;
use crate::domain::deletion::{DeletionOutcome, DeletionScope, DeletionState, FacultyDeletion};
use crate::domain::faculties::{FacultyRecordRepository, RecordKind};
use crate::shared::error::AppError;
use anyhow::Context;
use std::sync::Arc;
use validator::Validate;

#[derive(Debug, Clone, Validate)]
pub struct DeleteFacultyRequest {
    #[validate(custom(function = "validate_not_blank"))]
    pub faculty_id: String,
    pub scope: DeletionScope,
}

/// Cascading faculty deletion.
///
/// Steps are separate writes with no enclosing transaction. Each one deletes
/// whatever matches at the time it runs, so a repeated or concurrent call
/// removes nothing twice and never errors on rows that are already gone.
pub struct DeleteFacultyUseCase {
    records: Arc<dyn FacultyRecordRepository>,
    accounts: Arc<dyn AccountRepository>,
}

impl DeleteFacultyUseCase {
    pub fn new(
        records: Arc<dyn FacultyRecordRepository>,
        accounts: Arc<dyn AccountRepository>,
    ) -> Self {
        Self { records, accounts }
    }

    /// Runs the cascade. `Err` is only returned for requests rejected before
    /// anything was deleted; persistence failures come back as an outcome
    /// with `success == false`.
    #[tracing::instrument(skip(self, req), fields(faculty = %req.faculty_id, scope = %req.scope))]
    pub async fn execute(&self, req: DeleteFacultyRequest) -> Result<DeletionOutcome, AppError> {
        req.validate()
            .map_err(|e| AppError::ValidationError(e.to_string()))?;

        let mut deletion = FacultyDeletion::new(req.faculty_id, req.scope);
        deletion.advance()?;

        if let Err(e) = self.delete_records(&mut deletion).await {
            return self.abort(deletion, e);
        }
        deletion.advance()?;

        if *deletion.state() == DeletionState::DeletingAccounts {
            if let Err(e) = self.delete_lecturer_accounts(&mut deletion).await {
                return self.abort(deletion, e);
            }
            deletion.advance()?;
        }

        let outcome = deletion.into_outcome();
        tracing::info!(
            records = outcome.removed.records_total(),
            accounts = outcome.removed.accounts,
            "faculty deletion finished"
        );
        Ok(outcome)
    }

    async fn delete_records(&self, deletion: &mut FacultyDeletion) -> anyhow::Result<()> {
        for kind in RecordKind::ALL {
            let removed = self
                .records
                .delete(kind, deletion.faculty())
                .await
                .with_context(|| format!("failed to delete {} records", kind))?;
            deletion.record_removed(kind, removed)?;
            tracing::debug!(%kind, removed, "faculty records removed");
        }
        Ok(())
    }

    async fn delete_lecturer_accounts(&self, deletion: &mut FacultyDeletion) -> anyhow::Result<()> {
        let faculty = deletion.faculty().to_string();
        let candidates = self
            .accounts
            .find_by_faculty(&faculty)
            .await
            .context("failed to resolve faculty accounts")?;

        let mut ids = Vec::new();
        for account in candidates {
            if account.is_administrator() {
                tracing::warn!(
                    account_id = %account.id,
                    role = %account.role,
                    "administrator account references faculty, keeping it"
                );
                continue;
            }
            if account.is_purgeable_from(&faculty) {
                ids.push(account.id);
            }
        }

        let removed = self
            .accounts
            .delete_lecturers(&faculty, &ids)
            .await
            .context("failed to delete lecturer accounts")?;
        deletion.accounts_removed(removed)?;
        tracing::debug!(candidates = ids.len(), removed, "lecturer accounts removed");
        Ok(())
    }

    fn abort(
        &self,
        mut deletion: FacultyDeletion,
        err: anyhow::Error,
    ) -> Result<DeletionOutcome, AppError> {
        tracing::error!(
            state = ?deletion.state(),
            removed = ?deletion.removed(),
            "faculty deletion failed: {:#}",
            err
        );
        deletion.fail(format!("{:#}", err))?;
        Ok(deletion.into_outcome())
    }
}
