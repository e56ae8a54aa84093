use crate::domain::accounts::AccountRepository;
use crate::domain::auth::AuthService;
use crate::domain::faculties::FacultyRecordRepository;
use crate::infrastructure::db::DbPool;
use crate::infrastructure::repositories::accounts::PostgresAccountRepository;
use crate::infrastructure::repositories::faculty_records::PostgresFacultyRecordRepository;
use axum::extract::FromRef;
use std::sync::Arc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
    pub auth_service: Arc<dyn AuthService>,
    pub accounts: Arc<dyn AccountRepository>,
    pub records: Arc<dyn FacultyRecordRepository>,
}

impl AppState {
    /// State backed by the Postgres repositories on `pool`.
    pub fn new(pool: DbPool, auth_service: Arc<dyn AuthService>) -> Self {
        let accounts = Arc::new(PostgresAccountRepository::new(pool.clone()));
        let records = Arc::new(PostgresFacultyRecordRepository::new(pool.clone()));
        Self::with_repositories(pool, auth_service, accounts, records)
    }

    pub fn with_repositories(
        pool: DbPool,
        auth_service: Arc<dyn AuthService>,
        accounts: Arc<dyn AccountRepository>,
        records: Arc<dyn FacultyRecordRepository>,
    ) -> Self {
        Self {
            pool,
            auth_service,
            accounts,
            records,
        }
    }
}

impl FromRef<AppState> for DbPool {
    fn from_ref(state: &AppState) -> Self {
        state.pool.clone()
    }
}
