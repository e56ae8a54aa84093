use crate::domain::accounts::{
    ADMINISTRATOR_ROLES, Account, AccountRepository, LECTURER_ROLE, NewAccount,
};
use crate::infrastructure::db::DbPool;
use async_trait::async_trait;
use uuid::Uuid;

#[derive(Clone)]
pub struct PostgresAccountRepository {
    pool: DbPool,
}

impl PostgresAccountRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AccountRepository for PostgresAccountRepository {
    #[tracing::instrument(skip(self, new_account))]
    async fn create(&self, new_account: NewAccount) -> Result<Account, anyhow::Error> {
        let account = sqlx::query_as::<_, Account>(
            r#"
            INSERT INTO accounts (username, display_name, role, faculty, department)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, username, display_name, role, faculty, department, created_at, updated_at
            "#,
        )
        .bind(new_account.username)
        .bind(new_account.display_name)
        .bind(new_account.role)
        .bind(new_account.faculty)
        .bind(new_account.department)
        .fetch_one(&self.pool)
        .await?;

        Ok(account)
    }

    #[tracing::instrument(skip(self))]
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Account>, anyhow::Error> {
        let account = sqlx::query_as::<_, Account>(
            r#"
            SELECT id, username, display_name, role, faculty, department, created_at, updated_at
            FROM accounts
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(account)
    }

    #[tracing::instrument(skip(self))]
    async fn find_by_faculty(&self, faculty: &str) -> Result<Vec<Account>, anyhow::Error> {
        let accounts = sqlx::query_as::<_, Account>(
            r#"
            SELECT id, username, display_name, role, faculty, department, created_at, updated_at
            FROM accounts
            WHERE faculty = $1
            ORDER BY username
            "#,
        )
        .bind(faculty)
        .fetch_all(&self.pool)
        .await?;

        Ok(accounts)
    }

    #[tracing::instrument(skip(self))]
    async fn referenced_faculties(&self) -> Result<Vec<String>, anyhow::Error> {
        let faculties = sqlx::query_scalar::<_, String>(
            r#"
            SELECT DISTINCT faculty
            FROM accounts
            WHERE faculty IS NOT NULL
            ORDER BY faculty
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(faculties)
    }

    #[tracing::instrument(skip(self, ids), fields(candidates = ids.len()))]
    async fn delete_lecturers(&self, faculty: &str, ids: &[Uuid]) -> Result<u64, anyhow::Error> {
        if ids.is_empty() {
            return Ok(0);
        }

        // Criteria are re-checked here so a concurrent edit or a repeated call
        // only removes rows that still match.
        let result = sqlx::query(
            r#"
            DELETE FROM accounts
            WHERE id = ANY($1)
              AND faculty = $2
              AND role = $3
              AND LOWER(role) <> ALL($4)
            "#,
        )
        .bind(ids)
        .bind(faculty)
        .bind(LECTURER_ROLE)
        .bind(ADMINISTRATOR_ROLES)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }
}
