use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// Role string carried by lecturer accounts. Matched exactly.
pub const LECTURER_ROLE: &str = "lecturer";

/// Role strings that denote an administrator. Matched case-insensitively
/// so that a mis-cased administrator is still never purged.
pub const ADMINISTRATOR_ROLES: &[&str] = &["administrator", "admin", "super_admin"];

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Account {
    pub id: Uuid,
    pub username: String,
    pub display_name: String,
    pub role: String,
    pub faculty: Option<String>,
    pub department: Option<String>,
    #[serde(with = "time::serde::iso8601")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::iso8601")]
    pub updated_at: OffsetDateTime,
}

impl Account {
    pub fn is_lecturer(&self) -> bool {
        self.role == LECTURER_ROLE
    }

    pub fn is_administrator(&self) -> bool {
        ADMINISTRATOR_ROLES
            .iter()
            .any(|role| self.role.eq_ignore_ascii_case(role))
    }

    pub fn belongs_to(&self, faculty: &str) -> bool {
        self.faculty.as_deref() == Some(faculty)
    }

    /// Whether a lecturer-account purge of `faculty` may remove this account.
    pub fn is_purgeable_from(&self, faculty: &str) -> bool {
        self.belongs_to(faculty) && self.is_lecturer() && !self.is_administrator()
    }
}

#[derive(Debug, Clone)]
pub struct NewAccount {
    pub username: String,
    pub display_name: String,
    pub role: String,
    pub faculty: Option<String>,
    pub department: Option<String>,
}

#[async_trait]
pub trait AccountRepository: Send + Sync {
    async fn create(&self, new_account: NewAccount) -> Result<Account, anyhow::Error>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Account>, anyhow::Error>;
    async fn find_by_faculty(&self, faculty: &str) -> Result<Vec<Account>, anyhow::Error>;
    /// Distinct faculty names referenced by any account profile.
    async fn referenced_faculties(&self) -> Result<Vec<String>, anyhow::Error>;
    /// Deletes the given accounts, re-checking at delete time that each one
    /// still carries the lecturer role and belongs to `faculty`.
    /// Returns the number of rows actually removed.
    async fn delete_lecturers(&self, faculty: &str, ids: &[Uuid]) -> Result<u64, anyhow::Error>;
}
