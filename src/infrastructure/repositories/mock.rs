use crate::domain::accounts::{Account, AccountRepository, NewAccount};
use crate::domain::faculties::{FacultyRecordRepository, RecordCounts, RecordKind};
use async_trait::async_trait;
use std::collections::BTreeSet;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use time::OffsetDateTime;
use uuid::Uuid;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// In-memory account store with switchable delete failures.
#[derive(Clone, Default)]
pub struct MockAccountRepository {
    accounts: Arc<Mutex<Vec<Account>>>,
    fail_deletes: Arc<AtomicBool>,
    fail_reads: Arc<AtomicBool>,
    yielding: Arc<AtomicBool>,
    requested_deletes: Arc<AtomicU64>,
}

impl MockAccountRepository {
    /// Total number of ids passed to `delete_lecturers`, whether or not
    /// they were still present.
    pub fn requested_deletes(&self) -> u64 {
        self.requested_deletes.load(Ordering::SeqCst)
    }

    /// Yield to the scheduler inside lookups and deletes, so concurrent
    /// callers interleave between resolving and deleting accounts.
    pub fn yielding(&self, yielding: bool) {
        self.yielding.store(yielding, Ordering::SeqCst);
    }

    async fn maybe_yield(&self) {
        if self.yielding.load(Ordering::SeqCst) {
            tokio::task::yield_now().await;
        }
    }

    /// Make every subsequent `delete_lecturers` call fail.
    pub fn fail_deletes(&self, fail: bool) {
        self.fail_deletes.store(fail, Ordering::SeqCst);
    }

    /// Make every subsequent lookup by faculty fail.
    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn snapshot(&self) -> Vec<Account> {
        lock(&self.accounts).clone()
    }
}

#[async_trait]
impl AccountRepository for MockAccountRepository {
    async fn create(&self, new_account: NewAccount) -> Result<Account, anyhow::Error> {
        let account = Account {
            id: Uuid::new_v4(),
            username: new_account.username,
            display_name: new_account.display_name,
            role: new_account.role,
            faculty: new_account.faculty,
            department: new_account.department,
            created_at: OffsetDateTime::now_utc(),
            updated_at: OffsetDateTime::now_utc(),
        };
        lock(&self.accounts).push(account.clone());
        Ok(account)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Account>, anyhow::Error> {
        Ok(lock(&self.accounts).iter().find(|a| a.id == id).cloned())
    }

    async fn find_by_faculty(&self, faculty: &str) -> Result<Vec<Account>, anyhow::Error> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(anyhow::anyhow!("account store unavailable"));
        }
        self.maybe_yield().await;
        Ok(lock(&self.accounts)
            .iter()
            .filter(|a| a.belongs_to(faculty))
            .cloned()
            .collect())
    }

    async fn referenced_faculties(&self) -> Result<Vec<String>, anyhow::Error> {
        let faculties: BTreeSet<String> = lock(&self.accounts)
            .iter()
            .filter_map(|a| a.faculty.clone())
            .collect();
        Ok(faculties.into_iter().collect())
    }

    async fn delete_lecturers(&self, faculty: &str, ids: &[Uuid]) -> Result<u64, anyhow::Error> {
        if self.fail_deletes.load(Ordering::SeqCst) {
            return Err(anyhow::anyhow!("account store rejected delete"));
        }
        self.requested_deletes
            .fetch_add(ids.len() as u64, Ordering::SeqCst);
        self.maybe_yield().await;
        let mut accounts = lock(&self.accounts);
        let before = accounts.len();
        accounts.retain(|a| !(ids.contains(&a.id) && a.is_purgeable_from(faculty)));
        Ok((before - accounts.len()) as u64)
    }
}

/// In-memory faculty records, optionally failing deletes of one kind.
#[derive(Clone, Default)]
pub struct MockFacultyRecordRepository {
    records: Arc<Mutex<Vec<(RecordKind, String)>>>,
    fail_on: Arc<Mutex<Option<RecordKind>>>,
    yielding: Arc<AtomicBool>,
}

impl MockFacultyRecordRepository {
    pub fn insert(&self, kind: RecordKind, faculty: &str, n: usize) {
        let mut records = lock(&self.records);
        for _ in 0..n {
            records.push((kind, faculty.to_string()));
        }
    }

    /// Make deletes of `kind` fail; `None` clears the failure.
    pub fn fail_deletes_of(&self, kind: Option<RecordKind>) {
        *lock(&self.fail_on) = kind;
    }

    /// Yield to the scheduler before each delete.
    pub fn yielding(&self, yielding: bool) {
        self.yielding.store(yielding, Ordering::SeqCst);
    }

    pub fn len(&self) -> usize {
        lock(&self.records).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl FacultyRecordRepository for MockFacultyRecordRepository {
    async fn referenced_faculties(&self) -> Result<Vec<String>, anyhow::Error> {
        let faculties: BTreeSet<String> = lock(&self.records)
            .iter()
            .map(|(_, faculty)| faculty.clone())
            .collect();
        Ok(faculties.into_iter().collect())
    }

    async fn count(&self, faculty: &str) -> Result<RecordCounts, anyhow::Error> {
        let mut counts = RecordCounts::default();
        for (kind, owner) in lock(&self.records).iter() {
            if owner == faculty {
                counts.add(*kind, 1);
            }
        }
        Ok(counts)
    }

    async fn delete(&self, kind: RecordKind, faculty: &str) -> Result<u64, anyhow::Error> {
        if *lock(&self.fail_on) == Some(kind) {
            return Err(anyhow::anyhow!("record store rejected delete of {}", kind));
        }
        if self.yielding.load(Ordering::SeqCst) {
            tokio::task::yield_now().await;
        }
        let mut records = lock(&self.records);
        let before = records.len();
        records.retain(|(k, owner)| !(*k == kind && owner == faculty));
        Ok((before - records.len()) as u64)
    }
}
