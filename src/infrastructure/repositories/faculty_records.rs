use crate::domain::faculties::{FacultyRecordRepository, RecordCounts, RecordKind};
use crate::infrastructure::db::DbPool;
use async_trait::async_trait;

#[derive(Clone)]
pub struct PostgresFacultyRecordRepository {
    pool: DbPool,
}

impl PostgresFacultyRecordRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FacultyRecordRepository for PostgresFacultyRecordRepository {
    #[tracing::instrument(skip(self))]
    async fn referenced_faculties(&self) -> Result<Vec<String>, anyhow::Error> {
        let faculties = sqlx::query_scalar::<_, String>(
            r#"
            SELECT faculty FROM departments
            UNION
            SELECT faculty FROM majors
            UNION
            SELECT faculty FROM lecturer_assignments
            UNION
            SELECT faculty FROM cnbm_designations
            ORDER BY faculty
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(faculties)
    }

    #[tracing::instrument(skip(self))]
    async fn count(&self, faculty: &str) -> Result<RecordCounts, anyhow::Error> {
        let (departments, majors, lecturer_assignments, cnbm_designations): (i64, i64, i64, i64) =
            sqlx::query_as(
                r#"
                SELECT
                    (SELECT COUNT(*) FROM departments WHERE faculty = $1),
                    (SELECT COUNT(*) FROM majors WHERE faculty = $1),
                    (SELECT COUNT(*) FROM lecturer_assignments WHERE faculty = $1),
                    (SELECT COUNT(*) FROM cnbm_designations WHERE faculty = $1)
                "#,
            )
            .bind(faculty)
            .fetch_one(&self.pool)
            .await?;

        Ok(RecordCounts {
            departments: departments as u64,
            majors: majors as u64,
            lecturer_assignments: lecturer_assignments as u64,
            cnbm_designations: cnbm_designations as u64,
        })
    }

    #[tracing::instrument(skip(self))]
    async fn delete(&self, kind: RecordKind, faculty: &str) -> Result<u64, anyhow::Error> {
        // Table names come from a closed enum, never from input.
        let query = format!("DELETE FROM {} WHERE faculty = $1", kind.table());

        let result = sqlx::query(&query)
            .bind(faculty)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}
