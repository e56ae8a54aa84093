use crate::common;

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use faculty_portal::application::faculties::delete::{DeleteFacultyRequest, DeleteFacultyUseCase};
use faculty_portal::application::faculties::list::ListFacultiesUseCase;
use faculty_portal::domain::accounts::AccountRepository;
use faculty_portal::domain::deletion::DeletionScope;
use faculty_portal::domain::faculties::{FacultyRecordRepository, RecordKind};
use faculty_portal::infrastructure::repositories::accounts::PostgresAccountRepository;
use faculty_portal::infrastructure::repositories::faculty_records::PostgresFacultyRecordRepository;
use faculty_portal::infrastructure::state::AppState;
use http_body_util::BodyExt;
use serial_test::serial;
use std::sync::Arc;
use tower::ServiceExt;

fn use_case(pool: &sqlx::PgPool) -> DeleteFacultyUseCase {
    DeleteFacultyUseCase::new(
        Arc::new(PostgresFacultyRecordRepository::new(pool.clone())),
        Arc::new(PostgresAccountRepository::new(pool.clone())),
    )
}

fn purge(faculty: &str) -> DeleteFacultyRequest {
    DeleteFacultyRequest {
        faculty_id: faculty.to_string(),
        scope: DeletionScope::PurgeLecturerAccounts,
    }
}

#[tokio::test]
#[serial]
async fn test_cntt_scenario() {
    let pool = setup_test_db_or_skip!();
    common::cleanup_test_db(&pool).await;

    let accounts = PostgresAccountRepository::new(pool.clone());
    common::insert_records(&pool, RecordKind::Department, "CNTT", 3).await;
    common::create_account(&accounts, "pg_lecturer1", "lecturer", Some("CNTT")).await;
    common::create_account(&accounts, "pg_lecturer2", "lecturer", Some("CNTT")).await;
    let admin = common::create_account(&accounts, "pg_admin", "administrator", Some("CNTT")).await;
    let other = common::create_account(&accounts, "pg_other", "lecturer", Some("KT")).await;

    let outcome = use_case(&pool).execute(purge("CNTT")).await.unwrap();

    assert!(outcome.success);
    assert_eq!(outcome.removed.records_total(), 3);
    assert_eq!(outcome.removed.accounts, 2);
    assert!(accounts.find_by_id(admin.id).await.unwrap().is_some());
    assert!(accounts.find_by_id(other.id).await.unwrap().is_some());

    common::cleanup_test_db(&pool).await;
}

#[tokio::test]
#[serial]
async fn test_records_only_then_repeat() {
    let pool = setup_test_db_or_skip!();
    common::cleanup_test_db(&pool).await;

    let accounts = PostgresAccountRepository::new(pool.clone());
    common::insert_records(&pool, RecordKind::Major, "CNTT", 2).await;
    common::insert_records(&pool, RecordKind::LecturerAssignment, "CNTT", 2).await;
    common::insert_records(&pool, RecordKind::CnbmDesignation, "CNTT", 1).await;
    common::create_account(&accounts, "pg_lecturer", "lecturer", Some("CNTT")).await;

    let request = DeleteFacultyRequest {
        faculty_id: "CNTT".to_string(),
        scope: DeletionScope::RecordsOnly,
    };
    let first = use_case(&pool).execute(request.clone()).await.unwrap();
    let second = use_case(&pool).execute(request).await.unwrap();

    assert_eq!(first.removed.records.majors, 2);
    assert_eq!(first.removed.records.lecturer_assignments, 2);
    assert_eq!(first.removed.records.cnbm_designations, 1);
    assert_eq!(first.removed.accounts, 0);
    assert!(second.success);
    assert_eq!(second.removed.records_total(), 0);
    assert_eq!(accounts.find_by_faculty("CNTT").await.unwrap().len(), 1);

    common::cleanup_test_db(&pool).await;
}

#[tokio::test]
#[serial]
async fn test_concurrent_duplicate_purges() {
    let pool = setup_test_db_or_skip!();
    common::cleanup_test_db(&pool).await;

    let accounts = PostgresAccountRepository::new(pool.clone());
    common::insert_records(&pool, RecordKind::Department, "CNTT", 3).await;
    for i in 0..4 {
        common::create_account(&accounts, &format!("pg_lecturer{}", i), "lecturer", Some("CNTT"))
            .await;
    }

    let a = use_case(&pool);
    let b = use_case(&pool);
    let (first, second) = tokio::join!(a.execute(purge("CNTT")), b.execute(purge("CNTT")));
    let (first, second) = (first.unwrap(), second.unwrap());

    assert!(first.success && second.success);
    assert_eq!(first.removed.accounts + second.removed.accounts, 4);
    assert_eq!(first.removed.records_total() + second.removed.records_total(), 3);

    common::cleanup_test_db(&pool).await;
}

#[tokio::test]
#[serial]
async fn test_faculty_matching_is_exact() {
    let pool = setup_test_db_or_skip!();
    common::cleanup_test_db(&pool).await;

    let records = PostgresFacultyRecordRepository::new(pool.clone());
    common::insert_records(&pool, RecordKind::Department, "CNTT", 1).await;
    common::insert_records(&pool, RecordKind::Department, "cntt", 1).await;

    let outcome = use_case(&pool).execute(purge("CNTT")).await.unwrap();

    assert_eq!(outcome.removed.records.departments, 1);
    assert_eq!(records.count("cntt").await.unwrap().departments, 1);

    common::cleanup_test_db(&pool).await;
}

#[tokio::test]
#[serial]
async fn test_list_faculties_union() {
    let pool = setup_test_db_or_skip!();
    common::cleanup_test_db(&pool).await;

    let records = Arc::new(PostgresFacultyRecordRepository::new(pool.clone()));
    let accounts = Arc::new(PostgresAccountRepository::new(pool.clone()));
    common::insert_records(&pool, RecordKind::Department, "Kinh Te", 1).await;
    common::insert_records(&pool, RecordKind::Major, "CNTT", 1).await;
    common::create_account(accounts.as_ref(), "pg_l", "lecturer", Some("Ngoai Ngu")).await;
    common::create_account(accounts.as_ref(), "pg_s", "student", None).await;

    let names = ListFacultiesUseCase::new(records, accounts)
        .execute()
        .await
        .unwrap();

    assert_eq!(names, vec!["CNTT", "Kinh Te", "Ngoai Ngu"]);

    common::cleanup_test_db(&pool).await;
}

#[tokio::test]
#[serial]
async fn test_delete_over_http() {
    let pool = setup_test_db_or_skip!();
    common::cleanup_test_db(&pool).await;

    let accounts = PostgresAccountRepository::new(pool.clone());
    common::insert_records(&pool, RecordKind::Department, "CNTT", 3).await;
    common::create_account(&accounts, "pg_lecturer", "lecturer", Some("CNTT")).await;
    let admin = common::create_account(&accounts, "pg_admin", "administrator", None).await;

    let state = AppState::new(pool.clone(), common::create_test_auth_service());
    let app = faculty_portal::presentation::router::app(state).unwrap();

    let response = app
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/api/v1/faculties/CNTT?deleteAccounts=true")
                .header(
                    "authorization",
                    format!("Bearer {}", common::generate_token(admin.id)),
                )
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["removed"]["records"], 3);
    assert_eq!(json["removed"]["accounts"], 1);

    common::cleanup_test_db(&pool).await;
}
