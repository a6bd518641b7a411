mod common;

use school_portal::models::{
    dashboard::responses::DashboardSummary, grades::requests::GradeRequest,
    users::entities::UserRole,
};
use school_portal::runtime::lifetime::startup::seed_superadmin;
use school_portal::services::{
    dashboard::build_dashboard, grades::record_grade, sections::auto_assign_sections,
};

#[tokio::test]
async fn test_superadmin_is_seeded_once() {
    let storage = common::storage().await;

    seed_superadmin(&storage).await.unwrap();
    seed_superadmin(&storage).await.unwrap();

    assert_eq!(storage.count_users().await.unwrap(), 1);
    let admin = storage
        .get_user_by_username("superadmin")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(admin.role, UserRole::Superadmin);
    assert!(admin.password_hash.starts_with("$argon2"));
}

#[tokio::test]
async fn test_admin_dashboard_counts_records() {
    let storage = common::storage().await;
    let admin = common::user(&storage, "admin", UserRole::Admin).await;
    common::student(&storage, "2025-0001", "IT", 1).await;
    common::student(&storage, "2025-0002", "IT", 1).await;
    common::course(&storage, "IT101", 3, 1, None).await;
    auto_assign_sections(&storage, "IT", 1, 40).await.unwrap();

    let DashboardSummary::Admin {
        users_by_role,
        students,
        sections,
        courses,
        logins_last_24h,
    } = build_dashboard(&storage, &admin, 40).await.unwrap()
    else {
        panic!("admin should get the admin dashboard");
    };

    assert_eq!(students, 2);
    assert_eq!(sections, 1);
    assert_eq!(courses, 1);
    assert_eq!(logins_last_24h, 0);
    let student_count = users_by_role
        .iter()
        .find(|r| r.role == "student")
        .map(|r| r.count);
    assert_eq!(student_count, Some(2));
}

#[tokio::test]
async fn test_registrar_dashboard_shows_unassigned_students() {
    let storage = common::storage().await;
    let registrar = common::user(&storage, "registrar", UserRole::Registrar).await;
    common::student(&storage, "2025-0001", "IT", 1).await;
    common::student(&storage, "2024-0001", "IT", 2).await;
    auto_assign_sections(&storage, "IT", 1, 40).await.unwrap();

    let DashboardSummary::Registrar {
        students_by_year,
        unassigned_students,
        sections,
    } = build_dashboard(&storage, &registrar, 40).await.unwrap()
    else {
        panic!("registrar should get the registrar dashboard");
    };

    assert_eq!(unassigned_students, 1);
    assert_eq!(students_by_year.len(), 2);
    assert_eq!(sections.len(), 1);
    assert_eq!(sections[0].label, "IT 1A");
    assert_eq!(sections[0].occupants, 1);
}

#[tokio::test]
async fn test_teacher_and_student_dashboards() {
    let storage = common::storage().await;
    let teacher = common::user(&storage, "teacher", UserRole::Teacher).await;
    let student = common::student(&storage, "2025-0001", "IT", 1).await;
    let course = common::course(&storage, "IT101", 3, 1, Some(teacher.id)).await;
    common::course(&storage, "IT102", 3, 1, None).await;
    let enrollment = common::enroll(&storage, student.id, course.id).await;
    record_grade(
        &storage,
        &teacher,
        enrollment.id,
        GradeRequest {
            prelim: Some(90.0),
            midterm: Some(91.0),
            final_grade: Some(92.0),
            remarks: Some("Passed".to_string()),
        },
        (0.0, 100.0),
    )
    .await
    .unwrap();

    let DashboardSummary::Teacher {
        courses,
        enrollments,
    } = build_dashboard(&storage, &teacher, 40).await.unwrap()
    else {
        panic!("teacher should get the teacher dashboard");
    };
    assert_eq!(courses, 1);
    assert_eq!(enrollments, 1);

    let account = storage.get_user_by_id(student.user_id).await.unwrap().unwrap();
    let DashboardSummary::Student {
        profile,
        enrollments,
        general_average,
    } = build_dashboard(&storage, &account, 40).await.unwrap()
    else {
        panic!("student should get the student dashboard");
    };
    assert_eq!(profile.map(|p| p.student.id), Some(student.id));
    assert_eq!(enrollments, 1);
    assert_eq!(general_average, Some(91.0));
}

#[tokio::test]
async fn test_student_without_profile_gets_empty_dashboard() {
    let storage = common::storage().await;
    let account = common::user(&storage, "newcomer", UserRole::Student).await;

    let DashboardSummary::Student {
        profile,
        enrollments,
        general_average,
    } = build_dashboard(&storage, &account, 40).await.unwrap()
    else {
        panic!("student should get the student dashboard");
    };
    assert!(profile.is_none());
    assert_eq!(enrollments, 0);
    assert_eq!(general_average, None);
}
