mod common;

use school_portal::models::{
    enrollments::entities::EnrollmentStatus, grades::requests::GradeRequest,
    prospectus::responses::CourseStatus, users::entities::UserRole,
};
use school_portal::services::{
    grades::{GradeError, record_grade},
    prospectus::load_prospectus,
};

const RANGE: (f64, f64) = (0.0, 100.0);

fn grade(prelim: Option<f64>, midterm: Option<f64>, final_grade: Option<f64>) -> GradeRequest {
    GradeRequest {
        prelim,
        midterm,
        final_grade,
        remarks: None,
    }
}

#[tokio::test]
async fn test_complete_grade_marks_enrollment_completed() {
    let storage = common::storage().await;
    let teacher = common::user(&storage, "teacher1", UserRole::Teacher).await;
    let student = common::student(&storage, "2025-0001", "IT", 1).await;
    let course = common::course(&storage, "IT101", 3, 1, Some(teacher.id)).await;
    let enrollment = common::enroll(&storage, student.id, course.id).await;

    let partial = record_grade(
        &storage,
        &teacher,
        enrollment.id,
        grade(Some(80.0), None, None),
        RANGE,
    )
    .await
    .unwrap();
    assert_eq!(partial.average, None);
    let current = storage.get_enrollment_by_id(enrollment.id).await.unwrap().unwrap();
    assert_eq!(current.status, EnrollmentStatus::Enrolled);

    let full = record_grade(
        &storage,
        &teacher,
        enrollment.id,
        grade(Some(80.0), Some(85.0), Some(86.0)),
        RANGE,
    )
    .await
    .unwrap();
    // 同一选课只保留一条成绩
    assert_eq!(full.id, partial.id);
    assert_eq!(full.average, Some(83.67));
    assert_eq!(full.graded_by, teacher.id);

    let current = storage.get_enrollment_by_id(enrollment.id).await.unwrap().unwrap();
    assert_eq!(current.status, EnrollmentStatus::Completed);
}

#[tokio::test]
async fn test_teacher_cannot_grade_other_courses() {
    let storage = common::storage().await;
    let owner = common::user(&storage, "owner", UserRole::Teacher).await;
    let other = common::user(&storage, "other", UserRole::Teacher).await;
    let registrar = common::user(&storage, "registrar", UserRole::Registrar).await;
    let student = common::student(&storage, "2025-0001", "IT", 1).await;
    let course = common::course(&storage, "IT101", 3, 1, Some(owner.id)).await;
    let enrollment = common::enroll(&storage, student.id, course.id).await;

    let err = record_grade(
        &storage,
        &other,
        enrollment.id,
        grade(Some(90.0), None, None),
        RANGE,
    )
    .await
    .unwrap_err();
    assert!(matches!(err, GradeError::NotCourseTeacher));

    // 教务员不受任课限制
    record_grade(
        &storage,
        &registrar,
        enrollment.id,
        grade(Some(90.0), None, None),
        RANGE,
    )
    .await
    .unwrap();

    let err = record_grade(&storage, &registrar, 9999, grade(None, None, None), RANGE)
        .await
        .unwrap_err();
    assert!(matches!(err, GradeError::EnrollmentNotFound));

    let err = record_grade(
        &storage,
        &registrar,
        enrollment.id,
        grade(Some(101.0), None, None),
        RANGE,
    )
    .await
    .unwrap_err();
    assert!(matches!(err, GradeError::OutOfRange(_)));
}

#[tokio::test]
async fn test_prospectus_summarizes_progress() {
    let storage = common::storage().await;
    let registrar = common::user(&storage, "registrar", UserRole::Registrar).await;
    let student = common::student(&storage, "2025-0001", "IT", 1).await;
    let second_sem = common::course(&storage, "IT102", 3, 2, None).await;
    let first_sem = common::course(&storage, "IT101", 4, 1, None).await;
    let untaken = common::course(&storage, "IT103", 2, 2, None).await;

    let done = common::enroll(&storage, student.id, first_sem.id).await;
    common::enroll(&storage, student.id, second_sem.id).await;
    record_grade(
        &storage,
        &registrar,
        done.id,
        grade(Some(85.0), Some(86.0), Some(85.5)),
        RANGE,
    )
    .await
    .unwrap();

    let prospectus = load_prospectus(&storage, student.id).await.unwrap().unwrap();

    let codes: Vec<&str> = prospectus
        .entries
        .iter()
        .map(|e| e.course.code.as_str())
        .collect();
    assert_eq!(codes, vec!["IT101", "IT102", "IT103"]);
    let statuses: Vec<CourseStatus> = prospectus.entries.iter().map(|e| e.status).collect();
    assert_eq!(
        statuses,
        vec![
            CourseStatus::Completed,
            CourseStatus::Enrolled,
            CourseStatus::NotTaken
        ]
    );
    assert_eq!(prospectus.entries[2].enrollment_id, None);
    assert_eq!(untaken.units, 2);

    let summary = &prospectus.summary;
    assert_eq!(summary.total_courses, 3);
    assert_eq!(summary.completed, 1);
    assert_eq!(summary.enrolled, 1);
    assert_eq!(summary.units_earned, 4);
    assert_eq!(summary.general_average, Some(85.5));

    assert!(load_prospectus(&storage, 9999).await.unwrap().is_none());
}

#[tokio::test]
async fn test_duplicate_enrollment_is_rejected_by_storage() {
    let storage = common::storage().await;
    let student = common::student(&storage, "2025-0001", "IT", 1).await;
    let course = common::course(&storage, "IT101", 3, 1, None).await;
    common::enroll(&storage, student.id, course.id).await;

    let err = storage
        .create_enrollment(
            school_portal::models::enrollments::requests::CreateEnrollmentRequest {
                student_id: student.id,
                course_id: course.id,
                school_year: "2025-2026".to_string(),
            },
        )
        .await
        .unwrap_err();
    assert!(err.message().contains("UNIQUE constraint failed"));
}
