//! 集成测试公用的数据准备函数
#![allow(dead_code)]

use std::sync::Arc;

use school_portal::models::{
    courses::{entities::Course, requests::CreateCourseRequest},
    enrollments::{entities::Enrollment, requests::CreateEnrollmentRequest},
    students::{entities::Student, requests::CreateStudentRequest},
    users::{
        entities::{AuthProvider, User, UserRole},
        requests::CreateUserRequest,
    },
};
use school_portal::storage::{Storage, sea_orm_storage::SeaOrmStorage};

/// 每个测试独立的内存数据库（已执行迁移）
pub async fn storage() -> Arc<dyn Storage> {
    let storage = SeaOrmStorage::connect(":memory:", 1, 5)
        .await
        .expect("in-memory database should open");
    Arc::new(storage)
}

pub async fn user(storage: &Arc<dyn Storage>, username: &str, role: UserRole) -> User {
    storage
        .create_user(CreateUserRequest {
            username: username.to_string(),
            email: format!("{username}@school.test"),
            password: String::new(),
            role,
            display_name: None,
            avatar_url: None,
            auth_provider: Some(AuthProvider::Password),
        })
        .await
        .expect("user should be created")
}

pub async fn student(
    storage: &Arc<dyn Storage>,
    number: &str,
    program: &str,
    year_level: i32,
) -> Student {
    let account = user(storage, &format!("s{number}"), UserRole::Student).await;
    storage
        .create_student(CreateStudentRequest {
            user_id: account.id,
            student_number: number.to_string(),
            program: program.to_string(),
            year_level,
        })
        .await
        .expect("student should be created")
}

pub async fn course(
    storage: &Arc<dyn Storage>,
    code: &str,
    units: i32,
    semester: i32,
    teacher_id: Option<i64>,
) -> Course {
    storage
        .create_course(CreateCourseRequest {
            code: code.to_string(),
            title: format!("{code} title"),
            units,
            program: "IT".to_string(),
            year_level: 1,
            semester,
            teacher_id,
        })
        .await
        .expect("course should be created")
}

pub async fn enroll(storage: &Arc<dyn Storage>, student_id: i64, course_id: i64) -> Enrollment {
    storage
        .create_enrollment(CreateEnrollmentRequest {
            student_id,
            course_id,
            school_year: "2025-2026".to_string(),
        })
        .await
        .expect("enrollment should be created")
}
