pub mod auth;
pub mod common;
pub mod courses;
pub mod dashboard;
pub mod enrollments;
pub mod grades;
pub mod prospectus;
pub mod sections;
pub mod sessions;
pub mod students;
pub mod users;

pub use common::{ApiResponse, PaginationInfo, PaginationQuery};

use serde::Serialize;

/// 程序启动时间
#[derive(Debug, Clone)]
pub struct AppStartTime {
    pub start_datetime: chrono::DateTime<chrono::Utc>,
}

/// 业务错误码，写入响应体的 `code` 字段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[repr(i32)]
pub enum ErrorCode {
    Success = 0,

    // 通用错误
    BadRequest = 1000,
    Unauthorized = 1001,
    Forbidden = 1003,
    NotFound = 1004,
    RateLimitExceeded = 1029,
    InternalServerError = 1500,

    // 认证
    AuthFailed = 2000,
    OAuthFailed = 2001,
    OAuthRegistrationDisabled = 2002,
    OAuthDomainNotAllowed = 2003,

    // 用户
    UserNotFound = 3000,
    UserAlreadyExists = 3001,
    UserPasswordInvalid = 3002,
    UserNameInvalid = 3003,
    UserEmailInvalid = 3004,

    // 学生档案
    StudentNotFound = 4000,
    StudentAlreadyExists = 4001,
    StudentInvalid = 4002,

    // 班级
    SectionNotFound = 5000,
    SectionFull = 5001,
    SectionMismatch = 5002,
    SectionCapacityExhausted = 5003,

    // 课程
    CourseNotFound = 6000,
    CourseAlreadyExists = 6001,
    CourseInvalid = 6002,

    // 选课与成绩
    EnrollmentNotFound = 7000,
    EnrollmentAlreadyExists = 7001,
    GradeOutOfRange = 7002,
}
