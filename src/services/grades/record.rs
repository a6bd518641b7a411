use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::fmt;
use std::sync::Arc;
use tracing::info;

use super::GradeService;
use crate::errors::PortalError;
use crate::models::{
    ApiResponse, ErrorCode,
    grades::{entities::Grade, requests::GradeRequest},
    users::entities::{User, UserRole},
};
use crate::storage::Storage;
use crate::utils::validate::validate_grade;

/// 成绩录入失败的原因
#[derive(Debug)]
pub enum GradeError {
    EnrollmentNotFound,
    CourseNotFound,
    /// 教师只能给自己任教的课程录入成绩
    NotCourseTeacher,
    OutOfRange(String),
    Storage(PortalError),
}

impl fmt::Display for GradeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GradeError::EnrollmentNotFound => write!(f, "Enrollment not found"),
            GradeError::CourseNotFound => write!(f, "Course not found"),
            GradeError::NotCourseTeacher => {
                write!(f, "Only the course teacher may grade this enrollment")
            }
            GradeError::OutOfRange(msg) => write!(f, "{msg}"),
            GradeError::Storage(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for GradeError {}

impl From<PortalError> for GradeError {
    fn from(err: PortalError) -> Self {
        GradeError::Storage(err)
    }
}

/// 检查每一项成绩是否在允许范围内
pub fn check_grade_range(req: &GradeRequest, min: f64, max: f64) -> Result<(), GradeError> {
    for (term, value) in [
        ("prelim", req.prelim),
        ("midterm", req.midterm),
        ("final_grade", req.final_grade),
    ] {
        if let Some(value) = value {
            validate_grade(value, min, max)
                .map_err(|msg| GradeError::OutOfRange(format!("{term}: {msg}")))?;
        }
    }
    Ok(())
}

/// 写入某条选课的成绩
pub async fn record_grade(
    storage: &Arc<dyn Storage>,
    grader: &User,
    enrollment_id: i64,
    req: GradeRequest,
    range: (f64, f64),
) -> Result<Grade, GradeError> {
    check_grade_range(&req, range.0, range.1)?;

    let enrollment = storage
        .get_enrollment_by_id(enrollment_id)
        .await?
        .ok_or(GradeError::EnrollmentNotFound)?;

    if grader.role == UserRole::Teacher {
        let course = storage
            .get_course_by_id(enrollment.course_id)
            .await?
            .ok_or(GradeError::CourseNotFound)?;
        if course.teacher_id != Some(grader.id) {
            return Err(GradeError::NotCourseTeacher);
        }
    }

    let grade = storage.upsert_grade(enrollment_id, req, grader.id).await?;
    info!(
        "Grade for enrollment {} recorded by {} (average {:?})",
        enrollment_id, grader.username, grade.average
    );
    Ok(grade)
}

pub async fn handle_record_grade(
    service: &GradeService,
    enrollment_id: i64,
    grade_request: GradeRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let grader = match crate::services::current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request)?;
    let academic = &service.get_config().academic;

    match record_grade(
        &storage,
        &grader,
        enrollment_id,
        grade_request,
        (academic.grade_min, academic.grade_max),
    )
    .await
    {
        Ok(grade) => Ok(HttpResponse::Ok().json(ApiResponse::success(grade, "Grade recorded"))),
        Err(GradeError::EnrollmentNotFound) => Ok(HttpResponse::NotFound().json(
            ApiResponse::error_empty(ErrorCode::EnrollmentNotFound, "Enrollment not found"),
        )),
        Err(GradeError::CourseNotFound) => Ok(HttpResponse::NotFound().json(
            ApiResponse::error_empty(ErrorCode::CourseNotFound, "Course not found"),
        )),
        Err(e @ GradeError::NotCourseTeacher) => Ok(HttpResponse::Forbidden()
            .json(ApiResponse::error_empty(ErrorCode::Forbidden, e.to_string()))),
        Err(GradeError::OutOfRange(msg)) => Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::GradeOutOfRange, msg))),
        Err(GradeError::Storage(e)) => Ok(crate::services::internal_error(
            "Failed to record grade",
            e,
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(prelim: Option<f64>, midterm: Option<f64>, final_grade: Option<f64>) -> GradeRequest {
        GradeRequest {
            prelim,
            midterm,
            final_grade,
            remarks: None,
        }
    }

    #[test]
    fn test_range_accepts_bounds_and_missing_terms() {
        assert!(check_grade_range(&request(Some(0.0), None, Some(100.0)), 0.0, 100.0).is_ok());
        assert!(check_grade_range(&request(None, None, None), 0.0, 100.0).is_ok());
    }

    #[test]
    fn test_range_names_the_offending_term() {
        let err = check_grade_range(&request(Some(90.0), Some(101.0), None), 0.0, 100.0)
            .unwrap_err();
        match err {
            GradeError::OutOfRange(msg) => assert!(msg.starts_with("midterm")),
            other => panic!("unexpected error: {other}"),
        }
        assert!(check_grade_range(&request(None, None, Some(-1.0)), 0.0, 100.0).is_err());
    }
}
