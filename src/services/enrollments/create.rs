use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::EnrollmentService;
use crate::models::{ApiResponse, ErrorCode, enrollments::requests::CreateEnrollmentRequest};
use crate::utils::validate::validate_school_year;

pub async fn create_enrollment(
    service: &EnrollmentService,
    mut enrollment_data: CreateEnrollmentRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    enrollment_data.school_year = enrollment_data.school_year.trim().to_string();
    if let Err(msg) = validate_school_year(&enrollment_data.school_year) {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::BadRequest, msg)));
    }

    let storage = service.get_storage(request)?;

    match storage.get_student_by_id(enrollment_data.student_id).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::StudentNotFound,
                "Student not found",
            )));
        }
        Err(e) => return Ok(crate::services::internal_error("Enrollment failed", e)),
    }
    match storage.get_course_by_id(enrollment_data.course_id).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::CourseNotFound,
                "Course not found",
            )));
        }
        Err(e) => return Ok(crate::services::internal_error("Enrollment failed", e)),
    }

    let duplicate = || {
        HttpResponse::Conflict().json(ApiResponse::error_empty(
            ErrorCode::EnrollmentAlreadyExists,
            "Student is already enrolled in this course",
        ))
    };

    match storage
        .get_enrollment_by_student_and_course(enrollment_data.student_id, enrollment_data.course_id)
        .await
    {
        Ok(Some(_)) => return Ok(duplicate()),
        Ok(None) => {}
        Err(e) => return Ok(crate::services::internal_error("Enrollment failed", e)),
    }

    match storage.create_enrollment(enrollment_data).await {
        Ok(enrollment) => {
            info!(
                "Student {} enrolled in course {} for {}",
                enrollment.student_id, enrollment.course_id, enrollment.school_year
            );
            Ok(HttpResponse::Created().json(ApiResponse::success(enrollment, "Enrollment created")))
        }
        // 并发请求由唯一索引兜底
        Err(e) if crate::services::is_unique_violation(&e) => Ok(duplicate()),
        Err(e) => Ok(crate::services::internal_error("Enrollment failed", e)),
    }
}
