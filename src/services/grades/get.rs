use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::GradeService;
use crate::models::{ApiResponse, ErrorCode};

// 查看某条选课的成绩，学生只能查看自己的
pub async fn get_grade(
    service: &GradeService,
    enrollment_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = match crate::services::current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request)?;

    let enrollment = match storage.get_enrollment_by_id(enrollment_id).await {
        Ok(Some(enrollment)) => enrollment,
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::EnrollmentNotFound,
                "Enrollment not found",
            )));
        }
        Err(e) => return Ok(crate::services::internal_error("Failed to get grade", e)),
    };

    if !user.role.is_staff() {
        let owns = matches!(
            storage.get_student_by_user_id(user.id).await,
            Ok(Some(student)) if student.id == enrollment.student_id
        );
        if !owns {
            return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
                ErrorCode::Forbidden,
                "You can only view your own grades",
            )));
        }
    }

    match storage.get_grade_by_enrollment(enrollment_id).await {
        Ok(Some(grade)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            grade,
            "Grade retrieved successfully",
        ))),
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::NotFound,
            "No grade recorded for this enrollment",
        ))),
        Err(e) => Ok(crate::services::internal_error("Failed to get grade", e)),
    }
}
