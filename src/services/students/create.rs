use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::StudentService;
use crate::models::{
    ApiResponse, ErrorCode, students::requests::CreateStudentRequest,
    users::entities::UserRole,
};
use crate::utils::validate::{validate_program, validate_student_number, validate_year_level};

pub async fn create_student(
    service: &StudentService,
    mut student_data: CreateStudentRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    student_data.student_number = student_data.student_number.trim().to_string();
    student_data.program = student_data.program.trim().to_uppercase();

    let invalid = validate_student_number(&student_data.student_number)
        .and_then(|_| validate_program(&student_data.program))
        .and_then(|_| validate_year_level(student_data.year_level));
    if let Err(msg) = invalid {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::StudentInvalid, msg)));
    }

    let storage = service.get_storage(request)?;

    // 档案只能挂在学生账号上
    match storage.get_user_by_id(student_data.user_id).await {
        Ok(Some(user)) if user.role == UserRole::Student => {}
        Ok(Some(_)) => {
            return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                ErrorCode::StudentInvalid,
                "User is not a student account",
            )));
        }
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::UserNotFound,
                "User not found",
            )));
        }
        Err(e) => return Ok(crate::services::internal_error("Student creation failed", e)),
    }

    match storage.get_student_by_user_id(student_data.user_id).await {
        Ok(Some(_)) => {
            return Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
                ErrorCode::StudentAlreadyExists,
                "User already has a student profile",
            )));
        }
        Ok(None) => {}
        Err(e) => return Ok(crate::services::internal_error("Student creation failed", e)),
    }

    match storage.create_student(student_data).await {
        Ok(student) => {
            info!(
                "Student profile {} created ({} year {})",
                student.student_number, student.program, student.year_level
            );
            Ok(HttpResponse::Created().json(ApiResponse::success(student, "Student created")))
        }
        Err(e) if crate::services::is_unique_violation(&e) => {
            Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
                ErrorCode::StudentAlreadyExists,
                "Student number already exists",
            )))
        }
        Err(e) => Ok(crate::services::internal_error("Student creation failed", e)),
    }
}
