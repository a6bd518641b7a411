use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::CourseService;
use crate::models::{
    ApiResponse, ErrorCode, courses::requests::CreateCourseRequest, users::entities::UserRole,
};
use crate::utils::validate::{validate_program, validate_year_level};

/// 规范化并校验课程字段
pub fn validate_course(course: &mut CreateCourseRequest) -> Result<(), &'static str> {
    course.code = course.code.trim().to_uppercase();
    course.title = course.title.trim().to_string();
    course.program = course.program.trim().to_uppercase();

    if course.code.is_empty() || course.code.len() > 20 {
        return Err("Course code must be 1-20 characters");
    }
    if course.title.is_empty() {
        return Err("Course title is required");
    }
    if !(1..=10).contains(&course.units) {
        return Err("Units must be between 1 and 10");
    }
    if !(1..=3).contains(&course.semester) {
        return Err("Semester must be 1, 2 or 3 (summer)");
    }
    validate_program(&course.program)?;
    validate_year_level(course.year_level)
}

pub async fn create_course(
    service: &CourseService,
    mut course_data: CreateCourseRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    if let Err(msg) = validate_course(&mut course_data) {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::CourseInvalid, msg)));
    }

    let storage = service.get_storage(request)?;

    if let Some(teacher_id) = course_data.teacher_id {
        match storage.get_user_by_id(teacher_id).await {
            Ok(Some(user)) if user.role == UserRole::Teacher => {}
            Ok(_) => {
                return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                    ErrorCode::CourseInvalid,
                    "teacher_id must refer to a teacher account",
                )));
            }
            Err(e) => return Ok(crate::services::internal_error("Course creation failed", e)),
        }
    }

    match storage.create_course(course_data).await {
        Ok(course) => {
            info!("Course {} created for {} year {}", course.code, course.program, course.year_level);
            Ok(HttpResponse::Created().json(ApiResponse::success(course, "Course created")))
        }
        Err(e) if crate::services::is_unique_violation(&e) => {
            Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
                ErrorCode::CourseAlreadyExists,
                "Course code already exists",
            )))
        }
        Err(e) => Ok(crate::services::internal_error("Course creation failed", e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn course() -> CreateCourseRequest {
        CreateCourseRequest {
            code: " it101 ".to_string(),
            title: " Introduction to Computing ".to_string(),
            units: 3,
            program: "it".to_string(),
            year_level: 1,
            semester: 1,
            teacher_id: None,
        }
    }

    #[test]
    fn test_validate_course_normalizes_fields() {
        let mut c = course();
        assert!(validate_course(&mut c).is_ok());
        assert_eq!(c.code, "IT101");
        assert_eq!(c.program, "IT");
        assert_eq!(c.title, "Introduction to Computing");
    }

    #[test]
    fn test_validate_course_rejects_bad_values() {
        let mut c = course();
        c.semester = 4;
        assert!(validate_course(&mut c).is_err());

        let mut c = course();
        c.units = 0;
        assert!(validate_course(&mut c).is_err());

        let mut c = course();
        c.year_level = 7;
        assert!(validate_course(&mut c).is_err());
    }
}
