use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::EnrollmentService;
use crate::models::{
    ApiResponse, ErrorCode,
    enrollments::{requests::EnrollmentListQuery, responses::EnrollmentListResponse},
};

pub async fn list_enrollments(
    service: &EnrollmentService,
    query: EnrollmentListQuery,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = match crate::services::current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request)?;

    if !user.role.is_staff() {
        let own = matches!(
            storage.get_student_by_user_id(user.id).await,
            Ok(Some(student)) if student.id == query.student_id
        );
        if !own {
            return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
                ErrorCode::Forbidden,
                "You can only view your own enrollments",
            )));
        }
    }

    match storage.list_enrollments_by_student(query.student_id).await {
        Ok(items) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            EnrollmentListResponse { items },
            "Enrollment list retrieved successfully",
        ))),
        Err(e) => Ok(crate::services::internal_error(
            "Failed to retrieve enrollments",
            e,
        )),
    }
}
