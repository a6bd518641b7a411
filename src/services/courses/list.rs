use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::CourseService;
use crate::models::{
    ApiResponse,
    courses::{requests::CourseListQuery, responses::CourseListResponse},
};

pub async fn list_courses(
    service: &CourseService,
    mut query: CourseListQuery,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    query.program = query.program.map(|p| p.trim().to_uppercase());

    match storage.list_courses(query).await {
        Ok(items) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            CourseListResponse { items },
            "Course list retrieved successfully",
        ))),
        Err(e) => Ok(crate::services::internal_error(
            "Failed to retrieve course list",
            e,
        )),
    }
}
