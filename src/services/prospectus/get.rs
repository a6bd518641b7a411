use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use super::{ProspectusService, builder};
use crate::errors::Result;
use crate::models::{
    ApiResponse, ErrorCode, courses::requests::CourseListQuery,
    prospectus::responses::ProspectusResponse,
};
use crate::storage::Storage;

/// 读取学生的培养方案进度，学生不存在时返回 `None`
pub async fn load_prospectus(
    storage: &Arc<dyn Storage>,
    student_id: i64,
) -> Result<Option<ProspectusResponse>> {
    let Some(student) = storage.get_student_detail(student_id).await? else {
        return Ok(None);
    };

    let courses = storage
        .list_courses(CourseListQuery {
            program: Some(student.student.program.clone()),
            ..Default::default()
        })
        .await?;
    let enrollments = storage.list_enrollments_by_student(student_id).await?;
    let grades = storage.list_grades_by_student(student_id).await?;

    let entries = builder::build_entries(courses, &enrollments, &grades);
    let summary = builder::summarize(&entries);

    Ok(Some(ProspectusResponse {
        student,
        entries,
        summary,
    }))
}

pub async fn get_prospectus(
    service: &ProspectusService,
    student_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = match crate::services::current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request)?;

    // 学生只能查看自己的
    if !user.role.is_staff() {
        let own = matches!(
            storage.get_student_by_user_id(user.id).await,
            Ok(Some(student)) if student.id == student_id
        );
        if !own {
            return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
                ErrorCode::Forbidden,
                "You can only view your own prospectus",
            )));
        }
    }

    respond(&storage, student_id).await
}

pub async fn get_my_prospectus(
    service: &ProspectusService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = match crate::services::current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request)?;

    match storage.get_student_by_user_id(user.id).await {
        Ok(Some(student)) => respond(&storage, student.id).await,
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::StudentNotFound,
            "No student profile for the current user",
        ))),
        Err(e) => Ok(crate::services::internal_error(
            "Failed to load prospectus",
            e,
        )),
    }
}

async fn respond(storage: &Arc<dyn Storage>, student_id: i64) -> ActixResult<HttpResponse> {
    match load_prospectus(storage, student_id).await {
        Ok(Some(prospectus)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            prospectus,
            "Prospectus retrieved successfully",
        ))),
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::StudentNotFound,
            "Student not found",
        ))),
        Err(e) => Ok(crate::services::internal_error(
            "Failed to load prospectus",
            e,
        )),
    }
}
