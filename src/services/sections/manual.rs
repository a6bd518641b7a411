use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::fmt;
use std::sync::Arc;
use tracing::info;

use super::SectionService;
use crate::errors::PortalError;
use crate::models::{
    ApiResponse, ErrorCode,
    students::{entities::Student, requests::AssignSectionRequest},
};
use crate::storage::Storage;

/// 手动分班失败的原因
#[derive(Debug)]
pub enum SectionAssignError {
    StudentNotFound,
    SectionNotFound,
    /// 班级的专业或年级与学生不一致
    Mismatch,
    Full { capacity: usize },
    Storage(PortalError),
}

impl fmt::Display for SectionAssignError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SectionAssignError::StudentNotFound => write!(f, "Student not found"),
            SectionAssignError::SectionNotFound => write!(f, "Section not found"),
            SectionAssignError::Mismatch => write!(
                f,
                "Section program or year level does not match the student"
            ),
            SectionAssignError::Full { capacity } => {
                write!(f, "Section is full (capacity {capacity})")
            }
            SectionAssignError::Storage(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for SectionAssignError {}

impl From<PortalError> for SectionAssignError {
    fn from(err: PortalError) -> Self {
        SectionAssignError::Storage(err)
    }
}

/// 把学生放入指定班级，`None` 表示移出班级
pub async fn assign_student_section(
    storage: &Arc<dyn Storage>,
    student_id: i64,
    section_id: Option<i64>,
    capacity: usize,
) -> Result<Student, SectionAssignError> {
    let student = storage
        .get_student_by_id(student_id)
        .await?
        .ok_or(SectionAssignError::StudentNotFound)?;

    let Some(section_id) = section_id else {
        return storage
            .set_student_section(student_id, None)
            .await?
            .ok_or(SectionAssignError::StudentNotFound);
    };

    // 已在目标班级
    if student.section_id == Some(section_id) {
        return Ok(student);
    }

    let section = storage
        .get_section_by_id(section_id)
        .await?
        .ok_or(SectionAssignError::SectionNotFound)?;

    if section.program != student.program || section.year_level != student.year_level {
        return Err(SectionAssignError::Mismatch);
    }

    let occupants = storage.count_section_occupants(section_id).await?;
    if occupants >= capacity as i64 {
        return Err(SectionAssignError::Full { capacity });
    }

    storage
        .set_student_section(student_id, Some(section_id))
        .await?
        .ok_or(SectionAssignError::StudentNotFound)
}

pub async fn handle_assign_student(
    service: &SectionService,
    student_id: i64,
    assign_request: AssignSectionRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    match assign_student_section(
        &storage,
        student_id,
        assign_request.section_id,
        service.capacity(),
    )
    .await
    {
        Ok(student) => {
            info!(
                "Student {} moved to section {:?}",
                student.id, student.section_id
            );
            Ok(HttpResponse::Ok().json(ApiResponse::success(student, "Student section updated")))
        }
        Err(SectionAssignError::StudentNotFound) => Ok(HttpResponse::NotFound().json(
            ApiResponse::error_empty(ErrorCode::StudentNotFound, "Student not found"),
        )),
        Err(SectionAssignError::SectionNotFound) => Ok(HttpResponse::NotFound().json(
            ApiResponse::error_empty(ErrorCode::SectionNotFound, "Section not found"),
        )),
        Err(e @ SectionAssignError::Mismatch) => Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::SectionMismatch, e.to_string()))),
        Err(e @ SectionAssignError::Full { .. }) => Ok(HttpResponse::Conflict()
            .json(ApiResponse::error_empty(ErrorCode::SectionFull, e.to_string()))),
        Err(SectionAssignError::Storage(e)) => Ok(crate::services::internal_error(
            "Failed to update student section",
            e,
        )),
    }
}
