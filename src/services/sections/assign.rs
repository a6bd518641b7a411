use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use once_cell::sync::Lazy;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{info, warn};

use super::{SectionService, planner::plan_section_assignment, with_occupancy};
use crate::errors::{PortalError, Result};
use crate::models::{
    ApiResponse, ErrorCode,
    sections::{
        entities::SectionOccupancy,
        requests::{AutoAssignRequest, SectionListQuery},
        responses::AutoAssignResponse,
    },
};
use crate::storage::Storage;
use crate::utils::validate::{validate_program, validate_year_level};

// 同一进程内的自动分班串行执行
static AUTO_ASSIGN_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

/// 把某专业某年级的未分班学生分配到班级
///
/// 读取、规划与写入都在锁内完成，写入在一个事务中提交。
pub async fn auto_assign_sections(
    storage: &Arc<dyn Storage>,
    program: &str,
    year_level: i32,
    capacity: usize,
) -> Result<AutoAssignResponse> {
    let _guard = AUTO_ASSIGN_LOCK.lock().await;

    let scope = SectionListQuery {
        program: Some(program.to_string()),
        year_level: Some(year_level),
    };

    let students = storage.list_unassigned_students(program, year_level).await?;
    let sections = storage.list_sections_with_occupancy(scope.clone()).await?;

    let existing: Vec<SectionOccupancy> = sections
        .iter()
        .map(|(section, occupants)| SectionOccupancy {
            section_id: section.id,
            name: section.name.clone(),
            occupants: *occupants,
        })
        .collect();
    let student_ids: Vec<i64> = students.iter().map(|s| s.id).collect();

    let plan = plan_section_assignment(&existing, &student_ids, capacity as i64)?;

    let created = if plan.assignments.is_empty() {
        Vec::new()
    } else {
        storage
            .apply_section_plan(program, year_level, &plan)
            .await?
    };

    info!(
        "Auto-assigned {} student(s) of {} year {} ({} new section(s))",
        plan.assignments.len(),
        program,
        year_level,
        created.len()
    );

    let sections = storage
        .list_sections_with_occupancy(scope)
        .await?
        .into_iter()
        .map(|(section, occupants)| with_occupancy(section, occupants, capacity))
        .collect();

    Ok(AutoAssignResponse {
        program: program.to_string(),
        year_level,
        assigned: plan.assignments.len() as i64,
        created_sections: created.iter().map(|s| s.label()).collect(),
        sections,
    })
}

pub async fn handle_auto_assign(
    service: &SectionService,
    assign_request: AutoAssignRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let program = assign_request.program.trim().to_uppercase();

    if let Err(msg) = validate_program(&program) {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::BadRequest, msg)));
    }
    if let Err(msg) = validate_year_level(assign_request.year_level) {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::BadRequest, msg)));
    }

    let storage = service.get_storage(request)?;

    match auto_assign_sections(
        &storage,
        &program,
        assign_request.year_level,
        service.capacity(),
    )
    .await
    {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Students assigned to sections",
        ))),
        Err(PortalError::SectionCapacityExhausted(msg)) => {
            warn!("Auto-assign for {} year {} exhausted: {}", program, assign_request.year_level, msg);
            Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
                ErrorCode::SectionCapacityExhausted,
                msg,
            )))
        }
        Err(e) => Ok(crate::services::internal_error("Auto-assign failed", e)),
    }
}
