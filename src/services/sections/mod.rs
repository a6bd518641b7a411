pub mod assign;
pub mod list;
pub mod manual;
pub mod naming;
pub mod planner;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::config::AppConfig;
use crate::models::sections::{
    entities::{Section, SectionWithOccupancy},
    requests::{AutoAssignRequest, SectionListQuery},
};
use crate::models::students::requests::AssignSectionRequest;
use crate::storage::Storage;

pub use assign::auto_assign_sections;
pub use manual::{SectionAssignError, assign_student_section};
pub use naming::next_section_name;
pub use planner::plan_section_assignment;

pub struct SectionService {
    storage: Option<Arc<dyn Storage>>,
}

impl SectionService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => super::storage_from_request(request),
        }
    }

    pub(crate) fn capacity(&self) -> usize {
        AppConfig::get().academic.section_capacity
    }

    // 列出班级及人数
    pub async fn list_sections(
        &self,
        query: SectionListQuery,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        list::list_sections(self, query, request).await
    }

    // 自动分班
    pub async fn auto_assign(
        &self,
        assign_request: AutoAssignRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        assign::handle_auto_assign(self, assign_request, request).await
    }

    // 手动调整学生班级
    pub async fn assign_student(
        &self,
        student_id: i64,
        assign_request: AssignSectionRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        manual::handle_assign_student(self, student_id, assign_request, request).await
    }
}

pub(crate) fn with_occupancy(
    section: Section,
    occupants: i64,
    capacity: usize,
) -> SectionWithOccupancy {
    SectionWithOccupancy {
        label: section.label(),
        section,
        occupants,
        capacity: capacity as i64,
    }
}
