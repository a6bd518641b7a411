pub mod summary;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::config::AppConfig;
use crate::models::ApiResponse;
use crate::storage::Storage;

pub use summary::build_dashboard;

pub struct DashboardService {
    storage: Option<Arc<dyn Storage>>,
}

impl DashboardService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => super::storage_from_request(request),
        }
    }

    // 当前用户角色对应的首页概览
    pub async fn get_dashboard(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        let user = match super::current_user(request) {
            Ok(user) => user,
            Err(resp) => return Ok(resp),
        };
        let storage = self.get_storage(request)?;
        let capacity = AppConfig::get().academic.section_capacity;

        match build_dashboard(&storage, &user, capacity).await {
            Ok(summary) => Ok(HttpResponse::Ok().json(ApiResponse::success(
                summary,
                "Dashboard retrieved successfully",
            ))),
            Err(e) => Ok(super::internal_error("Failed to build dashboard", e)),
        }
    }
}
