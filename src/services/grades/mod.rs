pub mod average;
pub mod get;
pub mod record;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::config::AppConfig;
use crate::models::grades::requests::GradeRequest;
use crate::storage::Storage;

pub use average::average_grade;
pub use record::{GradeError, record_grade};

pub struct GradeService {
    storage: Option<Arc<dyn Storage>>,
}

impl GradeService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => super::storage_from_request(request),
        }
    }

    pub(crate) fn get_config(&self) -> &AppConfig {
        AppConfig::get()
    }

    // 录入或更新成绩
    pub async fn record_grade(
        &self,
        enrollment_id: i64,
        grade_request: GradeRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        record::handle_record_grade(self, enrollment_id, grade_request, request).await
    }

    pub async fn get_grade(
        &self,
        enrollment_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        get::get_grade(self, enrollment_id, request).await
    }
}
