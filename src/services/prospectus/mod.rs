pub mod builder;
pub mod get;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::storage::Storage;

pub use get::load_prospectus;

pub struct ProspectusService {
    storage: Option<Arc<dyn Storage>>,
}

impl ProspectusService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => super::storage_from_request(request),
        }
    }

    pub async fn get_prospectus(
        &self,
        student_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        get::get_prospectus(self, student_id, request).await
    }

    // 当前学生自己的培养方案
    pub async fn get_my_prospectus(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        get::get_my_prospectus(self, request).await
    }
}
