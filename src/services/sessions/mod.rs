pub mod list;
pub mod locator;
pub mod providers;
pub mod record;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::sessions::requests::SessionQueryParams;
use crate::storage::Storage;

pub use locator::{GeoLocator, public_ip};
pub use providers::{GeoProvider, IpApiCom, IpWhoIs, IpapiCo};
pub use record::{record_login, spawn_record_login};

pub struct SessionService {
    storage: Option<Arc<dyn Storage>>,
}

impl SessionService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => super::storage_from_request(request),
        }
    }

    // 登录记录列表
    pub async fn list_sessions(
        &self,
        query: SessionQueryParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        list::list_sessions(self, query, request).await
    }
}
