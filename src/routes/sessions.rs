use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::sessions::requests::SessionQueryParams;
use crate::services::SessionService;

static SESSION_SERVICE: Lazy<SessionService> = Lazy::new(SessionService::new_lazy);

pub async fn list_sessions(
    req: HttpRequest,
    query: web::Query<SessionQueryParams>,
) -> ActixResult<HttpResponse> {
    SESSION_SERVICE.list_sessions(query.into_inner(), &req).await
}

// 配置路由
pub fn configure_session_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/sessions")
            .wrap(middlewares::RequireJWT)
            .route("", web::get().to(list_sessions)),
    );
}
