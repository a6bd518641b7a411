use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::services::ProspectusService;
use crate::utils::SafeStudentIdI64;

static PROSPECTUS_SERVICE: Lazy<ProspectusService> = Lazy::new(ProspectusService::new_lazy);

pub async fn get_my_prospectus(req: HttpRequest) -> ActixResult<HttpResponse> {
    PROSPECTUS_SERVICE.get_my_prospectus(&req).await
}

pub async fn get_prospectus(
    req: HttpRequest,
    student_id: SafeStudentIdI64,
) -> ActixResult<HttpResponse> {
    PROSPECTUS_SERVICE.get_prospectus(student_id.0, &req).await
}

// 配置路由（/me 需在 /{student_id} 之前注册）
pub fn configure_prospectus_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/prospectus")
            .wrap(middlewares::RequireJWT)
            .route("/me", web::get().to(get_my_prospectus))
            .route("/{student_id}", web::get().to(get_prospectus)),
    );
}
