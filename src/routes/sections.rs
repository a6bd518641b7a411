use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::sections::requests::{AutoAssignRequest, SectionListQuery};
use crate::models::users::entities::UserRole;
use crate::services::SectionService;

static SECTION_SERVICE: Lazy<SectionService> = Lazy::new(SectionService::new_lazy);

pub async fn list_sections(
    req: HttpRequest,
    query: web::Query<SectionListQuery>,
) -> ActixResult<HttpResponse> {
    SECTION_SERVICE.list_sections(query.into_inner(), &req).await
}

pub async fn auto_assign(
    req: HttpRequest,
    assign_data: web::Json<AutoAssignRequest>,
) -> ActixResult<HttpResponse> {
    SECTION_SERVICE.auto_assign(assign_data.into_inner(), &req).await
}

// 配置路由
pub fn configure_section_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/sections")
            .wrap(middlewares::RequireRole::new_any(UserRole::registrar_roles()))
            .wrap(middlewares::RequireJWT)
            .route("", web::get().to(list_sections))
            .service(
                web::resource("/auto-assign")
                    .wrap(middlewares::RateLimit::auto_assign())
                    .route(web::post().to(auto_assign)),
            ),
    );
}
