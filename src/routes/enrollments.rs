use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::enrollments::requests::{CreateEnrollmentRequest, EnrollmentListQuery};
use crate::models::grades::requests::GradeRequest;
use crate::models::users::entities::UserRole;
use crate::services::{EnrollmentService, GradeService};
use crate::utils::SafeEnrollmentIdI64;

static ENROLLMENT_SERVICE: Lazy<EnrollmentService> = Lazy::new(EnrollmentService::new_lazy);
static GRADE_SERVICE: Lazy<GradeService> = Lazy::new(GradeService::new_lazy);

pub async fn list_enrollments(
    req: HttpRequest,
    query: web::Query<EnrollmentListQuery>,
) -> ActixResult<HttpResponse> {
    ENROLLMENT_SERVICE
        .list_enrollments(query.into_inner(), &req)
        .await
}

pub async fn create_enrollment(
    req: HttpRequest,
    enrollment_data: web::Json<CreateEnrollmentRequest>,
) -> ActixResult<HttpResponse> {
    ENROLLMENT_SERVICE
        .create_enrollment(enrollment_data.into_inner(), &req)
        .await
}

pub async fn get_grade(
    req: HttpRequest,
    enrollment_id: SafeEnrollmentIdI64,
) -> ActixResult<HttpResponse> {
    GRADE_SERVICE.get_grade(enrollment_id.0, &req).await
}

pub async fn record_grade(
    req: HttpRequest,
    enrollment_id: SafeEnrollmentIdI64,
    grade_data: web::Json<GradeRequest>,
) -> ActixResult<HttpResponse> {
    GRADE_SERVICE
        .record_grade(enrollment_id.0, grade_data.into_inner(), &req)
        .await
}

// 配置路由
pub fn configure_enrollment_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/enrollments")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("")
                    .route(web::get().to(list_enrollments))
                    .route(
                        web::post()
                            .to(create_enrollment)
                            .wrap(middlewares::RequireRole::new_any(UserRole::records_roles())),
                    ),
            )
            .service(
                web::resource("/{enrollment_id}/grade")
                    .route(web::get().to(get_grade))
                    .route(
                        web::put()
                            .to(record_grade)
                            .wrap(middlewares::RequireRole::new_any(UserRole::grading_roles())),
                    ),
            ),
    );
}
