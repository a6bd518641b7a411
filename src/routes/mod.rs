pub mod auth;
pub mod courses;
pub mod dashboard;
pub mod enrollments;
pub mod prospectus;
pub mod sections;
pub mod sessions;
pub mod students;
pub mod users;

pub use auth::configure_auth_routes;
pub use courses::configure_course_routes;
pub use dashboard::configure_dashboard_routes;
pub use enrollments::configure_enrollment_routes;
pub use prospectus::configure_prospectus_routes;
pub use sections::configure_section_routes;
pub use sessions::configure_session_routes;
pub use students::configure_student_routes;
pub use users::configure_user_routes;

use actix_web::web;

// 注册全部 API 路由
pub fn configure_api_routes(cfg: &mut web::ServiceConfig) {
    cfg.configure(configure_auth_routes)
        .configure(configure_user_routes)
        .configure(configure_student_routes)
        .configure(configure_section_routes)
        .configure(configure_course_routes)
        .configure(configure_enrollment_routes)
        .configure(configure_prospectus_routes)
        .configure(configure_session_routes)
        .configure(configure_dashboard_routes);
}
