use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::SessionService;
use crate::models::{
    ApiResponse,
    sessions::requests::{SessionListQuery, SessionQueryParams},
};

pub async fn list_sessions(
    service: &SessionService,
    query: SessionQueryParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = match crate::services::current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request)?;

    // 管理员可查看全部，其他角色只能看自己的
    let user_id = if user.role.is_admin() {
        query.user_id
    } else {
        Some(user.id)
    };

    let list_query = SessionListQuery {
        page: Some(query.pagination.page),
        size: Some(query.pagination.size),
        user_id,
    };

    match storage.list_login_sessions_with_pagination(list_query).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Login sessions retrieved successfully",
        ))),
        Err(e) => Ok(crate::services::internal_error(
            "Failed to retrieve login sessions",
            e,
        )),
    }
}
