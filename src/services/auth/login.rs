use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{AuthService, session::start_session};
use crate::models::{ApiResponse, ErrorCode, auth::LoginRequest};
use crate::utils::password::verify_password;

pub async fn handle_login(
    service: &AuthService,
    login_request: LoginRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    // 1. 根据用户名或邮箱获取用户信息
    let user = match storage
        .get_user_by_username_or_email(login_request.username.trim())
        .await
    {
        Ok(Some(user)) => user,
        Ok(None) => return Ok(invalid_credentials()),
        Err(e) => return Ok(crate::services::internal_error("Login failed", e)),
    };

    // 2. 验证密码（OAuth 账号没有密码哈希，必然失败）
    if !verify_password(&login_request.password, &user.password_hash) {
        return Ok(invalid_credentials());
    }

    // 3. 登录时间、登录记录、令牌
    match start_session(&storage, user, login_request.remember_me, request).await {
        Ok((response, cookie)) => Ok(HttpResponse::Ok()
            .cookie(cookie)
            .json(ApiResponse::success(response, "Login successful"))),
        Err(resp) => Ok(resp),
    }
}

fn invalid_credentials() -> HttpResponse {
    HttpResponse::Unauthorized().json(ApiResponse::error_empty(
        ErrorCode::AuthFailed,
        "Username or password is incorrect",
    ))
}
