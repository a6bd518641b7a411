use actix_web::{HttpRequest, HttpResponse, cookie::Cookie};
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::middlewares::rate_limit::extract_client_ip;
use crate::models::{
    ApiResponse, ErrorCode,
    auth::LoginResponse,
    users::entities::{User, UserStatus},
};
use crate::services::sessions::spawn_record_login;
use crate::storage::Storage;
use crate::utils::jwt::JwtUtils;

/// 登录成功后的公共流程：更新登录时间、后台记录登录地点、签发令牌
pub(crate) async fn start_session(
    storage: &Arc<dyn Storage>,
    user: User,
    remember_me: bool,
    request: &HttpRequest,
) -> Result<(LoginResponse, Cookie<'static>), HttpResponse> {
    if user.status != UserStatus::Active {
        warn!("Login rejected for {} user {}", user.status, user.username);
        return Err(HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::AuthFailed,
            format!("Account is {}", user.status),
        )));
    }

    if let Err(e) = storage.update_last_login(user.id).await {
        warn!("Failed to update last login for user {}: {}", user.id, e);
    }

    let user_agent = request
        .headers()
        .get(actix_web::http::header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.to_string());
    spawn_record_login(
        storage.clone(),
        user.id,
        extract_client_ip(request),
        user_agent,
    );

    let refresh_expiry = JwtUtils::refresh_token_expiry(remember_me);
    let token_pair = user.generate_token_pair(Some(refresh_expiry)).map_err(|e| {
        error!("Failed to generate JWT token: {}", e);
        HttpResponse::InternalServerError().json(ApiResponse::error_empty(
            ErrorCode::InternalServerError,
            "Login failed, unable to generate token",
        ))
    })?;

    info!("User {} logged in successfully", user.username);

    let cookie = JwtUtils::create_refresh_token_cookie(&token_pair.refresh_token, refresh_expiry);
    let response = LoginResponse {
        access_token: token_pair.access_token,
        expires_in: JwtUtils::access_token_expiry_secs(),
        user,
        created_at: chrono::Utc::now(),
    };
    Ok((response, cookie))
}
