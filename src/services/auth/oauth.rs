use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use once_cell::sync::Lazy;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use super::{
    AuthService,
    avatar::{merge_profile, resolve_avatar, resolve_display_name, username_base},
    google::GoogleClient,
    session::start_session,
};
use crate::config::AppConfig;
use crate::errors::Result;
use crate::models::{
    ApiResponse, ErrorCode,
    auth::{OAuthCallbackRequest, OAuthLoginResponse},
    users::{
        entities::{AuthProvider, User, UserRole},
        requests::CreateUserRequest,
    },
};
use crate::storage::Storage;

static GOOGLE_CLIENT: Lazy<GoogleClient> = Lazy::new(|| {
    let oauth = &AppConfig::get().oauth;
    GoogleClient::with_base_url(
        oauth.google_userinfo_url.as_str(),
        Duration::from_millis(oauth.timeout_ms),
    )
});

/// 邮箱域名是否允许登录，列表为空时不限制
pub fn domain_allowed(email: &str, allowed_domains: &[String]) -> bool {
    if allowed_domains.is_empty() {
        return true;
    }
    let Some((_, domain)) = email.rsplit_once('@') else {
        return false;
    };
    allowed_domains
        .iter()
        .any(|d| d.trim().trim_start_matches('@').eq_ignore_ascii_case(domain))
}

// 找到一个未被占用的用户名
async fn unique_username(storage: &Arc<dyn Storage>, email: &str) -> Result<String> {
    let base = username_base(email);
    if storage.get_user_by_username(&base).await?.is_none() {
        return Ok(base);
    }
    let mut suffix = 1;
    loop {
        let candidate = format!("{base}{suffix}");
        if storage.get_user_by_username(&candidate).await?.is_none() {
            return Ok(candidate);
        }
        suffix += 1;
    }
}

pub async fn handle_google_callback(
    service: &AuthService,
    callback: OAuthCallbackRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let config = service.get_config();

    // 1. 校验身份提供方令牌
    let userinfo = match GOOGLE_CLIENT.fetch_userinfo(&callback.provider_token).await {
        Ok(info) => info,
        Err(e) => {
            warn!("Google token verification failed: {}", e);
            return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
                ErrorCode::OAuthFailed,
                "Unable to verify Google account",
            )));
        }
    };
    // 未验证的邮箱不能用来匹配已有账号
    let Some(email) = userinfo.verified_email() else {
        warn!("Rejected Google account {} with unverified email", userinfo.sub);
        return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::OAuthFailed,
            "Google account email is not verified",
        )));
    };

    // 2. 域名限制
    if !domain_allowed(&email, &config.oauth.allowed_domains) {
        return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::OAuthDomainNotAllowed,
            "This email domain is not allowed",
        )));
    }

    // 3. 头像与显示名
    let display_name = resolve_display_name(&callback.user_metadata, userinfo.name.as_deref());
    let avatar = resolve_avatar(
        &callback.user_metadata,
        &callback.identities,
        userinfo.picture.as_deref(),
        display_name.as_deref().unwrap_or(&email),
        &config.oauth.placeholder_avatar_url,
    );

    let storage = service.get_storage(request)?;

    // 4. 合并到已有账号或新建账号
    let (user, created) = match storage.get_user_by_email(&email).await {
        Ok(Some(existing)) => match merge_existing(&storage, existing, &avatar, display_name.as_deref()).await {
            Ok(user) => (user, false),
            Err(e) => return Ok(crate::services::internal_error("OAuth profile sync failed", e)),
        },
        Ok(None) if !config.oauth.auto_register => {
            return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
                ErrorCode::OAuthRegistrationDisabled,
                "No account is registered for this email",
            )));
        }
        Ok(None) => {
            let username = match unique_username(&storage, &email).await {
                Ok(username) => username,
                Err(e) => return Ok(crate::services::internal_error("OAuth registration failed", e)),
            };
            let create = CreateUserRequest {
                username,
                email: email.clone(),
                password: String::new(),
                role: UserRole::Student,
                display_name: display_name.clone(),
                avatar_url: Some(avatar.url.clone()),
                auth_provider: Some(AuthProvider::Google),
            };
            match storage.create_user(create).await {
                Ok(user) => {
                    info!("Registered {} via Google OAuth", user.username);
                    (user, true)
                }
                Err(e) => return Ok(crate::services::internal_error("OAuth registration failed", e)),
            }
        }
        Err(e) => return Ok(crate::services::internal_error("OAuth profile sync failed", e)),
    };

    // 5. 与密码登录相同的后续流程
    match start_session(&storage, user, callback.remember_me, request).await {
        Ok((login, cookie)) => Ok(HttpResponse::Ok().cookie(cookie).json(ApiResponse::success(
            OAuthLoginResponse { login, created },
            "Login successful",
        ))),
        Err(resp) => Ok(resp),
    }
}

async fn merge_existing(
    storage: &Arc<dyn Storage>,
    user: User,
    avatar: &super::avatar::ResolvedAvatar,
    display_name: Option<&str>,
) -> Result<User> {
    let Some(update) = merge_profile(&user, avatar, display_name) else {
        return Ok(user);
    };
    Ok(storage.update_user(user.id, update).await?.unwrap_or(user))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_allowed() {
        let domains = vec!["school.edu".to_string(), "@Faculty.School.edu".to_string()];
        assert!(domain_allowed("a@school.edu", &domains));
        assert!(domain_allowed("b@faculty.school.edu", &domains));
        assert!(!domain_allowed("c@gmail.com", &domains));
        assert!(!domain_allowed("no-at-sign", &domains));
        assert!(domain_allowed("c@gmail.com", &[]));
    }
}
