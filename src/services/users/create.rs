use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::UserService;
use crate::models::{
    ApiResponse, ErrorCode,
    users::{
        entities::{AuthProvider, UserRole},
        requests::CreateUserRequest,
        responses::UserResponse,
    },
};
use crate::utils::password::hash_password;
use crate::utils::validate::{validate_email, validate_password_simple, validate_username};

/// 只有超级管理员可以创建管理员与超级管理员
pub fn can_create_role(creator: &UserRole, target: &UserRole) -> bool {
    !target.is_admin() || *creator == UserRole::Superadmin
}

pub async fn create_user(
    service: &UserService,
    mut user_data: CreateUserRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let creator = match crate::services::current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };

    if !can_create_role(&creator.role, &user_data.role) {
        return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::Forbidden,
            "Only a superadmin can create administrator accounts",
        )));
    }

    // 验证用户名
    if let Err(msg) = validate_username(&user_data.username) {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::UserNameInvalid, msg)));
    }

    // 验证邮箱
    if let Err(msg) = validate_email(&user_data.email) {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::UserEmailInvalid, msg)));
    }

    if let Err(msg) = validate_password_simple(&user_data.password) {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::UserPasswordInvalid, msg)));
    }

    user_data.password = match hash_password(&user_data.password) {
        Ok(hash) => hash,
        Err(e) => return Ok(crate::services::internal_error("Password hashing failed", e)),
    };
    user_data.email = user_data.email.trim().to_lowercase();
    user_data.auth_provider = Some(AuthProvider::Password);

    let storage = service.get_storage(request)?;

    match storage.create_user(user_data).await {
        Ok(user) => {
            info!("User {} ({}) created by {}", user.username, user.role, creator.username);
            Ok(HttpResponse::Created()
                .json(ApiResponse::success(UserResponse { user }, "User created")))
        }
        Err(e) if crate::services::is_unique_violation(&e) => {
            Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
                ErrorCode::UserAlreadyExists,
                "Username or email already exists",
            )))
        }
        Err(e) => Ok(crate::services::internal_error("User creation failed", e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_superadmin_creates_admins() {
        assert!(can_create_role(&UserRole::Superadmin, &UserRole::Admin));
        assert!(can_create_role(&UserRole::Superadmin, &UserRole::Superadmin));
        assert!(!can_create_role(&UserRole::Admin, &UserRole::Admin));
        assert!(!can_create_role(&UserRole::Admin, &UserRole::Superadmin));
        assert!(can_create_role(&UserRole::Admin, &UserRole::Registrar));
        assert!(can_create_role(&UserRole::Admin, &UserRole::Student));
    }
}
