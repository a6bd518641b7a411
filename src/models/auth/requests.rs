use serde::Deserialize;
use ts_rs::TS;

// 用户登录请求（来自HTTP请求）
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/auth.ts")]
pub struct LoginRequest {
    /// 用户名或邮箱
    pub username: String,
    /// 密码
    pub password: String,
    /// 是否记住我
    #[serde(default)]
    pub remember_me: bool,
}

// 更新个人资料请求
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/auth.ts")]
pub struct UpdateProfileRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    pub display_name: Option<String>,
    pub avatar_url: Option<String>,
}

// 身份提供方返回的单条身份信息
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/auth.ts")]
pub struct OAuthIdentity {
    #[serde(default)]
    pub provider: String,
    #[serde(default)]
    pub identity_data: serde_json::Value,
}

// Google OAuth 回调同步请求
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/auth.ts")]
pub struct OAuthCallbackRequest {
    /// 身份提供方签发的访问令牌
    pub provider_token: String,
    /// 会话携带的用户元数据
    #[serde(default)]
    pub user_metadata: serde_json::Value,
    #[serde(default)]
    pub identities: Vec<OAuthIdentity>,
    #[serde(default)]
    pub remember_me: bool,
}
