//! OAuth 头像与资料合并
//!
//! 头像按以下顺序取第一个非空值：
//! `user_metadata.avatar_url` → `user_metadata.picture` →
//! 各身份的 `identity_data.avatar_url` / `identity_data.picture` →
//! userinfo 的 `picture` → 按名字生成的占位头像。

use serde_json::Value;

use crate::models::{
    auth::OAuthIdentity,
    users::{entities::User, requests::UpdateUserRequest},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedAvatar {
    pub url: String,
    pub is_placeholder: bool,
}

fn non_blank<'a>(value: &'a Value, key: &str) -> Option<&'a str> {
    value
        .get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

/// 显示名：`full_name` → `name` → userinfo 的 `name`，取第一个非空值
pub fn resolve_display_name(user_metadata: &Value, userinfo_name: Option<&str>) -> Option<String> {
    non_blank(user_metadata, "full_name")
        .or_else(|| non_blank(user_metadata, "name"))
        .or_else(|| userinfo_name.map(str::trim).filter(|s| !s.is_empty()))
        .map(str::to_string)
}

pub fn resolve_avatar(
    user_metadata: &Value,
    identities: &[OAuthIdentity],
    userinfo_picture: Option<&str>,
    name: &str,
    placeholder_base: &str,
) -> ResolvedAvatar {
    let from_identities = identities.iter().find_map(|identity| {
        non_blank(&identity.identity_data, "avatar_url")
            .or_else(|| non_blank(&identity.identity_data, "picture"))
    });

    let found = non_blank(user_metadata, "avatar_url")
        .or_else(|| non_blank(user_metadata, "picture"))
        .or(from_identities)
        .or_else(|| userinfo_picture.map(str::trim).filter(|s| !s.is_empty()));

    match found {
        Some(url) => ResolvedAvatar {
            url: url.to_string(),
            is_placeholder: false,
        },
        None => ResolvedAvatar {
            url: placeholder_avatar(placeholder_base, name),
            is_placeholder: true,
        },
    }
}

/// 占位头像，同一名字总是得到同一地址
pub fn placeholder_avatar(base: &str, name: &str) -> String {
    let params = [("name", name), ("background", "0D8ABC"), ("color", "fff")];
    match reqwest::Url::parse_with_params(base, &params) {
        Ok(url) => url.to_string(),
        Err(_) => format!("{base}?name={}&background=0D8ABC&color=fff", name.replace(' ', "+")),
    }
}

/// 已有账号需要更新的字段，没有变化时返回 `None`
///
/// 真实头像覆盖旧头像；占位头像只在没有头像时写入。显示名只在为空时补上。
pub fn merge_profile(
    user: &User,
    avatar: &ResolvedAvatar,
    display_name: Option<&str>,
) -> Option<UpdateUserRequest> {
    let current_avatar = user.avatar_url.as_deref().map(str::trim).unwrap_or("");

    let avatar_url = if avatar.is_placeholder {
        current_avatar.is_empty().then(|| avatar.url.clone())
    } else {
        (current_avatar != avatar.url).then(|| avatar.url.clone())
    };

    let name_missing = user
        .display_name
        .as_deref()
        .is_none_or(|n| n.trim().is_empty());
    let display_name = display_name
        .map(str::trim)
        .filter(|n| name_missing && !n.is_empty())
        .map(str::to_string);

    if avatar_url.is_none() && display_name.is_none() {
        return None;
    }
    Some(UpdateUserRequest {
        avatar_url,
        display_name,
        ..Default::default()
    })
}

/// 由邮箱前缀生成用户名候选
pub fn username_base(email: &str) -> String {
    let local = email.split('@').next().unwrap_or_default().to_lowercase();
    let mut base: String = local
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_' || *c == '-')
        .take(12)
        .collect();
    if base.len() < 5 {
        base.push_str("_user");
    }
    base
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::users::entities::{AuthProvider, UserRole, UserStatus};
    use serde_json::json;

    const BASE: &str = "https://ui-avatars.com/api/";

    fn identity(data: Value) -> OAuthIdentity {
        OAuthIdentity {
            provider: "google".to_string(),
            identity_data: data,
        }
    }

    fn user(avatar_url: Option<&str>, display_name: Option<&str>) -> User {
        User {
            id: 1,
            username: "jdelacruz".to_string(),
            email: "jdelacruz@school.edu".to_string(),
            password_hash: String::new(),
            role: UserRole::Student,
            status: UserStatus::Active,
            display_name: display_name.map(str::to_string),
            avatar_url: avatar_url.map(str::to_string),
            auth_provider: AuthProvider::Google,
            last_login: None,
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn test_metadata_avatar_wins() {
        let metadata = json!({"avatar_url": "https://a/1.png", "picture": "https://a/2.png"});
        let ids = [identity(json!({"picture": "https://a/3.png"}))];
        let avatar = resolve_avatar(&metadata, &ids, Some("https://a/4.png"), "Juan", BASE);
        assert_eq!(avatar.url, "https://a/1.png");
        assert!(!avatar.is_placeholder);
    }

    #[test]
    fn test_chain_skips_blank_values() {
        let metadata = json!({"avatar_url": "  ", "picture": ""});
        let ids = [
            identity(json!({"avatar_url": ""})),
            identity(json!({"picture": "https://a/3.png"})),
        ];
        let avatar = resolve_avatar(&metadata, &ids, Some("https://a/4.png"), "Juan", BASE);
        assert_eq!(avatar.url, "https://a/3.png");

        let avatar = resolve_avatar(&json!({}), &[], Some(" https://a/4.png "), "Juan", BASE);
        assert_eq!(avatar.url, "https://a/4.png");
    }

    #[test]
    fn test_display_name_skips_blank_and_non_string_values() {
        let name = resolve_display_name(&json!({"full_name": "", "name": "Juan"}), Some("Google Juan"));
        assert_eq!(name.as_deref(), Some("Juan"));

        let name = resolve_display_name(&json!({"full_name": null, "name": "Juan"}), None);
        assert_eq!(name.as_deref(), Some("Juan"));

        let name = resolve_display_name(&json!({"full_name": " ", "name": ""}), Some(" Maria Santos "));
        assert_eq!(name.as_deref(), Some("Maria Santos"));

        let name = resolve_display_name(&json!({"full_name": "Juan Dela Cruz", "name": "Juan"}), None);
        assert_eq!(name.as_deref(), Some("Juan Dela Cruz"));

        assert_eq!(resolve_display_name(&Value::Null, Some("")), None);
    }

    #[test]
    fn test_placeholder_is_deterministic() {
        let a = resolve_avatar(&Value::Null, &[], None, "Juan Dela Cruz", BASE);
        let b = resolve_avatar(&json!({}), &[], Some(""), "Juan Dela Cruz", BASE);
        assert!(a.is_placeholder);
        assert_eq!(a, b);
        assert_eq!(
            a.url,
            "https://ui-avatars.com/api/?name=Juan+Dela+Cruz&background=0D8ABC&color=fff"
        );
    }

    #[test]
    fn test_placeholder_never_overwrites_existing_avatar() {
        let placeholder = ResolvedAvatar {
            url: placeholder_avatar(BASE, "Juan"),
            is_placeholder: true,
        };
        assert!(merge_profile(&user(Some("https://a/old.png"), Some("Juan")), &placeholder, None).is_none());

        let update = merge_profile(&user(None, Some("Juan")), &placeholder, None).unwrap();
        assert_eq!(update.avatar_url, Some(placeholder.url.clone()));
    }

    #[test]
    fn test_real_avatar_replaces_and_name_fills_when_empty() {
        let real = ResolvedAvatar {
            url: "https://a/new.png".to_string(),
            is_placeholder: false,
        };
        let update = merge_profile(&user(Some("https://a/old.png"), None), &real, Some("Juan")).unwrap();
        assert_eq!(update.avatar_url.as_deref(), Some("https://a/new.png"));
        assert_eq!(update.display_name.as_deref(), Some("Juan"));

        // 已有显示名时不覆盖，头像未变化时无需更新
        assert!(merge_profile(&user(Some("https://a/new.png"), Some("J.")), &real, Some("Juan")).is_none());
    }

    #[test]
    fn test_username_base() {
        assert_eq!(username_base("Juan.Dela+Cruz@school.edu"), "juandelacruz");
        assert_eq!(username_base("ab@school.edu"), "ab_user");
        assert_eq!(username_base("averyveryverylongname@x.io"), "averyveryver");
    }
}
