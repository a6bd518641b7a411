use serde::Deserialize;
use std::time::Duration;

use crate::errors::{PortalError, Result};

// Google userinfo 接口返回的字段
#[derive(Debug, Clone, Deserialize)]
pub struct GoogleUserInfo {
    pub sub: String,
    pub email: Option<String>,
    #[serde(default)]
    pub email_verified: bool,
    pub name: Option<String>,
    pub picture: Option<String>,
}

impl GoogleUserInfo {
    /// 已验证的邮箱（小写），未验证时返回 `None`
    pub fn verified_email(&self) -> Option<String> {
        if !self.email_verified {
            return None;
        }
        self.email
            .as_deref()
            .map(|e| e.trim().to_lowercase())
            .filter(|e| !e.is_empty())
    }
}

pub struct GoogleClient {
    client: reqwest::Client,
    userinfo_url: String,
}

impl GoogleClient {
    pub fn with_base_url(userinfo_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client: crate::services::sessions::providers::http_client(timeout),
            userinfo_url: userinfo_url.into(),
        }
    }

    /// 用访问令牌换取用户信息，令牌无效时返回认证错误
    pub async fn fetch_userinfo(&self, access_token: &str) -> Result<GoogleUserInfo> {
        let response = self
            .client
            .get(&self.userinfo_url)
            .bearer_auth(access_token)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(PortalError::authentication(format!(
                "Google userinfo returned {}",
                response.status()
            )));
        }

        Self::parse(&response.text().await?)
    }

    pub fn parse(body: &str) -> Result<GoogleUserInfo> {
        let info: GoogleUserInfo = serde_json::from_str(body)?;
        match info.email.as_deref().map(str::trim) {
            Some(email) if !email.is_empty() => Ok(info),
            _ => Err(PortalError::authentication(
                "Google account has no email address",
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_userinfo() {
        let body = r#"{"sub":"1234","email":"maria@school.edu","email_verified":true,
            "name":"Maria Santos","picture":"https://lh3.googleusercontent.com/a/x"}"#;
        let info = GoogleClient::parse(body).unwrap();
        assert_eq!(info.email.as_deref(), Some("maria@school.edu"));
        assert!(info.email_verified);
        assert_eq!(info.name.as_deref(), Some("Maria Santos"));
    }

    #[test]
    fn test_unverified_email_is_not_trusted() {
        let body = r#"{"sub":"1234","email":"admin@school.edu","email_verified":false}"#;
        let info = GoogleClient::parse(body).unwrap();
        assert_eq!(info.verified_email(), None);

        // 缺省视为未验证
        let info = GoogleClient::parse(r#"{"sub":"1234","email":"admin@school.edu"}"#).unwrap();
        assert_eq!(info.verified_email(), None);

        let body = r#"{"sub":"1234","email":" Maria@School.edu ","email_verified":true}"#;
        let info = GoogleClient::parse(body).unwrap();
        assert_eq!(info.verified_email().as_deref(), Some("maria@school.edu"));
    }

    #[test]
    fn test_parse_requires_email() {
        assert!(GoogleClient::parse(r#"{"sub":"1234"}"#).is_err());
        assert!(GoogleClient::parse(r#"{"sub":"1234","email":" "}"#).is_err());
    }
}
