use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 用户角色
#[derive(Debug, Clone, Serialize, PartialEq, Eq, Hash, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/user.ts")]
pub enum UserRole {
    Superadmin,  // 超级管理员
    Admin,       // 管理员
    Registrar,   // 教务员
    ProgramHead, // 专业负责人
    Teacher,     // 教师
    Student,     // 学生
}

impl UserRole {
    pub const SUPERADMIN: &'static str = "superadmin";
    pub const ADMIN: &'static str = "admin";
    pub const REGISTRAR: &'static str = "registrar";
    pub const PROGRAM_HEAD: &'static str = "program_head";
    pub const TEACHER: &'static str = "teacher";
    pub const STUDENT: &'static str = "student";

    pub fn superadmin_roles() -> &'static [&'static UserRole] {
        &[&Self::Superadmin]
    }
    pub fn admin_roles() -> &'static [&'static UserRole] {
        &[&Self::Superadmin, &Self::Admin]
    }
    // 可以管理学生档案与分班的角色
    pub fn registrar_roles() -> &'static [&'static UserRole] {
        &[
            &Self::Superadmin,
            &Self::Admin,
            &Self::Registrar,
            &Self::ProgramHead,
        ]
    }
    // 可以维护学籍、课程与选课记录的角色
    pub fn records_roles() -> &'static [&'static UserRole] {
        &[&Self::Superadmin, &Self::Admin, &Self::Registrar]
    }
    // 可以录入成绩的角色
    pub fn grading_roles() -> &'static [&'static UserRole] {
        &[
            &Self::Superadmin,
            &Self::Admin,
            &Self::Registrar,
            &Self::Teacher,
        ]
    }
    pub fn staff_roles() -> &'static [&'static UserRole] {
        &[
            &Self::Superadmin,
            &Self::Admin,
            &Self::Registrar,
            &Self::ProgramHead,
            &Self::Teacher,
        ]
    }
    pub fn all_roles() -> &'static [&'static UserRole] {
        &[
            &Self::Superadmin,
            &Self::Admin,
            &Self::Registrar,
            &Self::ProgramHead,
            &Self::Teacher,
            &Self::Student,
        ]
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, UserRole::Superadmin | UserRole::Admin)
    }

    pub fn is_staff(&self) -> bool {
        *self != UserRole::Student
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Superadmin => Self::SUPERADMIN,
            UserRole::Admin => Self::ADMIN,
            UserRole::Registrar => Self::REGISTRAR,
            UserRole::ProgramHead => Self::PROGRAM_HEAD,
            UserRole::Teacher => Self::TEACHER,
            UserRole::Student => Self::STUDENT,
        }
    }
}

impl<'de> Deserialize<'de> for UserRole {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse::<UserRole>().map_err(|_| {
            serde::de::Error::custom(format!(
                "无效的用户角色: '{s}'. 支持的角色: superadmin, admin, registrar, program_head, teacher, student"
            ))
        })
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            UserRole::SUPERADMIN => Ok(UserRole::Superadmin),
            UserRole::ADMIN => Ok(UserRole::Admin),
            UserRole::REGISTRAR => Ok(UserRole::Registrar),
            UserRole::PROGRAM_HEAD => Ok(UserRole::ProgramHead),
            UserRole::TEACHER => Ok(UserRole::Teacher),
            UserRole::STUDENT => Ok(UserRole::Student),
            _ => Err(format!("Invalid user role: {s}")),
        }
    }
}

// 用户状态
#[derive(Debug, Clone, Serialize, PartialEq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/user.ts")]
pub enum UserStatus {
    Active,    // 活跃
    Inactive,  // 非活跃
    Suspended, // 暂停
}

impl<'de> Deserialize<'de> for UserStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse::<UserStatus>().map_err(|_| {
            serde::de::Error::custom(format!(
                "无效的用户状态: '{s}'. 支持的状态: active, inactive, suspended"
            ))
        })
    }
}

impl std::fmt::Display for UserStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UserStatus::Active => write!(f, "active"),
            UserStatus::Inactive => write!(f, "inactive"),
            UserStatus::Suspended => write!(f, "suspended"),
        }
    }
}

impl std::str::FromStr for UserStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(UserStatus::Active),
            "inactive" => Ok(UserStatus::Inactive),
            "suspended" => Ok(UserStatus::Suspended),
            _ => Err(format!("Invalid user status: {s}")),
        }
    }
}

// 账号来源
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/user.ts")]
pub enum AuthProvider {
    Password,
    Google,
}

impl std::fmt::Display for AuthProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthProvider::Password => write!(f, "password"),
            AuthProvider::Google => write!(f, "google"),
        }
    }
}

impl std::str::FromStr for AuthProvider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "password" => Ok(AuthProvider::Password),
            "google" => Ok(AuthProvider::Google),
            _ => Err(format!("Invalid auth provider: {s}")),
        }
    }
}

// 用户实体
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/user.ts")]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing, default)] // 不序列化到JSON响应中
    #[ts(skip)]
    pub password_hash: String,
    pub role: UserRole,
    pub status: UserStatus,
    pub display_name: Option<String>,
    pub avatar_url: Option<String>,
    pub auth_provider: AuthProvider,
    pub last_login: Option<chrono::DateTime<chrono::Utc>>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl User {
    /// 展示用名称，未设置时回退到用户名
    pub fn name_for_display(&self) -> &str {
        self.display_name
            .as_deref()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or(&self.username)
    }

    // 生成 token 对（access + refresh）
    pub fn generate_token_pair(
        &self,
        refresh_token_expiry: Option<chrono::TimeDelta>,
    ) -> Result<crate::utils::jwt::TokenPair, String> {
        crate::utils::jwt::JwtUtils::generate_token_pair(
            self.id,
            self.role.as_str(),
            refresh_token_expiry,
        )
        .map_err(|e| format!("Failed to generate token pair: {e}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trip_through_str() {
        for role in UserRole::all_roles() {
            let parsed: UserRole = role.as_str().parse().unwrap();
            assert_eq!(&parsed, *role);
        }
        assert!("principal".parse::<UserRole>().is_err());
    }

    #[test]
    fn test_role_groups() {
        assert!(UserRole::Superadmin.is_admin());
        assert!(!UserRole::Registrar.is_admin());
        assert!(UserRole::ProgramHead.is_staff());
        assert!(!UserRole::Student.is_staff());
        assert!(!UserRole::grading_roles().contains(&&UserRole::ProgramHead));
        assert!(UserRole::registrar_roles().contains(&&UserRole::ProgramHead));
    }

    #[test]
    fn test_role_deserialize_rejects_unknown() {
        let role: UserRole = serde_json::from_str("\"program_head\"").unwrap();
        assert_eq!(role, UserRole::ProgramHead);
        assert!(serde_json::from_str::<UserRole>("\"dean\"").is_err());
    }
}
