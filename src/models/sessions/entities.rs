use serde::{Deserialize, Serialize};
use ts_rs::TS;

pub const UNKNOWN_LOCATION: &str = "Unknown";

// IP 地理位置
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/session.ts")]
pub struct GeoLocation {
    pub city: String,
    pub region: String,
    pub country: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    /// 提供结果的服务名，全部失败时为 "none"
    pub provider: String,
}

impl GeoLocation {
    pub fn unknown() -> Self {
        Self {
            city: UNKNOWN_LOCATION.to_string(),
            region: UNKNOWN_LOCATION.to_string(),
            country: UNKNOWN_LOCATION.to_string(),
            latitude: None,
            longitude: None,
            provider: "none".to_string(),
        }
    }

    pub fn is_unknown(&self) -> bool {
        self.provider == "none"
    }
}

// 登录记录
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/session.ts")]
pub struct LoginSession {
    pub id: String,
    pub user_id: i64,
    pub ip_address: String,
    pub user_agent: Option<String>,
    #[serde(flatten)]
    #[ts(flatten)]
    pub location: GeoLocation,
    pub created_at: chrono::DateTime<chrono::Utc>,
}
