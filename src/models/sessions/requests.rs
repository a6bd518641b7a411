use crate::models::common::PaginationQuery;
use serde::Deserialize;
use ts_rs::TS;

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/session.ts")]
pub struct SessionQueryParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    pub user_id: Option<i64>,
}

// 存储层查询参数
#[derive(Debug, Clone, Default)]
pub struct SessionListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub user_id: Option<i64>,
}

// 存储层写入参数
#[derive(Debug, Clone)]
pub struct NewLoginSession {
    pub user_id: i64,
    pub ip_address: String,
    pub user_agent: Option<String>,
    pub location: super::entities::GeoLocation,
}
