use super::entities::LoginSession;
use crate::models::common::PaginationInfo;
use serde::Serialize;
use ts_rs::TS;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/session.ts")]
pub struct SessionListResponse {
    pub items: Vec<LoginSession>,
    pub pagination: PaginationInfo,
}
