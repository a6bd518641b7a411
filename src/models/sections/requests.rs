use serde::Deserialize;
use ts_rs::TS;

// 班级列表查询参数
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/section.ts")]
pub struct SectionListQuery {
    pub program: Option<String>,
    pub year_level: Option<i32>,
}

// 自动分班请求
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/section.ts")]
pub struct AutoAssignRequest {
    pub program: String,
    pub year_level: i32,
}
