use super::entities::SectionWithOccupancy;
use serde::Serialize;
use ts_rs::TS;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/section.ts")]
pub struct SectionListResponse {
    pub items: Vec<SectionWithOccupancy>,
}

// 自动分班结果
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/section.ts")]
pub struct AutoAssignResponse {
    pub program: String,
    pub year_level: i32,
    /// 本次分配的学生数量
    pub assigned: i64,
    /// 本次新建的班级名称
    pub created_sections: Vec<String>,
    /// 分配完成后的各班人数
    pub sections: Vec<SectionWithOccupancy>,
}
