use crate::models::common::PaginationQuery;
use serde::Deserialize;
use ts_rs::TS;

// 学生列表查询参数（来自HTTP请求）
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/student.ts")]
pub struct StudentQueryParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    pub program: Option<String>,
    pub year_level: Option<i32>,
    pub section_id: Option<i64>,
    /// 仅返回未分班的学生
    #[serde(default)]
    pub unassigned: bool,
    pub search: Option<String>,
}

// 学生列表查询参数（用于存储层）
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/student.ts")]
pub struct StudentListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub program: Option<String>,
    pub year_level: Option<i32>,
    pub section_id: Option<i64>,
    pub unassigned: bool,
    pub search: Option<String>,
}

// 创建学生档案请求
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/student.ts")]
pub struct CreateStudentRequest {
    pub user_id: i64,
    pub student_number: String,
    pub program: String,
    pub year_level: i32,
}

// 手动分班请求，`section_id` 为空表示移出班级
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/student.ts")]
pub struct AssignSectionRequest {
    pub section_id: Option<i64>,
}
