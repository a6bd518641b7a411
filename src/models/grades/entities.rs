use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 成绩记录，每条选课最多一条
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grade.ts")]
pub struct Grade {
    pub id: i64,
    pub enrollment_id: i64,
    pub prelim: Option<f64>,
    pub midterm: Option<f64>,
    pub final_grade: Option<f64>,
    /// 三次成绩的平均值（保留两位小数）
    pub average: Option<f64>,
    pub remarks: Option<String>,
    pub graded_by: i64,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}
