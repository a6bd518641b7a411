use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 课程
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/course.ts")]
pub struct Course {
    pub id: i64,
    pub code: String,
    pub title: String,
    pub units: i32,
    pub program: String,
    pub year_level: i32,
    /// 1 = 第一学期，2 = 第二学期，3 = 夏季学期
    pub semester: i32,
    pub teacher_id: Option<i64>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}
