use crate::models::courses::entities::Course;
use crate::models::students::entities::StudentDetail;
use serde::Serialize;
use ts_rs::TS;

// 课程在学生培养方案中的状态
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/prospectus.ts")]
pub enum CourseStatus {
    NotTaken,
    Enrolled,
    Completed,
    Dropped,
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/prospectus.ts")]
pub struct ProspectusEntry {
    pub course: Course,
    pub status: CourseStatus,
    pub enrollment_id: Option<i64>,
    pub school_year: Option<String>,
    pub prelim: Option<f64>,
    pub midterm: Option<f64>,
    pub final_grade: Option<f64>,
    pub average: Option<f64>,
    pub remarks: Option<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/prospectus.ts")]
pub struct ProspectusSummary {
    pub total_courses: i64,
    pub enrolled: i64,
    pub completed: i64,
    pub units_earned: i64,
    /// 各门课程平均分的平均值
    pub general_average: Option<f64>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/prospectus.ts")]
pub struct ProspectusResponse {
    pub student: StudentDetail,
    pub entries: Vec<ProspectusEntry>,
    pub summary: ProspectusSummary,
}
