use serde::Deserialize;
use ts_rs::TS;

// 录入成绩请求
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grade.ts")]
pub struct GradeRequest {
    pub prelim: Option<f64>,
    pub midterm: Option<f64>,
    pub final_grade: Option<f64>,
    pub remarks: Option<String>,
}

impl GradeRequest {
    pub fn is_complete(&self) -> bool {
        self.prelim.is_some() && self.midterm.is_some() && self.final_grade.is_some()
    }
}
