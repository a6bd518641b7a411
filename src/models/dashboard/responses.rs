use crate::models::sections::entities::SectionWithOccupancy;
use crate::models::students::entities::StudentDetail;
use serde::Serialize;
use ts_rs::TS;

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/dashboard.ts")]
pub struct RoleCount {
    pub role: String,
    pub count: i64,
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/dashboard.ts")]
pub struct YearLevelCount {
    pub year_level: i32,
    pub count: i64,
}

// 按角色区分的首页概览
#[derive(Debug, Serialize, TS)]
#[serde(tag = "kind", rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/dashboard.ts")]
pub enum DashboardSummary {
    Admin {
        users_by_role: Vec<RoleCount>,
        students: i64,
        sections: i64,
        courses: i64,
        logins_last_24h: i64,
    },
    Registrar {
        students_by_year: Vec<YearLevelCount>,
        unassigned_students: i64,
        sections: Vec<SectionWithOccupancy>,
    },
    Teacher {
        courses: i64,
        enrollments: i64,
    },
    Student {
        profile: Option<StudentDetail>,
        enrollments: i64,
        general_average: Option<f64>,
    },
}
