use std::sync::Arc;

use crate::errors::Result;
use crate::models::{
    courses::requests::CourseListQuery,
    dashboard::responses::{DashboardSummary, RoleCount, YearLevelCount},
    sections::requests::SectionListQuery,
    users::entities::{User, UserRole},
};
use crate::services::{prospectus::load_prospectus, sections::with_occupancy};
use crate::storage::Storage;

const DAY_SECS: i64 = 24 * 60 * 60;

/// 按角色汇总首页数据
pub async fn build_dashboard(
    storage: &Arc<dyn Storage>,
    user: &User,
    section_capacity: usize,
) -> Result<DashboardSummary> {
    match user.role {
        UserRole::Superadmin | UserRole::Admin => {
            let users_by_role = storage
                .count_users_by_role()
                .await?
                .into_iter()
                .map(|(role, count)| RoleCount { role, count })
                .collect();
            let since = chrono::Utc::now().timestamp() - DAY_SECS;

            Ok(DashboardSummary::Admin {
                users_by_role,
                students: storage.count_students().await? as i64,
                sections: storage.count_sections().await? as i64,
                courses: storage.count_courses().await? as i64,
                logins_last_24h: storage.count_logins_since(since).await? as i64,
            })
        }
        UserRole::Registrar | UserRole::ProgramHead => {
            let students_by_year = storage
                .count_students_by_year_level()
                .await?
                .into_iter()
                .map(|(year_level, count)| YearLevelCount { year_level, count })
                .collect();
            let sections = storage
                .list_sections_with_occupancy(SectionListQuery::default())
                .await?
                .into_iter()
                .map(|(section, occupants)| with_occupancy(section, occupants, section_capacity))
                .collect();

            Ok(DashboardSummary::Registrar {
                students_by_year,
                unassigned_students: storage.count_unassigned_students().await? as i64,
                sections,
            })
        }
        UserRole::Teacher => {
            let courses = storage
                .list_courses(CourseListQuery {
                    teacher_id: Some(user.id),
                    ..Default::default()
                })
                .await?;

            Ok(DashboardSummary::Teacher {
                courses: courses.len() as i64,
                enrollments: storage.count_enrollments_for_teacher(user.id).await? as i64,
            })
        }
        UserRole::Student => {
            let Some(student) = storage.get_student_by_user_id(user.id).await? else {
                return Ok(DashboardSummary::Student {
                    profile: None,
                    enrollments: 0,
                    general_average: None,
                });
            };

            let enrollments = storage.list_enrollments_by_student(student.id).await?.len() as i64;
            let prospectus = load_prospectus(storage, student.id).await?;

            Ok(match prospectus {
                Some(p) => DashboardSummary::Student {
                    general_average: p.summary.general_average,
                    profile: Some(p.student),
                    enrollments,
                },
                None => DashboardSummary::Student {
                    profile: None,
                    enrollments,
                    general_average: None,
                },
            })
        }
    }
}
