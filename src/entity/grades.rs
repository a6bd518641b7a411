//! 成绩实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "grades")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub enrollment_id: i64,
    pub prelim: Option<f64>,
    pub midterm: Option<f64>,
    pub final_grade: Option<f64>,
    #[sea_orm(column_type = "Text", nullable)]
    pub remarks: Option<String>,
    pub graded_by: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::enrollments::Entity",
        from = "Column::EnrollmentId",
        to = "super::enrollments::Column::Id"
    )]
    Enrollment,
}

impl Related<super::enrollments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Enrollment.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_grade(self) -> crate::models::grades::entities::Grade {
        use crate::services::grades::average::average_grade;

        crate::models::grades::entities::Grade {
            id: self.id,
            enrollment_id: self.enrollment_id,
            average: average_grade(self.prelim, self.midterm, self.final_grade),
            prelim: self.prelim,
            midterm: self.midterm,
            final_grade: self.final_grade,
            remarks: self.remarks,
            graded_by: self.graded_by,
            updated_at: super::timestamp_to_datetime(self.updated_at),
        }
    }
}
