use super::SeaOrmStorage;
use crate::entity::enrollments::{Column as EnrollmentColumn, Entity as Enrollments};
use crate::entity::grades::{ActiveModel, Column, Entity as Grades, Relation};
use crate::errors::{PortalError, Result};
use crate::models::{
    enrollments::entities::EnrollmentStatus,
    grades::{entities::Grade, requests::GradeRequest},
};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, JoinType, QueryFilter, QuerySelect, RelationTrait,
    Set, TransactionTrait,
};

impl SeaOrmStorage {
    /// 写入或更新成绩
    pub async fn upsert_grade_impl(
        &self,
        enrollment_id: i64,
        req: GradeRequest,
        graded_by: i64,
    ) -> Result<Grade> {
        let now = chrono::Utc::now().timestamp();
        let complete = req.is_complete();

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| PortalError::database_operation(format!("开启事务失败: {e}")))?;

        let existing = Grades::find()
            .filter(Column::EnrollmentId.eq(enrollment_id))
            .one(&txn)
            .await
            .map_err(|e| PortalError::database_operation(format!("查询成绩失败: {e}")))?;

        let model = match existing {
            Some(existing) => ActiveModel {
                id: Set(existing.id),
                prelim: Set(req.prelim),
                midterm: Set(req.midterm),
                final_grade: Set(req.final_grade),
                remarks: Set(req.remarks),
                graded_by: Set(graded_by),
                updated_at: Set(now),
                ..Default::default()
            }
            .update(&txn)
            .await
            .map_err(|e| PortalError::database_operation(format!("更新成绩失败: {e}")))?,
            None => ActiveModel {
                enrollment_id: Set(enrollment_id),
                prelim: Set(req.prelim),
                midterm: Set(req.midterm),
                final_grade: Set(req.final_grade),
                remarks: Set(req.remarks),
                graded_by: Set(graded_by),
                updated_at: Set(now),
                ..Default::default()
            }
            .insert(&txn)
            .await
            .map_err(|e| PortalError::database_operation(format!("写入成绩失败: {e}")))?,
        };

        if complete {
            Enrollments::update_many()
                .col_expr(
                    EnrollmentColumn::Status,
                    Expr::value(EnrollmentStatus::Completed.to_string()),
                )
                .col_expr(EnrollmentColumn::UpdatedAt, Expr::value(now))
                .filter(EnrollmentColumn::Id.eq(enrollment_id))
                .exec(&txn)
                .await
                .map_err(|e| PortalError::database_operation(format!("更新选课状态失败: {e}")))?;
        }

        txn.commit()
            .await
            .map_err(|e| PortalError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(model.into_grade())
    }

    pub async fn get_grade_by_enrollment_impl(&self, enrollment_id: i64) -> Result<Option<Grade>> {
        let result = Grades::find()
            .filter(Column::EnrollmentId.eq(enrollment_id))
            .one(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("查询成绩失败: {e}")))?;

        Ok(result.map(|m| m.into_grade()))
    }

    /// 学生所有选课的成绩
    pub async fn list_grades_by_student_impl(&self, student_id: i64) -> Result<Vec<Grade>> {
        let result = Grades::find()
            .join(JoinType::InnerJoin, Relation::Enrollment.def())
            .filter(EnrollmentColumn::StudentId.eq(student_id))
            .all(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("查询学生成绩失败: {e}")))?;

        Ok(result.into_iter().map(|m| m.into_grade()).collect())
    }
}
