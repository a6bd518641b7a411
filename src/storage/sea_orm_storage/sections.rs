use std::collections::{BTreeMap, HashMap};

use super::SeaOrmStorage;
use crate::entity::sections::{ActiveModel, Column, Entity as Sections};
use crate::entity::students::{Column as StudentColumn, Entity as Students};
use crate::errors::{PortalError, Result};
use crate::models::sections::{
    entities::{Section, SectionPlan, SectionSlot},
    requests::SectionListQuery,
};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set, TransactionTrait,
};

impl SeaOrmStorage {
    pub async fn get_section_by_id_impl(&self, id: i64) -> Result<Option<Section>> {
        let result = Sections::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("查询班级失败: {e}")))?;

        Ok(result.map(|m| m.into_section()))
    }

    /// 列出班级及人数
    pub async fn list_sections_with_occupancy_impl(
        &self,
        query: SectionListQuery,
    ) -> Result<Vec<(Section, i64)>> {
        let mut select = Sections::find();

        if let Some(ref program) = query.program {
            select = select.filter(Column::Program.eq(program.as_str()));
        }

        if let Some(year_level) = query.year_level {
            select = select.filter(Column::YearLevel.eq(year_level));
        }

        let sections = select
            .order_by_asc(Column::Program)
            .order_by_asc(Column::YearLevel)
            .order_by_asc(Column::Name)
            .all(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("查询班级列表失败: {e}")))?;

        if sections.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<i64> = sections.iter().map(|s| s.id).collect();
        let counts: HashMap<i64, i64> = Students::find()
            .select_only()
            .column(StudentColumn::SectionId)
            .column_as(StudentColumn::Id.count(), "count")
            .filter(StudentColumn::SectionId.is_in(ids))
            .group_by(StudentColumn::SectionId)
            .into_tuple::<(Option<i64>, i64)>()
            .all(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("统计班级人数失败: {e}")))?
            .into_iter()
            .filter_map(|(id, count)| id.map(|id| (id, count)))
            .collect();

        Ok(sections
            .into_iter()
            .map(|m| {
                let occupants = counts.get(&m.id).copied().unwrap_or(0);
                (m.into_section(), occupants)
            })
            .collect())
    }

    pub async fn count_section_occupants_impl(&self, section_id: i64) -> Result<i64> {
        let count = Students::find()
            .filter(StudentColumn::SectionId.eq(section_id))
            .count(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("统计班级人数失败: {e}")))?;

        Ok(count as i64)
    }

    pub async fn count_sections_impl(&self) -> Result<u64> {
        Sections::find()
            .count(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("统计班级数量失败: {e}")))
    }

    /// 执行分班方案
    ///
    /// 新建班级与学生更新在同一事务中完成，任何一步失败都会整体回滚。
    /// 只更新仍未分班的学生。
    pub async fn apply_section_plan_impl(
        &self,
        program: &str,
        year_level: i32,
        plan: &SectionPlan,
    ) -> Result<Vec<Section>> {
        let now = chrono::Utc::now().timestamp();

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| PortalError::database_operation(format!("开启事务失败: {e}")))?;

        let mut created = Vec::with_capacity(plan.new_sections.len());
        for name in &plan.new_sections {
            let model = ActiveModel {
                program: Set(program.to_string()),
                year_level: Set(year_level),
                name: Set(name.clone()),
                created_at: Set(now),
                ..Default::default()
            };

            let section = model
                .insert(&txn)
                .await
                .map_err(|e| PortalError::database_operation(format!("创建班级失败: {e}")))?;
            created.push(section);
        }

        // 按目标班级分组后批量更新
        let mut targets: BTreeMap<i64, Vec<i64>> = BTreeMap::new();
        for (student_id, slot) in &plan.assignments {
            let section_id = match slot {
                SectionSlot::Existing(id) => *id,
                SectionSlot::New(index) => created
                    .get(*index)
                    .map(|s| s.id)
                    .ok_or_else(|| PortalError::validation(format!("分班方案引用了不存在的新班级: {index}")))?,
            };
            targets.entry(section_id).or_default().push(*student_id);
        }

        for (section_id, student_ids) in targets {
            let expected = student_ids.len() as u64;
            let result = Students::update_many()
                .col_expr(StudentColumn::SectionId, Expr::value(section_id))
                .col_expr(StudentColumn::UpdatedAt, Expr::value(now))
                .filter(StudentColumn::Id.is_in(student_ids))
                .filter(StudentColumn::SectionId.is_null())
                .exec(&txn)
                .await
                .map_err(|e| PortalError::database_operation(format!("更新学生班级失败: {e}")))?;

            // 学生已被其他请求分班时放弃整个方案
            if result.rows_affected != expected {
                txn.rollback().await.map_err(|e| {
                    PortalError::database_operation(format!("回滚事务失败: {e}"))
                })?;
                return Err(PortalError::database_operation(
                    "部分学生已被分配班级，请重新执行自动分班",
                ));
            }
        }

        txn.commit()
            .await
            .map_err(|e| PortalError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(created.into_iter().map(|m| m.into_section()).collect())
    }
}
