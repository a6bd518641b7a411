use std::collections::HashMap;

use super::SeaOrmStorage;
use crate::entity::sections::Entity as Sections;
use crate::entity::students::{ActiveModel, Column, Entity as Students, Model, Relation};
use crate::entity::users::{Column as UserColumn, Entity as Users};
use crate::errors::{PortalError, Result};
use crate::models::{
    PaginationInfo,
    sections::entities::section_label,
    students::{
        entities::{Student, StudentDetail},
        requests::{CreateStudentRequest, StudentListQuery},
        responses::StudentListResponse,
    },
};
use crate::utils::escape_like_pattern;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, JoinType, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, RelationTrait, Set,
};

impl SeaOrmStorage {
    /// 创建学生档案
    pub async fn create_student_impl(&self, req: CreateStudentRequest) -> Result<Student> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            user_id: Set(req.user_id),
            student_number: Set(req.student_number),
            program: Set(req.program),
            year_level: Set(req.year_level),
            section_id: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("创建学生档案失败: {e}")))?;

        Ok(result.into_student())
    }

    pub async fn get_student_by_id_impl(&self, id: i64) -> Result<Option<Student>> {
        let result = Students::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("查询学生失败: {e}")))?;

        Ok(result.map(|m| m.into_student()))
    }

    pub async fn get_student_by_user_id_impl(&self, user_id: i64) -> Result<Option<Student>> {
        let result = Students::find()
            .filter(Column::UserId.eq(user_id))
            .one(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("查询学生失败: {e}")))?;

        Ok(result.map(|m| m.into_student()))
    }

    pub async fn get_student_by_number_impl(&self, student_number: &str) -> Result<Option<Student>> {
        let result = Students::find()
            .filter(Column::StudentNumber.eq(student_number))
            .one(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("查询学生失败: {e}")))?;

        Ok(result.map(|m| m.into_student()))
    }

    /// 学生详情
    pub async fn get_student_detail_impl(&self, id: i64) -> Result<Option<StudentDetail>> {
        let result = Students::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("查询学生失败: {e}")))?;

        match result {
            Some(model) => Ok(self.to_details(vec![model]).await?.pop()),
            None => Ok(None),
        }
    }

    /// 分页列出学生
    pub async fn list_students_with_pagination_impl(
        &self,
        query: StudentListQuery,
    ) -> Result<StudentListResponse> {
        let page = query.page.unwrap_or(1).max(1) as u64;
        let size = query.size.unwrap_or(20).clamp(1, 100) as u64;

        let mut select = Students::find();

        if let Some(ref program) = query.program {
            select = select.filter(Column::Program.eq(program.as_str()));
        }

        if let Some(year_level) = query.year_level {
            select = select.filter(Column::YearLevel.eq(year_level));
        }

        if query.unassigned {
            select = select.filter(Column::SectionId.is_null());
        } else if let Some(section_id) = query.section_id {
            select = select.filter(Column::SectionId.eq(section_id));
        }

        // 搜索学号、用户名、邮箱、显示名
        if let Some(ref search) = query.search
            && !search.trim().is_empty()
        {
            let escaped = escape_like_pattern(search.trim());
            select = select
                .join(JoinType::InnerJoin, Relation::User.def())
                .filter(
                    Condition::any()
                        .add(Column::StudentNumber.contains(&escaped))
                        .add(UserColumn::Username.contains(&escaped))
                        .add(UserColumn::Email.contains(&escaped))
                        .add(UserColumn::DisplayName.contains(&escaped)),
                );
        }

        select = select.order_by_asc(Column::StudentNumber);

        let paginator = select.paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| PortalError::database_operation(format!("查询学生总数失败: {e}")))?;

        let pages = paginator
            .num_pages()
            .await
            .map_err(|e| PortalError::database_operation(format!("查询学生页数失败: {e}")))?;

        let students = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| PortalError::database_operation(format!("查询学生列表失败: {e}")))?;

        Ok(StudentListResponse {
            items: self.to_details(students).await?,
            pagination: PaginationInfo {
                page: page as i64,
                page_size: size as i64,
                total: total as i64,
                total_pages: pages as i64,
            },
        })
    }

    /// 未分班的学生，按学号排序
    pub async fn list_unassigned_students_impl(
        &self,
        program: &str,
        year_level: i32,
    ) -> Result<Vec<Student>> {
        let result = Students::find()
            .filter(Column::Program.eq(program))
            .filter(Column::YearLevel.eq(year_level))
            .filter(Column::SectionId.is_null())
            .order_by_asc(Column::StudentNumber)
            .all(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("查询未分班学生失败: {e}")))?;

        Ok(result.into_iter().map(|m| m.into_student()).collect())
    }

    /// 设置学生班级
    pub async fn set_student_section_impl(
        &self,
        student_id: i64,
        section_id: Option<i64>,
    ) -> Result<Option<Student>> {
        if self.get_student_by_id_impl(student_id).await?.is_none() {
            return Ok(None);
        }

        let model = ActiveModel {
            id: Set(student_id),
            section_id: Set(section_id),
            updated_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        model
            .update(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("更新学生班级失败: {e}")))?;

        self.get_student_by_id_impl(student_id).await
    }

    pub async fn count_students_impl(&self) -> Result<u64> {
        Students::find()
            .count(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("统计学生数量失败: {e}")))
    }

    pub async fn count_unassigned_students_impl(&self) -> Result<u64> {
        Students::find()
            .filter(Column::SectionId.is_null())
            .count(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("统计未分班学生失败: {e}")))
    }

    /// 按年级统计学生数量
    pub async fn count_students_by_year_level_impl(&self) -> Result<Vec<(i32, i64)>> {
        Students::find()
            .select_only()
            .column(Column::YearLevel)
            .column_as(Column::Id.count(), "count")
            .group_by(Column::YearLevel)
            .order_by_asc(Column::YearLevel)
            .into_tuple::<(i32, i64)>()
            .all(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("按年级统计学生失败: {e}")))
    }

    /// 批量补全用户信息与班级名称
    async fn to_details(&self, students: Vec<Model>) -> Result<Vec<StudentDetail>> {
        let user_ids: Vec<i64> = students.iter().map(|s| s.user_id).collect();
        let section_ids: Vec<i64> = students.iter().filter_map(|s| s.section_id).collect();

        let users: HashMap<i64, _> = Users::find()
            .filter(UserColumn::Id.is_in(user_ids))
            .all(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("查询学生用户信息失败: {e}")))?
            .into_iter()
            .map(|u| (u.id, u))
            .collect();

        let sections: HashMap<i64, String> = if section_ids.is_empty() {
            HashMap::new()
        } else {
            Sections::find()
                .filter(crate::entity::sections::Column::Id.is_in(section_ids))
                .all(&self.db)
                .await
                .map_err(|e| PortalError::database_operation(format!("查询班级失败: {e}")))?
                .into_iter()
                .map(|s| (s.id, section_label(&s.program, s.year_level, &s.name)))
                .collect()
        };

        Ok(students
            .into_iter()
            .map(|model| {
                let user = users.get(&model.user_id);
                let section_label = model.section_id.and_then(|id| sections.get(&id).cloned());
                StudentDetail {
                    username: user.map(|u| u.username.clone()).unwrap_or_default(),
                    email: user.map(|u| u.email.clone()).unwrap_or_default(),
                    display_name: user.and_then(|u| u.display_name.clone()),
                    avatar_url: user.and_then(|u| u.avatar_url.clone()),
                    section_label,
                    student: model.into_student(),
                }
            })
            .collect())
    }
}
