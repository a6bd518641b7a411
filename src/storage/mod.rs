use std::sync::Arc;

use crate::models::{
    courses::{
        entities::Course,
        requests::{CourseListQuery, CreateCourseRequest},
    },
    enrollments::{
        entities::{Enrollment, EnrollmentStatus},
        requests::CreateEnrollmentRequest,
    },
    grades::{entities::Grade, requests::GradeRequest},
    sections::{
        entities::{Section, SectionPlan},
        requests::SectionListQuery,
    },
    sessions::{
        entities::LoginSession,
        requests::{NewLoginSession, SessionListQuery},
        responses::SessionListResponse,
    },
    students::{
        entities::{Student, StudentDetail},
        requests::{CreateStudentRequest, StudentListQuery},
        responses::StudentListResponse,
    },
    users::{
        entities::User,
        requests::{CreateUserRequest, UpdateUserRequest, UserListQuery},
        responses::UserListResponse,
    },
};

use crate::errors::Result;

pub mod sea_orm_storage;

#[async_trait::async_trait]
pub trait Storage: Send + Sync {
    /// 用户管理方法
    // 创建用户
    async fn create_user(&self, user: CreateUserRequest) -> Result<User>;
    // 通过ID获取用户信息
    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>>;
    // 通过用户名获取用户信息
    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>>;
    // 通过邮箱获取用户信息
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>>;
    // 通过用户名或邮箱获取用户信息
    async fn get_user_by_username_or_email(&self, identifier: &str) -> Result<Option<User>>;
    // 列出用户
    async fn list_users_with_pagination(&self, query: UserListQuery) -> Result<UserListResponse>;
    // 更新用户信息
    async fn update_user(&self, id: i64, update: UpdateUserRequest) -> Result<Option<User>>;
    // 更新用户最后登录时间
    async fn update_last_login(&self, id: i64) -> Result<bool>;
    // 统计用户数量
    async fn count_users(&self) -> Result<u64>;
    // 按角色统计用户数量
    async fn count_users_by_role(&self) -> Result<Vec<(String, i64)>>;

    /// 学生档案方法
    async fn create_student(&self, req: CreateStudentRequest) -> Result<Student>;
    async fn get_student_by_id(&self, id: i64) -> Result<Option<Student>>;
    async fn get_student_by_user_id(&self, user_id: i64) -> Result<Option<Student>>;
    async fn get_student_by_number(&self, student_number: &str) -> Result<Option<Student>>;
    // 学生详情（含用户信息与班级名称）
    async fn get_student_detail(&self, id: i64) -> Result<Option<StudentDetail>>;
    async fn list_students_with_pagination(
        &self,
        query: StudentListQuery,
    ) -> Result<StudentListResponse>;
    // 某专业某年级尚未分班的学生，按学号排序
    async fn list_unassigned_students(&self, program: &str, year_level: i32)
    -> Result<Vec<Student>>;
    // 设置或清除学生的班级
    async fn set_student_section(
        &self,
        student_id: i64,
        section_id: Option<i64>,
    ) -> Result<Option<Student>>;
    async fn count_students(&self) -> Result<u64>;
    async fn count_students_by_year_level(&self) -> Result<Vec<(i32, i64)>>;
    async fn count_unassigned_students(&self) -> Result<u64>;

    /// 班级方法
    async fn get_section_by_id(&self, id: i64) -> Result<Option<Section>>;
    // 班级及其当前人数，按专业、年级、名称排序
    async fn list_sections_with_occupancy(
        &self,
        query: SectionListQuery,
    ) -> Result<Vec<(Section, i64)>>;
    async fn count_section_occupants(&self, section_id: i64) -> Result<i64>;
    async fn count_sections(&self) -> Result<u64>;
    // 在同一事务内新建班级并写入学生分班结果，返回新建的班级
    async fn apply_section_plan(
        &self,
        program: &str,
        year_level: i32,
        plan: &SectionPlan,
    ) -> Result<Vec<Section>>;

    /// 课程方法
    async fn create_course(&self, req: CreateCourseRequest) -> Result<Course>;
    async fn get_course_by_id(&self, id: i64) -> Result<Option<Course>>;
    async fn get_course_by_code(&self, code: &str) -> Result<Option<Course>>;
    // 按年级、学期、课程代码排序
    async fn list_courses(&self, query: CourseListQuery) -> Result<Vec<Course>>;
    async fn count_courses(&self) -> Result<u64>;

    /// 选课方法
    async fn create_enrollment(&self, req: CreateEnrollmentRequest) -> Result<Enrollment>;
    async fn get_enrollment_by_id(&self, id: i64) -> Result<Option<Enrollment>>;
    async fn get_enrollment_by_student_and_course(
        &self,
        student_id: i64,
        course_id: i64,
    ) -> Result<Option<Enrollment>>;
    async fn list_enrollments_by_student(&self, student_id: i64) -> Result<Vec<Enrollment>>;
    // 某位教师所授课程的选课总数
    async fn count_enrollments_for_teacher(&self, teacher_id: i64) -> Result<u64>;

    /// 成绩方法
    // 写入或更新成绩；三项齐全时同时把选课标记为已完成
    async fn upsert_grade(
        &self,
        enrollment_id: i64,
        req: GradeRequest,
        graded_by: i64,
    ) -> Result<Grade>;
    async fn get_grade_by_enrollment(&self, enrollment_id: i64) -> Result<Option<Grade>>;
    async fn list_grades_by_student(&self, student_id: i64) -> Result<Vec<Grade>>;
    async fn set_enrollment_status(&self, id: i64, status: EnrollmentStatus) -> Result<bool>;

    /// 登录记录方法
    async fn create_login_session(&self, session: NewLoginSession) -> Result<LoginSession>;
    async fn list_login_sessions_with_pagination(
        &self,
        query: SessionListQuery,
    ) -> Result<SessionListResponse>;
    async fn count_logins_since(&self, since: i64) -> Result<u64>;
}

pub async fn create_storage() -> Result<Arc<dyn Storage>> {
    let storage = sea_orm_storage::SeaOrmStorage::new_async().await?;
    Ok(Arc::new(storage))
}
