use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 班级（按专业与年级划分）
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/section.ts")]
pub struct Section {
    pub id: i64,
    pub program: String,
    pub year_level: i32,
    /// 单个字母 "A".."Z"
    pub name: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl Section {
    /// 展示名称，例如 "IT 1A"
    pub fn label(&self) -> String {
        section_label(&self.program, self.year_level, &self.name)
    }
}

pub fn section_label(program: &str, year_level: i32, name: &str) -> String {
    format!("{program} {year_level}{name}")
}

// 班级及当前人数
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/section.ts")]
pub struct SectionWithOccupancy {
    #[serde(flatten)]
    #[ts(flatten)]
    pub section: Section,
    pub label: String,
    pub occupants: i64,
    pub capacity: i64,
}

// 自动分班时某个班级的当前人数
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionOccupancy {
    pub section_id: i64,
    pub name: String,
    pub occupants: i64,
}

// 学生在分班方案中的去向
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SectionSlot {
    /// 已存在的班级 ID
    Existing(i64),
    /// `SectionPlan::new_sections` 中的下标
    New(usize),
}

// 分班方案，由存储层在一个事务内执行
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SectionPlan {
    /// (学生 ID, 目标班级)
    pub assignments: Vec<(i64, SectionSlot)>,
    /// 需要新建的班级名称，按创建顺序
    pub new_sections: Vec<String>,
}
