// ==========================================
// 学位课程规划引擎 - 规划方案领域模型
// ==========================================
// 不变量: Plan 是输出快照, 返回后归调用方所有,
//         引擎不保留引用; 重规划产生新 Plan, 不改旧 Plan
// 确定性: Plan 内不含时间戳/随机 ID,
//         相同输入必须产生逐字节相同的序列化结果
// ==========================================

use crate::domain::profile::StudentProfile;
use crate::domain::types::{CreditLoadPolicy, TermSlot};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

// ==========================================
// Semester - 单学期排课
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Semester {
    pub slot: TermSlot,          // 学期槽位
    pub courses: Vec<String>,    // 课程代码 (按落位顺序)
    pub total_credits: f64,      // 合计学分
}

impl Semester {
    pub fn contains(&self, code: &str) -> bool {
        self.courses.iter().any(|c| c == code)
    }
}

// ==========================================
// PlanWarning - 方案告警标签
// ==========================================
// 结构化标签, 不含面向用户的文案; 文案由前端协作方负责
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "tag", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PlanWarning {
    OverAggressiveCreditLoad { avg_credits: f64 },
    UnderMinimumCreditLoad { slot: TermSlot, credits: f64, min: f64 },
    NoSlackForFailure,
    AcceleratedGoalAtRisk { semesters: usize },
    LowGpaRetakeRisk { gpa: f64 },
    RepeatedAttempt { course: String, attempt_number: u32 },
}

// ==========================================
// CustomizationNote - 方案定制记录
// ==========================================
// 机器可读的定制痕迹, 供前端生成解释
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "note", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CustomizationNote {
    CompletedCoursesApplied { count: usize },
    SummerTermsEnabled,
    CreditLoadApplied { policy: CreditLoadPolicy },
    ElectedChoice { group_id: String, courses: Vec<String> },
    PrerequisiteAutoIncluded { course: String },
    ReplannedAfterFailure {
        course: String,
        term: TermSlot,
        attempt_number: u32,
    },
}

// ==========================================
// Plan - 规划方案
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    pub track_id: String,                        // 专业/方向标识
    pub profile: StudentProfile,                 // 档案快照 (重规划依据)
    pub semesters: Vec<Semester>,                // 学期序列 (时间升序)
    pub graduation_term: TermSlot,               // 毕业学期
    pub graduation_date: NaiveDate,              // 预计毕业日期
    pub success_probability: f64,                // 成功概率 (确定性启发值)
    pub warnings: Vec<PlanWarning>,              // 告警标签
    pub customization_notes: Vec<CustomizationNote>, // 定制记录
}

impl Plan {
    /// 方案内全部已排课程 (去重)
    pub fn scheduled_courses(&self) -> BTreeSet<String> {
        self.semesters
            .iter()
            .flat_map(|s| s.courses.iter().cloned())
            .collect()
    }

    /// 指定课程所在的学期
    pub fn semester_of(&self, code: &str) -> Option<&Semester> {
        self.semesters.iter().find(|s| s.contains(code))
    }

    /// 全方案合计学分
    pub fn total_scheduled_credits(&self) -> f64 {
        self.semesters.iter().map(|s| s.total_credits).sum()
    }
}
