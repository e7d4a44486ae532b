// ==========================================
// 学位课程规划引擎 - 学生档案与挂科事件
// ==========================================
// 不变量: 规划调用将档案视为只读输入,
//         规划器之间不共享可变状态
// ==========================================

use crate::domain::types::{CreditLoadPolicy, GraduationGoal, TermSlot};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

// ==========================================
// StudentProfile - 学生档案
// ==========================================
// 仅由调用方在两次规划调用之间修改
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentProfile {
    pub completed_courses: BTreeSet<String>, // 已修课程 (规范代码)
    pub current_term: TermSlot,              // 当前学期槽位
    pub gpa: Option<f64>,                    // GPA (可选)
    pub graduation_goal: GraduationGoal,     // 毕业目标
    pub credit_load: CreditLoadPolicy,       // 学分负荷策略
    pub allow_summer: bool,                  // 是否接受夏季学期
}

impl StudentProfile {
    /// 是否已修指定课程
    pub fn has_completed(&self, code: &str) -> bool {
        self.completed_courses.contains(code)
    }
}

// ==========================================
// FailureEvent - 挂科事件
// ==========================================
// 仅作为重规划输入, 引擎不持久化
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FailureEvent {
    pub course: String,        // 挂科课程 (规范代码)
    pub term_failed: TermSlot, // 挂科学期
    pub attempt_number: u32,   // 第几次修读 (首修为 1)
}
