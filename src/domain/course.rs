// ==========================================
// 学位课程规划引擎 - 课程主数据
// ==========================================
// 数据来源: 课程目录 (加载期一次性导入, 之后只读)
// ==========================================

use crate::domain::types::Term;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

// ==========================================
// Course - 课程主数据
// ==========================================
// 不变量: 由 CourseCatalog 独占持有, 加载后不可变
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    pub code: String,                    // 规范课程代码 (唯一键)
    pub title: String,                   // 课程名称
    pub credits: f64,                    // 学分 (正数)
    pub terms_offered: BTreeSet<Term>,   // 开课学期集合
    pub is_foundation: bool,             // 是否基础链课程
    pub difficulty_weight: f64,          // 难度权重 (1.0 - 5.0)
}

impl Course {
    /// 判断指定学期是否开课
    pub fn offered_in(&self, term: Term) -> bool {
        self.terms_offered.contains(&term)
    }

    /// 字段合法性检查, 返回首个不合法字段的描述
    pub fn field_error(&self) -> Option<String> {
        if self.code.trim().is_empty() {
            return Some("code 为空".to_string());
        }
        if !(self.credits > 0.0 && self.credits.is_finite()) {
            return Some(format!("credits 非法: {}", self.credits));
        }
        if !(1.0..=5.0).contains(&self.difficulty_weight) {
            return Some(format!(
                "difficulty_weight 越界: {}",
                self.difficulty_weight
            ));
        }
        if self.terms_offered.is_empty() {
            return Some("terms_offered 为空".to_string());
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Course {
        Course {
            code: "CS 25100".to_string(),
            title: "Data Structures And Algorithms".to_string(),
            credits: 3.0,
            terms_offered: BTreeSet::from([Term::Fall, Term::Spring, Term::Summer]),
            is_foundation: true,
            difficulty_weight: 4.2,
        }
    }

    #[test]
    fn test_offered_in() {
        let course = sample();
        assert!(course.offered_in(Term::Fall));
        assert!(course.offered_in(Term::Summer));
    }

    #[test]
    fn test_field_error_rejects_bad_credits() {
        let mut course = sample();
        course.credits = 0.0;
        assert!(course.field_error().is_some());

        let mut course = sample();
        course.difficulty_weight = 7.5;
        assert!(course.field_error().is_some());

        assert!(sample().field_error().is_none());
    }
}
