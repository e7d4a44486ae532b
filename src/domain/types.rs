// ==========================================
// 学位课程规划引擎 - 领域类型定义
// ==========================================
// 学期体系: Fall / Spring / Summer
// 序列化格式: SCREAMING_SNAKE_CASE (与数据文件一致)
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 学期 (Term)
// ==========================================
// 顺序: 同一公历年内 Spring < Summer < Fall
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Term {
    Spring, // 春季学期
    Summer, // 夏季学期
    Fall,   // 秋季学期
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Spring => write!(f, "SPRING"),
            Term::Summer => write!(f, "SUMMER"),
            Term::Fall => write!(f, "FALL"),
        }
    }
}

impl Term {
    /// 从字符串解析学期
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "SPRING" => Some(Term::Spring),
            "SUMMER" => Some(Term::Summer),
            "FALL" => Some(Term::Fall),
            _ => None,
        }
    }

    /// 转换为数据存储的字符串
    pub fn to_db_str(&self) -> &'static str {
        match self {
            Term::Spring => "SPRING",
            Term::Summer => "SUMMER",
            Term::Fall => "FALL",
        }
    }

    /// 是否为常规学期（夏季学期容量与规则不同）
    pub fn is_regular(&self) -> bool {
        !matches!(self, Term::Summer)
    }
}

// ==========================================
// 学期槽位 (Term Slot)
// ==========================================
// (year, term) 全序: 先比公历年, 再比学期
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TermSlot {
    pub year: i32,
    pub term: Term,
}

impl fmt::Display for TermSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.term, self.year)
    }
}

impl TermSlot {
    pub fn new(year: i32, term: Term) -> Self {
        Self { year, term }
    }

    /// 下一个学期槽位
    ///
    /// allow_summer=false 时跳过夏季学期:
    /// Fall y -> Spring y+1 -> (Summer y+1) -> Fall y+1 -> ...
    pub fn next(&self, allow_summer: bool) -> TermSlot {
        match self.term {
            Term::Fall => TermSlot::new(self.year + 1, Term::Spring),
            Term::Spring if allow_summer => TermSlot::new(self.year, Term::Summer),
            Term::Spring => TermSlot::new(self.year, Term::Fall),
            Term::Summer => TermSlot::new(self.year, Term::Fall),
        }
    }
}

// ==========================================
// 毕业目标 (Graduation Goal)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GraduationGoal {
    Standard,    // 标准四年
    Accelerated, // 提前毕业
    Flexible,    // 弹性学制
}

impl fmt::Display for GraduationGoal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GraduationGoal::Standard => write!(f, "STANDARD"),
            GraduationGoal::Accelerated => write!(f, "ACCELERATED"),
            GraduationGoal::Flexible => write!(f, "FLEXIBLE"),
        }
    }
}

// ==========================================
// 学分负荷策略 (Credit Load Policy)
// ==========================================
// 决定每学期学分上下限, 具体数值见 config::CreditLoadTable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CreditLoadPolicy {
    Light,    // 轻负荷
    Standard, // 标准负荷
    Heavy,    // 重负荷
}

impl fmt::Display for CreditLoadPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CreditLoadPolicy::Light => write!(f, "LIGHT"),
            CreditLoadPolicy::Standard => write!(f, "STANDARD"),
            CreditLoadPolicy::Heavy => write!(f, "HEAVY"),
        }
    }
}

// ==========================================
// 要求组类型 (Requirement Group Kind)
// ==========================================
// ExclusiveSubgroup 即 n=1 的 ChooseN, 作用于受限子集,
// 只能嵌套在 ChooseN 组内部, 语义为"至多选一"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GroupKind {
    Compulsory,        // 必修列表
    ChooseN,           // N 选 M
    ExclusiveSubgroup, // 互斥子组
}

impl fmt::Display for GroupKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupKind::Compulsory => write!(f, "COMPULSORY"),
            GroupKind::ChooseN => write!(f, "CHOOSE_N"),
            GroupKind::ExclusiveSubgroup => write!(f, "EXCLUSIVE_SUBGROUP"),
        }
    }
}

// ==========================================
// 规划器阶段 (Planner Phase)
// ==========================================
// 状态机: Init -> Scheduling -> Complete | Infeasible
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PlannerPhase {
    Init,
    Scheduling,
    Complete,
    Infeasible,
}

impl fmt::Display for PlannerPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlannerPhase::Init => write!(f, "INIT"),
            PlannerPhase::Scheduling => write!(f, "SCHEDULING"),
            PlannerPhase::Complete => write!(f, "COMPLETE"),
            PlannerPhase::Infeasible => write!(f, "INFEASIBLE"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_term_slot_ordering() {
        let fall_2025 = TermSlot::new(2025, Term::Fall);
        let spring_2026 = TermSlot::new(2026, Term::Spring);
        let summer_2026 = TermSlot::new(2026, Term::Summer);
        let fall_2026 = TermSlot::new(2026, Term::Fall);

        assert!(fall_2025 < spring_2026);
        assert!(spring_2026 < summer_2026);
        assert!(summer_2026 < fall_2026);
    }

    #[test]
    fn test_term_slot_next_with_summer() {
        let spring = TermSlot::new(2026, Term::Spring);
        assert_eq!(spring.next(true), TermSlot::new(2026, Term::Summer));
        assert_eq!(spring.next(false), TermSlot::new(2026, Term::Fall));

        let fall = TermSlot::new(2026, Term::Fall);
        assert_eq!(fall.next(true), TermSlot::new(2027, Term::Spring));
        assert_eq!(fall.next(false), TermSlot::new(2027, Term::Spring));
    }

    #[test]
    fn test_term_parse_roundtrip() {
        for term in [Term::Spring, Term::Summer, Term::Fall] {
            assert_eq!(Term::parse(term.to_db_str()), Some(term));
        }
        assert_eq!(Term::parse("winter"), None);
    }
}
