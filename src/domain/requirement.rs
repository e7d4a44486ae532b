// ==========================================
// 学位课程规划引擎 - 毕业要求数据模型
// ==========================================
// 设计: 每个专业/方向的规则全部表达为数据,
//       由同一套校验器/规划器解释执行,
//       不为具体方向编写专用类型
// ==========================================

use crate::domain::types::GroupKind;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

// ==========================================
// GroupMember - 要求组成员
// ==========================================
// 成员是课程代码, 或嵌套的互斥子组
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GroupMember {
    Course(String),
    Subgroup(RequirementGroup),
}

// ==========================================
// RequirementGroup - 要求组
// ==========================================
// required_count 仅对 ChooseN / ExclusiveSubgroup 有意义;
// ExclusiveSubgroup 固定 required_count=1, 语义为"至多选一"
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequirementGroup {
    pub group_id: String,
    pub kind: GroupKind,
    pub members: Vec<GroupMember>,
    pub required_count: usize,
}

impl RequirementGroup {
    pub fn compulsory(group_id: &str, courses: &[&str]) -> Self {
        Self {
            group_id: group_id.to_string(),
            kind: GroupKind::Compulsory,
            members: courses
                .iter()
                .map(|c| GroupMember::Course(c.to_string()))
                .collect(),
            required_count: courses.len(),
        }
    }

    pub fn choose_n(group_id: &str, n: usize, courses: &[&str]) -> Self {
        Self {
            group_id: group_id.to_string(),
            kind: GroupKind::ChooseN,
            members: courses
                .iter()
                .map(|c| GroupMember::Course(c.to_string()))
                .collect(),
            required_count: n,
        }
    }

    pub fn exclusive_subgroup(group_id: &str, courses: &[&str]) -> Self {
        Self {
            group_id: group_id.to_string(),
            kind: GroupKind::ExclusiveSubgroup,
            members: courses
                .iter()
                .map(|c| GroupMember::Course(c.to_string()))
                .collect(),
            required_count: 1,
        }
    }

    /// 直接课程成员 (不含子组内部课程)
    pub fn direct_courses(&self) -> impl Iterator<Item = &str> {
        self.members.iter().filter_map(|m| match m {
            GroupMember::Course(code) => Some(code.as_str()),
            GroupMember::Subgroup(_) => None,
        })
    }

    /// 嵌套子组
    pub fn subgroups(&self) -> impl Iterator<Item = &RequirementGroup> {
        self.members.iter().filter_map(|m| match m {
            GroupMember::Course(_) => None,
            GroupMember::Subgroup(g) => Some(g),
        })
    }

    /// 该组可计数的全部课程代码 (含子组成员), 规范序
    pub fn all_courses(&self) -> BTreeSet<String> {
        let mut out: BTreeSet<String> =
            self.direct_courses().map(|c| c.to_string()).collect();
        for sub in self.subgroups() {
            out.extend(sub.all_courses());
        }
        out
    }
}

// ==========================================
// TargetCount - 总量目标
// ==========================================
// 以课程数或总学分计
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TargetCount {
    Courses(usize),
    Credits(f64),
}

impl TargetCount {
    /// 换算为调度迭代预算的基数
    pub fn units(&self) -> usize {
        match self {
            TargetCount::Courses(n) => *n,
            TargetCount::Credits(c) => c.ceil().max(0.0) as usize,
        }
    }
}

// ==========================================
// RequirementSet - 毕业要求集
// ==========================================
// groups 有序: 消耗规则按文档顺序逐组认领课程
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequirementSet {
    pub track_id: String,
    pub title: String,
    pub groups: Vec<RequirementGroup>,
    pub target: TargetCount,
}

impl RequirementSet {
    /// 要求集中出现的全部课程代码
    pub fn all_courses(&self) -> BTreeSet<String> {
        let mut out = BTreeSet::new();
        for group in &self.groups {
            out.extend(group.all_courses());
        }
        out
    }

    /// 结构合法性检查 (加载期调用)
    ///
    /// 规则:
    /// - ChooseN 的 required_count 不得超过成员课程数
    /// - ExclusiveSubgroup 仅允许嵌套在 ChooseN 内, required_count 必须为 1
    /// - 子组内不允许再嵌套
    pub fn structure_error(&self) -> Option<String> {
        for group in &self.groups {
            match group.kind {
                GroupKind::Compulsory => {
                    if group.subgroups().next().is_some() {
                        return Some(format!(
                            "必修组 {} 不允许嵌套子组",
                            group.group_id
                        ));
                    }
                }
                GroupKind::ChooseN => {
                    let pool = group.all_courses().len();
                    if group.required_count > pool {
                        return Some(format!(
                            "选修组 {} 要求 {} 门但仅有 {} 个候选",
                            group.group_id, group.required_count, pool
                        ));
                    }
                    for sub in group.subgroups() {
                        if sub.kind != GroupKind::ExclusiveSubgroup {
                            return Some(format!(
                                "选修组 {} 的子组 {} 类型必须为互斥子组",
                                group.group_id, sub.group_id
                            ));
                        }
                        if sub.required_count != 1 {
                            return Some(format!(
                                "互斥子组 {} 的 required_count 必须为 1",
                                sub.group_id
                            ));
                        }
                        if sub.subgroups().next().is_some() {
                            return Some(format!(
                                "互斥子组 {} 不允许再嵌套",
                                sub.group_id
                            ));
                        }
                    }
                }
                GroupKind::ExclusiveSubgroup => {
                    return Some(format!(
                        "互斥子组 {} 不允许作为顶层要求组",
                        group.group_id
                    ));
                }
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn elective_group() -> RequirementGroup {
        RequirementGroup {
            group_id: "mi-electives".to_string(),
            kind: GroupKind::ChooseN,
            members: vec![
                GroupMember::Course("CS 34800".to_string()),
                GroupMember::Course("CS 45600".to_string()),
                GroupMember::Subgroup(RequirementGroup::exclusive_subgroup(
                    "mi-data-viz",
                    &["CS 43900", "CS 44000", "CS 47500"],
                )),
            ],
            required_count: 2,
        }
    }

    #[test]
    fn test_all_courses_includes_subgroup_members() {
        let group = elective_group();
        let all = group.all_courses();
        assert!(all.contains("CS 34800"));
        assert!(all.contains("CS 47500"));
        assert_eq!(all.len(), 5);
    }

    #[test]
    fn test_structure_error_rejects_top_level_subgroup() {
        let set = RequirementSet {
            track_id: "bad".to_string(),
            title: "bad".to_string(),
            groups: vec![RequirementGroup::exclusive_subgroup("x", &["CS 18000"])],
            target: TargetCount::Courses(1),
        };
        assert!(set.structure_error().is_some());
    }

    #[test]
    fn test_structure_error_rejects_overfull_choose_n() {
        let set = RequirementSet {
            track_id: "bad".to_string(),
            title: "bad".to_string(),
            groups: vec![RequirementGroup::choose_n("g", 3, &["CS 18000", "CS 18200"])],
            target: TargetCount::Courses(3),
        };
        assert!(set.structure_error().is_some());
    }

    #[test]
    fn test_structure_ok() {
        let set = RequirementSet {
            track_id: "ok".to_string(),
            title: "ok".to_string(),
            groups: vec![
                RequirementGroup::compulsory("core", &["CS 18000"]),
                elective_group(),
            ],
            target: TargetCount::Courses(3),
        };
        assert!(set.structure_error().is_none());
    }
}
