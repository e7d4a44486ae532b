// ==========================================
// 学位课程规划引擎 - 选课校验引擎
// ==========================================
// 职责: 纯函数式校验任意选课集合是否满足要求集
// 规则: 必修齐全 + ChooseN 计数 + 互斥子组 + 不重复计数
// 消耗规则: 按组声明顺序逐组认领课程, 组内按规范代码序,
//           一门课程至多满足一个要求组
// 用途: 规划器事后自检 + 独立对外校验
// ==========================================

use crate::domain::requirement::RequirementSet;
use crate::domain::types::GroupKind;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

// ==========================================
// ValidationViolation - 校验违规详情
// ==========================================
// 结构化违规记录, 不含面向用户的文案
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ValidationViolation {
    /// 缺少必修课程 (每缺一门记一条)
    MissingCompulsory { group_id: String, course: String },

    /// 选修组可认领课程不足
    GroupUnderfilled {
        group_id: String,
        selected: usize,
        required: usize,
    },

    /// 选修组超选 (告警, 多选不致错)
    GroupOverfilled {
        group_id: String,
        selected: usize,
        required: usize,
    },

    /// 互斥子组内选了多门
    ExclusiveSubgroupViolation {
        group_id: String,
        subgroup_id: String,
        selected: Vec<String>,
    },

    /// 课程被两个要求组重复计数
    DoubleCounted {
        course: String,
        first_group: String,
        second_group: String,
    },

    /// 选课中出现目录未收录的代码 (告警, 由调用方决定处置)
    UnknownCourse { course: String },
}

// ==========================================
// GroupConsumption - 分组认领结果
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupConsumption {
    pub group_id: String,
    pub courses: Vec<String>,
}

// ==========================================
// ValidationResult - 校验结果
// ==========================================
// 本调用永不失败, 一律返回结构化结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub valid: bool,
    pub errors: Vec<ValidationViolation>,
    pub warnings: Vec<ValidationViolation>,
    pub consumed: Vec<GroupConsumption>,
}

impl ValidationResult {
    pub fn has_error(&self, pred: impl Fn(&ValidationViolation) -> bool) -> bool {
        self.errors.iter().any(pred)
    }
}

// ==========================================
// SelectionValidator - 选课校验引擎
// ==========================================
pub struct SelectionValidator {
    // 无状态引擎, 不需要注入依赖
}

impl Default for SelectionValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl SelectionValidator {
    pub fn new() -> Self {
        Self {}
    }

    /// 校验选课集合
    ///
    /// # 参数
    /// - requirements: 要求集
    /// - selection: 选课集合 (规范代码)
    ///
    /// # 返回
    /// 结构化校验结果, 纯函数, 无副作用
    pub fn validate(
        &self,
        requirements: &RequirementSet,
        selection: &BTreeSet<String>,
    ) -> ValidationResult {
        let mut errors = Vec::new();
        let mut warnings = Vec::new();
        let mut consumed_by: BTreeMap<String, String> = BTreeMap::new();
        let mut consumptions = Vec::new();

        for group in &requirements.groups {
            match group.kind {
                GroupKind::Compulsory => {
                    let mut claimed = Vec::new();
                    for course in group.direct_courses() {
                        if !selection.contains(course) {
                            errors.push(ValidationViolation::MissingCompulsory {
                                group_id: group.group_id.clone(),
                                course: course.to_string(),
                            });
                        } else if let Some(first) = consumed_by.get(course) {
                            errors.push(ValidationViolation::DoubleCounted {
                                course: course.to_string(),
                                first_group: first.clone(),
                                second_group: group.group_id.clone(),
                            });
                        } else {
                            consumed_by
                                .insert(course.to_string(), group.group_id.clone());
                            claimed.push(course.to_string());
                        }
                    }
                    consumptions.push(GroupConsumption {
                        group_id: group.group_id.clone(),
                        courses: claimed,
                    });
                }
                GroupKind::ChooseN | GroupKind::ExclusiveSubgroup => {
                    self.check_choose_group(
                        group,
                        selection,
                        &mut consumed_by,
                        &mut errors,
                        &mut warnings,
                        &mut consumptions,
                    );
                }
            }
        }

        ValidationResult {
            valid: errors.is_empty(),
            errors,
            warnings,
            consumed: consumptions,
        }
    }

    /// ChooseN 组校验: 计数 + 互斥子组 + 重复计数
    fn check_choose_group(
        &self,
        group: &crate::domain::requirement::RequirementGroup,
        selection: &BTreeSet<String>,
        consumed_by: &mut BTreeMap<String, String>,
        errors: &mut Vec<ValidationViolation>,
        warnings: &mut Vec<ValidationViolation>,
        consumptions: &mut Vec<GroupConsumption>,
    ) {
        let required = group.required_count;
        let candidates = group.all_courses();

        // 互斥子组: 子集内选了多门即违规 (无论课程是否被其他组认领)
        for sub in group.subgroups() {
            let picked: Vec<String> = sub
                .all_courses()
                .into_iter()
                .filter(|c| selection.contains(c))
                .collect();
            if picked.len() > 1 {
                errors.push(ValidationViolation::ExclusiveSubgroupViolation {
                    group_id: group.group_id.clone(),
                    subgroup_id: sub.group_id.clone(),
                    selected: picked,
                });
            }
        }

        // 选中的成员, 按是否已被前序组认领拆分
        let mut available: Vec<String> = Vec::new();
        let mut double_claimed: Vec<(String, String)> = Vec::new();
        for course in candidates.iter().filter(|c| selection.contains(*c)) {
            match consumed_by.get(course) {
                Some(first) => double_claimed.push((course.clone(), first.clone())),
                None => available.push(course.clone()),
            }
        }

        // 互斥子组内至多 1 门计入有效数
        let mut subgroup_used: BTreeMap<&str, usize> = BTreeMap::new();
        let mut effective: Vec<String> = Vec::new();
        for course in &available {
            let in_sub = group
                .subgroups()
                .find(|sub| sub.all_courses().contains(course));
            match in_sub {
                Some(sub) => {
                    let used = subgroup_used.entry(sub.group_id.as_str()).or_insert(0);
                    if *used < sub.required_count {
                        *used += 1;
                        effective.push(course.clone());
                    }
                }
                None => effective.push(course.clone()),
            }
        }

        if effective.len() < required {
            errors.push(ValidationViolation::GroupUnderfilled {
                group_id: group.group_id.clone(),
                selected: effective.len(),
                required,
            });
            // 差额可能正是被其他组认领走的课程: 显式报重复计数
            for (course, first) in &double_claimed {
                errors.push(ValidationViolation::DoubleCounted {
                    course: course.clone(),
                    first_group: first.clone(),
                    second_group: group.group_id.clone(),
                });
            }
        } else if available.len() > required {
            warnings.push(ValidationViolation::GroupOverfilled {
                group_id: group.group_id.clone(),
                selected: available.len(),
                required,
            });
        }

        // 认领前 required 门有效课程
        let claimed: Vec<String> =
            effective.into_iter().take(required).collect();
        for course in &claimed {
            consumed_by.insert(course.clone(), group.group_id.clone());
        }
        consumptions.push(GroupConsumption {
            group_id: group.group_id.clone(),
            courses: claimed,
        });
    }
}
