// ==========================================
// 学位课程规划引擎 - 候选课程排序
// ==========================================
// 排序键 (降优先级):
// 1) remaining 子图内出度降序 (解锁越多后继越先排)
// 2) 类别: 基础链 > 必修 > 选修组成员 > 自由补课
// 3) 学分降序 (大课先落位, 便于填满学分上限)
// 4) 规范代码升序 (确定性决胜)
// ==========================================

use crate::catalog::CourseCatalog;
use crate::graph::PrerequisiteGraph;
use std::cmp::Ordering;
use std::collections::{BTreeSet, HashMap};

// ==========================================
// CourseCategory - 课程类别
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CourseCategory {
    Foundation,   // 基础链课程
    Compulsory,   // 必修组成员
    ChooseMember, // 选修组当选成员
    Elective,     // 自由补课 (先修闭包自动纳入等)
}

impl CourseCategory {
    fn rank(&self) -> u8 {
        match self {
            CourseCategory::Foundation => 0,
            CourseCategory::Compulsory => 1,
            CourseCategory::ChooseMember => 2,
            CourseCategory::Elective => 3,
        }
    }
}

// 单个候选的排序键
struct RankKey {
    dependents: usize,
    category: u8,
    credits: f64,
}

/// 对就绪候选排序, 返回落位尝试顺序
pub(super) fn rank_candidates(
    candidates: Vec<String>,
    graph: &PrerequisiteGraph,
    catalog: &CourseCatalog,
    remaining: &BTreeSet<String>,
    categories: &HashMap<String, CourseCategory>,
) -> Vec<String> {
    // 预计算排序键, 避免比较函数内重复查询
    let mut keyed: Vec<(RankKey, String)> = candidates
        .into_iter()
        .map(|code| {
            let key = RankKey {
                dependents: graph.dependents_within(&code, remaining),
                category: categories
                    .get(&code)
                    .copied()
                    .unwrap_or(CourseCategory::Elective)
                    .rank(),
                credits: catalog.lookup(&code).map(|c| c.credits).unwrap_or(0.0),
            };
            (key, code)
        })
        .collect();

    keyed.sort_by(|(ka, code_a), (kb, code_b)| {
        match kb.dependents.cmp(&ka.dependents) {
            Ordering::Equal => {}
            other => return other,
        }
        match ka.category.cmp(&kb.category) {
            Ordering::Equal => {}
            other => return other,
        }
        match kb.credits.total_cmp(&ka.credits) {
            Ordering::Equal => {}
            other => return other,
        }
        code_a.cmp(code_b)
    });

    keyed.into_iter().map(|(_, code)| code).collect()
}
