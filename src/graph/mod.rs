// ==========================================
// 学位课程规划引擎 - 先修依赖图
// ==========================================
// 存储: 课程竞技场 + 稠密整数索引邻接表,
//       不用指针/引用互指, 避免引用环并便于序列化
// 语义: course -> {prereq, ...} 为 AND 关系, 全部满足才可修读
// 加载期校验: 三色 DFS 环检测, 有环视为数据错误, 拒绝加载
// ==========================================

use crate::api::error::{PlanningError, PlanningResult};
use crate::catalog::CourseCatalog;
use crate::catalog::normalize_code;
use std::collections::{BTreeSet, HashMap};
use tracing::debug;

// DFS 三色标记
#[derive(Clone, Copy, PartialEq)]
enum Color {
    White, // 未访问
    Gray,  // 访问中 (在当前 DFS 栈上)
    Black, // 已完成
}

// ==========================================
// PrerequisiteGraph - 先修依赖图
// ==========================================
// 构建一次, 之后只读; 稠密 id 按规范代码排序分配, 保证确定性
#[derive(Debug, Clone)]
pub struct PrerequisiteGraph {
    codes: Vec<String>,              // id -> 规范代码
    index: HashMap<String, usize>,   // 规范代码 -> id
    prereqs: Vec<Vec<usize>>,        // 正向邻接: 课程 -> 先修
    dependents: Vec<Vec<usize>>,     // 反向邻接: 课程 -> 后继
}

impl PrerequisiteGraph {
    /// 从课程目录与先修边数据构建图
    ///
    /// # 参数
    /// - catalog: 课程目录 (决定节点全集)
    /// - edges: (课程, 先修课程) 对, 代码可为旧式形态
    ///
    /// # 错误
    /// - MalformedCatalog: 边引用了目录中不存在的课程
    /// - CycleDetected: 先修关系成环 (加载期致命错误)
    pub fn build(
        catalog: &CourseCatalog,
        edges: &[(String, String)],
    ) -> PlanningResult<Self> {
        let codes: Vec<String> = catalog.codes().map(|c| c.to_string()).collect();
        let index: HashMap<String, usize> = codes
            .iter()
            .enumerate()
            .map(|(i, c)| (c.clone(), i))
            .collect();

        let mut prereqs: Vec<Vec<usize>> = vec![Vec::new(); codes.len()];
        let mut dependents: Vec<Vec<usize>> = vec![Vec::new(); codes.len()];

        for (course, prereq) in edges {
            let course = normalize_code(course);
            let prereq = normalize_code(prereq);
            let course_id = *index.get(&course).ok_or_else(|| {
                PlanningError::MalformedCatalog(format!(
                    "先修边引用未知课程: {}",
                    course
                ))
            })?;
            let prereq_id = *index.get(&prereq).ok_or_else(|| {
                PlanningError::MalformedCatalog(format!(
                    "先修边引用未知先修课程: {}",
                    prereq
                ))
            })?;
            if course_id == prereq_id {
                return Err(PlanningError::CycleDetected {
                    path: vec![course.clone(), course],
                });
            }
            if !prereqs[course_id].contains(&prereq_id) {
                prereqs[course_id].push(prereq_id);
                dependents[prereq_id].push(course_id);
            }
        }

        // 邻接表内部排序, 保证遍历顺序确定
        for list in prereqs.iter_mut().chain(dependents.iter_mut()) {
            list.sort_unstable();
        }

        let graph = Self {
            codes,
            index,
            prereqs,
            dependents,
        };

        if let Some(path) = graph.find_cycle() {
            return Err(PlanningError::CycleDetected { path });
        }

        debug!(
            nodes = graph.codes.len(),
            edges = graph.prereqs.iter().map(|p| p.len()).sum::<usize>(),
            "先修依赖图构建完成"
        );
        Ok(graph)
    }

    /// 指定课程的全部直接先修 (规范代码)
    pub fn prereqs_of(&self, code: &str) -> Vec<&str> {
        match self.index.get(code) {
            Some(&id) => self.prereqs[id]
                .iter()
                .map(|&p| self.codes[p].as_str())
                .collect(),
            None => Vec::new(),
        }
    }

    /// 判断课程先修是否全部满足 (AND 语义)
    ///
    /// 图中无记录的课程视为无先修
    pub fn is_satisfied(&self, code: &str, available: &BTreeSet<String>) -> bool {
        match self.index.get(code) {
            Some(&id) => self.prereqs[id]
                .iter()
                .all(|&p| available.contains(&self.codes[p])),
            None => true,
        }
    }

    /// 就绪集查询: remaining 中先修全部落入 available 的课程
    ///
    /// 规划器每个调度步调用一次, 返回规范序
    pub fn ready_set(
        &self,
        available: &BTreeSet<String>,
        remaining: &BTreeSet<String>,
    ) -> Vec<String> {
        remaining
            .iter()
            .filter(|code| self.is_satisfied(code, available))
            .cloned()
            .collect()
    }

    /// 课程在 remaining 子图内的出度 (有多少剩余课程以其为先修)
    ///
    /// 规划器排序的首要信号: 解锁越多后继的课程越先排
    pub fn dependents_within(&self, code: &str, remaining: &BTreeSet<String>) -> usize {
        match self.index.get(code) {
            Some(&id) => self.dependents[id]
                .iter()
                .filter(|&&d| remaining.contains(&self.codes[d]))
                .count(),
            None => 0,
        }
    }

    /// 课程的传递先修闭包 (不含自身)
    pub fn transitive_prereqs(&self, code: &str) -> BTreeSet<String> {
        let mut out = BTreeSet::new();
        let Some(&start) = self.index.get(code) else {
            return out;
        };
        let mut stack = self.prereqs[start].clone();
        while let Some(id) = stack.pop() {
            if out.insert(self.codes[id].clone()) {
                stack.extend_from_slice(&self.prereqs[id]);
            }
        }
        out
    }

    /// 三色 DFS 环检测, 返回首个发现的环路径
    fn find_cycle(&self) -> Option<Vec<String>> {
        let mut colors = vec![Color::White; self.codes.len()];
        let mut trail: Vec<usize> = Vec::new();

        for start in 0..self.codes.len() {
            if colors[start] == Color::White {
                if let Some(path) = self.dfs_visit(start, &mut colors, &mut trail) {
                    return Some(path);
                }
            }
        }
        None
    }

    fn dfs_visit(
        &self,
        node: usize,
        colors: &mut [Color],
        trail: &mut Vec<usize>,
    ) -> Option<Vec<String>> {
        colors[node] = Color::Gray;
        trail.push(node);

        for &next in &self.prereqs[node] {
            match colors[next] {
                Color::Gray => {
                    // 灰节点再次可达即成环, 截取 trail 中的环段
                    let cycle_start = trail.iter().position(|&n| n == next).unwrap_or(0);
                    let mut path: Vec<String> = trail[cycle_start..]
                        .iter()
                        .map(|&n| self.codes[n].clone())
                        .collect();
                    path.push(self.codes[next].clone());
                    return Some(path);
                }
                Color::White => {
                    if let Some(path) = self.dfs_visit(next, colors, trail) {
                        return Some(path);
                    }
                }
                Color::Black => {}
            }
        }

        trail.pop();
        colors[node] = Color::Black;
        None
    }
}
