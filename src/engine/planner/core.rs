// ==========================================
// 学位课程规划引擎 - 贪心多学期调度器
// ==========================================
// 状态机: Init -> Scheduling -> Complete | Infeasible
// 复杂度: O(学期数 x 剩余课程数), 完全确定性 —
//         挂科重规划必须可复现、可解释, 且问题近似全序
//         (多数课程先修不超过 2 门且链条浅), 不需要约束求解器
// ==========================================

use super::ranking::{rank_candidates, CourseCategory};
use crate::api::error::{PlanningError, PlanningResult};
use crate::catalog::{normalize_code, CourseCatalog};
use crate::config::PlannerConfig;
use crate::domain::plan::{CustomizationNote, Plan, Semester};
use crate::domain::profile::StudentProfile;
use crate::domain::requirement::RequirementSet;
use crate::domain::types::{GroupKind, PlannerPhase, Term};
use crate::engine::timeline::TimelineEstimator;
use crate::engine::validator::{SelectionValidator, ValidationViolation};
use crate::graph::PrerequisiteGraph;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

const CREDIT_EPS: f64 = 1e-9;

// ==========================================
// ResolvedRequirements - Init 阶段解算结果
// ==========================================
struct ResolvedRequirements {
    remaining: BTreeSet<String>,
    categories: HashMap<String, CourseCategory>,
    elected: Vec<(String, Vec<String>)>,
    auto_included: Vec<String>,
}

// ==========================================
// SchedulePlanner - 调度规划器
// ==========================================
// 目录与依赖图为只读共享数据, 每次规划调用的中间状态
// 全部为调用私有, 可在多线程上并发规划而无需加锁
#[derive(Clone)]
pub struct SchedulePlanner {
    catalog: Arc<CourseCatalog>,
    graph: Arc<PrerequisiteGraph>,
    config: PlannerConfig,
}

impl SchedulePlanner {
    pub fn new(
        catalog: Arc<CourseCatalog>,
        graph: Arc<PrerequisiteGraph>,
        config: PlannerConfig,
    ) -> Self {
        Self {
            catalog,
            graph,
            config,
        }
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// 生成规划方案
    ///
    /// # 参数
    /// - profile: 学生档案 (只读)
    /// - requirements: 毕业要求集
    ///
    /// # 错误
    /// - UnknownCourseCode: 已修课程或要求成员不在目录中
    /// - RequirementUnsatisfiable: 选修组候选不足
    /// - NoFeasibleTermOffering: 剩余课程无可行落位
    /// - InternalConsistency: 生成方案未通过事后自检 (引擎缺陷)
    pub fn build_plan(
        &self,
        profile: &StudentProfile,
        requirements: &RequirementSet,
    ) -> PlanningResult<Plan> {
        // ==========================================
        // 阶段 1: Init - 规范化与剩余课程解算
        // ==========================================
        debug!(phase = %PlannerPhase::Init, track = %requirements.track_id, "规划开始");

        if let Some(reason) = requirements.structure_error() {
            return Err(PlanningError::MalformedCatalog(reason));
        }

        let completed = self.normalize_completed(profile)?;
        let resolved = self.resolve_requirements(&completed, requirements)?;

        info!(
            track = %requirements.track_id,
            completed = completed.len(),
            remaining = resolved.remaining.len(),
            "剩余课程解算完成"
        );

        // 档案快照: 已修课程统一为规范代码
        let mut profile_snapshot = profile.clone();
        profile_snapshot.completed_courses = completed.clone();

        // ==========================================
        // 阶段 2: Scheduling - 逐学期贪心落位
        // ==========================================
        debug!(phase = %PlannerPhase::Scheduling, "进入调度循环");
        let semesters =
            self.run_scheduling(&completed, &resolved, profile, requirements)?;

        // ==========================================
        // 阶段 3: Complete - 事后自检
        // ==========================================
        // 自检失败说明规划器或图构建有缺陷, 必须上抛, 不得吞掉
        self.verify_ordering(&completed, &semesters)?;
        self.verify_requirements(&completed, &semesters, requirements)?;
        debug!(phase = %PlannerPhase::Complete, semesters = semesters.len(), "调度完成");

        // ==========================================
        // 阶段 4: 时间线估计与方案组装
        // ==========================================
        let estimator = TimelineEstimator::new(&self.config);
        let assessment = estimator.assess(&self.catalog, profile, &semesters);

        let mut notes = Vec::new();
        if !completed.is_empty() {
            notes.push(CustomizationNote::CompletedCoursesApplied {
                count: completed.len(),
            });
        }
        if profile.allow_summer {
            notes.push(CustomizationNote::SummerTermsEnabled);
        }
        notes.push(CustomizationNote::CreditLoadApplied {
            policy: profile.credit_load,
        });
        for (group_id, courses) in &resolved.elected {
            notes.push(CustomizationNote::ElectedChoice {
                group_id: group_id.clone(),
                courses: courses.clone(),
            });
        }
        for course in &resolved.auto_included {
            notes.push(CustomizationNote::PrerequisiteAutoIncluded {
                course: course.clone(),
            });
        }

        Ok(Plan {
            track_id: requirements.track_id.clone(),
            profile: profile_snapshot,
            semesters,
            graduation_term: assessment.graduation_term,
            graduation_date: assessment.graduation_date,
            success_probability: assessment.success_probability,
            warnings: assessment.warnings,
            customization_notes: notes,
        })
    }

    /// 已修课程规范化, 未知代码立即上报
    fn normalize_completed(
        &self,
        profile: &StudentProfile,
    ) -> PlanningResult<BTreeSet<String>> {
        let mut completed = BTreeSet::new();
        for raw in &profile.completed_courses {
            let code = normalize_code(raw);
            if !self.catalog.contains(&code) {
                return Err(PlanningError::UnknownCourseCode { code });
            }
            completed.insert(code);
        }
        Ok(completed)
    }

    /// Init 阶段: 解算 remaining 集合
    ///
    /// 消耗规则与校验器一致: 按组声明顺序认领, 一门课至多满足一组;
    /// ChooseN 当选顺序: 已修成员优先, 其余按规范代码序,
    /// 互斥子组内至多当选一门。
    /// 任何选修组凑不满 required_count 即判定不可行。
    fn resolve_requirements(
        &self,
        completed: &BTreeSet<String>,
        requirements: &RequirementSet,
    ) -> PlanningResult<ResolvedRequirements> {
        for code in requirements.all_courses() {
            if !self.catalog.contains(&code) {
                return Err(PlanningError::UnknownCourseCode { code });
            }
        }

        let mut consumed: BTreeSet<String> = BTreeSet::new();
        let mut remaining: BTreeSet<String> = BTreeSet::new();
        let mut categories: HashMap<String, CourseCategory> = HashMap::new();
        let mut elected: Vec<(String, Vec<String>)> = Vec::new();

        for group in &requirements.groups {
            match group.kind {
                GroupKind::Compulsory => {
                    for course in group.direct_courses() {
                        if consumed.contains(course) {
                            continue; // 前序组已认领
                        }
                        consumed.insert(course.to_string());
                        if !completed.contains(course) {
                            remaining.insert(course.to_string());
                            categories
                                .insert(course.to_string(), CourseCategory::Compulsory);
                        }
                    }
                }
                GroupKind::ChooseN | GroupKind::ExclusiveSubgroup => {
                    let picked = self.elect_members(group, completed, &consumed);
                    if picked.len() < group.required_count {
                        return Err(PlanningError::RequirementUnsatisfiable {
                            group_id: group.group_id.clone(),
                            available: picked.len(),
                            required: group.required_count,
                        });
                    }
                    for course in &picked {
                        consumed.insert(course.clone());
                        if !completed.contains(course) {
                            remaining.insert(course.clone());
                            categories
                                .insert(course.clone(), CourseCategory::ChooseMember);
                        }
                    }
                    elected.push((group.group_id.clone(), picked));
                }
            }
        }

        // 先修闭包: 剩余课程的未修先修即使不在要求集内也必须补上
        let mut auto_included: Vec<String> = Vec::new();
        let mut queue: Vec<String> = remaining.iter().cloned().collect();
        while let Some(code) = queue.pop() {
            for prereq in self.graph.prereqs_of(&code) {
                if completed.contains(prereq) || remaining.contains(prereq) {
                    continue;
                }
                remaining.insert(prereq.to_string());
                categories
                    .entry(prereq.to_string())
                    .or_insert(CourseCategory::Elective);
                auto_included.push(prereq.to_string());
                queue.push(prereq.to_string());
            }
        }
        auto_included.sort();

        // 基础链标志优先于组类别
        for code in &remaining {
            if let Some(course) = self.catalog.lookup(code) {
                if course.is_foundation {
                    categories.insert(code.clone(), CourseCategory::Foundation);
                }
            }
        }

        Ok(ResolvedRequirements {
            remaining,
            categories,
            elected,
            auto_included,
        })
    }

    /// ChooseN 组当选成员: 已修优先, 规范序补齐, 互斥子组封顶
    fn elect_members(
        &self,
        group: &crate::domain::requirement::RequirementGroup,
        completed: &BTreeSet<String>,
        consumed: &BTreeSet<String>,
    ) -> Vec<String> {
        let n = group.required_count;
        let candidates = group.all_courses();
        let mut subgroup_used: BTreeMap<String, usize> = BTreeMap::new();
        let mut picked: Vec<String> = Vec::new();

        let try_pick = |course: &String,
                            picked: &mut Vec<String>,
                            subgroup_used: &mut BTreeMap<String, usize>|
         -> bool {
            if picked.len() == n || picked.contains(course) || consumed.contains(course) {
                return false;
            }
            if let Some(sub) = group
                .subgroups()
                .find(|sub| sub.all_courses().contains(course))
            {
                let used = subgroup_used.entry(sub.group_id.clone()).or_insert(0);
                if *used >= sub.required_count {
                    return false;
                }
                *used += 1;
            }
            picked.push(course.clone());
            true
        };

        // 第一轮: 已修成员
        for course in candidates.iter().filter(|c| completed.contains(*c)) {
            try_pick(course, &mut picked, &mut subgroup_used);
        }
        // 第二轮: 未修成员, 规范代码序
        for course in candidates.iter().filter(|c| !completed.contains(*c)) {
            try_pick(course, &mut picked, &mut subgroup_used);
        }

        picked
    }

    /// Scheduling 阶段: 逐学期贪心落位
    fn run_scheduling(
        &self,
        completed: &BTreeSet<String>,
        resolved: &ResolvedRequirements,
        profile: &StudentProfile,
        requirements: &RequirementSet,
    ) -> PlanningResult<Vec<Semester>> {
        let mut remaining = resolved.remaining.clone();
        let mut available = completed.clone();
        let mut semesters: Vec<Semester> = Vec::new();
        let mut slot = profile.current_term;

        // 一个完整开课周期内零落位才判定不可行,
        // 单个空学期 (如无开课的夏季) 不是不可行
        let cycle_len = if profile.allow_summer { 3 } else { 2 };
        // 安全阀: 正常终止论证下不可达, 超出即引擎缺陷
        // (自动补入的先修课程可能超出要求集的总量目标, 取两者较大值;
        //  每次落位之间最多间隔 cycle_len-1 个合法空学期, 故乘以周期长度)
        let budget = self.config.iteration_budget_factor
            * cycle_len
            * requirements
                .target
                .units()
                .max(resolved.remaining.len())
                .max(1);
        let mut zero_streak = 0usize;
        let mut iterations = 0usize;

        while !remaining.is_empty() {
            iterations += 1;
            if iterations > budget {
                error!(iterations, budget, "调度迭代超出安全阀");
                return Err(PlanningError::InternalConsistency(format!(
                    "调度迭代超出预算: {} > {}",
                    iterations, budget
                )));
            }

            let band = self.config.credit_loads.band(profile.credit_load, slot.term);
            let ready = self.graph.ready_set(&available, &remaining);
            let offered: Vec<String> = ready
                .into_iter()
                .filter(|code| {
                    self.catalog
                        .lookup(code)
                        .map(|c| c.offered_in(slot.term))
                        .unwrap_or(false)
                })
                .collect();

            let ranked = rank_candidates(
                offered,
                &self.graph,
                &self.catalog,
                &remaining,
                &resolved.categories,
            );

            // 贪心填充至学分上限; 放不下的候选跳过, 继续尝试更小的课
            let mut placed: Vec<String> = Vec::new();
            let mut total = 0.0;
            for code in ranked {
                let credits = match self.catalog.lookup(&code) {
                    Some(course) => course.credits,
                    None => continue,
                };
                if total + credits <= band.max + CREDIT_EPS {
                    total += credits;
                    placed.push(code);
                }
            }

            if placed.is_empty() {
                zero_streak += 1;
                debug!(slot = %slot, zero_streak, "本学期无可落位课程");
                if zero_streak >= cycle_len {
                    let blocking = self.blocking_courses(&available, &remaining, profile);
                    debug!(phase = %PlannerPhase::Infeasible, ?blocking, "判定不可行");
                    return Err(PlanningError::NoFeasibleTermOffering { blocking });
                }
            } else {
                zero_streak = 0;
                for code in &placed {
                    remaining.remove(code);
                    available.insert(code.clone());
                }
                debug!(slot = %slot, courses = placed.len(), credits = total, "学期落位完成");
                semesters.push(Semester {
                    slot,
                    courses: placed,
                    total_credits: total,
                });
            }

            slot = slot.next(profile.allow_summer);
        }

        Ok(semesters)
    }

    /// 不可行时定位阻塞课程: 就绪但在任何允许学期都无法落位的课程
    fn blocking_courses(
        &self,
        available: &BTreeSet<String>,
        remaining: &BTreeSet<String>,
        profile: &StudentProfile,
    ) -> Vec<String> {
        let allowed: Vec<Term> = if profile.allow_summer {
            vec![Term::Spring, Term::Summer, Term::Fall]
        } else {
            vec![Term::Spring, Term::Fall]
        };
        let max_cap = allowed
            .iter()
            .map(|t| self.config.credit_loads.band(profile.credit_load, *t).max)
            .fold(0.0_f64, f64::max);

        let ready = self.graph.ready_set(available, remaining);
        let mut blocking: Vec<String> = ready
            .iter()
            .filter(|code| match self.catalog.lookup(code) {
                Some(course) => {
                    !allowed.iter().any(|t| course.offered_in(*t))
                        || course.credits > max_cap + CREDIT_EPS
                }
                None => true,
            })
            .cloned()
            .collect();
        if blocking.is_empty() {
            blocking = ready;
        }
        if blocking.is_empty() {
            blocking = remaining.iter().cloned().collect();
        }
        blocking
    }

    /// 事后自检 1: 排序不变量 — 每门课的先修全部落在更早学期或已修集合
    fn verify_ordering(
        &self,
        completed: &BTreeSet<String>,
        semesters: &[Semester],
    ) -> PlanningResult<()> {
        let mut available = completed.clone();
        for semester in semesters {
            for course in &semester.courses {
                if !self.graph.is_satisfied(course, &available) {
                    error!(course = %course, slot = %semester.slot, "生成方案违反先修顺序");
                    return Err(PlanningError::InternalConsistency(format!(
                        "先修未满足: {} @ {}",
                        course, semester.slot
                    )));
                }
            }
            for course in &semester.courses {
                available.insert(course.clone());
            }
        }
        Ok(())
    }

    /// 事后自检 2: 方案课程全集必须通过要求校验 (含不重复计数)
    ///
    /// 只把涉及本次排课的违规当作引擎缺陷;
    /// 纯由历史已修课程引起的违规 (如已修了互斥子组内的两门课)
    /// 是输入状况, 记告警后放行
    fn verify_requirements(
        &self,
        completed: &BTreeSet<String>,
        semesters: &[Semester],
        requirements: &RequirementSet,
    ) -> PlanningResult<()> {
        let scheduled: BTreeSet<String> = semesters
            .iter()
            .flat_map(|s| s.courses.iter().cloned())
            .collect();
        let mut selection = completed.clone();
        selection.extend(scheduled.iter().cloned());

        let result = SelectionValidator::new().validate(requirements, &selection);
        let planner_faults: Vec<&ValidationViolation> = result
            .errors
            .iter()
            .filter(|v| is_planner_fault(v, &scheduled))
            .collect();
        if !planner_faults.is_empty() {
            error!(errors = ?planner_faults, "生成方案未通过要求校验");
            return Err(PlanningError::InternalConsistency(format!(
                "方案要求校验失败: {:?}",
                planner_faults
            )));
        }
        if !result.errors.is_empty() {
            warn!(errors = ?result.errors, "已修课程历史存在要求违规, 不影响本次排课");
        }
        Ok(())
    }
}

/// 违规是否指向规划器缺陷 (而非历史输入状况)
fn is_planner_fault(violation: &ValidationViolation, scheduled: &BTreeSet<String>) -> bool {
    match violation {
        // 方案不完整一律是引擎问题
        ValidationViolation::MissingCompulsory { .. }
        | ValidationViolation::GroupUnderfilled { .. }
        | ValidationViolation::UnknownCourse { .. } => true,
        // 互斥/重复计数违规仅在涉及本次排课时归咎于引擎
        ValidationViolation::ExclusiveSubgroupViolation { selected, .. } => {
            selected.iter().any(|c| scheduled.contains(c))
        }
        ValidationViolation::DoubleCounted { course, .. } => scheduled.contains(course),
        ValidationViolation::GroupOverfilled { .. } => false,
    }
}
