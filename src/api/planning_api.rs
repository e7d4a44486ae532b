// ==========================================
// 学位课程规划引擎 - 规划 API 门面
// ==========================================
// 对外四个调用, 输入输出均为可序列化的普通记录:
// - generate_plan     生成规划方案
// - validate_selection 校验任意选课集合 (永不失败)
// - replan            应用挂科事件重规划
// - normalize_code    课程代码规范化 (全函数)
// 共享状态仅有只读的目录与依赖图, 可跨线程并发调用
// ==========================================

use crate::api::error::PlanningResult;
use crate::catalog::{normalize_code, CourseCatalog};
use crate::config::PlannerConfig;
use crate::domain::plan::Plan;
use crate::domain::profile::{FailureEvent, StudentProfile};
use crate::domain::requirement::RequirementSet;
use crate::engine::planner::SchedulePlanner;
use crate::engine::replanner::FailureRecoveryReplanner;
use crate::engine::validator::{
    SelectionValidator, ValidationResult, ValidationViolation,
};
use crate::graph::PrerequisiteGraph;
use std::collections::BTreeSet;
use std::sync::Arc;

// ==========================================
// PlanningApi - 规划 API
// ==========================================
pub struct PlanningApi {
    catalog: Arc<CourseCatalog>,
    planner: SchedulePlanner,
    replanner: FailureRecoveryReplanner,
    validator: SelectionValidator,
}

impl PlanningApi {
    /// 创建 API 实例
    ///
    /// # 参数
    /// - catalog: 课程目录 (启动时构建一次)
    /// - graph: 先修依赖图 (启动时构建一次, 已通过环检测)
    /// - config: 规划器配置
    pub fn new(
        catalog: Arc<CourseCatalog>,
        graph: Arc<PrerequisiteGraph>,
        config: PlannerConfig,
    ) -> Self {
        let planner = SchedulePlanner::new(catalog.clone(), graph, config);
        let replanner = FailureRecoveryReplanner::new(planner.clone());
        Self {
            catalog,
            planner,
            replanner,
            validator: SelectionValidator::new(),
        }
    }

    /// 生成规划方案
    pub fn generate_plan(
        &self,
        profile: &StudentProfile,
        requirements: &RequirementSet,
    ) -> PlanningResult<Plan> {
        self.planner.build_plan(profile, requirements)
    }

    /// 校验任意选课集合
    ///
    /// 永不失败: 未知代码降级为结构化告警,
    /// 要求满足情况一律以结构化结果返回
    pub fn validate_selection(
        &self,
        courses: &[String],
        requirements: &RequirementSet,
    ) -> ValidationResult {
        let mut selection: BTreeSet<String> = BTreeSet::new();
        let mut unknown: Vec<ValidationViolation> = Vec::new();
        for raw in courses {
            let code = normalize_code(raw);
            if !self.catalog.contains(&code) {
                unknown.push(ValidationViolation::UnknownCourse {
                    course: code.clone(),
                });
            }
            selection.insert(code);
        }

        let mut result = self.validator.validate(requirements, &selection);
        result.warnings.extend(unknown);
        result
    }

    /// 应用挂科事件重规划, 返回全新方案
    pub fn replan(
        &self,
        plan: &Plan,
        event: &FailureEvent,
        requirements: &RequirementSet,
    ) -> PlanningResult<Plan> {
        self.replanner.replan(plan, event, requirements)
    }

    /// 课程代码规范化 (全函数, 未知输入原样返回)
    pub fn normalize_code(&self, raw: &str) -> String {
        normalize_code(raw)
    }
}
