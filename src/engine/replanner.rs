// ==========================================
// 学位课程规划引擎 - 挂科恢复重规划器
// ==========================================
// 职责: 在既有方案上应用挂科事件, 产生全新方案
// 规则: 截至挂科学期 (含) 的历史保持不动;
//       挂科课程回到待修集合, 从下一学期起重新调度,
//       因此重修最早落在挂科后一学期
// 延期语义: 延期学期数由重调度结果自然导出,
//           不查任何预置延期表 — "挂科加一学期"或
//           "被既有缓冲吸收 (零延期)" 都是同一条路径的产物
// ==========================================

use crate::api::error::{PlanningError, PlanningResult};
use crate::catalog::normalize_code;
use crate::domain::plan::{CustomizationNote, Plan, PlanWarning, Semester};
use crate::domain::profile::FailureEvent;
use crate::domain::requirement::RequirementSet;
use crate::engine::planner::SchedulePlanner;
use crate::engine::timeline::term_end_date;
use tracing::info;

// ==========================================
// FailureRecoveryReplanner - 重规划器
// ==========================================
pub struct FailureRecoveryReplanner {
    planner: SchedulePlanner,
}

impl FailureRecoveryReplanner {
    pub fn new(planner: SchedulePlanner) -> Self {
        Self { planner }
    }

    /// 应用挂科事件, 返回全新方案; 原方案不被修改
    ///
    /// # 错误
    /// - InvalidFailureEvent: 事件所述课程并未排在所述学期
    ///   (对"实际上通过了的课程"发起重规划属未定义输入, 一律拒绝)
    /// - 其余错误与 build_plan 相同, 作用于挂科后的剩余部分
    pub fn replan(
        &self,
        plan: &Plan,
        event: &FailureEvent,
        requirements: &RequirementSet,
    ) -> PlanningResult<Plan> {
        let course = normalize_code(&event.course);

        let scheduled_there = plan
            .semesters
            .iter()
            .find(|s| s.slot == event.term_failed)
            .map(|s| s.contains(&course))
            .unwrap_or(false);
        if !scheduled_there {
            return Err(PlanningError::InvalidFailureEvent {
                course,
                term: event.term_failed.to_string(),
            });
        }

        // 历史前缀固定: 挂科学期及之前照原样保留
        let prefix: Vec<Semester> = plan
            .semesters
            .iter()
            .filter(|s| s.slot <= event.term_failed)
            .cloned()
            .collect();

        // 挂科后视角的已修集合: 原已修 + 前缀课程 - 挂科课程
        let mut completed = plan.profile.completed_courses.clone();
        for semester in &prefix {
            for code in &semester.courses {
                completed.insert(code.clone());
            }
        }
        completed.remove(&course);

        let mut replan_profile = plan.profile.clone();
        replan_profile.completed_courses = completed;
        replan_profile.current_term = event.term_failed.next(plan.profile.allow_summer);

        info!(
            course = %course,
            term_failed = %event.term_failed,
            resume_from = %replan_profile.current_term,
            "挂科重规划开始"
        );

        let suffix = self.planner.build_plan(&replan_profile, requirements)?;

        // 合并: 固定前缀 + 重调度后缀
        let mut semesters = prefix;
        semesters.extend(suffix.semesters);
        let graduation_term = semesters
            .last()
            .map(|s| s.slot)
            .unwrap_or(plan.profile.current_term);

        let mut warnings = suffix.warnings;
        let estimator_config = &self.planner.config().estimator;
        if let Some(gpa) = plan.profile.gpa {
            if gpa < estimator_config.low_gpa_threshold {
                warnings.push(PlanWarning::LowGpaRetakeRisk { gpa });
            }
        }
        if event.attempt_number > 1 {
            warnings.push(PlanWarning::RepeatedAttempt {
                course: course.clone(),
                attempt_number: event.attempt_number,
            });
        }

        let mut notes = suffix.customization_notes;
        notes.push(CustomizationNote::ReplannedAfterFailure {
            course,
            term: event.term_failed,
            attempt_number: event.attempt_number,
        });

        Ok(Plan {
            track_id: requirements.track_id.clone(),
            profile: plan.profile.clone(),
            semesters,
            graduation_term,
            graduation_date: term_end_date(graduation_term),
            success_probability: suffix.success_probability,
            warnings,
            customization_notes: notes,
        })
    }
}
