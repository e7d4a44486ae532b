// ==========================================
// 学位课程规划引擎 - 时间线估计引擎
// ==========================================
// 职责: 预计毕业日期 + 成功概率 + 阈值告警标签
// 概率是文档化的确定性加权启发值, 不是统计/ML 模型,
// 调用方不得当作校准过的预测使用
// ==========================================

use crate::catalog::CourseCatalog;
use crate::config::{CreditLoadTable, EstimatorConfig, PlannerConfig};
use crate::domain::plan::{PlanWarning, Semester};
use crate::domain::profile::StudentProfile;
use crate::domain::types::{GraduationGoal, Term, TermSlot};
use chrono::NaiveDate;

/// 学期结束日期映射: Fall -> 12-20, Spring -> 05-15, Summer -> 08-05
pub fn term_end_date(slot: TermSlot) -> NaiveDate {
    let (month, day) = match slot.term {
        Term::Spring => (5, 15),
        Term::Summer => (8, 5),
        Term::Fall => (12, 20),
    };
    NaiveDate::from_ymd_opt(slot.year, month, day).unwrap_or(NaiveDate::MAX)
}

// ==========================================
// TimelineAssessment - 估计结果
// ==========================================
#[derive(Debug, Clone)]
pub struct TimelineAssessment {
    pub graduation_term: TermSlot,
    pub graduation_date: NaiveDate,
    pub success_probability: f64,
    pub warnings: Vec<PlanWarning>,
}

// ==========================================
// TimelineEstimator - 时间线估计引擎
// ==========================================
pub struct TimelineEstimator {
    config: EstimatorConfig,
    credit_loads: CreditLoadTable,
}

impl TimelineEstimator {
    pub fn new(config: &PlannerConfig) -> Self {
        Self {
            config: config.estimator.clone(),
            credit_loads: config.credit_loads.clone(),
        }
    }

    /// 评估学期序列
    ///
    /// 概率: 从 1.0 起, 每门待修课程按
    /// base_penalty x difficulty_weight x 负荷激进系数 扣减,
    /// 负荷激进系数 = 策略常规上限 / 标准策略常规上限,
    /// 最终钳位到 [min_probability, max_probability]
    pub fn assess(
        &self,
        catalog: &CourseCatalog,
        profile: &StudentProfile,
        semesters: &[Semester],
    ) -> TimelineAssessment {
        let graduation_term = semesters
            .last()
            .map(|s| s.slot)
            .unwrap_or(profile.current_term);
        let graduation_date = term_end_date(graduation_term);

        // ===== 成功概率 =====
        let standard_max = self.credit_loads.standard.regular.max;
        let policy_max = self.credit_loads.limits(profile.credit_load).regular.max;
        let load_factor = if standard_max > 0.0 {
            policy_max / standard_max
        } else {
            1.0
        };

        let mut probability = 1.0;
        for semester in semesters {
            for course in &semester.courses {
                let difficulty = catalog
                    .lookup(course)
                    .map(|c| c.difficulty_weight)
                    .unwrap_or(3.0);
                probability -= self.config.base_penalty * difficulty * load_factor;
            }
        }
        let probability = probability
            .clamp(self.config.min_probability, self.config.max_probability);

        // ===== 告警标签 =====
        let mut warnings = Vec::new();
        let regular: Vec<&Semester> = semesters
            .iter()
            .filter(|s| s.slot.term.is_regular())
            .collect();

        if !regular.is_empty() {
            let avg = regular.iter().map(|s| s.total_credits).sum::<f64>()
                / regular.len() as f64;
            if avg > self.config.over_aggressive_avg_credits {
                warnings.push(PlanWarning::OverAggressiveCreditLoad { avg_credits: avg });
            }

            let band = self
                .credit_loads
                .band(profile.credit_load, Term::Fall);
            // 末学期学分偏低属正常收尾, 不告警
            for semester in regular.iter().take(regular.len().saturating_sub(1)) {
                if semester.total_credits < band.min {
                    warnings.push(PlanWarning::UnderMinimumCreditLoad {
                        slot: semester.slot,
                        credits: semester.total_credits,
                        min: band.min,
                    });
                }
            }

            if regular
                .iter()
                .all(|s| band.max - s.total_credits < self.config.slack_credits)
            {
                warnings.push(PlanWarning::NoSlackForFailure);
            }
        }

        if profile.graduation_goal == GraduationGoal::Accelerated
            && semesters.len() > self.config.accelerated_semester_limit
        {
            warnings.push(PlanWarning::AcceleratedGoalAtRisk {
                semesters: semesters.len(),
            });
        }

        TimelineAssessment {
            graduation_term,
            graduation_date,
            success_probability: probability,
            warnings,
        }
    }
}
