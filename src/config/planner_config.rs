// ==========================================
// 学位课程规划引擎 - 规划器配置
// ==========================================
// 职责: 调度与概率估计的可调参数
// 加载: 平台配置目录下 degree-planner/config.json,
//       缺失时使用默认值; 解析失败记告警后回退默认值
// ==========================================

use crate::config::credit_policy::CreditLoadTable;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::warn;

// ==========================================
// EstimatorConfig - 时间线估计参数
// ==========================================
// 概率公式是文档化的确定性启发式, 不是统计模型,
// 调用方不得把结果当作校准过的预测值
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EstimatorConfig {
    /// 每门剩余课程的基准扣减
    pub base_penalty: f64,
    /// 概率下限
    pub min_probability: f64,
    /// 概率上限
    pub max_probability: f64,
    /// 平均学分超过此值视为过激负荷
    pub over_aggressive_avg_credits: f64,
    /// 学期剩余容量低于此学分数视为无挂科缓冲
    pub slack_credits: f64,
    /// GPA 低于此值时重修风险告警
    pub low_gpa_threshold: f64,
    /// 提前毕业目标允许的最大学期数
    pub accelerated_semester_limit: usize,
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            base_penalty: 0.012,
            min_probability: 0.05,
            max_probability: 0.98,
            over_aggressive_avg_credits: 18.0,
            slack_credits: 3.0,
            low_gpa_threshold: 2.5,
            accelerated_semester_limit: 6,
        }
    }
}

// ==========================================
// PlannerConfig - 规划器配置
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlannerConfig {
    pub credit_loads: CreditLoadTable,
    /// 调度循环迭代预算 = 因子 x 总量目标 (安全阀, 正常不可达)
    pub iteration_budget_factor: usize,
    pub estimator: EstimatorConfig,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            credit_loads: CreditLoadTable::default(),
            iteration_budget_factor: 2,
            estimator: EstimatorConfig::default(),
        }
    }
}

impl PlannerConfig {
    /// 默认配置文件路径: <平台配置目录>/degree-planner/config.json
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("degree-planner").join("config.json"))
    }

    /// 从指定路径加载配置
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let config: PlannerConfig = serde_json::from_str(&raw)?;
        Ok(config)
    }

    /// 加载配置, 失败时回退默认值
    ///
    /// 文件缺失属正常情况; 文件存在但解析失败记告警
    pub fn load_or_default() -> Self {
        let Some(path) = Self::default_config_path() else {
            return Self::default();
        };
        if !path.exists() {
            return Self::default();
        }
        match Self::load_from(&path) {
            Ok(config) => config,
            Err(err) => {
                warn!(path = %path.display(), error = %err, "配置文件解析失败, 使用默认配置");
                Self::default()
            }
        }
    }
}
