// ==========================================
// 学位课程规划引擎 - 引擎层
// ==========================================
// 职责: 实现规划业务规则
// 约定: 引擎不做 I/O, 全部为同步纯计算;
//       目录/依赖图等共享输入一律只读
// ==========================================

pub mod planner;
pub mod replanner;
pub mod timeline;
pub mod validator;

// 重导出核心引擎
pub use planner::{CourseCategory, SchedulePlanner};
pub use replanner::FailureRecoveryReplanner;
pub use timeline::{term_end_date, TimelineAssessment, TimelineEstimator};
pub use validator::{
    GroupConsumption, SelectionValidator, ValidationResult, ValidationViolation,
};
