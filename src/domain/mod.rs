// ==========================================
// 学位课程规划引擎 - 领域层
// ==========================================
// 职责: 实体与类型定义, 不含业务规则
// ==========================================

pub mod course;
pub mod plan;
pub mod profile;
pub mod requirement;
pub mod types;

pub use course::Course;
pub use plan::{CustomizationNote, Plan, PlanWarning, Semester};
pub use profile::{FailureEvent, StudentProfile};
pub use requirement::{GroupMember, RequirementGroup, RequirementSet, TargetCount};
pub use types::{
    CreditLoadPolicy, GraduationGoal, GroupKind, PlannerPhase, Term, TermSlot,
};
