// ==========================================
// 学位课程规划引擎 - 核心库
// ==========================================
// 技术栈: Rust + SQLite
// 系统定位: 毕业规划决策支持引擎 (前端负责全部自然语言呈现)
// 并发模型: 目录/依赖图启动时构建一次后只读,
//           任意多个规划请求可并发执行而无需加锁
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 课程目录 - 主数据与代码规范化
pub mod catalog;

// 先修依赖图
pub mod graph;

// 引擎层 - 业务规则
pub mod engine;

// 配置层 - 负荷策略与调参
pub mod config;

// 导入层 - 外部数据文件
pub mod importer;

// 数据仓储层 - SQLite 目录存储
pub mod repository;

// 数据库基础设施（连接初始化/PRAGMA 统一）
pub mod db;

// 日志系统
pub mod logging;

// API 层 - 对外四个调用
pub mod api;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{
    CreditLoadPolicy, GraduationGoal, GroupKind, PlannerPhase, Term, TermSlot,
};

// 领域实体
pub use domain::{
    Course, CustomizationNote, FailureEvent, GroupMember, Plan, PlanWarning,
    RequirementGroup, RequirementSet, Semester, StudentProfile, TargetCount,
};

// 目录与依赖图
pub use catalog::{normalize_code, CourseCatalog};
pub use graph::PrerequisiteGraph;

// 引擎
pub use engine::{
    FailureRecoveryReplanner, SchedulePlanner, SelectionValidator, TimelineEstimator,
    ValidationResult, ValidationViolation,
};

// 配置
pub use config::{CreditLoadTable, PlannerConfig};

// API
pub use api::{PlanningApi, PlanningError, PlanningResult};

// 仓储
pub use repository::CatalogStore;

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "学位课程规划引擎";
