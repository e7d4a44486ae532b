// ==========================================
// 学位课程规划引擎 - API层错误类型
// ==========================================
// 职责: 定义规划错误全集, 按错误类别划分处置方式
// 传播策略: 四个对外调用一律返回类型化结果,
//           不抛越过调用方的环境异常
// ==========================================

use crate::repository::error::StoreError;
use thiserror::Error;

/// 规划错误类型
///
/// 类别划分:
/// - 加载期致命: CycleDetected / MalformedCatalog, 必须中止启动
/// - 规划不可行: RequirementUnsatisfiable / NoFeasibleTermOffering,
///   调用方可放宽约束后重试 (如允许夏季学期)
/// - 输入校验: UnknownCourseCode / InvalidFailureEvent, 可定位到具体输入
/// - 内部一致性: InternalConsistency, 属引擎缺陷, 记日志后上抛, 不得吞掉
#[derive(Error, Debug)]
pub enum PlanningError {
    // ==========================================
    // 加载期致命错误
    // ==========================================
    /// 先修关系成环 (path 首尾为同一课程)
    #[error("先修关系成环: {}", path.join(" -> "))]
    CycleDetected { path: Vec<String> },

    #[error("课程目录数据损坏: {0}")]
    MalformedCatalog(String),

    // ==========================================
    // 规划不可行 (调用方可恢复)
    // ==========================================
    /// 选修组候选不足, 无法凑满 required_count
    #[error("要求组无法满足: group={group_id}, 可用候选={available}, 需要={required}")]
    RequirementUnsatisfiable {
        group_id: String,
        available: usize,
        required: usize,
    },

    /// 剩余课程在允许的学期内无任何可行落位
    #[error("无可行开课学期: {}", blocking.join(", "))]
    NoFeasibleTermOffering { blocking: Vec<String> },

    // ==========================================
    // 输入校验错误
    // ==========================================
    #[error("未知课程代码: {code}")]
    UnknownCourseCode { code: String },

    /// 挂科事件与方案不符 (课程未排在所述学期)
    #[error("无效挂科事件: course={course}, term={term}")]
    InvalidFailureEvent { course: String, term: String },

    // ==========================================
    // 内部一致性错误
    // ==========================================
    /// 规划器或图构建存在缺陷 (如生成方案未通过事后校验)
    #[error("内部一致性错误: {0}")]
    InternalConsistency(String),

    // ==========================================
    // 通用错误
    // ==========================================
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl PlanningError {
    /// 是否为调用方可恢复的"规划不可行"类错误
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            PlanningError::RequirementUnsatisfiable { .. }
                | PlanningError::NoFeasibleTermOffering { .. }
        )
    }

    /// 是否为加载期致命错误
    pub fn is_load_fatal(&self) -> bool {
        matches!(
            self,
            PlanningError::CycleDetected { .. } | PlanningError::MalformedCatalog(_)
        )
    }
}

// ==========================================
// 从 StoreError 转换
// 目的: 仓储层技术错误统一归入目录数据问题
// ==========================================
impl From<StoreError> for PlanningError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { entity, id } => {
                PlanningError::MalformedCatalog(format!("{}(id={})不存在", entity, id))
            }
            StoreError::FieldValueError { field, message } => {
                PlanningError::MalformedCatalog(format!("字段{}错误: {}", field, message))
            }
            StoreError::DatabaseQueryError(msg) => PlanningError::MalformedCatalog(msg),
            StoreError::LockError(msg) => {
                PlanningError::InternalConsistency(format!("存储锁获取失败: {}", msg))
            }
            StoreError::Other(err) => PlanningError::Other(err),
        }
    }
}

/// Result 类型别名
pub type PlanningResult<T> = Result<T, PlanningError>;
