// ==========================================
// 学位课程规划引擎 - 学分负荷配置
// ==========================================
// 三档负荷策略对应的每学期学分上下限,
// 常规学期与夏季学期分别配置
// ==========================================

use crate::domain::types::{CreditLoadPolicy, Term};
use serde::{Deserialize, Serialize};

// ==========================================
// CreditBand - 学分区间
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CreditBand {
    pub min: f64,
    pub max: f64,
}

// ==========================================
// PolicyLimits - 单策略的区间配置
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PolicyLimits {
    pub regular: CreditBand, // 秋/春学期
    pub summer: CreditBand,  // 夏季学期
}

// ==========================================
// CreditLoadTable - 负荷策略总表
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreditLoadTable {
    pub light: PolicyLimits,
    pub standard: PolicyLimits,
    pub heavy: PolicyLimits,
}

impl Default for CreditLoadTable {
    fn default() -> Self {
        // 上限 15/18/21 (夏季 6/9/12); 夏季为可选学期, 下限为 0
        Self {
            light: PolicyLimits {
                regular: CreditBand { min: 12.0, max: 15.0 },
                summer: CreditBand { min: 0.0, max: 6.0 },
            },
            standard: PolicyLimits {
                regular: CreditBand { min: 12.0, max: 18.0 },
                summer: CreditBand { min: 0.0, max: 9.0 },
            },
            heavy: PolicyLimits {
                regular: CreditBand { min: 15.0, max: 21.0 },
                summer: CreditBand { min: 0.0, max: 12.0 },
            },
        }
    }
}

impl CreditLoadTable {
    pub fn limits(&self, policy: CreditLoadPolicy) -> &PolicyLimits {
        match policy {
            CreditLoadPolicy::Light => &self.light,
            CreditLoadPolicy::Standard => &self.standard,
            CreditLoadPolicy::Heavy => &self.heavy,
        }
    }

    /// 指定策略在指定学期的学分区间
    pub fn band(&self, policy: CreditLoadPolicy, term: Term) -> CreditBand {
        let limits = self.limits(policy);
        if term.is_regular() {
            limits.regular
        } else {
            limits.summer
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_bands() {
        let table = CreditLoadTable::default();
        assert_eq!(table.band(CreditLoadPolicy::Standard, Term::Fall).max, 18.0);
        assert_eq!(table.band(CreditLoadPolicy::Heavy, Term::Spring).max, 21.0);
        assert_eq!(table.band(CreditLoadPolicy::Light, Term::Summer).max, 6.0);
        assert_eq!(table.band(CreditLoadPolicy::Standard, Term::Summer).min, 0.0);
    }
}
