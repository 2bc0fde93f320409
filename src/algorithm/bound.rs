//! 迭代上限
//!
//! 按已证明的复杂度界为增广次数与 Dinic 阶段数封顶，
//! 超出即视为致命错误，不返回部分结果。

use crate::error::{Error, Result};
use crate::graph::FlowNetwork;
use serde::{Deserialize, Serialize};

/// 迭代上限策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IterationLimit {
    /// 由 V 和 E 推导：增广不超过 `V·E + 1` 次，Dinic 阶段不超过 `V` 个
    #[default]
    Auto,
    /// 固定增广次数上限
    Fixed(u64),
    /// 不设上限
    Unbounded,
}

/// 单次计算的迭代计数
#[derive(Debug, Clone)]
pub struct IterationBudget {
    limit: Option<u64>,
    used: u64,
}

impl IterationBudget {
    /// 增广次数预算
    pub fn augmentations(limit: IterationLimit, network: &FlowNetwork) -> Self {
        let limit = match limit {
            IterationLimit::Auto => Some(
                (network.vertex_count() as u64)
                    .saturating_mul(network.arena_len() as u64)
                    .saturating_add(1),
            ),
            IterationLimit::Fixed(n) => Some(n),
            IterationLimit::Unbounded => None,
        };
        Self { limit, used: 0 }
    }

    /// Dinic 阶段数预算：汇点层次严格递增，至多 `V` 个阶段
    pub fn phases(limit: IterationLimit, network: &FlowNetwork) -> Self {
        let limit = match limit {
            IterationLimit::Unbounded => None,
            _ => Some(network.vertex_count() as u64),
        };
        Self { limit, used: 0 }
    }

    /// 消耗一次迭代
    pub fn charge(&mut self) -> Result<()> {
        self.used += 1;
        match self.limit {
            Some(limit) if self.used > limit => Err(Error::ComputationBoundExceeded { limit }),
            _ => Ok(()),
        }
    }

    pub fn used(&self) -> u64 {
        self.used
    }

    pub fn limit(&self) -> Option<u64> {
        self.limit
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auto_limit() {
        let mut net = FlowNetwork::new(4).unwrap();
        net.add_edge(0, 1, 1).unwrap();
        net.add_edge(1, 3, 1).unwrap();

        let budget = IterationBudget::augmentations(IterationLimit::Auto, &net);
        assert_eq!(budget.limit(), Some(4 * 4 + 1));
        let phases = IterationBudget::phases(IterationLimit::Fixed(1), &net);
        assert_eq!(phases.limit(), Some(4));
    }

    #[test]
    fn test_fixed_limit_exceeded() {
        let net = FlowNetwork::new(2).unwrap();
        let mut budget = IterationBudget::augmentations(IterationLimit::Fixed(2), &net);

        assert!(budget.charge().is_ok());
        assert!(budget.charge().is_ok());
        assert!(matches!(
            budget.charge(),
            Err(Error::ComputationBoundExceeded { limit: 2 })
        ));
        assert_eq!(budget.used(), 3);
    }

    #[test]
    fn test_unbounded() {
        let net = FlowNetwork::new(1).unwrap();
        let mut budget = IterationBudget::augmentations(IterationLimit::Unbounded, &net);
        for _ in 0..1000 {
            budget.charge().unwrap();
        }
        assert_eq!(budget.limit(), None);
    }
}
