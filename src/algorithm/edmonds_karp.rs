//! Edmonds-Karp 最大流算法
//!
//! 基于 BFS 的 Ford-Fulkerson：每轮在残余图中找边数最少的增广路径，
//! 总复杂度 O(V·E²)。

use super::bfs::residual_bfs;
use super::bound::{IterationBudget, IterationLimit};
use super::MaxFlow;
use crate::error::{Error, Result};
use crate::graph::FlowNetwork;
use crate::trace::TraceRecorder;
use crate::types::VertexId;
use tracing::debug;

/// Edmonds-Karp 最大流算法
pub struct EdmondsKarp<'g> {
    network: &'g mut FlowNetwork,
    limit: IterationLimit,
}

impl<'g> EdmondsKarp<'g> {
    /// 创建算法实例
    pub fn new(network: &'g mut FlowNetwork) -> Self {
        Self {
            network,
            limit: IterationLimit::Auto,
        }
    }

    /// 设置迭代上限
    pub fn with_limit(mut self, limit: IterationLimit) -> Self {
        self.limit = limit;
        self
    }

    /// 计算从 source 到 sink 的最大流，轨迹写入 `recorder`
    pub fn max_flow(
        &mut self,
        source: VertexId,
        sink: VertexId,
        recorder: &mut TraceRecorder,
    ) -> Result<MaxFlow> {
        self.network.check_vertex(source)?;
        self.network.check_vertex(sink)?;

        let mut result = MaxFlow::default();
        if source == sink {
            return Ok(result);
        }

        let mut budget = IterationBudget::augmentations(self.limit, self.network);

        loop {
            // BFS 找最短增广路径
            let tree = residual_bfs(self.network, source, Some(sink), recorder);
            let Some(path) = tree.path_to(self.network, sink) else {
                break;
            };
            budget.charge()?;

            let bottleneck = self.network.bottleneck(&path);
            recorder.path_found(&path);
            for &edge in &path {
                let flow = self.network.augment(edge, bottleneck)?;
                recorder.flow_augmented(edge, flow);
            }

            result.value = result
                .value
                .checked_add(bottleneck)
                .ok_or(Error::FlowOverflow)?;
            result.augmentations += 1;
            debug!(
                length = path.len(),
                bottleneck,
                total = result.value,
                "edmonds-karp augmenting path"
            );
        }

        Ok(result)
    }
}
