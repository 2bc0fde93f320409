//! Dinic 最大流算法
//!
//! 每个阶段先用 BFS 建层次图，再在层次图上用迭代 DFS 求阻塞流。
//! 每个顶点维护一个弧游标，已证明无用的边在本阶段内不会再被访问，
//! 这是 O(V²·E) 复杂度的前提。

use super::bfs::{residual_bfs, UNREACHED};
use super::bound::{IterationBudget, IterationLimit};
use super::MaxFlow;
use crate::error::{Error, Result};
use crate::graph::FlowNetwork;
use crate::trace::TraceRecorder;
use crate::types::{Capacity, EdgeIndex, VertexId};
use tracing::debug;

/// 每个顶点的当前弧游标
///
/// 游标只前进不后退；一个阶段结束后整体丢弃。
#[derive(Debug, Clone)]
pub struct ArcCursors {
    next: Vec<usize>,
}

impl ArcCursors {
    pub fn new(vertex_count: usize) -> Self {
        Self {
            next: vec![0; vertex_count],
        }
    }

    /// 顶点当前指向的边
    pub fn current(&self, vertex: VertexId, adjacency: &[EdgeIndex]) -> Option<EdgeIndex> {
        adjacency.get(self.next[vertex]).copied()
    }

    /// 放弃当前边，本阶段不再访问
    pub fn advance(&mut self, vertex: VertexId) {
        self.next[vertex] += 1;
    }

    pub fn position(&self, vertex: VertexId) -> usize {
        self.next[vertex]
    }

    pub fn is_exhausted(&self, vertex: VertexId, adjacency: &[EdgeIndex]) -> bool {
        self.next[vertex] >= adjacency.len()
    }
}

/// Dinic 最大流算法
pub struct Dinic<'g> {
    network: &'g mut FlowNetwork,
    limit: IterationLimit,
}

impl<'g> Dinic<'g> {
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

        let mut augmentations = IterationBudget::augmentations(self.limit, self.network);
        let mut phases = IterationBudget::phases(self.limit, self.network);

        loop {
            let tree = residual_bfs(self.network, source, None, recorder);
            let Some(sink_level) = tree.distance(sink) else {
                break;
            };
            phases.charge()?;
            debug_assert!(result.phase_levels.last().map_or(true, |&prev| sink_level > prev));
            result.phase_levels.push(sink_level);

            let pushed =
                self.blocking_flow(source, sink, tree.levels(), recorder, &mut augmentations)?;
            result.value = result.value.checked_add(pushed).ok_or(Error::FlowOverflow)?;
            debug!(
                phase = result.phase_levels.len(),
                sink_level,
                pushed,
                total = result.value,
                "dinic phase finished"
            );
        }

        result.augmentations = augmentations.used();
        Ok(result)
    }

    /// 在层次图上求阻塞流
    ///
    /// `stack` 保存当前 DFS 路径上的边；死路回退时推进尾顶点的游标，
    /// 增广后回退到第一条饱和边的起点继续搜索。
    fn blocking_flow(
        &mut self,
        source: VertexId,
        sink: VertexId,
        level: &[usize],
        recorder: &mut TraceRecorder,
        budget: &mut IterationBudget,
    ) -> Result<Capacity> {
        let mut cursors = ArcCursors::new(self.network.vertex_count());
        let mut stack: Vec<EdgeIndex> = Vec::new();
        let mut total: Capacity = 0;
        let mut u = source;

        loop {
            if u == sink {
                budget.charge()?;
                let bottleneck = self.network.bottleneck(&stack);
                recorder.path_found(&stack);
                for &edge in &stack {
                    let flow = self.network.augment(edge, bottleneck)?;
                    recorder.flow_augmented(edge, flow);
                }
                total = total.checked_add(bottleneck).ok_or(Error::FlowOverflow)?;

                let saturated = stack
                    .iter()
                    .position(|&e| self.network.edges()[e].residual() == 0)
                    .unwrap_or(0);
                u = self.network.edges()[stack[saturated]].from();
                stack.truncate(saturated);
                continue;
            }

            match self.admissible_arc(u, level, &mut cursors) {
                Some(edge) => {
                    stack.push(edge);
                    u = self.network.edges()[edge].to();
                }
                None => match stack.pop() {
                    // 源点的边全部耗尽，阶段结束
                    None => break,
                    Some(edge) => {
                        u = self.network.edges()[edge].from();
                        cursors.advance(u);
                    }
                },
            }
        }

        Ok(total)
    }

    /// 从游标位置起找第一条层次 +1 且有残余容量的边
    fn admissible_arc(
        &self,
        u: VertexId,
        level: &[usize],
        cursors: &mut ArcCursors,
    ) -> Option<EdgeIndex> {
        let adjacency = self.network.adjacency(u);
        while let Some(e) = cursors.current(u, adjacency) {
            let edge = &self.network.edges()[e];
            let next = level[edge.to()];
            if edge.residual() > 0 && next != UNREACHED && next == level[u] + 1 {
                return Some(e);
            }
            cursors.advance(u);
        }
        None
    }
}
