//! 最大流算法模块
//!
//! 包含 Edmonds-Karp、Dinic 两种引擎，以及共用的残余图 BFS、
//! 迭代上限与最小割

mod bfs;
mod bound;
mod dinic;
mod edmonds_karp;
mod min_cut;

pub use bfs::{residual_bfs, BfsTree, UNREACHED};
pub use bound::{IterationBudget, IterationLimit};
pub use dinic::{ArcCursors, Dinic};
pub use edmonds_karp::EdmondsKarp;
pub use min_cut::{min_cut, MinCut};

use crate::error::Result;
use crate::graph::FlowNetwork;
use crate::trace::TraceRecorder;
use crate::types::{Algorithm, Capacity, VertexId};
use serde::{Deserialize, Serialize};

/// 最大流结果
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaxFlow {
    /// 最大流量值
    pub value: Capacity,
    /// 增广路径条数
    pub augmentations: u64,
    /// Dinic 每个阶段的汇点层次（Edmonds-Karp 为空）
    pub phase_levels: Vec<usize>,
}

/// 按算法分派
pub fn run(
    algorithm: Algorithm,
    network: &mut FlowNetwork,
    source: VertexId,
    sink: VertexId,
    limit: IterationLimit,
    recorder: &mut TraceRecorder,
) -> Result<MaxFlow> {
    match algorithm {
        Algorithm::EdmondsKarp => EdmondsKarp::new(network)
            .with_limit(limit)
            .max_flow(source, sink, recorder),
        Algorithm::Dinic => Dinic::new(network)
            .with_limit(limit)
            .max_flow(source, sink, recorder),
    }
}
