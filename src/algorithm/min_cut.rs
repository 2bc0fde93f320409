//! 最小割
//!
//! 最大流计算完成后，残余图中从源点可达的顶点构成最小割的源侧。

use super::bfs::residual_bfs;
use crate::error::Result;
use crate::graph::FlowNetwork;
use crate::trace::TraceRecorder;
use crate::types::{Capacity, EdgeIndex, VertexId};
use serde::{Deserialize, Serialize};

/// 最小割
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MinCut {
    /// 源侧顶点（升序）
    pub source_side: Vec<VertexId>,
    /// 跨越割的饱和正向边
    pub cut_edges: Vec<EdgeIndex>,
    /// 割容量
    pub capacity: Capacity,
}

impl MinCut {
    pub fn contains(&self, vertex: VertexId) -> bool {
        self.source_side.binary_search(&vertex).is_ok()
    }
}

/// 基于当前流求最小割
pub fn min_cut(network: &FlowNetwork, source: VertexId) -> Result<MinCut> {
    network.check_vertex(source)?;

    let tree = residual_bfs(network, source, None, &mut TraceRecorder::disabled());
    let source_side: Vec<VertexId> = (0..network.vertex_count())
        .filter(|&v| tree.reached(v))
        .collect();

    let mut cut_edges = Vec::new();
    let mut capacity: Capacity = 0;
    for (index, edge) in network.forward_edges() {
        if tree.reached(edge.from()) && !tree.reached(edge.to()) {
            cut_edges.push(index);
            capacity = capacity.saturating_add(edge.capacity());
        }
    }

    Ok(MinCut {
        source_side,
        cut_edges,
        capacity,
    })
}
