//! 残余图上的广度优先搜索
//!
//! Edmonds-Karp 找最短增广路、Dinic 建层次图、最小割求源侧都基于它。

use crate::graph::FlowNetwork;
use crate::trace::TraceRecorder;
use crate::types::{EdgeIndex, VertexId};
use std::collections::VecDeque;

/// 未到达顶点的层次标记
pub const UNREACHED: usize = usize::MAX;

/// BFS 结果：每个顶点的距离与发现它的边
#[derive(Debug, Clone)]
pub struct BfsTree {
    distance: Vec<usize>,
    parent: Vec<Option<EdgeIndex>>,
}

impl BfsTree {
    /// 顶点层次，未到达为 `UNREACHED`
    pub fn levels(&self) -> &[usize] {
        &self.distance
    }

    pub fn distance(&self, vertex: VertexId) -> Option<usize> {
        match self.distance.get(vertex) {
            Some(&d) if d != UNREACHED => Some(d),
            _ => None,
        }
    }

    pub fn reached(&self, vertex: VertexId) -> bool {
        self.distance(vertex).is_some()
    }

    /// 沿父指针重构源到 `target` 的边序列
    pub fn path_to(&self, network: &FlowNetwork, target: VertexId) -> Option<Vec<EdgeIndex>> {
        if !self.reached(target) {
            return None;
        }

        let mut path = Vec::with_capacity(self.distance[target]);
        let mut current = target;
        while let Some(edge) = self.parent[current] {
            path.push(edge);
            current = network.edges()[edge].from();
        }
        path.reverse();
        Some(path)
    }
}

/// 从 `source` 出发，只走残余容量严格为正的边
///
/// 按加边顺序展开邻接表；到达 `stop_at` 后立即停止。
/// 每个新到达的顶点（含源点）发出一个 `FrontierVisited` 事件。
pub fn residual_bfs(
    network: &FlowNetwork,
    source: VertexId,
    stop_at: Option<VertexId>,
    recorder: &mut TraceRecorder,
) -> BfsTree {
    let n = network.vertex_count();
    let mut tree = BfsTree {
        distance: vec![UNREACHED; n],
        parent: vec![None; n],
    };
    let mut queue = VecDeque::new();

    tree.distance[source] = 0;
    recorder.frontier_visited(source, 0);
    if stop_at == Some(source) {
        return tree;
    }
    queue.push_back(source);

    while let Some(u) = queue.pop_front() {
        for &e in network.adjacency(u) {
            let edge = &network.edges()[e];
            let v = edge.to();
            if edge.residual() <= 0 || tree.distance[v] != UNREACHED {
                continue;
            }

            tree.distance[v] = tree.distance[u] + 1;
            tree.parent[v] = Some(e);
            recorder.frontier_visited(v, tree.distance[v]);

            if stop_at == Some(v) {
                return tree;
            }
            queue.push_back(v);
        }
    }

    tree
}
