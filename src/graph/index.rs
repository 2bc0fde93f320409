//! 邻接索引
//!
//! 顶点 -> 离开该顶点的边下标列表（正向边与反向边都在其中），
//! 顺序即加边顺序，BFS 依此决定平局。

use crate::types::{EdgeIndex, VertexId};

/// 邻接索引
#[derive(Debug, Clone, Default)]
pub struct AdjacencyIndex {
    lists: Vec<Vec<EdgeIndex>>,
}

impl AdjacencyIndex {
    /// 创建 `n` 个顶点的空索引
    pub fn new(vertex_count: usize) -> Self {
        Self {
            lists: vec![Vec::new(); vertex_count],
        }
    }

    /// 清空并重设顶点数
    pub fn reset(&mut self, vertex_count: usize) {
        self.lists.clear();
        self.lists.resize_with(vertex_count, Vec::new);
    }

    /// 追加一条离开 `vertex` 的边
    pub fn push(&mut self, vertex: VertexId, edge: EdgeIndex) {
        self.lists[vertex].push(edge);
    }

    /// 离开 `vertex` 的边
    pub fn get(&self, vertex: VertexId) -> &[EdgeIndex] {
        self.lists.get(vertex).map(Vec::as_slice).unwrap_or(&[])
    }

    /// 出度（含反向边）
    pub fn degree(&self, vertex: VertexId) -> usize {
        self.get(vertex).len()
    }

    pub fn vertex_count(&self) -> usize {
        self.lists.len()
    }
}
