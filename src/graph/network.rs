//! 流网络
//!
//! 边以数组存储、按下标寻址；正反向边成对存放（`2k` / `2k + 1`），
//! 只通过 `reset` 与 `add_edge` 修改结构。

use super::edge::FlowEdge;
use super::index::AdjacencyIndex;
use crate::error::{Error, Result};
use crate::types::{paired, Capacity, EdgeIndex, VertexId};
use serde::Serialize;

/// 流合法性检查发现的问题
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum FlowViolation {
    /// 流量超出容量或正向流量为负
    Capacity { edge: EdgeIndex },
    /// 配对边流量不互为相反数
    Antisymmetry { edge: EdgeIndex },
    /// 中间顶点流入不等于流出
    Conservation { vertex: VertexId, net_outflow: Capacity },
}

/// 带残余容量记账的有向多重图
#[derive(Debug, Clone)]
pub struct FlowNetwork {
    vertex_count: usize,
    edges: Vec<FlowEdge>,
    adjacency: AdjacencyIndex,
}

impl FlowNetwork {
    /// 创建 `n` 个顶点的空网络
    pub fn new(vertex_count: usize) -> Result<Self> {
        if vertex_count < 1 {
            return Err(Error::InvalidSize(vertex_count));
        }
        Ok(Self {
            vertex_count,
            edges: Vec::new(),
            adjacency: AdjacencyIndex::new(vertex_count),
        })
    }

    /// 丢弃所有边并重设顶点数；失败时网络保持不变
    pub fn reset(&mut self, vertex_count: usize) -> Result<()> {
        if vertex_count < 1 {
            return Err(Error::InvalidSize(vertex_count));
        }
        self.vertex_count = vertex_count;
        self.edges.clear();
        self.adjacency.reset(vertex_count);
        Ok(())
    }

    /// 追加一条边及其反向边，返回正向边下标
    pub fn add_edge(&mut self, from: VertexId, to: VertexId, capacity: Capacity) -> Result<EdgeIndex> {
        self.check_vertex(from)?;
        self.check_vertex(to)?;
        if capacity < 0 {
            return Err(Error::InvalidCapacity(capacity));
        }

        let index = self.edges.len();
        let forward = FlowEdge::forward(from, to, capacity);
        let reverse = FlowEdge::reverse_of(&forward);
        self.edges.push(forward);
        self.edges.push(reverse);
        self.adjacency.push(from, index);
        self.adjacency.push(to, index + 1);

        Ok(index)
    }

    /// 校验顶点下标
    pub fn check_vertex(&self, vertex: VertexId) -> Result<()> {
        if vertex >= self.vertex_count {
            return Err(Error::InvalidVertex {
                vertex,
                vertex_count: self.vertex_count,
            });
        }
        Ok(())
    }

    /// 获取边
    pub fn edge(&self, index: EdgeIndex) -> Result<&FlowEdge> {
        self.edges.get(index).ok_or(Error::EdgeNotFound(index))
    }

    /// 所有边（含反向边）
    pub fn edges(&self) -> &[FlowEdge] {
        &self.edges
    }

    /// 所有正向边及其下标
    pub fn forward_edges(&self) -> impl Iterator<Item = (EdgeIndex, &FlowEdge)> + '_ {
        self.edges.iter().enumerate().step_by(2)
    }

    /// 离开 `vertex` 的边下标，按加边顺序
    pub fn adjacency(&self, vertex: VertexId) -> &[EdgeIndex] {
        self.adjacency.get(vertex)
    }

    pub fn vertex_count(&self) -> usize {
        self.vertex_count
    }

    /// 用户添加的边数（不含反向边）
    pub fn edge_count(&self) -> usize {
        self.edges.len() / 2
    }

    /// 边数组长度（含反向边）
    pub fn arena_len(&self) -> usize {
        self.edges.len()
    }

    /// 残余容量
    pub fn residual(&self, index: EdgeIndex) -> Result<Capacity> {
        Ok(self.edge(index)?.residual())
    }

    /// 当前流量
    pub fn flow(&self, index: EdgeIndex) -> Result<Capacity> {
        Ok(self.edge(index)?.flow())
    }

    /// 沿边增广 `amount`，配对边同步减少，返回该边的新流量
    pub fn augment(&mut self, index: EdgeIndex, amount: Capacity) -> Result<Capacity> {
        let edge = *self.edge(index)?;
        let pair = self.edges[paired(index)];

        if amount > edge.residual() {
            return Err(Error::CapacityExceeded {
                edge: index,
                amount,
                residual: edge.residual(),
            });
        }
        // 负增广会消耗配对边的残余容量
        if amount < 0 && -amount > pair.residual() {
            return Err(Error::CapacityExceeded {
                edge: paired(index),
                amount: -amount,
                residual: pair.residual(),
            });
        }

        let flow = edge.flow() + amount;
        self.edges[index].set_flow(flow);
        self.edges[paired(index)].set_flow(pair.flow() - amount);
        Ok(flow)
    }

    /// 路径瓶颈：路径上最小的残余容量
    pub fn bottleneck(&self, path: &[EdgeIndex]) -> Capacity {
        path.iter()
            .map(|&e| self.edges[e].residual())
            .min()
            .unwrap_or(0)
    }

    /// 顶点净流出量（流出 - 流入）
    pub fn net_outflow(&self, vertex: VertexId) -> Capacity {
        self.adjacency(vertex)
            .iter()
            .map(|&e| self.edges[e].flow())
            .sum()
    }

    /// 清零所有流量，保留边
    pub fn reset_flows(&mut self) {
        for edge in &mut self.edges {
            edge.set_flow(0);
        }
    }

    /// 检查容量约束、反对称与流守恒
    pub fn validate_flow(&self, source: VertexId, sink: VertexId) -> Vec<FlowViolation> {
        let mut violations = Vec::new();

        for (index, edge) in self.edges.iter().enumerate() {
            if edge.residual() < 0 || (!edge.is_reverse() && edge.flow() < 0) {
                violations.push(FlowViolation::Capacity { edge: index });
            }
            if !edge.is_reverse() && edge.flow() != -self.edges[paired(index)].flow() {
                violations.push(FlowViolation::Antisymmetry { edge: index });
            }
        }

        for vertex in 0..self.vertex_count {
            if vertex == source || vertex == sink {
                continue;
            }
            let net_outflow = self.net_outflow(vertex);
            if net_outflow != 0 {
                violations.push(FlowViolation::Conservation { vertex, net_outflow });
            }
        }

        violations
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line_network() -> FlowNetwork {
        let mut net = FlowNetwork::new(3).unwrap();
        net.add_edge(0, 1, 5).unwrap();
        net.add_edge(1, 2, 3).unwrap();
        net
    }

    #[test]
    fn test_new_rejects_empty() {
        assert!(matches!(FlowNetwork::new(0), Err(Error::InvalidSize(0))));
    }

    #[test]
    fn test_add_edge_layout() {
        let mut net = FlowNetwork::new(3).unwrap();
        let e0 = net.add_edge(0, 1, 5).unwrap();
        let e1 = net.add_edge(1, 2, 3).unwrap();

        assert_eq!((e0, e1), (0, 2));
        assert_eq!(net.edge_count(), 2);
        assert_eq!(net.arena_len(), 4);
        assert_eq!(net.adjacency(0), &[0]);
        assert_eq!(net.adjacency(1), &[1, 2]);
        assert_eq!(net.adjacency(2), &[3]);
        assert!(net.edge(1).unwrap().is_reverse());
    }

    #[test]
    fn test_add_edge_validation_leaves_graph_unmodified() {
        let mut net = line_network();

        assert!(matches!(
            net.add_edge(0, 3, 1),
            Err(Error::InvalidVertex { vertex: 3, vertex_count: 3 })
        ));
        assert!(matches!(net.add_edge(0, 1, -2), Err(Error::InvalidCapacity(-2))));
        assert_eq!(net.edge_count(), 2);
        assert_eq!(net.adjacency(0).len(), 1);
    }

    #[test]
    fn test_self_loop_accepted() {
        let mut net = FlowNetwork::new(2).unwrap();
        let e = net.add_edge(1, 1, 4).unwrap();

        assert_eq!(net.adjacency(1), &[e, e + 1]);
        assert_eq!(net.net_outflow(1), 0);
    }

    #[test]
    fn test_augment_antisymmetry() {
        let mut net = line_network();

        assert_eq!(net.augment(0, 3).unwrap(), 3);
        assert_eq!(net.flow(1).unwrap(), -3);
        assert_eq!(net.residual(0).unwrap(), 2);
        assert_eq!(net.residual(1).unwrap(), 3);

        // 沿反向边退流
        assert_eq!(net.augment(1, 2).unwrap(), -1);
        assert_eq!(net.flow(0).unwrap(), 1);
    }

    #[test]
    fn test_augment_capacity_exceeded() {
        let mut net = line_network();

        let err = net.augment(2, 4).unwrap_err();
        assert!(matches!(
            err,
            Error::CapacityExceeded { edge: 2, amount: 4, residual: 3 }
        ));
        assert!(err.is_fatal());
        assert_eq!(net.flow(2).unwrap(), 0);

        // 反向边没有残余容量
        assert!(net.augment(1, 1).is_err());
        assert!(net.augment(0, -1).is_err());
        assert!(matches!(net.augment(99, 1), Err(Error::EdgeNotFound(99))));
    }

    #[test]
    fn test_reset_is_idempotent() {
        let mut net = line_network();
        net.augment(0, 2).unwrap();

        net.reset(4).unwrap();
        net.reset(4).unwrap();
        assert_eq!(net.vertex_count(), 4);
        assert_eq!(net.edge_count(), 0);
        assert!((0..4).all(|v| net.adjacency(v).is_empty()));

        assert!(net.reset(0).is_err());
        assert_eq!(net.vertex_count(), 4);
    }

    #[test]
    fn test_validate_flow() {
        let mut net = line_network();
        net.augment(0, 3).unwrap();
        assert_eq!(
            net.validate_flow(0, 2),
            vec![FlowViolation::Conservation { vertex: 1, net_outflow: -3 }]
        );

        net.augment(2, 3).unwrap();
        assert!(net.validate_flow(0, 2).is_empty());

        net.reset_flows();
        assert!(net.validate_flow(0, 2).is_empty());
        assert_eq!(net.flow(0).unwrap(), 0);
    }

    #[test]
    fn test_bottleneck() {
        let net = line_network();
        assert_eq!(net.bottleneck(&[0, 2]), 3);
        assert_eq!(net.bottleneck(&[]), 0);
    }
}
