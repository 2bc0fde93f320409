//! 边定义
//!
//! 带容量的有向边。每条正向边都有一条容量为 0 的配对反向边，
//! 两者的流量互为相反数。

use crate::types::{Capacity, VertexId};
use serde::{Deserialize, Serialize};

/// 残余网络中的一条边
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowEdge {
    /// 起点
    from: VertexId,
    /// 终点
    to: VertexId,
    /// 容量（反向边为 0）
    capacity: Capacity,
    /// 当前流量（反向边为正向流量的相反数）
    flow: Capacity,
    /// 是否为隐式反向边
    reverse: bool,
}

impl FlowEdge {
    /// 创建正向边
    pub fn forward(from: VertexId, to: VertexId, capacity: Capacity) -> Self {
        Self {
            from,
            to,
            capacity,
            flow: 0,
            reverse: false,
        }
    }

    /// 创建与 `forward` 配对的反向边
    pub fn reverse_of(forward: &FlowEdge) -> Self {
        Self {
            from: forward.to,
            to: forward.from,
            capacity: 0,
            flow: 0,
            reverse: true,
        }
    }

    pub fn from(&self) -> VertexId {
        self.from
    }

    pub fn to(&self) -> VertexId {
        self.to
    }

    pub fn capacity(&self) -> Capacity {
        self.capacity
    }

    pub fn flow(&self) -> Capacity {
        self.flow
    }

    pub fn is_reverse(&self) -> bool {
        self.reverse
    }

    /// 残余容量 = 容量 - 流量
    #[inline]
    pub fn residual(&self) -> Capacity {
        self.capacity - self.flow
    }

    pub(crate) fn set_flow(&mut self, flow: Capacity) {
        self.flow = flow;
    }
}
