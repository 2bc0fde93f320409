//! 图模型
//!
//! 残余网络的核心数据结构：边数组、邻接索引与流网络

mod edge;
mod index;
mod network;

pub use edge::FlowEdge;
pub use index::AdjacencyIndex;
pub use network::{FlowNetwork, FlowViolation};
