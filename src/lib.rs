//! FlowTrace - 可重放的最大流计算引擎
//!
//! 接收带容量的有向图，用两种算法计算 s-t 最大流：
//! - Edmonds-Karp（BFS 最短增广路径）
//! - Dinic（层次图 + 带弧游标剪枝的阻塞流）
//!
//! 两种算法都可输出确定性的步骤轨迹（BFS 前沿、增广路径、边流量变化），
//! 供下游渲染层逐步重建动画。

pub mod algorithm;
pub mod cli;
pub mod engine;
pub mod error;
pub mod graph;
pub mod import;
pub mod metrics;
pub mod server;
pub mod session;
pub mod trace;
pub mod types;

// 重导出常用类型
pub use algorithm::{Dinic, EdmondsKarp, IterationLimit, MaxFlow, MinCut};
pub use engine::{EngineConfig, FlowEngine, FlowReport};
pub use error::{Error, Result};
pub use graph::{FlowEdge, FlowNetwork};
pub use session::{SessionId, SessionRegistry};
pub use trace::{Trace, TraceEvent, TraceRecorder};
pub use types::{Algorithm, Capacity, EdgeIndex, VertexId};

/// 库版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
