//! 引擎门面
//!
//! 调用方面向的完整接口：重置图、加边、计算最大流、取回轨迹。
//! 每个逻辑会话独立持有一个 `FlowEngine`，不存在全局单例。

use crate::algorithm::{self, min_cut, IterationLimit, MinCut};
use crate::error::{Error, Result};
use crate::graph::FlowNetwork;
use crate::metrics;
use crate::trace::{Trace, TraceRecorder};
use crate::types::{Algorithm, Capacity, EdgeIndex, VertexId};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// 引擎配置
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// 是否记录轨迹
    #[serde(default = "default_record_trace")]
    pub record_trace: bool,
    /// 迭代上限
    #[serde(default)]
    pub iteration_limit: IterationLimit,
    /// 顶点数上限
    #[serde(default = "default_max_vertices")]
    pub max_vertices: usize,
    /// 边数上限（不含反向边）
    #[serde(default = "default_max_edges")]
    pub max_edges: usize,
}

/// 默认顶点数上限
pub const DEFAULT_MAX_VERTICES: usize = 1 << 20;
/// 默认边数上限
pub const DEFAULT_MAX_EDGES: usize = 1 << 24;

fn default_record_trace() -> bool {
    true
}

fn default_max_vertices() -> usize {
    DEFAULT_MAX_VERTICES
}

fn default_max_edges() -> usize {
    DEFAULT_MAX_EDGES
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            record_trace: default_record_trace(),
            iteration_limit: IterationLimit::Auto,
            max_vertices: DEFAULT_MAX_VERTICES,
            max_edges: DEFAULT_MAX_EDGES,
        }
    }
}

impl EngineConfig {
    /// 顶点数须在 `1..=max_vertices` 内，先于分配检查
    pub fn check_vertex_count(&self, vertex_count: usize) -> Result<()> {
        if vertex_count == 0 || vertex_count > self.max_vertices {
            return Err(Error::InvalidSize(vertex_count));
        }
        Ok(())
    }

    /// 加边后的总边数不得超过 `max_edges`
    pub fn check_edge_count(&self, edge_count: usize) -> Result<()> {
        if edge_count > self.max_edges {
            return Err(Error::TooManyEdges {
                requested: edge_count,
                limit: self.max_edges,
            });
        }
        Ok(())
    }
}

/// 一次计算的结果
#[derive(Debug, Clone, Serialize)]
pub struct FlowReport {
    pub algorithm: Algorithm,
    pub source: VertexId,
    pub sink: VertexId,
    pub max_flow: Capacity,
    pub augmentations: u64,
    /// Dinic 每个阶段的汇点层次
    pub phases: Vec<usize>,
    pub min_cut: MinCut,
    pub trace: Trace,
}

/// 最大流引擎
#[derive(Debug, Clone)]
pub struct FlowEngine {
    network: FlowNetwork,
    config: EngineConfig,
    last_trace: Option<Trace>,
}

impl FlowEngine {
    /// 创建 `n` 个顶点的引擎
    pub fn new(vertex_count: usize) -> Result<Self> {
        Self::with_config(vertex_count, EngineConfig::default())
    }

    pub fn with_config(vertex_count: usize, config: EngineConfig) -> Result<Self> {
        config.check_vertex_count(vertex_count)?;
        Ok(Self {
            network: FlowNetwork::new(vertex_count)?,
            config,
            last_trace: None,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: EngineConfig) {
        self.config = config;
    }

    pub fn network(&self) -> &FlowNetwork {
        &self.network
    }

    /// 清空图并重设顶点数
    pub fn reset_graph(&mut self, vertex_count: usize) -> Result<()> {
        self.config.check_vertex_count(vertex_count)?;
        self.network.reset(vertex_count)?;
        self.last_trace = None;
        Ok(())
    }

    /// 加边，返回正向边下标
    pub fn add_edge(&mut self, from: VertexId, to: VertexId, capacity: Capacity) -> Result<EdgeIndex> {
        self.config.check_edge_count(self.network.edge_count() + 1)?;
        let index = self.network.add_edge(from, to, capacity)?;
        metrics::global_metrics().record_edge_added();
        Ok(index)
    }

    /// 批量加边；先整体校验，任一条非法则一条都不加
    pub fn add_edges<I>(&mut self, edges: I) -> Result<Vec<EdgeIndex>>
    where
        I: IntoIterator<Item = (VertexId, VertexId, Capacity)>,
    {
        let edges: Vec<_> = edges.into_iter().collect();
        self.config
            .check_edge_count(self.network.edge_count().saturating_add(edges.len()))?;
        for &(from, to, capacity) in &edges {
            self.network.check_vertex(from)?;
            self.network.check_vertex(to)?;
            if capacity < 0 {
                return Err(Error::InvalidCapacity(capacity));
            }
        }

        edges
            .into_iter()
            .map(|(from, to, capacity)| self.add_edge(from, to, capacity))
            .collect()
    }

    /// 计算最大流
    ///
    /// `source == sink` 是合法的退化情形，返回 0 与空轨迹。
    /// 图会停留在计算后的饱和状态，无关的新计算需要先 `reset_graph`。
    /// 致命错误（超出迭代上限、溢出）会清零已推送的部分流量。
    pub fn compute_max_flow(
        &mut self,
        source: VertexId,
        sink: VertexId,
        algorithm: Algorithm,
    ) -> Result<FlowReport> {
        let record_trace = self.config.record_trace;
        self.compute_max_flow_with_trace(source, sink, algorithm, record_trace)
    }

    /// 计算最大流，本次调用单独指定是否记录轨迹，不改动引擎配置
    pub fn compute_max_flow_with_trace(
        &mut self,
        source: VertexId,
        sink: VertexId,
        algorithm: Algorithm,
        record_trace: bool,
    ) -> Result<FlowReport> {
        let metrics = metrics::global_metrics();
        let timer = metrics.record_computation_start(algorithm);

        let mut recorder = if record_trace {
            TraceRecorder::new()
        } else {
            TraceRecorder::disabled()
        };

        let outcome = algorithm::run(
            algorithm,
            &mut self.network,
            source,
            sink,
            self.config.iteration_limit,
            &mut recorder,
        );

        let flow = match outcome {
            Ok(flow) => flow,
            Err(e) => {
                if e.is_fatal() {
                    warn!(%algorithm, source, sink, error = %e, "max flow computation aborted");
                    self.network.reset_flows();
                }
                metrics.record_computation_complete(timer, 0, false);
                self.last_trace = None;
                return Err(e);
            }
        };
        metrics.record_computation_complete(timer, flow.augmentations, true);

        if cfg!(debug_assertions) {
            let violations = self.network.validate_flow(source, sink);
            if !violations.is_empty() {
                warn!(?violations, "flow invariants violated");
            }
        }

        let cut = min_cut(&self.network, source)?;
        let trace = recorder.finish();
        info!(
            %algorithm,
            source,
            sink,
            max_flow = flow.value,
            augmentations = flow.augmentations,
            events = trace.len(),
            "max flow computed"
        );

        self.last_trace = Some(trace.clone());
        Ok(FlowReport {
            algorithm,
            source,
            sink,
            max_flow: flow.value,
            augmentations: flow.augmentations,
            phases: flow.phase_levels,
            min_cut: cut,
            trace,
        })
    }

    /// Dinic 最大流（仅返回数值）
    pub fn dinic_max_flow(&mut self, source: VertexId, sink: VertexId) -> Result<Capacity> {
        Ok(self.compute_max_flow(source, sink, Algorithm::Dinic)?.max_flow)
    }

    /// Edmonds-Karp 最大流（仅返回数值）
    pub fn edmonds_karp_max_flow(&mut self, source: VertexId, sink: VertexId) -> Result<Capacity> {
        Ok(self
            .compute_max_flow(source, sink, Algorithm::EdmondsKarp)?
            .max_flow)
    }

    /// 最近一次成功计算的轨迹
    pub fn last_trace(&self) -> Option<&Trace> {
        self.last_trace.as_ref()
    }

    /// 基于当前流的最小割
    pub fn min_cut(&self, source: VertexId) -> Result<MinCut> {
        min_cut(&self.network, source)
    }

    /// 清零流量但保留边，便于在同一拓扑上换算法重算
    pub fn reset_flows(&mut self) {
        self.network.reset_flows();
        self.last_trace = None;
    }

    /// 一次性计算：建图、计算、返回结果
    pub fn solve(
        vertex_count: usize,
        edges: &[(VertexId, VertexId, Capacity)],
        source: VertexId,
        sink: VertexId,
        algorithm: Algorithm,
        config: EngineConfig,
    ) -> Result<FlowReport> {
        let mut engine = Self::with_config(vertex_count, config)?;
        engine.add_edges(edges.iter().copied())?;
        engine.compute_max_flow(source, sink, algorithm)
    }
}

impl TryFrom<usize> for FlowEngine {
    type Error = Error;

    fn try_from(vertex_count: usize) -> Result<Self> {
        Self::new(vertex_count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trace::TraceEvent;

    const S: usize = 0;
    const T: usize = 5;

    /// 顶点 s, b, c, d, e, t
    fn sample_edges(d_to_e: bool) -> Vec<(usize, usize, i64)> {
        let (b, c, d, e) = (1, 2, 3, 4);
        let last = if d_to_e { (d, e, 6) } else { (e, d, 6) };
        vec![
            (S, b, 10),
            (S, c, 10),
            (b, c, 2),
            (b, d, 4),
            (b, e, 8),
            (c, e, 9),
            (d, T, 10),
            (e, T, 10),
            last,
        ]
    }

    fn engine_with(edges: &[(usize, usize, i64)]) -> FlowEngine {
        let mut engine = FlowEngine::new(6).unwrap();
        engine.add_edges(edges.iter().copied()).unwrap();
        engine
    }

    #[test]
    fn test_sample_graph_both_algorithms() {
        // d 只能从 b 收到 4，割 {d, t} 的容量为 4 + 10
        for algorithm in Algorithm::ALL {
            let mut engine = engine_with(&sample_edges(true));
            let report = engine.compute_max_flow(S, T, algorithm).unwrap();
            assert_eq!(report.max_flow, 14, "{algorithm}");
            assert_eq!(report.min_cut.capacity, 14);
            assert!(engine.network().validate_flow(S, T).is_empty());
        }
    }

    #[test]
    fn test_sample_graph_with_e_to_d() {
        for algorithm in Algorithm::ALL {
            let mut engine = engine_with(&sample_edges(false));
            let report = engine.compute_max_flow(S, T, algorithm).unwrap();
            assert_eq!(report.max_flow, 19, "{algorithm}");
            assert_eq!(report.min_cut.source_side, vec![0, 2]);
        }
    }

    #[test]
    fn test_value_only_entry_points() {
        let mut engine = engine_with(&sample_edges(false));
        assert_eq!(engine.dinic_max_flow(S, T).unwrap(), 19);
        // 图已饱和，再算一次不会有新流量
        assert_eq!(engine.edmonds_karp_max_flow(S, T).unwrap(), 0);

        engine.reset_flows();
        assert_eq!(engine.edmonds_karp_max_flow(S, T).unwrap(), 19);
    }

    #[test]
    fn test_source_equals_sink() {
        let mut engine = engine_with(&sample_edges(true));
        let report = engine.compute_max_flow(3, 3, Algorithm::Dinic).unwrap();

        assert_eq!(report.max_flow, 0);
        assert!(report.trace.is_empty());
        assert!(engine.network().validate_flow(3, 3).is_empty());
    }

    #[test]
    fn test_disconnected_single_search() {
        for algorithm in Algorithm::ALL {
            let mut engine = FlowEngine::new(4).unwrap();
            engine.add_edge(0, 1, 3).unwrap();
            engine.add_edge(2, 3, 3).unwrap();

            let report = engine.compute_max_flow(0, 3, algorithm).unwrap();
            assert_eq!(report.max_flow, 0);
            assert_eq!(report.trace.paths().count(), 0);

            let grouped = report.trace.steps();
            assert!(grouped.steps.is_empty());
            assert_eq!(grouped.exhausted_frontier, vec![(0, 0), (1, 1)]);
        }
    }

    #[test]
    fn test_trace_disabled() {
        let config = EngineConfig {
            record_trace: false,
            ..EngineConfig::default()
        };
        let report =
            FlowEngine::solve(6, &sample_edges(true), S, T, Algorithm::Dinic, config).unwrap();
        assert_eq!(report.max_flow, 14);
        assert!(report.trace.is_empty());
    }

    #[test]
    fn test_last_trace_and_reset() {
        let mut engine = engine_with(&sample_edges(true));
        assert!(engine.last_trace().is_none());

        let report = engine.compute_max_flow(S, T, Algorithm::EdmondsKarp).unwrap();
        let trace = engine.last_trace().unwrap();
        assert_eq!(trace, &report.trace);
        assert!(matches!(
            trace.events().first(),
            Some(TraceEvent::FrontierVisited { vertex: 0, distance: 0 })
        ));

        engine.reset_graph(6).unwrap();
        engine.reset_graph(6).unwrap();
        assert!(engine.last_trace().is_none());
        assert_eq!(engine.network().edge_count(), 0);
        assert_eq!(engine.network().vertex_count(), 6);
    }

    #[test]
    fn test_validation_errors() {
        assert!(matches!(FlowEngine::new(0), Err(Error::InvalidSize(0))));

        let mut engine = FlowEngine::new(2).unwrap();
        assert!(matches!(engine.reset_graph(0), Err(Error::InvalidSize(0))));
        assert_eq!(engine.network().vertex_count(), 2);
        assert!(matches!(
            engine.add_edge(0, 2, 1),
            Err(Error::InvalidVertex { vertex: 2, vertex_count: 2 })
        ));
        assert!(matches!(engine.add_edge(0, 1, -5), Err(Error::InvalidCapacity(-5))));
        assert!(matches!(
            engine.compute_max_flow(0, 7, Algorithm::Dinic),
            Err(Error::InvalidVertex { vertex: 7, .. })
        ));
        assert_eq!(engine.network().edge_count(), 0);
    }

    #[test]
    fn test_add_edges_is_atomic() {
        let mut engine = FlowEngine::new(3).unwrap();
        let err = engine
            .add_edges(vec![(0, 1, 2), (1, 2, 2), (2, 3, 1)])
            .unwrap_err();

        assert!(matches!(err, Error::InvalidVertex { vertex: 3, .. }));
        assert_eq!(engine.network().edge_count(), 0);
        assert_eq!(engine.add_edges(vec![(0, 1, 2), (1, 2, 2)]).unwrap(), vec![0, 2]);
    }

    #[test]
    fn test_computation_bound() {
        let config = EngineConfig {
            record_trace: true,
            iteration_limit: IterationLimit::Fixed(1),
            ..EngineConfig::default()
        };
        for algorithm in Algorithm::ALL {
            let err = FlowEngine::solve(6, &sample_edges(true), S, T, algorithm, config).unwrap_err();
            assert!(matches!(err, Error::ComputationBoundExceeded { limit: 1 }));
        }
    }

    #[test]
    fn test_bound_failure_clears_partial_flow() {
        let mut engine = engine_with(&sample_edges(true));
        engine.set_config(EngineConfig {
            iteration_limit: IterationLimit::Fixed(1),
            ..EngineConfig::default()
        });
        assert!(engine.compute_max_flow(S, T, Algorithm::EdmondsKarp).is_err());
        assert!(engine.network().forward_edges().all(|(_, e)| e.flow() == 0));
        assert!(engine.last_trace().is_none());

        engine.set_config(EngineConfig::default());
        assert_eq!(engine.edmonds_karp_max_flow(S, T).unwrap(), 14);
    }

    #[test]
    fn test_size_limits() {
        let config = EngineConfig {
            max_vertices: 4,
            max_edges: 2,
            ..EngineConfig::default()
        };
        assert!(matches!(
            FlowEngine::with_config(5, config),
            Err(Error::InvalidSize(5))
        ));
        assert!(matches!(
            FlowEngine::new(usize::MAX),
            Err(Error::InvalidSize(usize::MAX))
        ));

        let mut engine = FlowEngine::with_config(4, config).unwrap();
        assert!(matches!(engine.reset_graph(1 << 40), Err(Error::InvalidSize(_))));
        assert_eq!(engine.network().vertex_count(), 4);

        let err = engine
            .add_edges(vec![(0, 1, 1), (1, 2, 1), (2, 3, 1)])
            .unwrap_err();
        assert!(matches!(err, Error::TooManyEdges { requested: 3, limit: 2 }));
        assert_eq!(engine.network().edge_count(), 0);

        engine.add_edges(vec![(0, 1, 1), (1, 3, 1)]).unwrap();
        assert!(matches!(
            engine.add_edge(0, 3, 1),
            Err(Error::TooManyEdges { requested: 3, limit: 2 })
        ));
    }

    #[test]
    fn test_per_call_trace_keeps_config() {
        let config = EngineConfig {
            record_trace: false,
            ..EngineConfig::default()
        };
        let mut engine = FlowEngine::with_config(6, config).unwrap();
        engine.add_edges(sample_edges(true)).unwrap();

        let report = engine
            .compute_max_flow_with_trace(S, T, Algorithm::Dinic, true)
            .unwrap();
        assert!(!report.trace.is_empty());
        assert!(!engine.config().record_trace);

        engine.reset_flows();
        let report = engine.compute_max_flow(S, T, Algorithm::Dinic).unwrap();
        assert!(report.trace.is_empty());
    }
}
