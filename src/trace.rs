//! 算法轨迹记录
//!
//! 两种算法共用的被动事件接收器。事件按发生顺序追加，
//! 计算结束后以只读快照交给调用方，用于逐步重放动画。

use crate::types::{Capacity, EdgeIndex, VertexId};
use serde::{Deserialize, Serialize};

/// 轨迹事件
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TraceEvent {
    /// BFS 新到达一个顶点
    FrontierVisited { vertex: VertexId, distance: usize },
    /// 找到增广路径（源到汇的边下标序列）
    PathFound { edges: Vec<EdgeIndex> },
    /// 边的流量被更新为 `flow`
    FlowAugmented { edge: EdgeIndex, flow: Capacity },
}

/// 轨迹记录器
#[derive(Debug, Clone)]
pub struct TraceRecorder {
    events: Vec<TraceEvent>,
    enabled: bool,
}

impl Default for TraceRecorder {
    fn default() -> Self {
        Self::new()
    }
}

impl TraceRecorder {
    pub fn new() -> Self {
        Self {
            events: Vec::new(),
            enabled: true,
        }
    }

    /// 不保留任何事件的记录器
    pub fn disabled() -> Self {
        Self {
            events: Vec::new(),
            enabled: false,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn record(&mut self, event: TraceEvent) {
        if self.enabled {
            self.events.push(event);
        }
    }

    pub fn frontier_visited(&mut self, vertex: VertexId, distance: usize) {
        self.record(TraceEvent::FrontierVisited { vertex, distance });
    }

    pub fn path_found(&mut self, edges: &[EdgeIndex]) {
        if self.enabled {
            self.events.push(TraceEvent::PathFound {
                edges: edges.to_vec(),
            });
        }
    }

    pub fn flow_augmented(&mut self, edge: EdgeIndex, flow: Capacity) {
        self.record(TraceEvent::FlowAugmented { edge, flow });
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// 只读快照
    pub fn snapshot(&self) -> Trace {
        Trace {
            events: self.events.clone(),
        }
    }

    pub fn finish(self) -> Trace {
        Trace {
            events: self.events,
        }
    }
}

/// 一次计算的完整轨迹
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trace {
    events: Vec<TraceEvent>,
}

/// 一个增广步骤：此前探索的前沿、找到的路径、各边的新流量
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TraceStep {
    pub frontier: Vec<(VertexId, usize)>,
    pub path: Vec<EdgeIndex>,
    pub augmented: Vec<(EdgeIndex, Capacity)>,
}

/// 按增广步骤分组后的轨迹
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TraceSteps {
    pub steps: Vec<TraceStep>,
    /// 最后一次未到达汇点的搜索
    pub exhausted_frontier: Vec<(VertexId, usize)>,
}

impl Trace {
    pub fn events(&self) -> &[TraceEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// 所有增广路径，按发现顺序
    pub fn paths(&self) -> impl Iterator<Item = &[EdgeIndex]> + '_ {
        self.events.iter().filter_map(|e| match e {
            TraceEvent::PathFound { edges } => Some(edges.as_slice()),
            _ => None,
        })
    }

    /// 按 `PathFound` 切分为增广步骤
    pub fn steps(&self) -> TraceSteps {
        let mut steps: Vec<TraceStep> = Vec::new();
        let mut frontier = Vec::new();

        for event in &self.events {
            match event {
                TraceEvent::FrontierVisited { vertex, distance } => {
                    frontier.push((*vertex, *distance));
                }
                TraceEvent::PathFound { edges } => steps.push(TraceStep {
                    frontier: std::mem::take(&mut frontier),
                    path: edges.clone(),
                    augmented: Vec::new(),
                }),
                TraceEvent::FlowAugmented { edge, flow } => {
                    if let Some(step) = steps.last_mut() {
                        step.augmented.push((*edge, *flow));
                    }
                }
            }
        }

        TraceSteps {
            steps,
            exhausted_frontier: frontier,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recorder_order() {
        let mut rec = TraceRecorder::new();
        rec.frontier_visited(0, 0);
        rec.frontier_visited(1, 1);
        rec.path_found(&[0]);
        rec.flow_augmented(0, 5);

        let trace = rec.finish();
        assert_eq!(
            trace.events(),
            &[
                TraceEvent::FrontierVisited { vertex: 0, distance: 0 },
                TraceEvent::FrontierVisited { vertex: 1, distance: 1 },
                TraceEvent::PathFound { edges: vec![0] },
                TraceEvent::FlowAugmented { edge: 0, flow: 5 },
            ]
        );
    }

    #[test]
    fn test_disabled_recorder() {
        let mut rec = TraceRecorder::disabled();
        rec.frontier_visited(0, 0);
        rec.path_found(&[0, 2]);
        assert!(rec.is_empty());
        assert!(rec.finish().is_empty());
    }

    #[test]
    fn test_steps_grouping() {
        let mut rec = TraceRecorder::new();
        rec.frontier_visited(0, 0);
        rec.frontier_visited(1, 1);
        rec.path_found(&[0]);
        rec.flow_augmented(0, 2);
        // 同一层次图中的第二条路径没有新的前沿
        rec.path_found(&[2]);
        rec.flow_augmented(2, 1);
        rec.frontier_visited(0, 0);

        let grouped = rec.snapshot().steps();
        assert_eq!(grouped.steps.len(), 2);
        assert_eq!(grouped.steps[0].frontier, vec![(0, 0), (1, 1)]);
        assert_eq!(grouped.steps[0].augmented, vec![(0, 2)]);
        assert!(grouped.steps[1].frontier.is_empty());
        assert_eq!(grouped.steps[1].path, vec![2]);
        assert_eq!(grouped.exhausted_frontier, vec![(0, 0)]);
    }

    #[test]
    fn test_trace_json_shape() {
        let mut rec = TraceRecorder::new();
        rec.frontier_visited(3, 1);
        rec.flow_augmented(4, 7);

        let json = serde_json::to_value(rec.finish()).unwrap();
        assert_eq!(json["events"][0]["type"], "frontier_visited");
        assert_eq!(json["events"][0]["vertex"], 3);
        assert_eq!(json["events"][1]["type"], "flow_augmented");
        assert_eq!(json["events"][1]["flow"], 7);
    }
}
