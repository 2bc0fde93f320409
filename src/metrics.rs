//! 性能指标收集模块
//!
//! 提供引擎运行时指标的收集和导出功能

use crate::types::Algorithm;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// 系统全局指标
#[derive(Debug)]
pub struct Metrics {
    /// 计算统计
    computation_stats: ComputationStats,
    /// 图操作统计
    graph_stats: GraphStats,
    /// 启动时间
    start_time: Instant,
}

/// 计算统计
#[derive(Debug, Default)]
struct ComputationStats {
    /// 总计算数
    total: AtomicU64,
    /// 成功计算数
    success: AtomicU64,
    /// 失败计算数
    failed: AtomicU64,
    /// Edmonds-Karp 计算数
    edmonds_karp: AtomicU64,
    /// Dinic 计算数
    dinic: AtomicU64,
    /// 增广路径总数
    augmentations: AtomicU64,
    /// 计算总耗时（微秒）
    total_duration_us: AtomicU64,
}

/// 图操作统计
#[derive(Debug, Default)]
struct GraphStats {
    /// 加边数
    edges_added: AtomicU64,
    /// 创建的会话数
    sessions_created: AtomicU64,
    /// 关闭的会话数
    sessions_closed: AtomicU64,
}

/// 可导出的指标快照
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    // 计算指标
    pub total_computations: u64,
    pub success_computations: u64,
    pub failed_computations: u64,
    pub edmonds_karp_computations: u64,
    pub dinic_computations: u64,
    pub augmentations: u64,
    pub avg_computation_duration_ms: f64,

    // 图操作指标
    pub edges_added: u64,
    pub sessions_created: u64,
    pub active_sessions: u64,

    // 系统指标
    pub uptime_seconds: u64,
}

/// Prometheus 格式指标
#[derive(Debug, Clone)]
pub struct PrometheusMetrics {
    pub content: String,
}

impl Metrics {
    /// 创建新的指标收集器
    pub fn new() -> Self {
        Self {
            computation_stats: ComputationStats::default(),
            graph_stats: GraphStats::default(),
            start_time: Instant::now(),
        }
    }

    /// 记录计算开始
    pub fn record_computation_start(&self, algorithm: Algorithm) -> ComputationTimer {
        self.computation_stats.total.fetch_add(1, Ordering::Relaxed);
        let counter = match algorithm {
            Algorithm::EdmondsKarp => &self.computation_stats.edmonds_karp,
            Algorithm::Dinic => &self.computation_stats.dinic,
        };
        counter.fetch_add(1, Ordering::Relaxed);
        ComputationTimer::new()
    }

    /// 记录计算完成
    pub fn record_computation_complete(&self, timer: ComputationTimer, augmentations: u64, success: bool) {
        let duration = timer.elapsed();

        if success {
            self.computation_stats.success.fetch_add(1, Ordering::Relaxed);
        } else {
            self.computation_stats.failed.fetch_add(1, Ordering::Relaxed);
        }

        self.computation_stats
            .augmentations
            .fetch_add(augmentations, Ordering::Relaxed);
        self.computation_stats
            .total_duration_us
            .fetch_add(duration.as_micros() as u64, Ordering::Relaxed);
    }

    /// 记录加边
    pub fn record_edge_added(&self) {
        self.graph_stats.edges_added.fetch_add(1, Ordering::Relaxed);
    }

    /// 记录会话创建
    pub fn record_session_created(&self) {
        self.graph_stats.sessions_created.fetch_add(1, Ordering::Relaxed);
    }

    /// 记录会话关闭
    pub fn record_session_closed(&self) {
        self.graph_stats.sessions_closed.fetch_add(1, Ordering::Relaxed);
    }

    /// 获取指标快照
    pub fn snapshot(&self) -> MetricsSnapshot {
        let stats = &self.computation_stats;
        let total = stats.total.load(Ordering::Relaxed);
        let total_duration_us = stats.total_duration_us.load(Ordering::Relaxed);
        let created = self.graph_stats.sessions_created.load(Ordering::Relaxed);
        let closed = self.graph_stats.sessions_closed.load(Ordering::Relaxed);

        let avg_computation_duration_ms = if total > 0 {
            (total_duration_us as f64) / (total as f64) / 1000.0
        } else {
            0.0
        };

        MetricsSnapshot {
            total_computations: total,
            success_computations: stats.success.load(Ordering::Relaxed),
            failed_computations: stats.failed.load(Ordering::Relaxed),
            edmonds_karp_computations: stats.edmonds_karp.load(Ordering::Relaxed),
            dinic_computations: stats.dinic.load(Ordering::Relaxed),
            augmentations: stats.augmentations.load(Ordering::Relaxed),
            avg_computation_duration_ms,
            edges_added: self.graph_stats.edges_added.load(Ordering::Relaxed),
            sessions_created: created,
            active_sessions: created.saturating_sub(closed),
            uptime_seconds: self.start_time.elapsed().as_secs(),
        }
    }

    /// 导出为 Prometheus 格式
    pub fn to_prometheus(&self) -> PrometheusMetrics {
        let snapshot = self.snapshot();
        let mut content = String::new();

        let mut metric = |name: &str, kind: &str, help: &str, value: String| {
            content.push_str(&format!("# HELP flowtrace_{name} {help}\n"));
            content.push_str(&format!("# TYPE flowtrace_{name} {kind}\n"));
            content.push_str(&format!("flowtrace_{name} {value}\n"));
        };

        metric(
            "computations_total",
            "counter",
            "Total number of max flow computations",
            snapshot.total_computations.to_string(),
        );
        metric(
            "computations_failed_total",
            "counter",
            "Number of failed computations",
            snapshot.failed_computations.to_string(),
        );
        metric(
            "edmonds_karp_computations_total",
            "counter",
            "Computations run with Edmonds-Karp",
            snapshot.edmonds_karp_computations.to_string(),
        );
        metric(
            "dinic_computations_total",
            "counter",
            "Computations run with Dinic",
            snapshot.dinic_computations.to_string(),
        );
        metric(
            "augmentations_total",
            "counter",
            "Augmenting paths applied",
            snapshot.augmentations.to_string(),
        );
        metric(
            "computation_duration_avg_ms",
            "gauge",
            "Average computation duration in milliseconds",
            format!("{:.3}", snapshot.avg_computation_duration_ms),
        );
        metric(
            "edges_added_total",
            "counter",
            "Total edges added",
            snapshot.edges_added.to_string(),
        );
        metric(
            "sessions_active",
            "gauge",
            "Open engine sessions",
            snapshot.active_sessions.to_string(),
        );
        metric(
            "uptime_seconds",
            "counter",
            "System uptime in seconds",
            snapshot.uptime_seconds.to_string(),
        );

        PrometheusMetrics { content }
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

/// 计算计时器
pub struct ComputationTimer {
    start: Instant,
}

impl ComputationTimer {
    fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

/// 全局指标实例
static METRICS: once_cell::sync::Lazy<Arc<Metrics>> =
    once_cell::sync::Lazy::new(|| Arc::new(Metrics::new()));

/// 获取全局指标实例
pub fn global_metrics() -> Arc<Metrics> {
    METRICS.clone()
}
