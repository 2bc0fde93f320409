//! HTTP 服务器模块
//!
//! 提供最大流计算的 REST 接口。每个会话持有独立引擎，
//! 另有无状态的一次性计算接口。

use crate::engine::{EngineConfig, FlowEngine, FlowReport};
use crate::error::{Error, Result};
use crate::metrics;
use crate::session::{SessionId, SessionInfo, SessionRegistry};
use crate::trace::{Trace, TraceSteps};
use crate::types::{Algorithm, Capacity, EdgeIndex, VertexId};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

/// 服务器配置
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub engine: EngineConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            engine: EngineConfig::default(),
        }
    }
}

/// 应用状态
#[derive(Clone)]
pub struct AppState {
    pub sessions: Arc<SessionRegistry>,
    pub engine_config: EngineConfig,
}

impl AppState {
    pub fn new(engine_config: EngineConfig) -> Self {
        Self {
            sessions: Arc::new(SessionRegistry::new(engine_config)),
            engine_config,
        }
    }
}

/// 构建路由
pub fn router(state: AppState) -> Router {
    Router::new()
        // 健康检查
        .route("/health", get(health_check))
        // 指标
        .route("/metrics", get(metrics_handler))
        .route("/stats", get(stats_handler))
        // 一次性计算
        .route("/max-flow", post(solve))
        // 会话
        .route("/sessions", post(create_session))
        .route("/sessions/:id", get(session_info).delete(delete_session))
        .route("/sessions/:id/reset", post(reset_graph))
        .route("/sessions/:id/edges", post(add_edges))
        .route("/sessions/:id/max-flow", post(compute_max_flow))
        .route("/sessions/:id/trace", get(get_trace))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// 启动服务器
pub async fn start_server(config: ServerConfig) -> Result<()> {
    let app = router(AppState::new(config.engine));

    let addr = format!("{}:{}", config.host, config.port);
    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|e| Error::ServerError(format!("绑定地址失败: {}", e)))?;
    info!("flowtrace 服务器启动于 http://{}", addr);

    axum::serve(listener, app)
        .await
        .map_err(|e| Error::ServerError(format!("服务器错误: {}", e)))?;

    Ok(())
}

// ==================== 处理器 ====================

async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Prometheus 格式指标
async fn metrics_handler() -> Response {
    let prom = metrics::global_metrics().to_prometheus();
    (
        StatusCode::OK,
        [("Content-Type", "text/plain; version=0.0.4")],
        prom.content,
    )
        .into_response()
}

/// 详细统计信息
async fn stats_handler(State(state): State<AppState>) -> impl IntoResponse {
    let snapshot = metrics::global_metrics().snapshot();
    Json(ApiResponse::success(serde_json::json!({
        "metrics": snapshot,
        "open_sessions": state.sessions.len(),
    })))
}

/// 一次性计算请求（外部渲染层的完整输入）
#[derive(Debug, Deserialize)]
pub struct SolveRequest {
    pub vertex_count: usize,
    pub edges: Vec<(VertexId, VertexId, Capacity)>,
    pub source: VertexId,
    pub sink: VertexId,
    #[serde(default = "default_algorithm")]
    pub algorithm: Algorithm,
    /// 缺省时沿用服务器配置
    #[serde(default)]
    pub trace: Option<bool>,
}

fn default_algorithm() -> Algorithm {
    Algorithm::Dinic
}

async fn solve(
    State(state): State<AppState>,
    Json(req): Json<SolveRequest>,
) -> Result<Json<ApiResponse<FlowReport>>> {
    let config = EngineConfig {
        record_trace: req.trace.unwrap_or(state.engine_config.record_trace),
        ..state.engine_config
    };
    let report = FlowEngine::solve(
        req.vertex_count,
        &req.edges,
        req.source,
        req.sink,
        req.algorithm,
        config,
    )?;
    Ok(Json(ApiResponse::success(report)))
}

/// 创建会话请求
#[derive(Debug, Deserialize)]
pub struct VertexCountRequest {
    pub vertex_count: usize,
}

async fn create_session(
    State(state): State<AppState>,
    Json(req): Json<VertexCountRequest>,
) -> Result<(StatusCode, Json<ApiResponse<SessionInfo>>)> {
    let id = state.sessions.create(req.vertex_count)?;
    let info = state.sessions.info(&id)?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(info))))
}

async fn session_info(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<SessionInfo>>> {
    let id: SessionId = id.parse()?;
    Ok(Json(ApiResponse::success(state.sessions.info(&id)?)))
}

async fn delete_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    let id: SessionId = id.parse()?;
    state.sessions.remove(&id)?;
    Ok(StatusCode::NO_CONTENT)
}

async fn reset_graph(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<VertexCountRequest>,
) -> Result<Json<ApiResponse<SessionInfo>>> {
    let id: SessionId = id.parse()?;
    state
        .sessions
        .get(&id)?
        .with_engine(|engine| engine.reset_graph(req.vertex_count))?;
    Ok(Json(ApiResponse::success(state.sessions.info(&id)?)))
}

/// 加边请求
#[derive(Debug, Deserialize)]
pub struct AddEdgesRequest {
    pub edges: Vec<(VertexId, VertexId, Capacity)>,
}

#[derive(Debug, Serialize)]
pub struct AddEdgesResponse {
    pub edge_indices: Vec<EdgeIndex>,
}

async fn add_edges(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<AddEdgesRequest>,
) -> Result<Json<ApiResponse<AddEdgesResponse>>> {
    let id: SessionId = id.parse()?;
    let edge_indices = state
        .sessions
        .get(&id)?
        .with_engine(|engine| engine.add_edges(req.edges))?;
    Ok(Json(ApiResponse::success(AddEdgesResponse { edge_indices })))
}

/// 会话内计算请求
#[derive(Debug, Deserialize)]
pub struct MaxFlowRequest {
    pub source: VertexId,
    pub sink: VertexId,
    #[serde(default = "default_algorithm")]
    pub algorithm: Algorithm,
    #[serde(default)]
    pub trace: Option<bool>,
}

async fn compute_max_flow(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<MaxFlowRequest>,
) -> Result<Json<ApiResponse<FlowReport>>> {
    let id: SessionId = id.parse()?;
    let report = state.sessions.get(&id)?.with_engine(|engine| {
        let record_trace = req.trace.unwrap_or(engine.config().record_trace);
        engine.compute_max_flow_with_trace(req.source, req.sink, req.algorithm, record_trace)
    })?;
    Ok(Json(ApiResponse::success(report)))
}

/// 轨迹及其分组视图
#[derive(Debug, Serialize)]
pub struct TraceView {
    pub trace: Trace,
    pub steps: TraceSteps,
}

async fn get_trace(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Option<TraceView>>>> {
    let id: SessionId = id.parse()?;
    let view = state.sessions.get(&id)?.with_engine(|engine| {
        engine.last_trace().map(|trace| TraceView {
            steps: trace.steps(),
            trace: trace.clone(),
        })
    });
    Ok(Json(ApiResponse::success(view)))
}

/// API 响应
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(msg: &str) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(msg.to_string()),
        }
    }
}

impl<T> IntoResponse for ApiResponse<T>
where
    T: Serialize,
{
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = match &self {
            Error::SessionNotFound(_) => StatusCode::NOT_FOUND,
            e if e.is_validation() => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(ApiResponse::<()>::error(&self.to_string()))).into_response()
    }
}
