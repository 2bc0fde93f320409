//! flowtrace 服务器入口
//!
//! 启动 HTTP API 服务器

use flowtrace::engine::{EngineConfig, DEFAULT_MAX_EDGES, DEFAULT_MAX_VERTICES};
use flowtrace::server::{start_server, ServerConfig};
use flowtrace::IterationLimit;
use clap::Parser;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "flowtrace-server")]
#[command(about = "flowtrace 最大流 HTTP API 服务器")]
struct Args {
    /// 监听地址
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    /// 监听端口
    #[arg(short, long, default_value = "8080")]
    port: u16,

    /// 增广次数上限（默认按 V·E 推导）
    #[arg(long)]
    max_augmentations: Option<u64>,

    /// 默认不记录轨迹（请求中的 trace 字段可单次覆盖）
    #[arg(long)]
    no_trace: bool,

    /// 单个图的顶点数上限
    #[arg(long, default_value_t = DEFAULT_MAX_VERTICES)]
    max_vertices: usize,

    /// 单个图的边数上限
    #[arg(long, default_value_t = DEFAULT_MAX_EDGES)]
    max_edges: usize,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let engine = EngineConfig {
        record_trace: !args.no_trace,
        iteration_limit: args
            .max_augmentations
            .map_or(IterationLimit::Auto, IterationLimit::Fixed),
        max_vertices: args.max_vertices,
        max_edges: args.max_edges,
    };
    let config = ServerConfig {
        host: args.host,
        port: args.port,
        engine,
    };

    start_server(config).await?;

    Ok(())
}
