//! flowtrace CLI 工具
//!
//! 读取图文件，计算最大流并打印结果与轨迹

use anyhow::{bail, Context};
use clap::Parser;
use flowtrace::cli::{PrintMode, Printer};
use flowtrace::import::GraphFile;
use flowtrace::{Algorithm, EngineConfig, FlowEngine, IterationLimit};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "flowtrace-cli")]
#[command(about = "flowtrace 最大流命令行工具")]
struct Args {
    /// 图文件（.json 图描述或 .csv 边列表）
    #[arg(short, long)]
    input: PathBuf,

    /// 源点（覆盖文件中的值）
    #[arg(short, long)]
    source: Option<usize>,

    /// 汇点（覆盖文件中的值）
    #[arg(short = 't', long)]
    sink: Option<usize>,

    /// 算法: Dinic, Edmonds-Karp
    #[arg(short, long)]
    algorithm: Option<String>,

    /// 打印逐步轨迹
    #[arg(long)]
    trace: bool,

    /// 两种算法都运行并对比
    #[arg(long)]
    compare: bool,

    /// 垂直显示
    #[arg(long)]
    vertical: bool,

    /// 增广次数上限
    #[arg(long)]
    max_augmentations: Option<u64>,

    /// 以 JSON 输出结果
    #[arg(long)]
    json: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let graph = GraphFile::load(&args.input)
        .with_context(|| format!("无法读取图文件 {:?}", args.input))?;

    let source = args.source.or(graph.source).unwrap_or(0);
    let sink = match args.sink.or(graph.sink) {
        Some(sink) => sink,
        None if graph.vertex_count > 0 => graph.vertex_count - 1,
        None => bail!("图中没有顶点"),
    };
    let algorithm = match args.algorithm.as_deref() {
        Some(name) => name.parse::<Algorithm>()?,
        None => graph.algorithm.unwrap_or(Algorithm::Dinic),
    };
    let config = EngineConfig {
        record_trace: args.trace || args.json,
        iteration_limit: args
            .max_augmentations
            .map_or(IterationLimit::Auto, IterationLimit::Fixed),
        ..EngineConfig::default()
    };
    let algorithms: Vec<Algorithm> = if args.compare {
        Algorithm::ALL.to_vec()
    } else {
        vec![algorithm]
    };

    let printer = Printer::new(if args.vertical {
        PrintMode::Vertical
    } else {
        PrintMode::Table
    });

    let mut reports = Vec::new();
    for algorithm in algorithms {
        let mut engine = FlowEngine::with_config(graph.vertex_count, config)?;
        engine.add_edges(graph.edges.iter().copied())?;
        let report = engine.compute_max_flow(source, sink, algorithm)?;

        if !args.json {
            println!("{}", printer.print_report(&report));
            if args.trace {
                println!("{}", printer.print_trace(&report, engine.network()));
            }
        }
        reports.push(report);
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
    } else if args.compare {
        println!("{}", printer.print_comparison(&reports));
        if reports.windows(2).any(|w| w[0].max_flow != w[1].max_flow) {
            bail!("算法结果不一致");
        }
    }

    Ok(())
}
