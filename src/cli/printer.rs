//! 结果打印器
//!
//! 提供表格和垂直格式的结果输出

use crate::engine::FlowReport;
use crate::graph::FlowNetwork;
use crate::trace::TraceStep;
use crate::types::EdgeIndex;
use prettytable::{format, row, Cell, Row, Table};

/// 打印模式
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum PrintMode {
    /// 表格模式
    Table,
    /// 垂直模式
    Vertical,
}

/// 结果打印器
pub struct Printer {
    mode: PrintMode,
}

impl Default for Printer {
    fn default() -> Self {
        Self::new(PrintMode::Table)
    }
}

impl Printer {
    pub fn new(mode: PrintMode) -> Self {
        Self { mode }
    }

    /// 设置打印模式
    pub fn set_mode(&mut self, mode: PrintMode) {
        self.mode = mode;
    }

    /// 打印计算结果摘要
    pub fn print_report(&self, report: &FlowReport) -> String {
        let mut table = Table::new();
        table.set_format(*format::consts::FORMAT_BOX_CHARS);
        table.set_titles(row!["Property", "Value"]);
        table.add_row(row!["Algorithm", report.algorithm.name()]);
        table.add_row(row!["Source -> Sink", format!("{} -> {}", report.source, report.sink)]);
        table.add_row(row!["Max Flow", report.max_flow.to_string()]);
        table.add_row(row!["Augmenting Paths", report.augmentations.to_string()]);
        if !report.phases.is_empty() {
            table.add_row(row!["Phase Sink Levels", format!("{:?}", report.phases)]);
        }
        table.add_row(row!["Min Cut (source side)", format!("{:?}", report.min_cut.source_side)]);
        table.add_row(row!["Min Cut Capacity", report.min_cut.capacity.to_string()]);
        table.to_string()
    }

    /// 多个算法结果对比
    pub fn print_comparison(&self, reports: &[FlowReport]) -> String {
        let columns = ["Algorithm", "Max Flow", "Augmenting Paths", "Trace Events"]
            .map(String::from)
            .to_vec();
        let rows: Vec<Vec<String>> = reports
            .iter()
            .map(|r| {
                vec![
                    r.algorithm.name().to_string(),
                    r.max_flow.to_string(),
                    r.augmentations.to_string(),
                    r.trace.len().to_string(),
                ]
            })
            .collect();
        self.render(&columns, &rows)
    }

    /// 按增广步骤打印轨迹
    pub fn print_trace(&self, report: &FlowReport, network: &FlowNetwork) -> String {
        let grouped = report.trace.steps();
        if grouped.steps.is_empty() && grouped.exhausted_frontier.is_empty() {
            return "Empty trace\n".to_string();
        }

        let columns = ["Step", "Frontier", "Path", "Flow Updates"]
            .map(String::from)
            .to_vec();
        let mut rows: Vec<Vec<String>> = grouped
            .steps
            .iter()
            .enumerate()
            .map(|(i, step)| step_row(i + 1, step, network))
            .collect();
        if !grouped.exhausted_frontier.is_empty() {
            rows.push(vec![
                "end".to_string(),
                format_frontier(&grouped.exhausted_frontier),
                "-".to_string(),
                "-".to_string(),
            ]);
        }

        format!("{}{} step(s)\n", self.render(&columns, &rows), grouped.steps.len())
    }

    fn render(&self, columns: &[String], rows: &[Vec<String>]) -> String {
        match self.mode {
            PrintMode::Table => format_table(columns, rows),
            PrintMode::Vertical => format_vertical(columns, rows),
        }
    }
}

fn step_row(index: usize, step: &TraceStep, network: &FlowNetwork) -> Vec<String> {
    let updates = step
        .augmented
        .iter()
        .map(|&(edge, flow)| format!("{}={}", describe_edge(edge, network), flow))
        .collect::<Vec<_>>()
        .join(", ");
    vec![
        index.to_string(),
        format_frontier(&step.frontier),
        format_path(&step.path, network),
        updates,
    ]
}

fn format_frontier(frontier: &[(usize, usize)]) -> String {
    if frontier.is_empty() {
        return "(same level graph)".to_string();
    }
    frontier
        .iter()
        .map(|(v, d)| format!("{v}@{d}"))
        .collect::<Vec<_>>()
        .join(" ")
}

/// 以顶点序列表示路径
fn format_path(path: &[EdgeIndex], network: &FlowNetwork) -> String {
    let mut vertices = Vec::with_capacity(path.len() + 1);
    for (i, &e) in path.iter().enumerate() {
        if let Ok(edge) = network.edge(e) {
            if i == 0 {
                vertices.push(edge.from().to_string());
            }
            vertices.push(edge.to().to_string());
        }
    }
    vertices.join(" -> ")
}

/// 反向边标记为 `~`
fn describe_edge(index: EdgeIndex, network: &FlowNetwork) -> String {
    match network.edge(index) {
        Ok(edge) if edge.is_reverse() => format!("~{}->{}", edge.from(), edge.to()),
        Ok(edge) => format!("{}->{}", edge.from(), edge.to()),
        Err(_) => format!("#{index}"),
    }
}

/// 表格格式
fn format_table(columns: &[String], rows: &[Vec<String>]) -> String {
    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_BOX_CHARS);

    let header: Vec<Cell> = columns.iter().map(|c| Cell::new(c)).collect();
    table.set_titles(Row::new(header));

    for row_data in rows {
        let cells: Vec<Cell> = row_data.iter().map(|v| Cell::new(v)).collect();
        table.add_row(Row::new(cells));
    }

    table.to_string()
}

/// 垂直格式
fn format_vertical(columns: &[String], rows: &[Vec<String>]) -> String {
    let max_col_width = columns.iter().map(|c| c.len()).max().unwrap_or(0);
    let mut output = String::new();

    for (i, row_data) in rows.iter().enumerate() {
        output.push_str(&format!(
            "*************************** {}. row ***************************\n",
            i + 1
        ));

        for (j, col) in columns.iter().enumerate() {
            let value = row_data.get(j).map(|s| s.as_str()).unwrap_or("");
            output.push_str(&format!("{:>width$}: {}\n", col, value, width = max_col_width));
        }
    }

    output
}
