//! 图文件导入模块
//!
//! 支持 JSON 图描述与 CSV 边列表（`from,to,capacity`，带表头）

use crate::error::{Error, Result};
use crate::types::{Algorithm, Capacity, VertexId};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// 图描述：顶点数、边三元组以及可选的源汇与算法
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphFile {
    pub vertex_count: usize,
    pub edges: Vec<(VertexId, VertexId, Capacity)>,
    #[serde(default)]
    pub source: Option<VertexId>,
    #[serde(default)]
    pub sink: Option<VertexId>,
    #[serde(default)]
    pub algorithm: Option<Algorithm>,
}

/// CSV 中的一行
#[derive(Debug, Deserialize)]
struct EdgeRecord {
    from: VertexId,
    to: VertexId,
    capacity: Capacity,
}

/// 输入格式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GraphFormat {
    Json,
    Csv,
}

impl GraphFormat {
    /// 按扩展名推断，默认 JSON
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("csv") => GraphFormat::Csv,
            _ => GraphFormat::Json,
        }
    }
}

impl GraphFile {
    /// 解析 JSON 图描述
    pub fn from_json<R: Read>(reader: R) -> Result<Self> {
        let file: GraphFile =
            serde_json::from_reader(reader).map_err(|e| Error::ImportError(e.to_string()))?;
        Ok(file)
    }

    /// 解析 CSV 边列表；未给出顶点数时取最大下标 + 1
    pub fn from_csv<R: Read>(reader: R, vertex_count: Option<usize>) -> Result<Self> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut edges = Vec::new();
        for record in csv_reader.deserialize() {
            let record: EdgeRecord = record?;
            edges.push((record.from, record.to, record.capacity));
        }

        let inferred = edges
            .iter()
            .map(|&(u, v, _)| u.max(v) + 1)
            .max()
            .unwrap_or(1);

        Ok(GraphFile {
            vertex_count: vertex_count.unwrap_or(inferred),
            edges,
            source: None,
            sink: None,
            algorithm: None,
        })
    }

    /// 从文件读取，格式按扩展名推断
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;
        match GraphFormat::from_path(path) {
            GraphFormat::Json => Self::from_json(file),
            GraphFormat::Csv => Self::from_csv(file, None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_json_graph() {
        let json = r#"{
            "vertex_count": 4,
            "edges": [[0, 1, 10], [1, 2, 15]],
            "source": 0,
            "sink": 2,
            "algorithm": "Edmonds-Karp"
        }"#;
        let graph = GraphFile::from_json(json.as_bytes()).unwrap();

        assert_eq!(graph.vertex_count, 4);
        assert_eq!(graph.edges, vec![(0, 1, 10), (1, 2, 15)]);
        assert_eq!(graph.sink, Some(2));
        assert_eq!(graph.algorithm, Some(Algorithm::EdmondsKarp));
    }

    #[test]
    fn test_json_rejects_garbage() {
        assert!(matches!(
            GraphFile::from_json("[1, 2".as_bytes()),
            Err(Error::ImportError(_))
        ));
    }

    #[test]
    fn test_csv_edge_list() {
        let csv = "from,to,capacity\n0, 1, 10\n1,3,4\n";
        let graph = GraphFile::from_csv(csv.as_bytes(), None).unwrap();

        assert_eq!(graph.vertex_count, 4);
        assert_eq!(graph.edges, vec![(0, 1, 10), (1, 3, 4)]);

        let graph = GraphFile::from_csv(csv.as_bytes(), Some(9)).unwrap();
        assert_eq!(graph.vertex_count, 9);
    }

    #[test]
    fn test_csv_bad_row() {
        let csv = "from,to,capacity\n0,x,10\n";
        assert!(matches!(
            GraphFile::from_csv(csv.as_bytes(), None),
            Err(Error::ImportError(_))
        ));
    }

    #[test]
    fn test_load_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("edges.csv");
        let mut file = File::create(&path).unwrap();
        writeln!(file, "from,to,capacity").unwrap();
        writeln!(file, "0,2,5").unwrap();

        let graph = GraphFile::load(&path).unwrap();
        assert_eq!(graph.vertex_count, 3);
        assert_eq!(GraphFormat::from_path(Path::new("g.JSON")), GraphFormat::Json);
        assert!(matches!(
            GraphFile::load(dir.path().join("missing.json")),
            Err(Error::IoError(_))
        ));
    }
}
