//! 通用类型定义

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 顶点 ID，取值范围 `[0, n)`
pub type VertexId = usize;

/// 边在边数组中的下标
///
/// 第 k 条加入的边，正向边位于 `2k`，反向边位于 `2k + 1`。
pub type EdgeIndex = usize;

/// 容量与流量（整数，不使用浮点）
pub type Capacity = i64;

/// 配对边下标（正向 <-> 反向）
#[inline]
pub fn paired(edge: EdgeIndex) -> EdgeIndex {
    edge ^ 1
}

/// 最大流算法
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Algorithm {
    #[serde(rename = "Edmonds-Karp", alias = "edmonds_karp", alias = "EdmondsKarp")]
    EdmondsKarp,
    #[serde(rename = "Dinic", alias = "dinic")]
    Dinic,
}

impl Algorithm {
    pub const ALL: [Algorithm; 2] = [Algorithm::EdmondsKarp, Algorithm::Dinic];

    pub fn name(&self) -> &'static str {
        match self {
            Algorithm::EdmondsKarp => "Edmonds-Karp",
            Algorithm::Dinic => "Dinic",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Algorithm {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "edmonds-karp" | "edmonds_karp" | "edmondskarp" | "ek" => Ok(Algorithm::EdmondsKarp),
            "dinic" => Ok(Algorithm::Dinic),
            _ => Err(Error::UnknownAlgorithm(s.to_string())),
        }
    }
}
