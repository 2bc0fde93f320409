//! 错误类型定义

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("无效的顶点数: {0}")]
    InvalidSize(usize),

    #[error("边数超出上限: {requested}（上限 {limit}）")]
    TooManyEdges { requested: usize, limit: usize },

    #[error("顶点越界: {vertex}（顶点数 {vertex_count}）")]
    InvalidVertex { vertex: usize, vertex_count: usize },

    #[error("无效的容量: {0}")]
    InvalidCapacity(i64),

    #[error("边不存在: {0}")]
    EdgeNotFound(usize),

    #[error("容量超限: 边 {edge} 残余容量 {residual}, 增广量 {amount}")]
    CapacityExceeded {
        edge: usize,
        amount: i64,
        residual: i64,
    },

    #[error("计算超出迭代上限: {limit}")]
    ComputationBoundExceeded { limit: u64 },

    #[error("流量溢出")]
    FlowOverflow,

    #[error("未知算法: {0}")]
    UnknownAlgorithm(String),

    #[error("会话不存在: {0}")]
    SessionNotFound(String),

    #[error("导入错误: {0}")]
    ImportError(String),

    #[error("服务器错误: {0}")]
    ServerError(String),

    #[error("IO 错误: {0}")]
    IoError(#[from] std::io::Error),

    #[error("序列化错误: {0}")]
    SerializationError(String),
}

impl Error {
    /// 是否为引擎内部不变量被破坏（不可恢复）
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Error::CapacityExceeded { .. } | Error::ComputationBoundExceeded { .. } | Error::FlowOverflow
        )
    }

    /// 是否为调用方输入错误
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Error::InvalidSize(_)
                | Error::TooManyEdges { .. }
                | Error::InvalidVertex { .. }
                | Error::InvalidCapacity(_)
                | Error::EdgeNotFound(_)
                | Error::UnknownAlgorithm(_)
                | Error::ImportError(_)
        )
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::SerializationError(e.to_string())
    }
}

impl From<csv::Error> for Error {
    fn from(e: csv::Error) -> Self {
        Error::ImportError(e.to_string())
    }
}
