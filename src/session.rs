//! 会话管理
//!
//! 每个调用方拥有独立的引擎实例；同一会话上的调用通过互斥锁串行化。

use crate::engine::{EngineConfig, FlowEngine};
use crate::error::{Error, Result};
use crate::metrics;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use uuid::Uuid;

/// 会话 ID
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for SessionId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Uuid::parse_str(s)
            .map(SessionId)
            .map_err(|_| Error::SessionNotFound(s.to_string()))
    }
}

/// 会话：引擎与创建时间
pub struct Session {
    engine: Mutex<FlowEngine>,
    created_at: DateTime<Utc>,
}

impl Session {
    /// 独占访问引擎
    pub fn with_engine<R>(&self, f: impl FnOnce(&mut FlowEngine) -> R) -> R {
        f(&mut self.engine.lock())
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// 会话信息
#[derive(Debug, Clone, Serialize)]
pub struct SessionInfo {
    pub id: SessionId,
    pub vertex_count: usize,
    pub edge_count: usize,
    pub created_at: DateTime<Utc>,
}

/// 会话注册表
#[derive(Default)]
pub struct SessionRegistry {
    sessions: DashMap<SessionId, Arc<Session>>,
    config: EngineConfig,
}

impl SessionRegistry {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            sessions: DashMap::new(),
            config,
        }
    }

    /// 创建 `n` 个顶点的新会话
    pub fn create(&self, vertex_count: usize) -> Result<SessionId> {
        let engine = FlowEngine::with_config(vertex_count, self.config)?;
        let id = SessionId::new();
        self.sessions.insert(
            id,
            Arc::new(Session {
                engine: Mutex::new(engine),
                created_at: Utc::now(),
            }),
        );
        metrics::global_metrics().record_session_created();
        Ok(id)
    }

    pub fn get(&self, id: &SessionId) -> Result<Arc<Session>> {
        self.sessions
            .get(id)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| Error::SessionNotFound(id.to_string()))
    }

    pub fn remove(&self, id: &SessionId) -> Result<()> {
        self.sessions
            .remove(id)
            .ok_or_else(|| Error::SessionNotFound(id.to_string()))?;
        metrics::global_metrics().record_session_closed();
        Ok(())
    }

    pub fn info(&self, id: &SessionId) -> Result<SessionInfo> {
        let session = self.get(id)?;
        let (vertex_count, edge_count) = session.with_engine(|engine| {
            (engine.network().vertex_count(), engine.network().edge_count())
        });
        Ok(SessionInfo {
            id: *id,
            vertex_count,
            edge_count,
            created_at: session.created_at(),
        })
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
