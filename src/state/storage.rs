//! State storage implementation
//!
//! This module persists conversation and user state documents as JSON,
//! either in process memory or in Redis.

use std::collections::HashMap;
use std::sync::Arc;
use redis::AsyncCommands;
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::{debug, error, info};
use crate::config::{RedisConfig, StorageBackend, StorageConfig};
use crate::utils::errors::Result;

/// Handle to the state storage backend. Clones share the same backend.
#[derive(Clone)]
pub struct StateStorage {
    backend: Backend,
}

#[derive(Clone)]
enum Backend {
    Memory(Arc<RwLock<HashMap<String, Value>>>),
    Redis {
        connection_manager: redis::aio::ConnectionManager,
        config: RedisConfig,
    },
}

impl StateStorage {
    /// Create an empty in-process storage
    pub fn memory() -> Self {
        Self {
            backend: Backend::Memory(Arc::new(RwLock::new(HashMap::new()))),
        }
    }

    /// Connect to Redis
    pub async fn redis(config: RedisConfig) -> Result<Self> {
        let client = redis::Client::open(config.url.as_str())?;
        let connection_manager = redis::aio::ConnectionManager::new(client).await?;

        info!(url = %config.redacted_url(), prefix = %config.prefix, "Connected to Redis state storage");
        Ok(Self {
            backend: Backend::Redis {
                connection_manager,
                config,
            },
        })
    }

    /// Build the backend selected in configuration
    pub async fn from_config(config: &StorageConfig) -> Result<Self> {
        match config.backend {
            StorageBackend::Memory => Ok(Self::memory()),
            StorageBackend::Redis => Self::redis(config.redis.clone()).await,
        }
    }

    pub fn backend_name(&self) -> &'static str {
        match self.backend {
            Backend::Memory(_) => "memory",
            Backend::Redis { .. } => "redis",
        }
    }

    /// Read the documents stored under `keys`. Missing keys are absent from the result.
    pub async fn read(&self, keys: &[String]) -> Result<HashMap<String, Value>> {
        let mut found = HashMap::new();

        match &self.backend {
            Backend::Memory(items) => {
                let items = items.read().await;
                for key in keys {
                    if let Some(value) = items.get(key) {
                        found.insert(key.clone(), value.clone());
                    }
                }
            }
            Backend::Redis { connection_manager, config } => {
                let mut conn = connection_manager.clone();
                for key in keys {
                    let full_key = format!("{}{}", config.prefix, key);
                    let serialized: Option<String> = match conn.get(&full_key).await {
                        Ok(data) => data,
                        Err(e) => {
                            error!(key = %full_key, error = %e, "Failed to read state from Redis");
                            return Err(e.into());
                        }
                    };

                    if let Some(data) = serialized {
                        let value: Value = serde_json::from_str(&data)?;
                        found.insert(key.clone(), value);
                    }
                }
            }
        }

        debug!(requested = keys.len(), found = found.len(), backend = self.backend_name(), "State read");
        Ok(found)
    }

    /// Store documents, replacing whatever was under each key
    pub async fn write(&self, changes: HashMap<String, Value>) -> Result<()> {
        if changes.is_empty() {
            return Ok(());
        }

        let count = changes.len();
        match &self.backend {
            Backend::Memory(items) => {
                items.write().await.extend(changes);
            }
            Backend::Redis { connection_manager, config } => {
                let mut conn = connection_manager.clone();
                for (key, value) in changes {
                    let full_key = format!("{}{}", config.prefix, key);
                    let serialized = serde_json::to_string(&value)?;

                    let result = if config.ttl_seconds > 0 {
                        conn.set_ex::<_, _, ()>(&full_key, serialized, config.ttl_seconds).await
                    } else {
                        conn.set::<_, _, ()>(&full_key, serialized).await
                    };

                    if let Err(e) = result {
                        error!(key = %full_key, error = %e, "Failed to write state to Redis");
                        return Err(e.into());
                    }
                }
            }
        }

        debug!(count = count, backend = self.backend_name(), "State written");
        Ok(())
    }

    /// Remove documents. Unknown keys are ignored.
    pub async fn delete(&self, keys: &[String]) -> Result<()> {
        match &self.backend {
            Backend::Memory(items) => {
                let mut items = items.write().await;
                for key in keys {
                    items.remove(key);
                }
            }
            Backend::Redis { connection_manager, config } => {
                let mut conn = connection_manager.clone();
                for key in keys {
                    let full_key = format!("{}{}", config.prefix, key);
                    let deleted: u32 = conn.del(&full_key).await?;
                    debug!(key = %full_key, deleted = deleted > 0, "State deletion attempted");
                }
            }
        }

        Ok(())
    }

    /// Check if a document exists
    pub async fn exists(&self, key: &str) -> Result<bool> {
        match &self.backend {
            Backend::Memory(items) => Ok(items.read().await.contains_key(key)),
            Backend::Redis { connection_manager, config } => {
                let mut conn = connection_manager.clone();
                let exists: bool = conn.exists(format!("{}{}", config.prefix, key)).await?;
                Ok(exists)
            }
        }
    }

    /// Verify the backend is reachable
    pub async fn test_connection(&self) -> Result<()> {
        if let Backend::Redis { connection_manager, .. } = &self.backend {
            let mut conn = connection_manager.clone();
            let _: String = redis::cmd("PING").query_async(&mut conn).await?;
        }
        Ok(())
    }
}

impl std::fmt::Debug for StateStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.backend {
            Backend::Memory(_) => f.debug_struct("StateStorage")
                .field("backend", &"memory")
                .finish(),
            Backend::Redis { config, .. } => f.debug_struct("StateStorage")
                .field("backend", &"redis")
                .field("url", &config.redacted_url())
                .field("prefix", &config.prefix)
                .field("ttl_seconds", &config.ttl_seconds)
                .finish_non_exhaustive(),
        }
    }
}
