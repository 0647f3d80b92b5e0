//! Redis-backed key-value cache, grounded in the teacher's
//! `RedisTokenRepository` (`modules/auth/adapter/outgoing/token_repository_redis.rs`):
//! a `deadpool_redis::Pool`, pipelined SET+EXPIRE pairs, and tests gated on a
//! live `REDIS_URL`.
//!
//! This backs the `KV` binding from the sync/access-layer design (§4.5/§6.5):
//! it is a best-effort cache. Every method swallows its own Redis errors and
//! logs a warning rather than propagating — a cache miss (real or due to a
//! transient Redis failure) must never fail the request it supports.

use async_trait::async_trait;
use deadpool_redis::redis::AsyncCommands;
use deadpool_redis::Pool;

#[async_trait]
pub trait Kv: Send + Sync {
    async fn get(&self, key: &str) -> Option<String>;
    async fn set_ex(&self, key: &str, value: &str, ttl_secs: i64);
    async fn ttl_secs(&self, key: &str) -> Option<i64>;
    async fn expire(&self, key: &str, ttl_secs: i64);
    async fn del(&self, key: &str);
}

#[derive(Clone)]
pub struct RedisKv {
    pool: Pool,
}

impl RedisKv {
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Kv for RedisKv {
    async fn get(&self, key: &str) -> Option<String> {
        let mut conn = match self.pool.get().await {
            Ok(c) => c,
            Err(err) => {
                tracing::warn!(%key, error = %err, "kv get: pool unavailable");
                return None;
            }
        };
        match conn.get::<_, Option<String>>(key).await {
            Ok(v) => v,
            Err(err) => {
                tracing::warn!(%key, error = %err, "kv get failed");
                None
            }
        }
    }

    async fn set_ex(&self, key: &str, value: &str, ttl_secs: i64) {
        let mut conn = match self.pool.get().await {
            Ok(c) => c,
            Err(err) => {
                tracing::warn!(%key, error = %err, "kv set_ex: pool unavailable");
                return;
            }
        };
        let ttl = ttl_secs.max(1) as u64;
        if let Err(err) = conn.set_ex::<_, _, ()>(key, value, ttl).await {
            tracing::warn!(%key, error = %err, "kv set_ex failed");
        }
    }

    async fn ttl_secs(&self, key: &str) -> Option<i64> {
        let mut conn = match self.pool.get().await {
            Ok(c) => c,
            Err(err) => {
                tracing::warn!(%key, error = %err, "kv ttl: pool unavailable");
                return None;
            }
        };
        match conn.ttl::<_, i64>(key).await {
            Ok(ttl) if ttl >= 0 => Some(ttl),
            Ok(_) => None,
            Err(err) => {
                tracing::warn!(%key, error = %err, "kv ttl failed");
                None
            }
        }
    }

    async fn expire(&self, key: &str, ttl_secs: i64) {
        let mut conn = match self.pool.get().await {
            Ok(c) => c,
            Err(err) => {
                tracing::warn!(%key, error = %err, "kv expire: pool unavailable");
                return;
            }
        };
        if let Err(err) = conn.expire::<_, ()>(key, ttl_secs.max(1)).await {
            tracing::warn!(%key, error = %err, "kv expire failed");
        }
    }

    async fn del(&self, key: &str) {
        let mut conn = match self.pool.get().await {
            Ok(c) => c,
            Err(err) => {
                tracing::warn!(%key, error = %err, "kv del: pool unavailable");
                return;
            }
        };
        if let Err(err) = conn.del::<_, ()>(key).await {
            tracing::warn!(%key, error = %err, "kv del failed");
        }
    }
}

/// In-memory fake for unit tests, avoiding a live Redis dependency.
#[cfg(any(test, feature = "test-helpers"))]
pub mod fake {
    use super::Kv;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Default)]
    pub struct FakeKv {
        entries: Mutex<HashMap<String, (String, i64)>>,
    }

    #[async_trait]
    impl Kv for FakeKv {
        async fn get(&self, key: &str) -> Option<String> {
            self.entries.lock().unwrap().get(key).map(|(v, _)| v.clone())
        }

        async fn set_ex(&self, key: &str, value: &str, ttl_secs: i64) {
            self.entries
                .lock()
                .unwrap()
                .insert(key.to_string(), (value.to_string(), ttl_secs));
        }

        async fn ttl_secs(&self, key: &str) -> Option<i64> {
            self.entries.lock().unwrap().get(key).map(|(_, ttl)| *ttl)
        }

        async fn expire(&self, key: &str, ttl_secs: i64) {
            if let Some(entry) = self.entries.lock().unwrap().get_mut(key) {
                entry.1 = ttl_secs;
            }
        }

        async fn del(&self, key: &str) {
            self.entries.lock().unwrap().remove(key);
        }
    }

    #[tokio::test]
    async fn set_then_get_round_trips() {
        let kv = FakeKv::default();
        kv.set_ex("a", "1", 60).await;
        assert_eq!(kv.get("a").await, Some("1".to_string()));
        assert_eq!(kv.ttl_secs("a").await, Some(60));
        kv.del("a").await;
        assert_eq!(kv.get("a").await, None);
    }
}
