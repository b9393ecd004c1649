//! Bearer-token authentication context.
//!
//! The token is cached in memory and only re-read from its source once the cache
//! expires or a request comes back 401.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::RwLock;

use crate::errors::{WorkflowError, WorkflowResult};

/// Where the bearer token is persisted.
pub trait TokenSource: Send + Sync {
    /// Read the current token, `None` when logged out.
    fn load(&self) -> WorkflowResult<Option<String>>;
}

/// A fixed token, mainly for tools and tests.
#[derive(Debug, Clone)]
pub struct StaticToken(pub String);

impl TokenSource for StaticToken {
    fn load(&self) -> WorkflowResult<Option<String>> {
        Ok(Some(self.0.clone()))
    }
}

/// Token persisted in a file. A missing or blank file means logged out.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl TokenSource for FileTokenStore {
    fn load(&self) -> WorkflowResult<Option<String>> {
        match std::fs::read_to_string(&self.path) {
            Ok(contents) => {
                let token = contents.trim();
                Ok((!token.is_empty()).then(|| token.to_string()))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

struct CachedToken {
    value: String,
    loaded_at: Instant,
}

/// Shared auth context injected into the API client.
#[derive(Clone)]
pub struct AuthContext {
    source: Arc<dyn TokenSource>,
    ttl: Duration,
    cache: Arc<RwLock<Option<CachedToken>>>,
}

impl AuthContext {
    pub fn new(source: impl TokenSource + 'static, ttl: Duration) -> Self {
        Self {
            source: Arc::new(source),
            ttl,
            cache: Arc::new(RwLock::new(None)),
        }
    }

    /// Return the cached token, refreshing it from the source when stale.
    pub async fn token(&self) -> WorkflowResult<String> {
        {
            let cache = self.cache.read().await;
            if let Some(cached) = cache.as_ref() {
                if cached.loaded_at.elapsed() < self.ttl {
                    return Ok(cached.value.clone());
                }
            }
        }

        let mut cache = self.cache.write().await;
        // Another caller may have refreshed while we waited for the write lock.
        if let Some(cached) = cache.as_ref() {
            if cached.loaded_at.elapsed() < self.ttl {
                return Ok(cached.value.clone());
            }
        }

        tracing::debug!("Refreshing bearer token from source");
        match self.source.load()? {
            Some(value) => {
                *cache = Some(CachedToken {
                    value: value.clone(),
                    loaded_at: Instant::now(),
                });
                Ok(value)
            }
            None => {
                *cache = None;
                Err(WorkflowError::unauthorized("Not logged in"))
            }
        }
    }

    /// Drop the cached token so the next request re-reads the source.
    pub async fn invalidate(&self) {
        tracing::warn!("Invalidating cached bearer token");
        *self.cache.write().await = None;
    }
}

impl std::fmt::Debug for AuthContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthContext")
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingSource {
        loads: Arc<AtomicUsize>,
    }

    impl TokenSource for CountingSource {
        fn load(&self) -> WorkflowResult<Option<String>> {
            let n = self.loads.fetch_add(1, Ordering::SeqCst);
            Ok(Some(format!("token-{}", n)))
        }
    }

    #[tokio::test]
    async fn test_token_is_cached_until_invalidated() {
        let loads = Arc::new(AtomicUsize::new(0));
        let auth = AuthContext::new(
            CountingSource {
                loads: loads.clone(),
            },
            Duration::from_secs(60),
        );

        assert_eq!(auth.token().await.unwrap(), "token-0");
        assert_eq!(auth.token().await.unwrap(), "token-0");
        assert_eq!(loads.load(Ordering::SeqCst), 1);

        auth.invalidate().await;
        assert_eq!(auth.token().await.unwrap(), "token-1");
        assert_eq!(loads.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_zero_ttl_rereads_every_time() {
        let loads = Arc::new(AtomicUsize::new(0));
        let auth = AuthContext::new(
            CountingSource {
                loads: loads.clone(),
            },
            Duration::ZERO,
        );

        auth.token().await.unwrap();
        auth.token().await.unwrap();
        assert_eq!(loads.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_file_store_missing_or_blank_is_logged_out() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("token");

        let auth = AuthContext::new(FileTokenStore::new(&path), Duration::from_secs(60));
        let err = auth.token().await.unwrap_err();
        assert!(err.is_unauthorized());

        std::fs::write(&path, "   \n").unwrap();
        assert!(auth.token().await.unwrap_err().is_unauthorized());

        std::fs::write(&path, "abc123\n").unwrap();
        assert_eq!(auth.token().await.unwrap(), "abc123");
    }
}
