//! Fixed-size connection pool with bounded connect retry.

use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use tokio_rusqlite::Connection;

use lessonbook_core::storage::{RepositoryError, Result};

use super::error::wrap_err;
use super::schema;

/// How connection acquisition is retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first one.
    pub attempts: u32,
    /// Fixed delay between attempts.
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: 3,
            backoff: Duration::from_secs(1),
        }
    }
}

/// Runs `op` until it succeeds or `policy.attempts` are used up, sleeping
/// `policy.backoff` between attempts. Returns the last error on failure.
pub async fn retry_with_backoff<T, E, F, Fut>(policy: RetryPolicy, mut op: F) -> std::result::Result<T, E>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = std::result::Result<T, E>>,
    E: std::fmt::Display,
{
    let attempts = policy.attempts.max(1);
    let mut attempt = 1;
    loop {
        match op(attempt).await {
            Ok(value) => return Ok(value),
            Err(err) if attempt < attempts => {
                tracing::warn!(
                    attempt,
                    attempts,
                    backoff_ms = policy.backoff.as_millis() as u64,
                    error = %err,
                    "Store connection failed, retrying"
                );
                tokio::time::sleep(policy.backoff).await;
                attempt += 1;
            }
            Err(err) => return Err(err),
        }
    }
}

/// A fixed set of open connections handed out round-robin.
pub struct ConnectionPool {
    connections: Vec<Connection>,
    next: AtomicUsize,
}

impl ConnectionPool {
    /// Opens `size` connections to the database file at `path`, creating the
    /// schema on the first one.
    pub async fn open(path: &str, size: usize, policy: RetryPolicy) -> Result<Self> {
        let size = size.max(1);
        let mut connections = Vec::with_capacity(size);

        for index in 0..size {
            let path = path.to_string();
            let conn = retry_with_backoff(policy, |_| Connection::open(path.clone()))
                .await
                .map_err(|e| {
                    RepositoryError::ConnectionFailed(format!(
                        "{path} after {} attempts: {e}",
                        policy.attempts
                    ))
                })?;

            configure(&conn, index == 0).await?;
            connections.push(conn);
        }

        tracing::info!(path, size, "SQLite pool opened");
        Ok(Self {
            connections,
            next: AtomicUsize::new(0),
        })
    }

    /// Opens a single-connection pool over a private in-memory database.
    pub async fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()
            .await
            .map_err(|e| RepositoryError::ConnectionFailed(e.to_string()))?;
        configure(&conn, true).await?;

        Ok(Self {
            connections: vec![conn],
            next: AtomicUsize::new(0),
        })
    }

    /// Returns the next connection in round-robin order.
    pub fn get(&self) -> &Connection {
        let index = self.next.fetch_add(1, Ordering::Relaxed) % self.connections.len();
        &self.connections[index]
    }

    pub fn size(&self) -> usize {
        self.connections.len()
    }
}

async fn configure(conn: &Connection, create_schema: bool) -> Result<()> {
    conn.call(move |conn| {
        conn.execute_batch(schema::CONNECTION_PRAGMAS)
            .map_err(wrap_err)?;
        if create_schema {
            conn.execute_batch(schema::CREATE_TABLES).map_err(wrap_err)?;
        }
        Ok(())
    })
    .await
    .map_err(|e| RepositoryError::QueryFailed(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicU32;
    use std::sync::Arc;

    fn fast_policy(attempts: u32) -> RetryPolicy {
        RetryPolicy {
            attempts,
            backoff: Duration::from_millis(1),
        }
    }

    #[tokio::test]
    async fn test_retry_succeeds_after_failures() {
        let calls = Arc::new(AtomicU32::new(0));

        let result: std::result::Result<&str, String> = retry_with_backoff(fast_policy(3), |_| {
            let calls = calls.clone();
            async move {
                if calls.fetch_add(1, Ordering::SeqCst) < 2 {
                    Err("refused".to_string())
                } else {
                    Ok("connected")
                }
            }
        })
        .await;

        assert_eq!(result, Ok("connected"));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_retry_gives_up_after_attempts() {
        let calls = Arc::new(AtomicU32::new(0));

        let result: std::result::Result<(), String> = retry_with_backoff(fast_policy(3), |attempt| {
            calls.fetch_add(1, Ordering::SeqCst);
            async move { Err(format!("attempt {attempt}")) }
        })
        .await;

        assert_eq!(result, Err("attempt 3".to_string()));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_round_robin() {
        let dir = std::env::temp_dir().join(format!("lessonbook-pool-{}.db", uuid::Uuid::new_v4()));
        let path = dir.to_string_lossy().to_string();

        let pool = ConnectionPool::open(&path, 3, fast_policy(1)).await.unwrap();
        assert_eq!(pool.size(), 3);

        let first = pool.get() as *const Connection;
        pool.get();
        pool.get();
        assert_eq!(pool.get() as *const Connection, first);

        drop(pool);
        let _ = std::fs::remove_file(&dir);
    }
}
