// Schedule lock
//
// Serialises every check-then-write sequence (approve, decline, update and
// delete) within one process so two overlapping events can't both pass the
// conflict check.

use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

#[derive(Debug, Clone, Default)]
pub struct ScheduleLock {
    inner: Arc<Mutex<()>>,
}

impl ScheduleLock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access; released when the guard drops
    pub async fn acquire(&self) -> OwnedMutexGuard<()> {
        self.inner.clone().lock_owned().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_clones_share_one_lock() {
        let lock = ScheduleLock::new();
        let other = lock.clone();

        let guard = lock.acquire().await;
        let blocked = tokio::time::timeout(Duration::from_millis(20), other.acquire()).await;
        assert!(blocked.is_err());

        drop(guard);
        let acquired = tokio::time::timeout(Duration::from_millis(200), other.acquire()).await;
        assert!(acquired.is_ok());
    }
}
