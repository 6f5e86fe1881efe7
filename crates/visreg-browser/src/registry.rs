//! Per-session comparator registry
//!
//! Each browser session owns at most one comparator. The registry maps
//! session identity to that comparator so later comparisons in the same
//! session reuse it.

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;

use crate::comparator::Comparator;
use crate::error::Result;
use visreg_core::SessionId;

#[derive(Default)]
pub struct ComparatorRegistry {
    comparators: Mutex<HashMap<SessionId, Arc<dyn Comparator>>>,
}

impl ComparatorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self, session: SessionId) -> Option<Arc<dyn Comparator>> {
        self.comparators.lock().await.get(&session).cloned()
    }

    pub async fn contains(&self, session: SessionId) -> bool {
        self.comparators.lock().await.contains_key(&session)
    }

    /// Attach a comparator to a session, replacing any existing one
    pub async fn insert(&self, session: SessionId, comparator: Arc<dyn Comparator>) {
        debug!("Registering comparator for {}", session);
        self.comparators.lock().await.insert(session, comparator);
    }

    /// Return the session's comparator, creating it with `create` if absent
    ///
    /// `create` runs under the registry lock, so the first registration wins.
    pub async fn get_or_try_insert_with<F>(
        &self,
        session: SessionId,
        create: F,
    ) -> Result<Arc<dyn Comparator>>
    where
        F: FnOnce() -> Result<Arc<dyn Comparator>>,
    {
        let mut comparators = self.comparators.lock().await;

        if let Some(existing) = comparators.get(&session) {
            debug!("Reusing comparator for {}", session);
            return Ok(existing.clone());
        }

        let comparator = create()?;
        debug!("Created comparator for {}", session);
        comparators.insert(session, comparator.clone());
        Ok(comparator)
    }

    /// Drop the session's comparator when the session ends
    pub async fn remove(&self, session: SessionId) -> Option<Arc<dyn Comparator>> {
        self.comparators.lock().await.remove(&session)
    }

    pub async fn len(&self) -> usize {
        self.comparators.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.comparators.lock().await.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comparator::MockComparator;
    use visreg_core::VisregError;

    fn mock() -> Arc<dyn Comparator> {
        Arc::new(MockComparator::matching())
    }

    #[tokio::test]
    async fn test_create_once_per_session() {
        let registry = ComparatorRegistry::new();
        let session = SessionId::new();
        let mut created = 0;

        let first = registry
            .get_or_try_insert_with(session, || {
                created += 1;
                Ok(mock())
            })
            .await
            .unwrap();
        let second = registry
            .get_or_try_insert_with(session, || {
                created += 1;
                Ok(mock())
            })
            .await
            .unwrap();

        assert_eq!(created, 1);
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(registry.len().await, 1);
    }

    #[tokio::test]
    async fn test_sessions_are_isolated() {
        let registry = ComparatorRegistry::new();
        let a = SessionId::new();
        let b = SessionId::new();

        registry.insert(a, mock()).await;

        assert!(registry.contains(a).await);
        assert!(!registry.contains(b).await);
        assert!(registry.get(b).await.is_none());
    }

    #[tokio::test]
    async fn test_failed_creation_registers_nothing() {
        let registry = ComparatorRegistry::new();
        let session = SessionId::new();

        let result = registry
            .get_or_try_insert_with(session, || {
                Err(VisregError::Other("engine unavailable".to_string()))
            })
            .await;

        assert!(result.is_err());
        assert!(registry.is_empty().await);
    }

    #[tokio::test]
    async fn test_remove() {
        let registry = ComparatorRegistry::new();
        let session = SessionId::new();
        registry.insert(session, mock()).await;

        assert!(registry.remove(session).await.is_some());
        assert!(registry.is_empty().await);
    }
}
