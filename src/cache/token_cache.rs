use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::cache::token::{AccessToken, TokenScope};

/// Scope-keyed token cache.
///
/// Reads and writes take the lock separately, so two requests that both see an
/// expired token may both refresh it. The last write wins.
#[derive(Debug, Clone, Default)]
pub struct TokenCache {
    inner: Arc<RwLock<HashMap<TokenScope, AccessToken>>>,
    safety_margin_seconds: u64,
}

impl TokenCache {
    pub fn new(safety_margin_seconds: u64) -> Self {
        Self {
            inner: Arc::new(RwLock::new(HashMap::new())),
            safety_margin_seconds,
        }
    }

    /// Insert token under its own scope
    pub async fn set(&self, token: AccessToken) {
        let mut map = self.inner.write().await;
        map.insert(token.scope.clone(), token);
    }

    /// Get token if it exists and is not expired
    pub async fn get(&self, scope: &TokenScope) -> Option<AccessToken> {
        let map = self.inner.read().await;
        map.get(scope)
            .filter(|token| token.is_valid_at(Utc::now(), self.safety_margin_seconds))
            .cloned()
    }

    #[cfg(test)]
    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    #[cfg(test)]
    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[tokio::test]
    async fn keeps_tokens_per_scope() {
        let cache = TokenCache::new(0);
        let now = Utc::now();
        cache.set(AccessToken::new("api-tok".into(), TokenScope::Api, None, 3600, now).unwrap()).await;
        cache.set(AccessToken::new("cust-tok".into(), TokenScope::customer("c1"), None, 3600, now).unwrap()).await;

        assert_eq!(cache.len().await, 2);
        assert_eq!(cache.get(&TokenScope::Api).await.map(|t| t.value), Some("api-tok".to_string()));
        assert_eq!(cache.get(&TokenScope::customer("c1")).await.map(|t| t.value), Some("cust-tok".to_string()));
        assert!(cache.get(&TokenScope::customer("c2")).await.is_none());
    }

    #[tokio::test]
    async fn hides_expired_tokens() {
        let cache = TokenCache::new(0);
        let issued = Utc::now() - Duration::seconds(120);
        cache.set(AccessToken::new("old".into(), TokenScope::Api, None, 60, issued).unwrap()).await;

        assert!(cache.get(&TokenScope::Api).await.is_none());
        assert_eq!(cache.len().await, 1);
    }

    #[tokio::test]
    async fn safety_margin_shortens_validity() {
        let cache = TokenCache::new(30);
        cache.set(AccessToken::new("short".into(), TokenScope::Api, None, 20, Utc::now()).unwrap()).await;

        assert!(cache.get(&TokenScope::Api).await.is_none());
    }
}
