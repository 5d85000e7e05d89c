//! Ordered provider fallback chains

use futures::future::BoxFuture;
use tracing::{debug, warn};

/// An ordered list of provider tiers for one data kind
///
/// Tiers are awaited strictly in the order they were added; the first tier to
/// yield `Some` wins and later tiers are never polled. Each invocation builds
/// a fresh chain; there is no cross-request state, no retry, and no circuit
/// breaking. Exhausting every tier yields `None`.
pub struct FallbackChain<'a, T> {
    kind: &'static str,
    tiers: Vec<(&'static str, BoxFuture<'a, Option<T>>)>,
}

impl<'a, T> FallbackChain<'a, T> {
    /// Start an empty chain for the named data kind
    pub fn new(kind: &'static str) -> Self {
        Self {
            kind,
            tiers: Vec::new(),
        }
    }

    /// Append a tier; the future runs only if every earlier tier came back
    /// empty
    pub fn tier<F>(mut self, provider: &'static str, fut: F) -> Self
    where
        F: std::future::Future<Output = Option<T>> + Send + 'a,
    {
        self.tiers.push((provider, Box::pin(fut)));
        self
    }

    /// Await tiers in order, returning the first non-empty result
    pub async fn resolve(self) -> Option<T> {
        for (provider, fut) in self.tiers {
            if let Some(value) = fut.await {
                debug!(kind = self.kind, provider, "fallback tier succeeded");
                return Some(value);
            }
            warn!(kind = self.kind, provider, "fallback tier yielded no data");
        }
        warn!(kind = self.kind, "all fallback tiers exhausted");
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn test_first_success_wins() {
        let second_calls = AtomicUsize::new(0);
        let result = FallbackChain::new("quote")
            .tier("primary", async { Some(42) })
            .tier("secondary", async {
                second_calls.fetch_add(1, Ordering::SeqCst);
                Some(7)
            })
            .resolve()
            .await;
        assert_eq!(result, Some(42));
        // Later tiers are never polled once an earlier one succeeds.
        assert_eq!(second_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_advances_past_empty_tiers() {
        let result = FallbackChain::new("quote")
            .tier("primary", async { None })
            .tier("secondary", async { Some("fallback data") })
            .resolve()
            .await;
        assert_eq!(result, Some("fallback data"));
    }

    #[tokio::test]
    async fn test_exhaustion_yields_none() {
        let result: Option<u8> = FallbackChain::new("quote")
            .tier("primary", async { None })
            .tier("secondary", async { None })
            .tier("tertiary", async { None })
            .resolve()
            .await;
        assert_eq!(result, None);
    }

    #[tokio::test]
    async fn test_tiers_run_in_declared_order() {
        let counter = AtomicUsize::new(0);
        let result = FallbackChain::new("ohlc")
            .tier("first", async {
                assert_eq!(counter.fetch_add(1, Ordering::SeqCst), 0);
                None::<u8>
            })
            .tier("second", async {
                assert_eq!(counter.fetch_add(1, Ordering::SeqCst), 1);
                None
            })
            .tier("third", async {
                assert_eq!(counter.fetch_add(1, Ordering::SeqCst), 2);
                Some(9)
            })
            .resolve()
            .await;
        assert_eq!(result, Some(9));
        assert_eq!(counter.load(Ordering::SeqCst), 3);
    }
}
