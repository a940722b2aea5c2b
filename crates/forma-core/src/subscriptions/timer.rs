use crate::subscription::{SubscriptionId, SubscriptionSource};
use futures::stream::BoxStream;
use std::time::{Duration, Instant};

/// A one-shot delay that fires once after the specified duration.
///
/// The `key` is part of the subscription identity, so a widget can keep one
/// pending timer per purpose per instance. Declaring the same `After` again
/// while it is pending is a no-op; dropping it from the subscription list
/// cancels it.
///
/// # Example
///
/// ```rust,ignore
/// use std::time::Duration;
/// use forma_core::subscriptions::After;
/// use forma_core::subscription::subscribe;
///
/// let sub = subscribe(After::keyed(Duration::from_millis(50), ("reposition", id)))
///     .map(|_| Msg::RepositionElapsed);
/// ```
pub struct After {
    /// How long to wait before firing.
    pub duration: Duration,
    key: u64,
}

impl After {
    /// Create a new one-shot delay for the given duration.
    pub fn new(duration: Duration) -> Self {
        Self { duration, key: 0 }
    }

    /// Create a one-shot delay whose identity also includes `key`.
    pub fn keyed(duration: Duration, key: impl std::hash::Hash) -> Self {
        use std::hash::Hasher;
        let mut hasher = std::hash::DefaultHasher::new();
        key.hash(&mut hasher);
        Self {
            duration,
            key: hasher.finish(),
        }
    }
}

impl SubscriptionSource for After {
    type Output = Instant;

    fn id(&self) -> SubscriptionId {
        SubscriptionId::keyed::<Self>((self.duration.as_nanos(), self.key))
    }

    fn stream(self) -> BoxStream<'static, Instant> {
        let stream = futures::stream::once(async move {
            tokio::time::sleep(self.duration).await;
            Instant::now()
        });
        Box::pin(stream)
    }
}
