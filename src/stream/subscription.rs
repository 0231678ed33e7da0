//! Subscription handles and lifetimes.

/// Handle to a registered subscriber. Dropping it unsubscribes.
///
/// It is safe to drop the handle from inside the subscriber's own callback:
/// the callback finishes its current delivery and receives nothing further.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    release: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    pub(crate) fn new(release: impl FnOnce() + 'static) -> Self {
        Self {
            release: Some(Box::new(release)),
        }
    }

    /// Keep the subscriber registered for as long as its source lives.
    pub fn detach(mut self) {
        self.release = None;
    }

    /// Whether this handle still controls a subscriber.
    pub fn is_active(&self) -> bool {
        self.release.is_some()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.is_active())
            .finish()
    }
}

/// Owns a group of subscriptions and releases all of them when dropped.
#[derive(Debug, Default)]
pub struct Lifetime {
    subscriptions: Vec<Subscription>,
}

impl Lifetime {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, subscription: Subscription) {
        self.subscriptions.push(subscription);
    }
}
