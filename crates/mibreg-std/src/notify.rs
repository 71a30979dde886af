//! Change notification.
//!
//! Subscribers run synchronously, in registration order, on the thread
//! that refreshed the registry.

use std::fmt;

/// Error a subscriber may return to stop delivery.
pub type SubscriberError = Box<dyn std::error::Error + Send + Sync>;

type Callback = Box<dyn FnMut() -> Result<(), SubscriberError> + Send>;

/// Handle returned by [`ChangeNotifier::subscribe`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

/// Ordered list of change callbacks.
#[derive(Default)]
pub struct ChangeNotifier {
    next_id: u64,
    subscribers: Vec<(SubscriptionId, Callback)>,
}

impl ChangeNotifier {
    /// Register a callback, run after every later notification.
    pub fn subscribe<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: FnMut() -> Result<(), SubscriberError> + Send + 'static,
    {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.subscribers.push((id, Box::new(callback)));
        id
    }

    /// Remove a callback. Returns false if `id` was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sub, _)| *sub != id);
        self.subscribers.len() != before
    }

    /// Number of registered callbacks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.subscribers.len()
    }

    /// True if nobody is subscribed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.subscribers.is_empty()
    }

    /// Call every subscriber in order.
    ///
    /// # Errors
    ///
    /// The first subscriber error. Subscribers after it are not called.
    pub fn notify(&mut self) -> Result<(), SubscriberError> {
        for (_, callback) in &mut self.subscribers {
            callback()?;
        }
        Ok(())
    }
}

impl fmt::Debug for ChangeNotifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChangeNotifier")
            .field("subscribers", &self.subscribers.len())
            .finish_non_exhaustive()
    }
}
