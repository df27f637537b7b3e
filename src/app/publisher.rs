//! Replay-latest publication of the filtered employee view.
//!
//! The UI never reads the cache directly. It subscribes to a
//! [`ViewPublisher`], which always holds the most recent result of
//! `search(cache, query)`, kept in a `tokio::sync::watch` channel. New
//! subscribers see the current value immediately; intermediate values may be
//! skipped by slow readers.

use crate::domain::Employee;
use std::sync::Arc;
use tokio::sync::watch;

/// An immutable published view.
pub type EmployeeView = Arc<[Employee]>;

/// Holds the current view and hands out subscriptions.
#[derive(Debug)]
pub struct ViewPublisher {
    sender: watch::Sender<EmployeeView>,
}

impl Default for ViewPublisher {
    fn default() -> Self {
        Self::new()
    }
}

impl ViewPublisher {
    /// Creates a publisher whose initial value is the empty view.
    #[must_use]
    pub fn new() -> Self {
        let (sender, _receiver) = watch::channel(EmployeeView::from(Vec::new()));
        Self { sender }
    }

    /// Replaces the current view and notifies subscribers.
    ///
    /// Works whether or not anyone is subscribed.
    pub fn publish(&self, view: Vec<Employee>) {
        let count = view.len();
        self.sender.send_replace(EmployeeView::from(view));
        tracing::trace!(count = count, subscribers = self.sender.receiver_count(), "view published");
    }

    /// Returns the latest published view.
    #[must_use]
    pub fn current(&self) -> EmployeeView {
        self.sender.borrow().clone()
    }

    /// Subscribes to future views; the current one is readable right away.
    #[must_use]
    pub fn subscribe(&self) -> ViewSubscription {
        ViewSubscription {
            receiver: self.sender.subscribe(),
        }
    }
}

/// A UI-side handle on the published view.
///
/// # Example
///
/// ```
/// use roster::app::publisher::ViewPublisher;
/// use roster::Employee;
///
/// let publisher = ViewPublisher::new();
/// publisher.publish(vec![Employee::new("Ann").with_id(1)]);
///
/// let mut subscription = publisher.subscribe();
/// assert_eq!(subscription.current().len(), 1);
/// assert!(!subscription.has_changed());
/// ```
#[derive(Debug, Clone)]
pub struct ViewSubscription {
    receiver: watch::Receiver<EmployeeView>,
}

impl ViewSubscription {
    /// Returns the latest view and marks it as seen.
    pub fn current(&mut self) -> EmployeeView {
        self.receiver.borrow_and_update().clone()
    }

    /// Returns `true` if a view was published since the last `current()`.
    ///
    /// A dropped publisher reports no change.
    #[must_use]
    pub fn has_changed(&self) -> bool {
        self.receiver.has_changed().unwrap_or(false)
    }

    /// Waits for the next publication and returns it.
    ///
    /// Returns `None` once the publisher is gone.
    pub async fn changed(&mut self) -> Option<EmployeeView> {
        self.receiver.changed().await.ok()?;
        Some(self.receiver.borrow_and_update().clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_empty_and_replays_latest() {
        let publisher = ViewPublisher::new();
        assert!(publisher.current().is_empty());

        publisher.publish(vec![Employee::new("A").with_id(1)]);
        publisher.publish(vec![Employee::new("B").with_id(2), Employee::new("C").with_id(3)]);

        let mut late = publisher.subscribe();
        let view = late.current();
        assert_eq!(view.len(), 2);
        assert_eq!(view[0].name, "B");
    }

    #[test]
    fn subscribers_see_changes() {
        let publisher = ViewPublisher::new();
        let mut subscription = publisher.subscribe();
        assert!(!subscription.has_changed());

        publisher.publish(vec![Employee::new("A").with_id(1)]);
        assert!(subscription.has_changed());
        assert_eq!(subscription.current().len(), 1);
        assert!(!subscription.has_changed());
    }

    #[tokio::test]
    async fn changed_resolves_on_publish_and_ends_with_publisher() {
        let publisher = ViewPublisher::new();
        let mut subscription = publisher.subscribe();

        publisher.publish(vec![Employee::new("A").with_id(1)]);
        let view = subscription.changed().await.unwrap();
        assert_eq!(view[0].name, "A");

        drop(publisher);
        assert!(subscription.changed().await.is_none());
    }
}
