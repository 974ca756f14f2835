// ── Notification queue ──
//
// Transient user-facing messages. Each one gets a unique id and its own
// expiry timer; expiry removes by id, so independent timers never remove
// the wrong entry.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::stream::StateStream;

/// How long a notification stays visible unless told otherwise.
pub const DEFAULT_DURATION: Duration = Duration::from_millis(3000);

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum NotificationKind {
    Success,
    Error,
    #[default]
    Info,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub id: u64,
    pub message: String,
    pub kind: NotificationKind,
    pub duration: Duration,
}

pub type NotificationSnapshot = Arc<Vec<Notification>>;

/// Auto-expiring notification list. Clones share the same queue.
#[derive(Clone)]
pub struct NotificationQueue {
    inner: Arc<QueueInner>,
}

struct QueueInner {
    items: watch::Sender<NotificationSnapshot>,
    next_id: AtomicU64,
    cancel: CancellationToken,
}

impl QueueInner {
    fn remove(&self, id: u64) -> bool {
        self.items.send_if_modified(|items| {
            let Some(idx) = items.iter().position(|n| n.id == id) else {
                return false;
            };
            Arc::make_mut(items).remove(idx);
            true
        })
    }
}

impl Drop for QueueInner {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

impl Default for NotificationQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl NotificationQueue {
    pub fn new() -> Self {
        let (items, _) = watch::channel(Arc::new(Vec::new()));
        Self {
            inner: Arc::new(QueueInner {
                items,
                next_id: AtomicU64::new(1),
                cancel: CancellationToken::new(),
            }),
        }
    }

    /// Append a notification and schedule its removal after `duration`.
    ///
    /// Expiry needs a tokio runtime; without one the entry stays until
    /// dismissed. After `shutdown` nothing is queued.
    pub fn show(&self, message: impl Into<String>, kind: NotificationKind, duration: Duration) -> u64 {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        if self.inner.cancel.is_cancelled() {
            debug!(id, "notification queue shut down, dropping message");
            return id;
        }

        let notification = Notification {
            id,
            message: message.into(),
            kind,
            duration,
        };
        debug!(id, %kind, message = %notification.message, "notification queued");
        self.inner
            .items
            .send_modify(|items| Arc::make_mut(items).push(notification));

        self.schedule_expiry(id, duration);
        id
    }

    pub fn success(&self, message: impl Into<String>) -> u64 {
        self.show(message, NotificationKind::Success, DEFAULT_DURATION)
    }

    pub fn error(&self, message: impl Into<String>) -> u64 {
        self.show(message, NotificationKind::Error, DEFAULT_DURATION)
    }

    pub fn info(&self, message: impl Into<String>) -> u64 {
        self.show(message, NotificationKind::Info, DEFAULT_DURATION)
    }

    /// Remove a notification before it expires.
    pub fn dismiss(&self, id: u64) -> bool {
        self.inner.remove(id)
    }

    /// Cancel every pending expiry timer and clear the list.
    pub fn shutdown(&self) {
        self.inner.cancel.cancel();
        self.inner.items.send_replace(Arc::new(Vec::new()));
    }

    pub fn snapshot(&self) -> NotificationSnapshot {
        self.inner.items.borrow().clone()
    }

    pub fn len(&self) -> usize {
        self.inner.items.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.items.borrow().is_empty()
    }

    pub fn subscribe(&self) -> StateStream<NotificationSnapshot> {
        StateStream::new(self.inner.items.subscribe())
    }

    fn schedule_expiry(&self, id: u64, duration: Duration) {
        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            warn!(id, "no tokio runtime, notification will not expire");
            return;
        };

        // The timer holds only a weak reference so it never keeps a
        // dropped queue alive.
        let weak: Weak<QueueInner> = Arc::downgrade(&self.inner);
        let token = self.inner.cancel.child_token();
        handle.spawn(async move {
            tokio::select! {
                () = token.cancelled() => {}
                () = tokio::time::sleep(duration) => {
                    if let Some(inner) = weak.upgrade() {
                        inner.remove(id);
                    }
                }
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn messages(queue: &NotificationQueue) -> Vec<String> {
        queue.snapshot().iter().map(|n| n.message.clone()).collect()
    }

    #[tokio::test(start_paused = true)]
    async fn notification_expires_after_default_duration() {
        let queue = NotificationQueue::new();
        queue.success("Saved");
        assert_eq!(queue.len(), 1);
        assert_eq!(queue.snapshot()[0].kind, NotificationKind::Success);

        tokio::time::sleep(Duration::from_millis(2999)).await;
        assert_eq!(queue.len(), 1);

        tokio::time::sleep(Duration::from_millis(2)).await;
        assert!(queue.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn expiry_is_independent_per_notification() {
        let queue = NotificationQueue::new();
        queue.show("short", NotificationKind::Info, Duration::from_millis(100));
        queue.show("long", NotificationKind::Info, Duration::from_millis(500));
        queue.show("short again", NotificationKind::Error, Duration::from_millis(100));

        tokio::time::sleep(Duration::from_millis(150)).await;
        assert_eq!(messages(&queue), vec!["long".to_owned()]);

        tokio::time::sleep(Duration::from_millis(400)).await;
        assert!(queue.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn identical_text_expires_by_id() {
        let queue = NotificationQueue::new();
        let quick = queue.show("Saved", NotificationKind::Success, Duration::from_millis(100));
        let slow = queue.show("Saved", NotificationKind::Success, Duration::from_millis(1000));

        tokio::time::sleep(Duration::from_millis(150)).await;
        let left: Vec<u64> = queue.snapshot().iter().map(|n| n.id).collect();
        assert_eq!(left, vec![slow]);
        assert_ne!(quick, slow);

        tokio::time::sleep(Duration::from_millis(900)).await;
        assert!(queue.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn dismiss_removes_by_id() {
        let queue = NotificationQueue::new();
        let first = queue.info("first");
        let second = queue.info("second");
        assert_ne!(first, second);

        assert!(queue.dismiss(first));
        assert!(!queue.dismiss(first));
        assert_eq!(messages(&queue), vec!["second".to_owned()]);
    }

    #[tokio::test(start_paused = true)]
    async fn shutdown_clears_and_stops_queueing() {
        let queue = NotificationQueue::new();
        queue.error("boom");
        queue.shutdown();
        assert!(queue.is_empty());

        queue.info("late");
        assert!(queue.is_empty());
    }

    #[test]
    fn show_without_runtime_keeps_entry() {
        let queue = NotificationQueue::new();
        queue.info("no runtime");
        assert_eq!(queue.len(), 1);
    }
}
