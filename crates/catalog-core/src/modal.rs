// ── Confirmation gate ──
//
// A single pending yes/no question. `open` hands back a handle the caller
// awaits; whoever drives the prompt answers with `confirm` or `cancel`.
// Opening again while a question is pending supersedes it: the earlier
// handle resolves to `None` instead of waiting forever.

use std::sync::{Mutex, MutexGuard, PoisonError};

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use tokio::sync::{oneshot, watch};
use tracing::debug;

use crate::stream::StateStream;

/// Visual intent of a confirmation prompt.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ModalKind {
    #[default]
    Default,
    Danger,
    Success,
}

/// What to ask and how to label the answers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModalOptions {
    pub title: String,
    pub message: String,
    pub confirm_text: String,
    pub cancel_text: String,
    pub kind: ModalKind,
}

impl ModalOptions {
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            confirm_text: "Confirm".into(),
            cancel_text: "Cancel".into(),
            kind: ModalKind::Default,
        }
    }

    pub fn confirm_text(mut self, text: impl Into<String>) -> Self {
        self.confirm_text = text.into();
        self
    }

    pub fn cancel_text(mut self, text: impl Into<String>) -> Self {
        self.cancel_text = text.into();
        self
    }

    pub fn kind(mut self, kind: ModalKind) -> Self {
        self.kind = kind;
        self
    }
}

/// Awaitable answer to one `open` call.
#[derive(Debug)]
pub struct ConfirmHandle {
    answer: oneshot::Receiver<bool>,
}

impl ConfirmHandle {
    /// `Some(true)` on confirm, `Some(false)` on cancel, `None` when the
    /// question was superseded or the gate closed without an answer.
    pub async fn wait(self) -> Option<bool> {
        self.answer.await.ok()
    }
}

/// Single-slot confirmation handshake.
pub struct ConfirmGate {
    pending: Mutex<Option<oneshot::Sender<bool>>>,
    options: watch::Sender<Option<ModalOptions>>,
}

impl Default for ConfirmGate {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfirmGate {
    pub fn new() -> Self {
        let (options, _) = watch::channel(None);
        Self {
            pending: Mutex::new(None),
            options,
        }
    }

    /// Ask a question. Any question still pending is superseded.
    pub fn open(&self, options: ModalOptions) -> ConfirmHandle {
        let (tx, rx) = oneshot::channel();
        let mut pending = self.lock();
        if pending.replace(tx).is_some() {
            debug!("pending confirmation superseded");
        }
        self.options.send_replace(Some(options));
        ConfirmHandle { answer: rx }
    }

    /// Answer yes. Returns `false` when nothing was pending.
    pub fn confirm(&self) -> bool {
        self.resolve(true)
    }

    /// Answer no. Returns `false` when nothing was pending.
    pub fn cancel(&self) -> bool {
        self.resolve(false)
    }

    /// Close without answering; a pending handle resolves to `None`.
    pub fn close(&self) {
        let mut pending = self.lock();
        pending.take();
        self.options.send_replace(None);
    }

    pub fn is_open(&self) -> bool {
        self.options.borrow().is_some()
    }

    pub fn options(&self) -> Option<ModalOptions> {
        self.options.borrow().clone()
    }

    /// Observe the options of the pending question (`None` while closed).
    pub fn subscribe(&self) -> StateStream<Option<ModalOptions>> {
        StateStream::new(self.options.subscribe())
    }

    fn resolve(&self, answer: bool) -> bool {
        let mut pending = self.lock();
        let Some(tx) = pending.take() else {
            return false;
        };
        self.options.send_replace(None);
        if tx.send(answer).is_err() {
            debug!("confirmation answered after the asker went away");
        }
        true
    }

    fn lock(&self) -> MutexGuard<'_, Option<oneshot::Sender<bool>>> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options() -> ModalOptions {
        ModalOptions::new("Delete Product", "Are you sure?")
    }

    #[test]
    fn options_have_default_labels() {
        let opts = options();
        assert_eq!(opts.confirm_text, "Confirm");
        assert_eq!(opts.cancel_text, "Cancel");
        assert_eq!(opts.kind, ModalKind::Default);
    }

    #[tokio::test]
    async fn confirm_resolves_true_and_closes() {
        let gate = ConfirmGate::new();
        let handle = gate.open(options());
        assert!(gate.is_open());

        assert!(gate.confirm());
        assert_eq!(handle.wait().await, Some(true));
        assert!(!gate.is_open());
        assert!(gate.options().is_none());
    }

    #[tokio::test]
    async fn cancel_resolves_false() {
        let gate = ConfirmGate::new();
        let handle = gate.open(options());
        assert!(gate.cancel());
        assert_eq!(handle.wait().await, Some(false));
    }

    #[test]
    fn answers_while_closed_are_noops() {
        let gate = ConfirmGate::new();
        assert!(!gate.confirm());
        assert!(!gate.cancel());
        assert!(!gate.is_open());
    }

    #[tokio::test]
    async fn reopening_supersedes_previous_handle() {
        let gate = ConfirmGate::new();
        let first = gate.open(options());
        let second = gate.open(options().kind(ModalKind::Danger).confirm_text("Delete"));

        assert_eq!(first.wait().await, None);
        assert_eq!(gate.options().map(|o| o.confirm_text), Some("Delete".into()));

        gate.confirm();
        assert_eq!(second.wait().await, Some(true));
    }

    #[tokio::test]
    async fn close_resolves_none() {
        let gate = ConfirmGate::new();
        let handle = gate.open(options());
        gate.close();
        assert_eq!(handle.wait().await, None);
        assert!(!gate.is_open());
    }

    #[tokio::test]
    async fn subscribers_see_open_and_close() {
        let gate = ConfirmGate::new();
        let mut stream = gate.subscribe();
        assert!(stream.current().is_none());

        let _handle = gate.open(options());
        let opened = stream.changed().await;
        assert_eq!(opened.flatten().map(|o| o.title), Some("Delete Product".into()));

        gate.cancel();
        assert_eq!(stream.changed().await, Some(None));
    }
}
