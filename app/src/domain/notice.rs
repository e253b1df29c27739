//! User-visible failure notices.
//!
//! Every non-silent failure in this layer funnels through a [`NoticeHub`]:
//! the embedding UI registers a subscriber and renders each notice as a
//! modal alert with a single acknowledgment action. With no subscriber
//! registered (headless use, early boot), notices degrade to log lines.
//! The corruption-fallback path never produces a notice; it is intentionally
//! invisible.

use log::warn;
use std::sync::Mutex;

/// What went wrong, at the granularity the UI cares about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    /// A durable-store flush failed; in-memory state is still authoritative
    SaveFailed,
    /// A remote fetch failed; a local fallback snapshot was substituted
    FetchFailed,
    /// A remote save failed; edits remain pending for a manual retry
    SyncFailed,
}

/// A single user-facing alert.
#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    pub fn new(kind: NoticeKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

type Subscriber = Box<dyn Fn(Notice) + Send + Sync>;

/// Fan-in point for notices, shared by all services via `Arc`.
#[derive(Default)]
pub struct NoticeHub {
    subscriber: Mutex<Option<Subscriber>>,
}

impl NoticeHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the UI callback. Replaces any previous subscriber.
    pub fn subscribe<F>(&self, callback: F)
    where
        F: Fn(Notice) + Send + Sync + 'static,
    {
        *self.subscriber.lock().unwrap() = Some(Box::new(callback));
    }

    /// Deliver a notice to the subscriber, or log it if nobody listens.
    pub fn post(&self, notice: Notice) {
        let subscriber = self.subscriber.lock().unwrap();
        match subscriber.as_ref() {
            Some(callback) => callback(notice),
            None => warn!("Unsubscribed notice ({:?}): {}", notice.kind, notice.message),
        }
    }
}
