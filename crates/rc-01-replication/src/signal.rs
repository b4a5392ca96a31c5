//! # Fatal Signal
//!
//! Terminal, broadcast signal shared by every subsystem of a node.
//!
//! Any holder can trigger it; every watcher observes it. Backed by a
//! `tokio::sync::watch` whose value moves from `None` to `Some(reason)`
//! exactly once.

use std::sync::Arc;
use tokio::sync::watch;
use tracing::error;

/// Sender side of the node's fatal signal. Cheap to clone.
#[derive(Clone)]
pub struct FatalSignal {
    tx: Arc<watch::Sender<Option<Arc<str>>>>,
}

impl FatalSignal {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(None);
        Self { tx: Arc::new(tx) }
    }

    /// Raise the signal. The first reason wins; returns `false` if the signal
    /// was already raised.
    pub fn trigger(&self, reason: impl Into<String>) -> bool {
        let reason: Arc<str> = Arc::from(reason.into());
        let raised = self.tx.send_if_modified(|current| {
            if current.is_some() {
                return false;
            }
            *current = Some(Arc::clone(&reason));
            true
        });
        if raised {
            error!(reason = %reason, "Fatal signal raised");
        }
        raised
    }

    pub fn is_triggered(&self) -> bool {
        self.tx.borrow().is_some()
    }

    pub fn reason(&self) -> Option<String> {
        self.tx.borrow().as_deref().map(str::to_string)
    }

    pub fn subscribe(&self) -> FatalWatcher {
        FatalWatcher {
            rx: self.tx.subscribe(),
        }
    }
}

impl Default for FatalSignal {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for FatalSignal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FatalSignal")
            .field("reason", &self.reason())
            .finish()
    }
}

/// Receiver side of the fatal signal.
#[derive(Clone)]
pub struct FatalWatcher {
    rx: watch::Receiver<Option<Arc<str>>>,
}

impl FatalWatcher {
    /// Resolve with the reason once the signal is raised.
    ///
    /// Returns immediately if it was raised before the call. Never resolves
    /// if every `FatalSignal` handle is dropped without raising it.
    pub async fn wait(&mut self) -> String {
        loop {
            let current = self.rx.borrow_and_update().clone();
            if let Some(reason) = current {
                return reason.to_string();
            }
            if self.rx.changed().await.is_err() {
                std::future::pending::<()>().await;
            }
        }
    }

    pub fn is_triggered(&self) -> bool {
        self.rx.borrow().is_some()
    }
}
