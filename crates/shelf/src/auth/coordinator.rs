// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Single-flight refresh coordination.
//!
//! The first caller to hit an expired session becomes the leader and runs the
//! refresh. Every caller arriving while that refresh is in flight parks on a
//! oneshot channel in a FIFO queue. When the leader settles, the coordinator
//! returns to idle and drains the queue in arrival order, handing each waiter
//! the same outcome the leader saw.

use std::collections::VecDeque;
use std::future::Future;

use parking_lot::Mutex;
use tokio::sync::oneshot;

use crate::error::RefreshError;

/// Result of a refresh: the new access token, or why it failed.
pub type RefreshOutcome = Result<String, RefreshError>;

enum RefreshState {
    Idle,
    Refreshing { waiters: VecDeque<oneshot::Sender<RefreshOutcome>> },
}

/// Guards the refresh state machine. Cheap to construct; one per client.
pub struct RefreshCoordinator {
    state: Mutex<RefreshState>,
}

impl Default for RefreshCoordinator {
    fn default() -> Self {
        Self::new()
    }
}

impl RefreshCoordinator {
    pub fn new() -> Self {
        Self { state: Mutex::new(RefreshState::Idle) }
    }

    pub fn is_refreshing(&self) -> bool {
        matches!(*self.state.lock(), RefreshState::Refreshing { .. })
    }

    /// Number of callers parked behind the in-flight refresh.
    pub fn pending(&self) -> usize {
        match &*self.state.lock() {
            RefreshState::Idle => 0,
            RefreshState::Refreshing { waiters } => waiters.len(),
        }
    }

    /// Obtain a fresh access token.
    ///
    /// Runs `refresh` only if no refresh is in flight; otherwise waits for the
    /// in-flight one and returns its outcome. `refresh` must finish its side
    /// effects (storing the token, logging out) before resolving, because
    /// waiters are released as soon as it does.
    pub async fn run<F, Fut>(&self, refresh: F) -> RefreshOutcome
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = RefreshOutcome>,
    {
        let waiter = {
            let mut state = self.state.lock();
            if let RefreshState::Refreshing { waiters } = &mut *state {
                let (tx, rx) = oneshot::channel();
                waiters.push_back(tx);
                tracing::debug!(position = waiters.len(), "refresh in flight, queued");
                Some(rx)
            } else {
                *state = RefreshState::Refreshing { waiters: VecDeque::new() };
                None
            }
        };

        if let Some(rx) = waiter {
            return rx.await.unwrap_or(Err(RefreshError::Abandoned));
        }

        let mut lease = Lease { coordinator: self, settled: false };
        let outcome = refresh().await;
        lease.settle(&outcome);
        outcome
    }

    /// Return to idle and release every waiter, oldest first.
    fn settle(&self, outcome: &RefreshOutcome) {
        let waiters = match std::mem::replace(&mut *self.state.lock(), RefreshState::Idle) {
            RefreshState::Refreshing { waiters } => waiters,
            RefreshState::Idle => VecDeque::new(),
        };
        if !waiters.is_empty() {
            tracing::debug!(
                waiters = waiters.len(),
                ok = outcome.is_ok(),
                "releasing queued requests"
            );
        }
        for tx in waiters {
            // A waiter whose caller went away simply has nobody to tell.
            let _ = tx.send(outcome.clone());
        }
    }
}

impl std::fmt::Debug for RefreshCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RefreshCoordinator")
            .field("refreshing", &self.is_refreshing())
            .field("pending", &self.pending())
            .finish()
    }
}

/// Held by the leader for the duration of a refresh. If the leader's future is
/// dropped mid-refresh, the waiters are released with `Abandoned`.
struct Lease<'a> {
    coordinator: &'a RefreshCoordinator,
    settled: bool,
}

impl Lease<'_> {
    fn settle(&mut self, outcome: &RefreshOutcome) {
        self.settled = true;
        self.coordinator.settle(outcome);
    }
}

impl Drop for Lease<'_> {
    fn drop(&mut self) {
        if !self.settled {
            tracing::warn!("refresh leader dropped before settling");
            self.coordinator.settle(&Err(RefreshError::Abandoned));
        }
    }
}

#[cfg(test)]
#[path = "coordinator_tests.rs"]
mod tests;
