// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Selector-scoped change notification.
//!
//! Each subscription holds a selector, the value it last produced, and a
//! listener. After every mutation the tracker re-runs all selectors and fires
//! only the listeners whose selected value changed. Intermediate values are
//! not buffered: a listener sees the latest value as of its firing.

use indexmap::IndexMap;
use parking_lot::Mutex;
use std::collections::HashSet;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Weak};

use crate::state::TrackerState;

type SubscriptionId = u64;

/// A type-erased selector/listener pair.
trait Watch: Send {
    /// Re-run the selector and fire the listener if the value changed.
    fn refresh(&mut self, state: &TrackerState) -> bool;
}

struct Selection<T, S, L> {
    selector: S,
    listener: L,
    last: T,
}

impl<T, S, L> Watch for Selection<T, S, L>
where
    T: PartialEq + Send,
    S: Fn(&TrackerState) -> T + Send,
    L: FnMut(&T) + Send,
{
    fn refresh(&mut self, state: &TrackerState) -> bool {
        let next = (self.selector)(state);
        if next == self.last {
            return false;
        }
        self.last = next;
        (self.listener)(&self.last);
        true
    }
}

#[derive(Default)]
struct Registry {
    next_id: SubscriptionId,
    watches: IndexMap<SubscriptionId, Box<dyn Watch>>,
    /// True while a notification pass has the watches checked out
    notifying: bool,
    /// Unsubscribed during the current pass; dropped when it ends
    cancelled: HashSet<SubscriptionId>,
}

/// The set of live subscriptions for one tracker.
#[derive(Default)]
pub(crate) struct Subscriptions {
    registry: Arc<Mutex<Registry>>,
}

impl Subscriptions {
    pub(crate) fn subscribe<T, S, L>(
        &self,
        state: &TrackerState,
        selector: S,
        listener: L,
    ) -> Subscription
    where
        T: PartialEq + Send + 'static,
        S: Fn(&TrackerState) -> T + Send + 'static,
        L: FnMut(&T) + Send + 'static,
    {
        let last = selector(state);
        let mut registry = self.registry.lock();
        let id = registry.next_id;
        registry.next_id += 1;
        registry.watches.insert(id, Box::new(Selection { selector, listener, last }));
        Subscription { id, registry: Arc::downgrade(&self.registry) }
    }

    pub(crate) fn len(&self) -> usize {
        self.registry.lock().watches.len()
    }

    /// Run one notification pass. Returns how many listeners fired.
    ///
    /// The registry lock is released while listeners run, so a listener may
    /// unsubscribe itself or others without deadlocking. A panicking selector
    /// or listener is logged and skipped; the rest of the pass still runs and
    /// the subscription stays registered.
    pub(crate) fn notify(&self, state: &TrackerState) -> usize {
        let mut watches = {
            let mut registry = self.registry.lock();
            registry.notifying = true;
            std::mem::take(&mut registry.watches)
        };

        let mut fired = 0;
        for (id, watch) in watches.iter_mut() {
            if self.registry.lock().cancelled.contains(id) {
                continue;
            }
            match panic::catch_unwind(AssertUnwindSafe(|| watch.refresh(state))) {
                Ok(true) => fired += 1,
                Ok(false) => {}
                Err(_) => tracing::warn!(subscription = *id, "listener panicked, pass continues"),
            }
        }

        let mut registry = self.registry.lock();
        let cancelled = std::mem::take(&mut registry.cancelled);
        watches.retain(|id, _| !cancelled.contains(id));
        let added = std::mem::take(&mut registry.watches);
        watches.extend(added);
        registry.watches = watches;
        registry.notifying = false;
        fired
    }
}

/// Handle returned by [`crate::Tracker::subscribe`].
///
/// Dropping the handle keeps the subscription alive; call
/// [`Subscription::unsubscribe`] to stop notifications.
#[must_use = "a subscription can only be cancelled through its handle"]
#[derive(Debug, Clone)]
pub struct Subscription {
    id: SubscriptionId,
    registry: Weak<Mutex<Registry>>,
}

impl Subscription {
    /// Stop notifications. Idempotent, and a no-op once the tracker is gone.
    pub fn unsubscribe(&self) {
        let Some(registry) = self.registry.upgrade() else {
            return;
        };
        let mut registry = registry.lock();
        if registry.watches.shift_remove(&self.id).is_none() && registry.notifying {
            registry.cancelled.insert(self.id);
        }
    }
}

#[cfg(test)]
#[path = "subscription_tests.rs"]
mod tests;
