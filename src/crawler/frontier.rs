//! Frontier store: the shared state of one crawl
//!
//! This module owns everything workers share:
//! - The FIFO queue of URLs waiting to be fetched
//! - The visited set (every URL ever admitted, seed included)
//! - The in-flight count of URLs taken but not yet finished
//! - The budget-bounded counter of successfully crawled pages
//!
//! Queue, visited set and in-flight count sit behind one mutex so that
//! "admit if unseen" and "empty with nothing in flight" are each a single
//! atomic observation. The page counter is a lock-free atomic advanced by a
//! compare-and-swap loop that never passes the budget.

use std::collections::{HashSet, VecDeque};
use std::ops::Deref;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Condvar, Mutex, MutexGuard};
use std::time::Duration;

/// Lock-protected part of the store
#[derive(Debug, Default)]
struct FrontierInner {
    queue: VecDeque<String>,
    visited: HashSet<String>,
    in_flight: usize,
}

/// Answer from [`FrontierStore::wait_for_work`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkSignal {
    /// The queue holds at least one URL
    Ready,

    /// Nothing more will ever be queued: the budget is spent, or the queue
    /// is empty and no worker holds a URL
    Done,
}

/// Concurrency-safe frontier, visited set and page budget for one crawl
#[derive(Debug)]
pub struct FrontierStore {
    inner: Mutex<FrontierInner>,
    work_changed: Condvar,
    pages_crawled: AtomicUsize,
    max_pages: usize,
}

impl FrontierStore {
    /// Creates a store seeded with `seed`
    ///
    /// The seed is both queued and marked visited.
    pub fn new(seed: impl Into<String>, max_pages: usize) -> Self {
        let seed = seed.into();
        let mut inner = FrontierInner::default();
        inner.visited.insert(seed.clone());
        inner.queue.push_back(seed);

        Self {
            inner: Mutex::new(inner),
            work_changed: Condvar::new(),
            pages_crawled: AtomicUsize::new(0),
            max_pages,
        }
    }

    /// Admits `url` to the frontier if it has never been admitted before
    ///
    /// Check and insert happen under one lock, so of any number of
    /// concurrent calls with the same URL at most one returns `true`. Once
    /// the budget is exhausted nothing is admitted.
    ///
    /// # Returns
    ///
    /// * `true` - The URL was newly queued
    /// * `false` - Already visited, or the budget is spent; no side effect
    pub fn try_schedule(&self, url: impl Into<String>) -> bool {
        let url = url.into();
        let mut inner = self.lock();
        if self.is_exhausted() || inner.visited.contains(&url) {
            return false;
        }

        inner.visited.insert(url.clone());
        inner.queue.push_back(url);
        drop(inner);

        self.work_changed.notify_one();
        true
    }

    /// Pops the oldest queued URL without blocking
    ///
    /// The URL counts as in flight until the returned guard is dropped, which
    /// keeps peers from concluding the crawl is over while it is processed.
    ///
    /// # Returns
    ///
    /// * `Some(TakenUrl)` - A URL to crawl
    /// * `None` - The queue is empty or the budget is exhausted
    pub fn take(&self) -> Option<TakenUrl<'_>> {
        if self.is_exhausted() {
            return None;
        }

        let mut inner = self.lock();
        let url = inner.queue.pop_front()?;
        inner.in_flight += 1;

        Some(TakenUrl { url, store: self })
    }

    /// Removes the entire current frontier for a generational wave
    ///
    /// Returns an empty batch once the budget is exhausted.
    pub fn drain_generation(&self) -> Vec<String> {
        if self.is_exhausted() {
            return Vec::new();
        }
        self.lock().queue.drain(..).collect()
    }

    /// Counts one successfully fetched page against the budget
    ///
    /// # Returns
    ///
    /// * `Some(count)` - The page was admitted; `count` is the new total
    /// * `None` - The budget was already spent; the counter is unchanged
    pub fn record_success(&self) -> Option<usize> {
        let previous = self
            .pages_crawled
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |current| {
                (current < self.max_pages).then_some(current + 1)
            })
            .ok()?;

        let count = previous + 1;
        if count >= self.max_pages {
            // Wake idle workers so they observe exhaustion
            self.work_changed.notify_all();
        }
        Some(count)
    }

    /// True once `pages_crawled >= max_pages`
    pub fn is_exhausted(&self) -> bool {
        self.pages_crawled.load(Ordering::Acquire) >= self.max_pages
    }

    /// Blocks an idle worker until there is work or the crawl is over
    ///
    /// Termination is decided from the in-flight count, not from elapsed
    /// time: `Done` is returned only when the budget is spent or when the
    /// queue is empty and no peer holds a URL that could produce more work.
    /// `backoff` bounds each condvar wait so exhaustion is re-checked even
    /// without a notification.
    pub fn wait_for_work(&self, backoff: Duration) -> WorkSignal {
        let mut inner = self.lock();
        loop {
            if self.is_exhausted() {
                return WorkSignal::Done;
            }
            if !inner.queue.is_empty() {
                return WorkSignal::Ready;
            }
            if inner.in_flight == 0 {
                return WorkSignal::Done;
            }

            inner = match self.work_changed.wait_timeout(inner, backoff) {
                Ok((guard, _)) => guard,
                Err(poisoned) => poisoned.into_inner().0,
            };
        }
    }

    /// Number of pages successfully crawled so far
    pub fn pages_crawled(&self) -> usize {
        self.pages_crawled.load(Ordering::Acquire)
    }

    /// The crawl budget
    pub fn max_pages(&self) -> usize {
        self.max_pages
    }

    /// Number of URLs waiting in the queue
    pub fn frontier_len(&self) -> usize {
        self.lock().queue.len()
    }

    /// Number of URLs ever admitted
    pub fn visited_len(&self) -> usize {
        self.lock().visited.len()
    }

    /// Number of URLs currently held by workers
    pub fn in_flight(&self) -> usize {
        self.lock().in_flight
    }

    /// Copy of the visited set
    pub fn visited_snapshot(&self) -> HashSet<String> {
        self.lock().visited.clone()
    }

    /// Returns a taken URL's in-flight slot and wakes waiting workers
    fn release(&self) {
        let mut inner = self.lock();
        inner.in_flight = inner.in_flight.saturating_sub(1);
        let finished = inner.in_flight == 0 && inner.queue.is_empty();
        drop(inner);

        if finished {
            self.work_changed.notify_all();
        } else {
            self.work_changed.notify_one();
        }
    }

    /// Locks the inner state, recovering from poisoning
    ///
    /// Every mutation under the lock is a single container call, so the
    /// structures are never left half-updated.
    fn lock(&self) -> MutexGuard<'_, FrontierInner> {
        self.inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// A URL taken from the frontier and still being processed
///
/// Dropping the guard marks the work as finished.
#[derive(Debug)]
pub struct TakenUrl<'a> {
    url: String,
    store: &'a FrontierStore,
}

impl TakenUrl<'_> {
    pub fn url(&self) -> &str {
        &self.url
    }
}

impl Deref for TakenUrl<'_> {
    type Target = str;

    fn deref(&self) -> &str {
        &self.url
    }
}

impl Drop for TakenUrl<'_> {
    fn drop(&mut self) {
        self.store.release();
    }
}
