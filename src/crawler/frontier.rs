//! Frontier: the de-duplicating, budget-bounded task queue
//!
//! Admission and `seen` insertion happen under one lock, so a URL is queued
//! at most once per run. Completion is tracked with an unfinished-task count;
//! [`Frontier::join`] resolves once every admitted task has been marked done.

use std::collections::{HashSet, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Mutex, MutexGuard};
use tokio::sync::Notify;

/// One URL scheduled for fetching
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    pub url: String,

    /// Link distance from the start URL
    pub depth: u32,

    /// Page this URL was discovered on; `None` for the start URL
    pub parent_url: Option<String>,
}

impl Task {
    /// The start task, at depth 0 with no parent
    pub fn seed(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            depth: 0,
            parent_url: None,
        }
    }

    /// A task for a link found on this task's page
    pub fn child(&self, url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            depth: self.depth + 1,
            parent_url: Some(self.url.clone()),
        }
    }
}

/// Page and depth budgets; `None` means unbounded
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CrawlLimits {
    pub max_pages: Option<u32>,
    pub max_depth: Option<u32>,
}

#[derive(Debug, Default)]
struct QueueState {
    pending: VecDeque<Task>,
    seen: HashSet<String>,
    unfinished: usize,
}

/// Work queue shared by every crawl worker
#[derive(Debug)]
pub struct Frontier {
    state: Mutex<QueueState>,
    limits: CrawlLimits,
    collected: AtomicU32,
    budget_exhausted: AtomicBool,
    available: Notify,
    drained: Notify,
}

impl Frontier {
    pub fn new(limits: CrawlLimits) -> Self {
        Self {
            state: Mutex::new(QueueState::default()),
            limits,
            collected: AtomicU32::new(0),
            budget_exhausted: AtomicBool::new(false),
            available: Notify::new(),
            drained: Notify::new(),
        }
    }

    /// Admits a task unless it was seen before or a budget forbids it
    ///
    /// Rejection is silent; the return value only reports whether the task
    /// was queued. Hitting either budget latches [`Self::is_budget_exhausted`]
    /// but leaves already queued tasks in place.
    pub fn put(&self, task: Task) -> bool {
        let mut state = self.lock_state();

        if state.seen.contains(&task.url) {
            return false;
        }

        if let Some(max_pages) = self.limits.max_pages {
            if self.collected_count() >= max_pages {
                self.exhaust_budget(format_args!("Max pages {} collected; stopping", max_pages));
                return false;
            }
        }

        if let Some(max_depth) = self.limits.max_depth {
            if task.depth > max_depth {
                self.exhaust_budget(format_args!(
                    "URL depth is greater than max depth {}; stopping",
                    max_depth
                ));
                return false;
            }
        }

        state.seen.insert(task.url.clone());
        state.pending.push_back(task);
        state.unfinished += 1;
        drop(state);

        self.available.notify_one();
        true
    }

    /// Waits for the next queued task
    pub async fn get(&self) -> Task {
        loop {
            {
                let mut state = self.lock_state();
                if let Some(task) = state.pending.pop_front() {
                    // A single stored permit may stand for several puts
                    if !state.pending.is_empty() {
                        self.available.notify_one();
                    }
                    return task;
                }
            }
            self.available.notified().await;
        }
    }

    /// Counts one produced document toward the page budget
    ///
    /// Reaching `max_pages` latches the budget immediately, so tasks already
    /// queued are skipped even if no further link is ever offered. Returns the
    /// new total.
    pub fn mark_collected(&self) -> u32 {
        let collected = self.collected.fetch_add(1, Ordering::SeqCst) + 1;
        if let Some(max_pages) = self.limits.max_pages {
            if collected >= max_pages {
                self.exhaust_budget(format_args!("Max pages {} collected; stopping", max_pages));
            }
        }
        collected
    }

    /// Marks one previously dequeued task as finished
    pub fn task_done(&self) {
        let mut state = self.lock_state();
        if state.unfinished == 0 {
            tracing::warn!("task_done called more times than tasks were queued");
            return;
        }

        state.unfinished -= 1;
        if state.unfinished == 0 {
            self.drained.notify_waiters();
        }
    }

    /// Marks the task done when the returned guard is dropped
    pub fn done_guard(&self) -> TaskGuard<'_> {
        TaskGuard { frontier: self }
    }

    /// Waits until every admitted task has been marked done
    pub async fn join(&self) {
        loop {
            let drained = self.drained.notified();
            tokio::pin!(drained);
            drained.as_mut().enable();

            let unfinished = self.lock_state().unfinished;
            if unfinished == 0 {
                return;
            }
            drained.await;
        }
    }

    pub fn is_budget_exhausted(&self) -> bool {
        self.budget_exhausted.load(Ordering::SeqCst)
            || self
                .limits
                .max_pages
                .is_some_and(|max_pages| self.collected_count() >= max_pages)
    }

    pub fn collected_count(&self) -> u32 {
        self.collected.load(Ordering::SeqCst)
    }

    /// Tasks queued but not yet dequeued
    pub fn pending(&self) -> usize {
        self.lock_state().pending.len()
    }

    /// URLs admitted so far in this run
    pub fn seen_count(&self) -> usize {
        self.lock_state().seen.len()
    }

    pub fn limits(&self) -> CrawlLimits {
        self.limits
    }

    fn exhaust_budget(&self, reason: std::fmt::Arguments<'_>) {
        if !self.budget_exhausted.swap(true, Ordering::SeqCst) {
            tracing::info!("{}", reason);
        }
    }

    fn lock_state(&self) -> MutexGuard<'_, QueueState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Calls [`Frontier::task_done`] on drop
#[must_use = "the task is marked done as soon as the guard is dropped"]
pub struct TaskGuard<'a> {
    frontier: &'a Frontier,
}

impl Drop for TaskGuard<'_> {
    fn drop(&mut self) {
        self.frontier.task_done();
    }
}
