//! Debounced pass scheduling
//!
//! Input events arrive faster than passes should run. Each request schedules
//! a pass after a quiet window and invalidates the previously scheduled one;
//! every started pass carries a sequence stamp, and only the latest stamp is
//! allowed to commit, so a stale pass can never overwrite a newer result.

use crate::content::ContentSource;
use crate::filter::FilterEngine;
use crate::model::{FilterResult, NoteCard};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::debug;

/// Quiet window between the last input event and the pass it triggers
pub const DEBOUNCE_WINDOW: Duration = Duration::from_millis(300);

/// Schedules filter passes and exposes the committed result
pub struct FilterScheduler<S> {
    engine: Arc<FilterEngine<S>>,
    debounce: Duration,
    seq: Arc<AtomicU64>,
    committed: Arc<Mutex<Option<FilterResult>>>,
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl<S: ContentSource + 'static> FilterScheduler<S> {
    pub fn new(engine: FilterEngine<S>) -> Self {
        Self::with_debounce(engine, DEBOUNCE_WINDOW)
    }

    pub fn with_debounce(engine: FilterEngine<S>, debounce: Duration) -> Self {
        Self {
            engine: Arc::new(engine),
            debounce,
            seq: Arc::new(AtomicU64::new(0)),
            committed: Arc::new(Mutex::new(None)),
            pending: Mutex::new(None),
        }
    }

    /// Schedule a pass after the quiet window (keystroke path)
    ///
    /// A request arriving before the window elapses cancels the pass that was
    /// waiting to start.
    pub fn request(&self, query: &str, worksheets_only: bool, cards: Arc<Vec<NoteCard>>) {
        self.schedule(query, worksheets_only, cards, self.debounce);
    }

    /// Schedule a pass immediately (toggle path)
    ///
    /// Shares the stamp discipline with debounced passes, so an immediate
    /// pass supersedes any pending keystroke pass.
    pub fn request_now(&self, query: &str, worksheets_only: bool, cards: Arc<Vec<NoteCard>>) {
        self.schedule(query, worksheets_only, cards, Duration::ZERO);
    }

    /// The most recently committed pass result
    pub fn latest(&self) -> Option<FilterResult> {
        self.committed.lock().ok().and_then(|slot| slot.clone())
    }

    /// The engine backing this scheduler
    pub fn engine(&self) -> &FilterEngine<S> {
        &self.engine
    }

    fn schedule(
        &self,
        query: &str,
        worksheets_only: bool,
        cards: Arc<Vec<NoteCard>>,
        delay: Duration,
    ) {
        let stamp = self.seq.fetch_add(1, Ordering::SeqCst) + 1;
        let engine = Arc::clone(&self.engine);
        let seq = Arc::clone(&self.seq);
        let committed = Arc::clone(&self.committed);
        let query = query.to_string();

        let handle = tokio::spawn(async move {
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            if seq.load(Ordering::SeqCst) != stamp {
                debug!("Pass {} superseded before start", stamp);
                return;
            }

            let mut result = engine.run_filter(&query, worksheets_only, &cards).await;
            result.pass = stamp;

            // A newer pass may have been issued while this one was running;
            // its lookups stay valid in the cache but its result is stale.
            if seq.load(Ordering::SeqCst) != stamp {
                debug!("Pass {} finished stale, discarding", stamp);
                return;
            }
            if let Ok(mut slot) = committed.lock() {
                if slot.as_ref().map_or(false, |prev| prev.pass > stamp) {
                    debug!("Pass {} lost the commit race, discarding", stamp);
                } else {
                    debug!("Pass {} committed", stamp);
                    *slot = Some(result);
                }
            }
        });

        if let Ok(mut pending) = self.pending.lock() {
            if let Some(previous) = pending.take() {
                previous.abort();
            }
            *pending = Some(handle);
        }
    }
}
