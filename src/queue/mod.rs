use std::collections::VecDeque;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};

use anyhow::{Context, Result};

use crate::event::AssuranceEvent;

/// Receives inbound events one at a time on the queue's dispatch thread.
///
/// An `Err` (or a panic) is logged and counted; the event is not retried.
pub type EventListener = Box<dyn FnMut(AssuranceEvent) -> Result<()> + Send>;

const DISPATCH_THREAD_NAME: &str = "assurance-inbound";

#[derive(Default)]
struct QueueState {
    buffer: VecDeque<AssuranceEvent>,
    started: bool,
    closed: bool,
}

struct Shared {
    state: Mutex<QueueState>,
    ready: Condvar,
    failed: AtomicUsize,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, QueueState> {
        // The listener never runs under this lock, so poisoning can only come
        // from a panic in our own bookkeeping; the state is still coherent.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Start-gated FIFO buffer between the transport's receive loop and the
/// application listener.
///
/// Events offered before [`start`](Self::start) are held; once started they
/// are handed to the listener in offer order, followed by every later event.
/// A single dispatch thread owns the listener, so deliveries never overlap.
pub struct InboundEventQueue {
    shared: Arc<Shared>,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl InboundEventQueue {
    /// Create a stopped queue and spawn its dispatch thread.
    pub fn new(listener: EventListener) -> Result<Self> {
        let shared = Arc::new(Shared {
            state: Mutex::new(QueueState::default()),
            ready: Condvar::new(),
            failed: AtomicUsize::new(0),
        });

        let worker_shared = Arc::clone(&shared);
        let handle = thread::Builder::new()
            .name(DISPATCH_THREAD_NAME.to_string())
            .spawn(move || dispatch_loop(&worker_shared, listener))
            .context("failed to spawn inbound event dispatch thread")?;

        Ok(Self {
            shared,
            worker: Mutex::new(Some(handle)),
        })
    }

    /// Append an event to the tail of the queue.
    pub fn offer(&self, event: AssuranceEvent) {
        let mut state = self.shared.lock();
        if state.closed {
            tracing::debug!(event_type = %event.event_type, "dropping event offered to closed queue");
            return;
        }
        tracing::trace!(
            event_type = %event.event_type,
            started = state.started,
            "queued inbound event"
        );
        state.buffer.push_back(event);
        if state.started {
            self.shared.ready.notify_one();
        }
    }

    /// Release buffered events to the listener and switch to live delivery.
    ///
    /// Returns `true` only for the call that performed the transition.
    pub fn start(&self) -> bool {
        let mut state = self.shared.lock();
        if state.started || state.closed {
            return false;
        }
        state.started = true;
        tracing::info!(buffered = state.buffer.len(), "inbound event queue started");
        self.shared.ready.notify_one();
        true
    }

    /// Discard pending events and stop the dispatch thread.
    ///
    /// An event already handed to the listener finishes first. Safe to call
    /// from inside the listener itself.
    pub fn close(&self) {
        {
            let mut state = self.shared.lock();
            if state.closed {
                return;
            }
            state.closed = true;
            let dropped = state.buffer.len();
            state.buffer.clear();
            tracing::info!(dropped, "inbound event queue closed");
            self.shared.ready.notify_all();
        }

        let handle = self
            .worker
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(handle) = handle
            && handle.thread().id() != thread::current().id()
            && handle.join().is_err()
        {
            tracing::error!("inbound event dispatch thread panicked");
        }
    }

    pub fn is_started(&self) -> bool {
        self.shared.lock().started
    }

    pub fn is_closed(&self) -> bool {
        self.shared.lock().closed
    }

    /// Number of events waiting for delivery.
    pub fn len(&self) -> usize {
        self.shared.lock().buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of events whose delivery failed since creation.
    pub fn failed_deliveries(&self) -> usize {
        self.shared.failed.load(Ordering::SeqCst)
    }
}

impl Drop for InboundEventQueue {
    fn drop(&mut self) {
        self.close();
    }
}

fn dispatch_loop(shared: &Shared, mut listener: EventListener) {
    loop {
        let event = {
            let mut state = shared.lock();
            loop {
                if state.closed {
                    return;
                }
                if state.started
                    && let Some(event) = state.buffer.pop_front()
                {
                    break event;
                }
                state = shared
                    .ready
                    .wait(state)
                    .unwrap_or_else(PoisonError::into_inner);
            }
        };

        let event_type = event.event_type.clone();
        match panic::catch_unwind(AssertUnwindSafe(|| listener(event))) {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                shared.failed.fetch_add(1, Ordering::SeqCst);
                tracing::error!(%event_type, "inbound event listener failed: {e:#}");
            }
            Err(_) => {
                shared.failed.fetch_add(1, Ordering::SeqCst);
                tracing::error!(%event_type, "inbound event listener panicked");
            }
        }
    }
}
