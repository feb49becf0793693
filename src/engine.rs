use std::{
    collections::{HashMap, HashSet},
    sync::{
        Arc, Mutex, MutexGuard, PoisonError,
        atomic::{AtomicBool, AtomicU64, Ordering},
    },
    thread,
    time::Duration,
};

use crossbeam_channel::{Receiver, RecvTimeoutError};
use thiserror::Error;

use crate::{
    catalog::{CatalogError, GestureCatalog, GestureFactory},
    gesture::{AttemptState, Gesture},
    types::{FrameBatch, RecognitionEvent},
};

// Poll interval of the stream worker between stop-flag checks.
const STREAM_POLL: Duration = Duration::from_millis(25);

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EngineError {
    #[error("engine is already consuming a frame stream")]
    AlreadyStarted,
}

/// Token returned by [`GestureEngine::subscribe`], used to unsubscribe.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Handler = Box<dyn FnMut(&RecognitionEvent) + Send>;

/// Catalog plus the per-(gesture, body) attempt table, mutated together
/// under one lock so a frame batch dispatches run-to-completion.
#[derive(Default)]
struct DispatchState {
    catalog: GestureCatalog,
    // body id -> gesture name -> attempt. Postures never allocate entries;
    // they carry no temporal memory.
    attempts: HashMap<u64, HashMap<String, AttemptState>>,
}

struct EngineShared {
    dispatch: Mutex<DispatchState>,
    subscribers: Mutex<Vec<(SubscriptionId, Handler)>>,
    next_subscription: AtomicU64,
    stop: AtomicBool,
}

fn lock_ignoring_poison<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl EngineShared {
    fn dispatch_batch(&self, batch: &FrameBatch) {
        let mut dispatch = lock_ignoring_poison(&self.dispatch);
        let DispatchState { catalog, attempts } = &mut *dispatch;

        let mut tracked_ids: HashSet<u64> = HashSet::new();
        for body in &batch.bodies {
            if !body.tracked {
                continue;
            }
            tracked_ids.insert(body.body_id);

            for gesture in catalog.iter() {
                let recognized = if gesture.window().is_instant() {
                    gesture.test_initial(body)
                } else {
                    let per_body = attempts.entry(body.body_id).or_default();
                    let attempt = per_body.entry(gesture.name().to_owned()).or_default();
                    attempt.step(gesture.as_ref(), body)
                };

                if recognized {
                    let event = RecognitionEvent {
                        gesture: gesture.name().to_owned(),
                        body_id: body.body_id,
                        frame_index: batch.frame_index,
                    };
                    log::debug!(
                        "recognized {} for body {} at frame {}",
                        event.gesture,
                        event.body_id,
                        event.frame_index
                    );
                    self.publish(&event);
                }
            }
        }

        // Bodies absent or untracked this tick abandon their attempts
        // silently; a later re-appearance starts from a fresh baseline.
        let before = attempts.len();
        attempts.retain(|body_id, _| tracked_ids.contains(body_id));
        if attempts.len() < before {
            log::debug!(
                "dropped attempt state for {} departed bodies",
                before - attempts.len()
            );
        }
    }

    fn publish(&self, event: &RecognitionEvent) {
        let mut subscribers = lock_ignoring_poison(&self.subscribers);
        for (_, handler) in subscribers.iter_mut() {
            handler(event);
        }
    }

    fn clear_attempts(&self) {
        lock_ignoring_poison(&self.dispatch).attempts.clear();
    }
}

/// Handle a recognition handler can use to request a stop without touching
/// the dispatch lock it is running under.
#[derive(Clone)]
pub struct StopSignal {
    shared: Arc<EngineShared>,
}

impl StopSignal {
    pub fn stop(&self) {
        self.shared.stop.store(true, Ordering::SeqCst);
    }
}

struct StreamWorker {
    handle: thread::JoinHandle<()>,
}

/// The recognition dispatcher.
///
/// Owns the catalog and the per-(gesture, body) attempt table, consumes one
/// frame batch at a time and fans it out body by body, gesture by gesture in
/// catalog order. Each engine is an independent value; two engines never
/// share state.
pub struct GestureEngine {
    shared: Arc<EngineShared>,
    worker: Option<StreamWorker>,
}

impl Default for GestureEngine {
    fn default() -> Self {
        GestureEngine::new()
    }
}

impl GestureEngine {
    /// An engine with an empty catalog.
    pub fn new() -> Self {
        GestureEngine {
            shared: Arc::new(EngineShared {
                dispatch: Mutex::new(DispatchState::default()),
                subscribers: Mutex::new(Vec::new()),
                next_subscription: AtomicU64::new(0),
                stop: AtomicBool::new(false),
            }),
            worker: None,
        }
    }

    /// An engine pre-populated through a catalog-building strategy.
    pub fn from_factory(factory: &dyn GestureFactory) -> Result<Self, CatalogError> {
        let engine = GestureEngine::new();
        engine.add_gestures(factory)?;
        Ok(engine)
    }

    /// Appends every definition the factory produces, in factory order.
    /// Stops at the first duplicate name and reports it.
    pub fn add_gestures(&self, factory: &dyn GestureFactory) -> Result<(), CatalogError> {
        let mut dispatch = lock_ignoring_poison(&self.shared.dispatch);
        for gesture in factory.create_gestures() {
            dispatch.catalog.add(gesture)?;
        }
        Ok(())
    }

    pub fn add_gesture(&self, gesture: Arc<dyn Gesture>) -> Result<(), CatalogError> {
        lock_ignoring_poison(&self.shared.dispatch).catalog.add(gesture)
    }

    /// Removes a definition and discards every attempt keyed by its name.
    pub fn remove_gesture(&self, name: &str) -> Result<(), CatalogError> {
        let mut dispatch = lock_ignoring_poison(&self.shared.dispatch);
        dispatch.catalog.remove(name)?;
        for per_body in dispatch.attempts.values_mut() {
            per_body.remove(name);
        }
        dispatch.attempts.retain(|_, per_body| !per_body.is_empty());
        Ok(())
    }

    pub fn gesture_names(&self) -> Vec<String> {
        lock_ignoring_poison(&self.shared.dispatch)
            .catalog
            .names()
            .into_iter()
            .map(str::to_owned)
            .collect()
    }

    /// Registers an event handler. Handlers for one event run in
    /// subscription order; events within one frame arrive in
    /// (body order x catalog order).
    pub fn subscribe<F>(&self, handler: F) -> SubscriptionId
    where
        F: FnMut(&RecognitionEvent) + Send + 'static,
    {
        let id = SubscriptionId(self.shared.next_subscription.fetch_add(1, Ordering::Relaxed));
        lock_ignoring_poison(&self.shared.subscribers).push((id, Box::new(handler)));
        id
    }

    /// Returns whether the subscription existed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut subscribers = lock_ignoring_poison(&self.shared.subscribers);
        let before = subscribers.len();
        subscribers.retain(|(existing, _)| *existing != id);
        subscribers.len() < before
    }

    /// Synchronous dispatch of one batch; the entry point test harnesses
    /// drive directly. Serialized by the dispatch lock, so a second call
    /// cannot interleave with one in progress.
    pub fn on_frame(&self, batch: &FrameBatch) {
        self.shared.dispatch_batch(batch);
    }

    /// Subscribes to a frame stream and dispatches on a worker thread until
    /// [`GestureEngine::stop`] or the producer disconnects. Under
    /// backpressure the worker drains to the most recent pending batch.
    pub fn start(&mut self, frames: Receiver<FrameBatch>) -> Result<(), EngineError> {
        if self.worker.is_some() {
            return Err(EngineError::AlreadyStarted);
        }

        self.shared.stop.store(false, Ordering::SeqCst);
        let shared = self.shared.clone();
        let handle = thread::spawn(move || {
            log::info!("frame stream worker started");
            loop {
                if shared.stop.load(Ordering::SeqCst) {
                    break;
                }
                match frames.recv_timeout(STREAM_POLL) {
                    Ok(batch) => {
                        let batch = latest_pending(&frames, batch);
                        shared.dispatch_batch(&batch);
                    }
                    Err(RecvTimeoutError::Timeout) => {}
                    Err(RecvTimeoutError::Disconnected) => break,
                }
            }
            // Attempts do not survive a stream; see stop().
            shared.clear_attempts();
            log::info!("frame stream worker stopped");
        });

        self.worker = Some(StreamWorker { handle });
        Ok(())
    }

    /// A clonable handle that lets recognition handlers (which run on the
    /// stream thread) request a stop.
    pub fn stop_signal(&self) -> StopSignal {
        StopSignal {
            shared: self.shared.clone(),
        }
    }

    /// Unsubscribes from the frame stream and discards all attempt state.
    /// Idempotent; in-progress attempts are abandoned, not completed. Event
    /// subscribers stay registered for a later start().
    pub fn stop(&mut self) {
        self.shared.stop.store(true, Ordering::SeqCst);
        if let Some(worker) = self.worker.take() {
            if thread::current().id() == worker.handle.thread().id() {
                // Called on the stream thread itself; the worker loop clears
                // attempt state on its own way out.
                return;
            }
            if worker.handle.join().is_err() {
                log::error!("frame stream worker panicked");
            }
        }
        self.shared.clear_attempts();
    }
}

impl Drop for GestureEngine {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Drains the channel down to the newest batch already queued. Only the most
/// recent skeleton snapshot is worth evaluating; replaying stale ticks would
/// just lag the stream further.
fn latest_pending(frames: &Receiver<FrameBatch>, mut batch: FrameBatch) -> FrameBatch {
    while let Ok(newer) = frames.try_recv() {
        batch = newer;
    }
    batch
}
