//! The event bus: one ordered message stream out of many input sources.
//!
//! An [`EventBus`] unifies decoded terminal input and [`Command`] execution
//! into a single stream of [`Event`]s, fanned out synchronously to every
//! subscriber. Commands run as spawned tasks; their intermediate emissions
//! and final outcomes all funnel back through the bus's own emit path, which
//! checks the disposed flag before every delivery.
//!
//! Dispatch is a snapshot-then-call fan-out: the subscriber list is copied
//! under the lock and invoked outside it, so handlers may re-entrantly call
//! [`emit`](EventBus::emit), [`on`](EventBus::on), or even
//! [`dispose`](EventBus::dispose) without deadlocking.

use crate::command::{Command, Emitter, Outcome};
use crate::decode::decode_key;
use crate::io::IoSource;
use crate::msg::{Event, KeyMsg, ResizeMsg};
use futures::StreamExt;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::task::AbortHandle;
use tracing::error;

type EventHandler<M> = Arc<dyn Fn(Event<M>) + Send + Sync>;
type QuitHandler = Arc<dyn Fn() + Send + Sync>;

/// A handle to something registered on a bus: a subscriber, a quit handler,
/// or an I/O connection.
///
/// `dispose` is idempotent and takes effect immediately. Dropping the handle
/// does *not* detach the registration; removal is always explicit, matching
/// the explicit lifecycle of every other bus resource.
pub struct Subscription {
    disposed: AtomicBool,
    detach: Box<dyn Fn() + Send + Sync>,
}

impl Subscription {
    fn new(detach: impl Fn() + Send + Sync + 'static) -> Self {
        Self {
            disposed: AtomicBool::new(false),
            detach: Box::new(detach),
        }
    }

    /// Detach the registration. Safe to call more than once.
    pub fn dispose(&self) {
        if !self.disposed.swap(true, Ordering::SeqCst) {
            (self.detach)();
        }
    }

    /// Whether `dispose` has been called on this handle.
    pub fn is_disposed(&self) -> bool {
        self.disposed.load(Ordering::SeqCst)
    }
}

struct BusInner<M> {
    disposed: AtomicBool,
    next_id: AtomicU64,
    subscribers: Mutex<Vec<(u64, EventHandler<M>)>>,
    quit_handlers: Mutex<Vec<(u64, QuitHandler)>>,
    io_tasks: Mutex<Vec<(u64, AbortHandle)>>,
}

/// Coordinates input sources, command execution, and subscribers.
///
/// Cloning is cheap and shares the same bus. A disposed bus is permanently
/// inert: `emit` and `run_cmd` become no-ops, and late-settling commands are
/// silently dropped.
pub struct EventBus<M: Clone + Send + 'static> {
    inner: Arc<BusInner<M>>,
}

impl<M: Clone + Send + 'static> Clone for EventBus<M> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<M: Clone + Send + 'static> Default for EventBus<M> {
    fn default() -> Self {
        Self::new()
    }
}

// A panicking subscriber cannot poison these locks (handlers run outside the
// critical section), but recover rather than unwind if it ever happens.
fn relock<T>(lock: &Mutex<T>) -> MutexGuard<'_, T> {
    lock.lock().unwrap_or_else(PoisonError::into_inner)
}

impl<M: Clone + Send + 'static> EventBus<M> {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(BusInner {
                disposed: AtomicBool::new(false),
                next_id: AtomicU64::new(0),
                subscribers: Mutex::new(Vec::new()),
                quit_handlers: Mutex::new(Vec::new()),
                io_tasks: Mutex::new(Vec::new()),
            }),
        }
    }

    fn next_id(&self) -> u64 {
        self.inner.next_id.fetch_add(1, Ordering::Relaxed)
    }

    /// Whether [`dispose`](EventBus::dispose) has been called.
    pub fn is_disposed(&self) -> bool {
        self.inner.disposed.load(Ordering::SeqCst)
    }

    /// Subscribe to every event. Handlers are invoked synchronously within
    /// the emitting call, in subscription order.
    pub fn on(&self, handler: impl Fn(Event<M>) + Send + Sync + 'static) -> Subscription {
        let id = self.next_id();
        relock(&self.inner.subscribers).push((id, Arc::new(handler)));
        let inner = self.inner.clone();
        Subscription::new(move || {
            relock(&inner.subscribers).retain(|(sid, _)| *sid != id);
        })
    }

    /// Register a quit observer, fired when a command settles to the quit
    /// sentinel. Kept separate from [`on`](EventBus::on) so ordinary
    /// subscribers never have to filter for a termination value.
    pub fn on_quit(&self, handler: impl Fn() + Send + Sync + 'static) -> Subscription {
        let id = self.next_id();
        relock(&self.inner.quit_handlers).push((id, Arc::new(handler)));
        let inner = self.inner.clone();
        Subscription::new(move || {
            relock(&inner.quit_handlers).retain(|(sid, _)| *sid != id);
        })
    }

    /// Deliver an event to all current subscribers. No-op after dispose.
    pub fn emit(&self, event: Event<M>) {
        if self.is_disposed() {
            return;
        }
        let handlers: Vec<EventHandler<M>> = relock(&self.inner.subscribers)
            .iter()
            .map(|(_, h)| h.clone())
            .collect();
        for handler in handlers {
            handler(event.clone());
        }
    }

    fn fire_quit(&self) {
        if self.is_disposed() {
            return;
        }
        let handlers: Vec<QuitHandler> = relock(&self.inner.quit_handlers)
            .iter()
            .map(|(_, h)| h.clone())
            .collect();
        for handler in handlers {
            handler();
        }
    }

    /// An emitter wired to this bus's `emit` path, dropping messages once the
    /// bus is disposed.
    fn emitter(&self) -> Emitter<M> {
        let bus = self.clone();
        Emitter::new(move |msg| bus.emit(Event::App(msg)))
    }

    /// Start executing a command.
    ///
    /// The command receives this bus's emitter for intermediate progress.
    /// When it settles: a message is emitted to all subscribers, the quit
    /// sentinel fires every quit handler, nothing does nothing. A failing
    /// command is logged and otherwise ignored; it can neither crash the bus
    /// nor reach subscribers.
    pub fn run_cmd(&self, cmd: Command<M>) {
        if self.is_disposed() {
            return;
        }
        let bus = self.clone();
        let emitter = self.emitter();
        tokio::spawn(async move {
            match cmd.start(emitter).await {
                Ok(Outcome::Message(msg)) => bus.emit(Event::App(msg)),
                Ok(Outcome::Quit) => bus.fire_quit(),
                Ok(Outcome::Nothing) => {}
                Err(err) => error!(error = %err, "command failed"),
            }
        });
    }

    /// Wire an I/O adapter's raw input and resize notifications into the bus
    /// using the default key decoder.
    ///
    /// Input chunks that decode to an unknown key are silently dropped.
    /// The returned handle aborts both forwarding tasks; so does
    /// [`dispose`](EventBus::dispose).
    pub fn connect_io(&self, io: impl IoSource) -> Subscription {
        self.connect_io_with(io, decode_key)
    }

    /// Like [`connect_io`](EventBus::connect_io) with a custom key decoder.
    pub fn connect_io_with(
        &self,
        mut io: impl IoSource,
        decoder: impl Fn(&[u8]) -> KeyMsg + Send + 'static,
    ) -> Subscription {
        if self.is_disposed() {
            return Subscription::new(|| {});
        }

        let bus = self.clone();
        let mut input = io.input();
        let input_task = tokio::spawn(async move {
            while let Some(chunk) = input.next().await {
                let key = decoder(&chunk);
                if !key.key.is_unknown() {
                    bus.emit(Event::Key(key));
                }
            }
        })
        .abort_handle();

        let bus = self.clone();
        let mut resize = io.resize();
        let resize_task = tokio::spawn(async move {
            while let Some((cols, rows)) = resize.next().await {
                bus.emit(Event::Resize(ResizeMsg::new(cols, rows)));
            }
        })
        .abort_handle();

        let id = self.next_id();
        {
            let mut tasks = relock(&self.inner.io_tasks);
            tasks.push((id, input_task));
            tasks.push((id, resize_task));
        }

        let inner = self.inner.clone();
        Subscription::new(move || {
            relock(&inner.io_tasks).retain(|(tid, task)| {
                if *tid == id {
                    task.abort();
                }
                *tid != id
            });
        })
    }

    /// Permanently shut the bus down: abort I/O tasks, clear all subscribers
    /// and quit handlers, and make every later `emit`/`run_cmd` a no-op.
    /// Idempotent. Commands still in flight settle into the void.
    pub fn dispose(&self) {
        if self.inner.disposed.swap(true, Ordering::SeqCst) {
            return;
        }
        for (_, task) in relock(&self.inner.io_tasks).drain(..) {
            task.abort();
        }
        relock(&self.inner.subscribers).clear();
        relock(&self.inner.quit_handlers).clear();
    }
}
