use futures::future::BoxFuture;
use std::future::Future;
use std::sync::Arc;

/// The value a [`Command`] settles to.
///
/// `Quit` is the termination sentinel: it is a dedicated variant rather than a
/// magic message value, so it can never collide with an application message
/// that happens to have the same shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome<M> {
    /// Deliver this message to all bus subscribers.
    Message(M),
    /// The application should terminate. Routed to quit handlers only.
    Quit,
    /// No final message.
    Nothing,
}

/// Handle a running [`Command`] uses to report intermediate messages.
///
/// The event bus hands each command an emitter wired to its own `emit` path.
/// Once the bus is disposed every emission becomes a silent no-op, so a
/// long-running command that outlives the bus cannot corrupt anything.
pub struct Emitter<M> {
    send: Arc<dyn Fn(M) + Send + Sync>,
}

impl<M> Clone for Emitter<M> {
    fn clone(&self) -> Self {
        Self {
            send: self.send.clone(),
        }
    }
}

impl<M> Emitter<M> {
    /// Create an emitter from a sink function.
    ///
    /// Mostly useful in tests; commands receive their emitter from
    /// [`EventBus::run_cmd`](crate::bus::EventBus::run_cmd).
    pub fn new(send: impl Fn(M) + Send + Sync + 'static) -> Self {
        Self {
            send: Arc::new(send),
        }
    }

    /// Emit an intermediate message.
    pub fn emit(&self, msg: M) {
        (self.send)(msg);
    }
}

/// A deferred, possibly-failing side effect.
///
/// A command is single-use: the bus starts it once, it may emit any number of
/// intermediate messages through its [`Emitter`], and it settles to exactly
/// one [`Outcome`]. A failing command is caught at the bus boundary and
/// logged; the failure never reaches subscribers.
///
/// # Examples
///
/// ```rust,ignore
/// // Do nothing:
/// let cmd = Command::none();
///
/// // Run an async task and map the result to a message:
/// let cmd = Command::perform(
///     async { fetch_data().await },
///     Msg::DataLoaded,
/// );
///
/// // Quit the program:
/// let cmd = Command::quit();
/// ```
pub struct Command<M: Send + 'static> {
    #[allow(clippy::type_complexity)]
    run: Box<dyn FnOnce(Emitter<M>) -> BoxFuture<'static, anyhow::Result<Outcome<M>>> + Send>,
}

impl<M: Send + 'static> Command<M> {
    /// The full form: `f` receives the emitter and resolves to an outcome.
    ///
    /// Use this for streaming commands that report progress while they run:
    ///
    /// ```rust,ignore
    /// Command::from_fn(|emit| async move {
    ///     for frame in 0..60 {
    ///         emit.emit(Msg::Frame(frame));
    ///         tokio::time::sleep(FRAME).await;
    ///     }
    ///     Ok(Outcome::Message(Msg::AnimationDone))
    /// })
    /// ```
    pub fn from_fn<F, Fut>(f: F) -> Self
    where
        F: FnOnce(Emitter<M>) -> Fut + Send + 'static,
        Fut: Future<Output = anyhow::Result<Outcome<M>>> + Send + 'static,
    {
        Command {
            run: Box::new(move |emitter| Box::pin(f(emitter))),
        }
    }

    /// No-op command.
    pub fn none() -> Self {
        Command::from_fn(|_| async { Ok(Outcome::Nothing) })
    }

    /// Settle immediately with a message.
    pub fn message(msg: M) -> Self {
        Command::from_fn(move |_| async move { Ok(Outcome::Message(msg)) })
    }

    /// Settle immediately with the quit sentinel.
    pub fn quit() -> Self {
        Command::from_fn(|_| async { Ok(Outcome::Quit) })
    }

    /// Run an async future, map the result to a message.
    pub fn perform<F, T>(future: F, map: impl FnOnce(T) -> M + Send + 'static) -> Self
    where
        F: Future<Output = T> + Send + 'static,
    {
        Command::from_fn(move |_| async move { Ok(Outcome::Message(map(future.await))) })
    }

    /// Run a fallible future. `Ok` settles to a message; `Err` is reported on
    /// the bus's operator log and nothing is delivered.
    pub fn try_perform<F>(future: F) -> Self
    where
        F: Future<Output = anyhow::Result<M>> + Send + 'static,
    {
        Command::from_fn(move |_| async move { Ok(Outcome::Message(future.await?)) })
    }

    /// One-shot timer: fires once after `duration`, mapping the instant to a
    /// message.
    pub fn tick(
        duration: std::time::Duration,
        map: impl FnOnce(std::time::Instant) -> M + Send + 'static,
    ) -> Self {
        Command::from_fn(move |_| async move {
            tokio::time::sleep(duration).await;
            Ok(Outcome::Message(map(std::time::Instant::now())))
        })
    }

    /// Request the current window size. The callback receives (columns, rows),
    /// falling back to 80x24 when the environment cannot report one.
    pub fn window_size(map: impl FnOnce(u16, u16) -> M + Send + 'static) -> Self {
        Command::from_fn(move |_| async move {
            let (cols, rows) = crossterm::terminal::size().unwrap_or((80, 24));
            Ok(Outcome::Message(map(cols, rows)))
        })
    }

    /// Start the command with the given emitter, producing its settle future.
    pub(crate) fn start(
        self,
        emitter: Emitter<M>,
    ) -> BoxFuture<'static, anyhow::Result<Outcome<M>>> {
        (self.run)(emitter)
    }
}
