//! The raw terminal I/O boundary.
//!
//! The bus consumes two streams from an [`IoSource`]: raw byte chunks from
//! the keyboard and resize notifications. [`StdinIo`] is the real-terminal
//! implementation; tests substitute scripted sources.

use futures::stream::BoxStream;
use futures::StreamExt;
use tokio::io::AsyncReadExt;

/// An adapter delivering raw terminal input to the bus.
pub trait IoSource: Send + 'static {
    /// Raw byte chunks as they arrive from the terminal in raw mode.
    fn input(&mut self) -> BoxStream<'static, Vec<u8>>;

    /// Terminal dimension changes as `(columns, rows)`.
    fn resize(&mut self) -> BoxStream<'static, (u16, u16)>;
}

/// Real-terminal I/O: raw-mode stdin plus SIGWINCH-driven resize notices.
///
/// Raw mode is enabled on construction. The guard rides inside the input
/// stream, so cooked mode is restored when the stream is dropped — that is,
/// when the bus connection holding it is disposed.
pub struct StdinIo {
    raw: Option<RawModeGuard>,
}

impl StdinIo {
    /// Put the terminal into raw mode. Fails when stdin is not a terminal or
    /// the mode switch is refused.
    pub fn new() -> std::io::Result<Self> {
        #[cfg(unix)]
        if unsafe { libc::isatty(libc::STDIN_FILENO) } != 1 {
            return Err(std::io::Error::other("stdin is not a terminal"));
        }
        crossterm::terminal::enable_raw_mode()?;
        Ok(Self {
            raw: Some(RawModeGuard),
        })
    }
}

impl IoSource for StdinIo {
    fn input(&mut self) -> BoxStream<'static, Vec<u8>> {
        let state = (tokio::io::stdin(), self.raw.take());
        let stream = futures::stream::unfold(state, |(mut stdin, guard)| async move {
            let mut buf = [0u8; 1024];
            match stdin.read(&mut buf).await {
                Ok(0) | Err(_) => None,
                Ok(n) => Some((buf[..n].to_vec(), (stdin, guard))),
            }
        });
        Box::pin(stream)
    }

    #[cfg(unix)]
    fn resize(&mut self) -> BoxStream<'static, (u16, u16)> {
        use tokio::signal::unix::{signal, SignalKind};
        use tokio_stream::wrappers::SignalStream;

        match signal(SignalKind::window_change()) {
            Ok(sig) => Box::pin(
                SignalStream::new(sig).map(|_| crossterm::terminal::size().unwrap_or((80, 24))),
            ),
            Err(_) => Box::pin(futures::stream::pending()),
        }
    }

    #[cfg(not(unix))]
    fn resize(&mut self) -> BoxStream<'static, (u16, u16)> {
        Box::pin(futures::stream::pending())
    }
}

/// Restores cooked input mode on drop.
struct RawModeGuard;

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = crossterm::terminal::disable_raw_mode();
    }
}
