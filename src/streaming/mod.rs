//! Streaming relay body
//!
//! [`RelayStream`] is the byte sequence handed back to the caller: lazy,
//! forward-only, single-pass, finite once the upstream closes, and never
//! restartable. Chunks pass through untouched, one item per upstream chunk.
//!
//! Dropping the stream drops the upstream response it wraps, which closes the
//! upstream connection. That is how a caller disconnect propagates.

use std::pin::Pin;
use std::task::{Context, Poll};

use bytes::Bytes;
use futures::Stream;
use tracing::{debug, warn};

/// Stream type for upstream response bodies
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, reqwest::Error>> + Send>>;

/// Where a stream stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Termination {
    Running,
    Completed,
    Failed,
}

/// Upstream body relayed chunk by chunk
pub struct RelayStream<S = ByteStream> {
    inner: S,
    chunks: u64,
    bytes: u64,
    state: Termination,
}

impl<S> RelayStream<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            chunks: 0,
            bytes: 0,
            state: Termination::Running,
        }
    }

    /// Chunks relayed so far
    pub fn chunks(&self) -> u64 {
        self.chunks
    }

    /// Bytes relayed so far
    pub fn bytes(&self) -> u64 {
        self.bytes
    }
}

impl<S, E> Stream for RelayStream<S>
where
    S: Stream<Item = Result<Bytes, E>> + Unpin,
    E: std::fmt::Display,
{
    type Item = Result<Bytes, E>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        if self.state != Termination::Running {
            return Poll::Ready(None);
        }

        let polled = Pin::new(&mut self.inner).poll_next(cx);
        match &polled {
            Poll::Ready(Some(Ok(chunk))) => {
                self.chunks += 1;
                self.bytes += chunk.len() as u64;
            }
            Poll::Ready(Some(Err(e))) => {
                warn!(
                    error = %e,
                    chunks = self.chunks,
                    bytes = self.bytes,
                    "Upstream stream failed mid-body"
                );
                self.state = Termination::Failed;
            }
            Poll::Ready(None) => {
                debug!(chunks = self.chunks, bytes = self.bytes, "Upstream stream completed");
                self.state = Termination::Completed;
            }
            Poll::Pending => {}
        }
        polled
    }
}

impl<S> Drop for RelayStream<S> {
    fn drop(&mut self) {
        if self.state == Termination::Running {
            debug!(
                chunks = self.chunks,
                bytes = self.bytes,
                "Caller went away before upstream finished, closing upstream"
            );
        }
    }
}
