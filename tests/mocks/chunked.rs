//! Scripted chunked upstream
//!
//! A real axum server whose response body is produced chunk by chunk, so
//! tests can observe timing, boundaries and connection teardown that a
//! buffered mock cannot show.

#![allow(dead_code)]

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    extract::State,
    http::{header, StatusCode},
    response::Response,
    routing::post,
    Router,
};
use bytes::Bytes;
use tokio::sync::Notify;

use super::upstream::CHAT_PATH;

/// How the upstream body is produced
#[derive(Clone)]
enum Script {
    /// Emit each chunk after `delay`
    Paced { chunks: Vec<Bytes>, delay: Duration },
    /// Emit `first`, wait for the gate, then emit `rest`
    Gated {
        first: Bytes,
        rest: Vec<Bytes>,
        gate: Arc<Notify>,
    },
    /// Emit a tick every `interval` until the connection is torn down
    Endless {
        interval: Duration,
        dropped: Arc<AtomicBool>,
    },
}

/// Sets its flag when the body producing stream is dropped
struct DropFlag(Arc<AtomicBool>);

impl Drop for DropFlag {
    fn drop(&mut self) {
        self.0.store(true, Ordering::SeqCst);
    }
}

pub struct ChunkedUpstream {
    addr: SocketAddr,
    gate: Arc<Notify>,
    dropped: Arc<AtomicBool>,
}

impl ChunkedUpstream {
    /// Chunks separated by `delay`
    pub async fn paced(chunks: Vec<Bytes>, delay: Duration) -> Self {
        Self::serve(|_, _| Script::Paced { chunks, delay }).await
    }

    /// One chunk, then the rest only after [`ChunkedUpstream::open_gate`]
    pub async fn gated(first: Bytes, rest: Vec<Bytes>) -> Self {
        Self::serve(|gate, _| Script::Gated { first, rest, gate }).await
    }

    /// Never-ending body; see [`ChunkedUpstream::body_dropped`]
    pub async fn endless(interval: Duration) -> Self {
        Self::serve(|_, dropped| Script::Endless { interval, dropped }).await
    }

    async fn serve<F>(build: F) -> Self
    where
        F: FnOnce(Arc<Notify>, Arc<AtomicBool>) -> Script,
    {
        let gate = Arc::new(Notify::new());
        let dropped = Arc::new(AtomicBool::new(false));
        let script = build(gate.clone(), dropped.clone());

        let app = Router::new()
            .route(CHAT_PATH, post(respond))
            .with_state(script);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind chunked upstream");
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            addr,
            gate,
            dropped,
        }
    }

    pub fn chat_url(&self) -> String {
        format!("http://{}{}", self.addr, CHAT_PATH)
    }

    pub fn open_gate(&self) {
        self.gate.notify_one();
    }

    /// Whether the endless body has been torn down
    pub fn body_dropped(&self) -> bool {
        self.dropped.load(Ordering::SeqCst)
    }
}

async fn respond(State(script): State<Script>) -> Response {
    let body = match script {
        Script::Paced { chunks, delay } => Body::from_stream(async_stream::stream! {
            for chunk in chunks {
                tokio::time::sleep(delay).await;
                yield Ok::<_, Infallible>(chunk);
            }
        }),
        Script::Gated { first, rest, gate } => Body::from_stream(async_stream::stream! {
            yield Ok::<_, Infallible>(first);
            gate.notified().await;
            for chunk in rest {
                yield Ok::<_, Infallible>(chunk);
            }
        }),
        Script::Endless { interval, dropped } => {
            let flag = DropFlag(dropped);
            Body::from_stream(async_stream::stream! {
                let _flag = flag;
                let mut tick = 0u64;
                loop {
                    tokio::time::sleep(interval).await;
                    tick += 1;
                    yield Ok::<_, Infallible>(Bytes::from(format!("data: tick {}\n\n", tick)));
                }
            })
        }
    };

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "text/event-stream")
        .body(body)
        .unwrap()
}
