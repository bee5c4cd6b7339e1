use std::task::{Context, Poll};

use futures_util::future::BoxFuture;
use futures_util::stream::{FuturesUnordered, StreamExt};
use futures_util::task::noop_waker_ref;
use futures_util::FutureExt;

use crate::layer::TileLayer;
use crate::node::NodeId;
use crate::provider::{TileFetchError, TileImage};
use crate::tile::TileCoord;

/// Liveness token for one load: the node handle plus the node's load epoch
/// at the time the load was issued.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct LoadTicket {
    pub node: NodeId,
    pub epoch: u32,
    pub layer: TileLayer,
}

#[derive(Debug)]
pub struct LoadCompletion {
    pub ticket: LoadTicket,
    pub coord: TileCoord,
    pub started_frame: u64,
    pub result: Result<TileImage, TileFetchError>,
}

/// In-flight provider fetches.
///
/// Fetches are never cancelled; completions carry their ticket so the tree
/// can discard results whose node is gone.
#[derive(Default)]
pub struct Loader {
    in_flight: FuturesUnordered<BoxFuture<'static, LoadCompletion>>,
}

impl std::fmt::Debug for Loader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Loader")
            .field("in_flight", &self.in_flight.len())
            .finish()
    }
}

impl Loader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.in_flight.len()
    }

    pub fn is_empty(&self) -> bool {
        self.in_flight.is_empty()
    }

    pub fn submit(
        &mut self,
        ticket: LoadTicket,
        coord: TileCoord,
        started_frame: u64,
        fetch: BoxFuture<'static, Result<TileImage, TileFetchError>>,
    ) {
        self.in_flight.push(
            fetch
                .map(move |result| LoadCompletion {
                    ticket,
                    coord,
                    started_frame,
                    result,
                })
                .boxed(),
        );
    }

    /// Completions that are ready right now, without blocking.
    pub fn poll_ready(&mut self) -> Vec<LoadCompletion> {
        let mut cx = Context::from_waker(noop_waker_ref());
        let mut ready = Vec::new();
        while let Poll::Ready(Some(done)) = self.in_flight.poll_next_unpin(&mut cx) {
            ready.push(done);
        }
        ready
    }

    /// Wait for the next completion; `None` once nothing is in flight.
    pub async fn next(&mut self) -> Option<LoadCompletion> {
        self.in_flight.next().await
    }
}
