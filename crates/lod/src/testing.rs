//! Deterministic providers and a recording uploader for unit tests.

use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;

use foundation::{GeometryHandle, TextureHandle};
use futures_util::FutureExt;
use futures_util::future::BoxFuture;
use tokio::sync::oneshot;

use crate::kind::NodeKind;
use crate::layer::TileLayer;
use crate::provider::{NodeResources, TileFetchError, TileImage, TileProvider, TileUploader};
use crate::tile::TileCoord;

/// Resolves every fetch immediately, failing the coordinates in `failing`.
#[derive(Default)]
pub struct ImmediateProvider {
    pub failing: HashSet<TileCoord>,
}

impl ImmediateProvider {
    pub fn failing(coords: impl IntoIterator<Item = TileCoord>) -> Self {
        Self {
            failing: coords.into_iter().collect(),
        }
    }
}

impl TileProvider for ImmediateProvider {
    fn fetch_tile(&self, coord: TileCoord) -> BoxFuture<'static, Result<TileImage, TileFetchError>> {
        let result = if self.failing.contains(&coord) {
            Err(TileFetchError::NotFound)
        } else {
            Ok(TileImage::solid(2, 2, [coord.level as u8, 0, 0, 255]))
        };
        futures_util::future::ready(result).boxed()
    }
}

pub type PendingFetches = Rc<RefCell<Vec<(TileCoord, oneshot::Sender<Result<TileImage, TileFetchError>>)>>>;

/// Parks every fetch until the test answers it through the shared list.
#[derive(Default, Clone)]
pub struct ManualProvider {
    pub pending: PendingFetches,
}

impl ManualProvider {
    /// Answer the `index`-th parked fetch (in issue order) with a small image.
    pub fn resolve(&self, index: usize) -> TileCoord {
        let (coord, tx) = self.pending.borrow_mut().remove(index);
        let _ = tx.send(Ok(TileImage::solid(1, 1, [255; 4])));
        coord
    }

    pub fn resolve_all(&self) -> Vec<TileCoord> {
        let drained: Vec<_> = self.pending.borrow_mut().drain(..).collect();
        drained
            .into_iter()
            .map(|(coord, tx)| {
                let _ = tx.send(Ok(TileImage::solid(1, 1, [255; 4])));
                coord
            })
            .collect()
    }

    pub fn parked(&self) -> Vec<TileCoord> {
        self.pending.borrow().iter().map(|(c, _)| *c).collect()
    }
}

impl TileProvider for ManualProvider {
    fn fetch_tile(&self, coord: TileCoord) -> BoxFuture<'static, Result<TileImage, TileFetchError>> {
        let (tx, rx) = oneshot::channel();
        self.pending.borrow_mut().push((coord, tx));
        async move { rx.await.unwrap_or(Err(TileFetchError::Cancelled)) }.boxed()
    }
}

#[derive(Debug, Default)]
pub struct RecordingUploader {
    next: u64,
    pub textures: Vec<(TileCoord, TileLayer)>,
    pub geometries: Vec<(TileCoord, NodeKind)>,
    pub released: Vec<(TileCoord, NodeResources)>,
}

impl TileUploader for RecordingUploader {
    fn upload_texture(&mut self, coord: TileCoord, layer: TileLayer, _image: &TileImage) -> TextureHandle {
        self.next += 1;
        self.textures.push((coord, layer));
        TextureHandle(self.next)
    }

    fn build_geometry(
        &mut self,
        coord: TileCoord,
        kind: NodeKind,
        _height: &TileImage,
        _segments: u32,
    ) -> GeometryHandle {
        self.next += 1;
        self.geometries.push((coord, kind));
        GeometryHandle(self.next)
    }

    fn release(&mut self, coord: TileCoord, resources: NodeResources) {
        self.released.push((coord, resources));
    }
}
