use std::collections::VecDeque;

use foundation::math::Vec3;
use runtime::Frame;

use crate::event::LodEventBus;
use crate::node::LodNode;
use crate::tree::LodTree;

/// What one [`LodController::update`] pass changed.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct LodUpdate {
    pub splits: usize,
    pub merges: usize,
}

/// Distance-driven split/merge policy.
///
/// Walks the tree top-down once per frame. Nodes created by a split are not
/// visited again in the same pass, so detail grows by one level per frame.
#[derive(Debug, Default, Copy, Clone)]
pub struct LodController;

impl LodController {
    pub fn new() -> Self {
        Self
    }

    /// Distance from `viewpoint` to the node box, in node edge lengths.
    pub fn metric(node: &LodNode, viewpoint: Vec3) -> f64 {
        node.bounds().distance_to_point(viewpoint) / node.coord().edge_length()
    }

    pub fn update(
        &self,
        tree: &mut LodTree,
        viewpoint: Vec3,
        frame: Frame,
        bus: &mut LodEventBus,
    ) -> LodUpdate {
        let split_threshold = tree.config().split_threshold;
        let merge_threshold = tree.config().merge_threshold;
        let min_level = tree.config().min_level;
        let max_level = tree.max_level();

        let mut summary = LodUpdate::default();
        let mut queue = VecDeque::from([tree.root()]);
        while let Some(id) = queue.pop_front() {
            let Some(node) = tree.node(id) else {
                continue;
            };
            let level = node.level();

            match node.children() {
                None => {
                    if level < max_level
                        && Self::metric(node, viewpoint) < split_threshold
                        && tree.split(id, frame, bus)
                    {
                        summary.splits += 1;
                    }
                }
                Some(children) => {
                    let far = level >= min_level
                        && children.iter().all(|c| {
                            tree.node(*c)
                                .is_some_and(|n| Self::metric(n, viewpoint) > merge_threshold)
                        });
                    if far {
                        if tree.merge(id, frame, bus) {
                            summary.merges += 1;
                        }
                    } else {
                        queue.extend(children);
                    }
                }
            }
        }

        if summary != LodUpdate::default() {
            tracing::debug!(
                frame = frame.index,
                splits = summary.splits,
                merges = summary.merges,
                nodes = tree.len(),
                "lod update"
            );
        }
        summary
    }
}
