use crate::foundation::core::{Point, ScreenPoint, Vec2};
use crate::foundation::error::{FrostError, FrostResult};
use crate::scene::tree::{NodeId, SurfaceTree};

/// One step of a containment walk: `node` sits at `offset` inside `parent`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ChainLink {
    pub node: NodeId,
    pub parent: NodeId,
    pub offset: Vec2,
}

/// Iterator over the containment links from a node up to its root surface.
///
/// Yields an error and stops when a parent link dangles, points at a node that cannot contain
/// children, or the walk runs longer than the tree has nodes (a cycle).
pub struct ContainmentChain<'a> {
    tree: &'a SurfaceTree,
    current: Option<NodeId>,
    steps: usize,
}

impl<'a> ContainmentChain<'a> {
    pub fn new(tree: &'a SurfaceTree, start: NodeId) -> Self {
        Self {
            tree,
            current: Some(start),
            steps: 0,
        }
    }

    fn fail(&mut self, err: FrostError) -> Option<FrostResult<ChainLink>> {
        self.current = None;
        Some(Err(err))
    }
}

impl Iterator for ContainmentChain<'_> {
    type Item = FrostResult<ChainLink>;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.current?;
        let Some(node) = self.tree.node(id) else {
            return self.fail(FrostError::containment(format!("{id:?} is not in the tree")));
        };
        let Some(parent) = node.parent else {
            self.current = None;
            return None;
        };

        self.steps += 1;
        if self.steps > self.tree.len() {
            return self.fail(FrostError::containment(format!(
                "containment chain from {id:?} does not terminate"
            )));
        }
        match self.tree.node(parent) {
            None => self.fail(FrostError::containment(format!(
                "{id:?} points at missing parent {parent:?}"
            ))),
            Some(p) if !p.kind.is_container() => self.fail(FrostError::containment(format!(
                "{id:?} points at {parent:?}, which is not a group"
            ))),
            Some(_) => {
                self.current = Some(parent);
                Some(Ok(ChainLink {
                    node: id,
                    parent,
                    offset: node.offset,
                }))
            }
        }
    }
}

/// Computes where a node's origin sits relative to its root surface.
#[derive(Clone, Copy, Debug, Default)]
pub struct ScreenPositionResolver;

impl ScreenPositionResolver {
    /// Sum the local offsets along the containment chain.
    ///
    /// A node without a parent resolves to the origin.
    pub fn try_resolve(&self, tree: &SurfaceTree, node: NodeId) -> FrostResult<ScreenPoint> {
        let mut acc = Vec2::ZERO;
        for link in ContainmentChain::new(tree, node) {
            acc += link?.offset;
        }
        Ok(acc.to_point())
    }

    /// Like [`Self::try_resolve`], but a broken chain resolves to the origin.
    pub fn resolve(&self, tree: &SurfaceTree, node: NodeId) -> ScreenPoint {
        match self.try_resolve(tree, node) {
            Ok(p) => p,
            Err(err) => {
                tracing::debug!(?node, %err, "position resolution failed, using origin");
                Point::ZERO
            }
        }
    }
}

/// Non-owning reference from a layer to the root surface it captures from.
///
/// Only a node id is kept, never a borrow of the tree. Every access re-walks the layer's
/// containment chain, so a layer that was detached (directly or through an ancestor) stops
/// resolving immediately.
#[derive(Clone, Copy, Debug, Default)]
pub struct SurfaceHandle {
    cached: Option<NodeId>,
}

impl SurfaceHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Root found by the last [`Self::resolve`], without validating it.
    pub fn cached(&self) -> Option<NodeId> {
        self.cached
    }

    pub fn invalidate(&mut self) {
        self.cached = None;
    }

    /// Root surface for `node`, or `None` if `node` is detached or its chain is broken.
    pub fn resolve(&mut self, tree: &SurfaceTree, node: NodeId) -> Option<NodeId> {
        let mut top = None;
        for link in ContainmentChain::new(tree, node) {
            match link {
                Ok(l) => top = Some(l.parent),
                Err(err) => {
                    tracing::debug!(?node, %err, "root surface lookup failed");
                    top = None;
                    break;
                }
            }
        }
        let root = top.filter(|&root| tree.is_root_surface(root));
        if root != self.cached {
            tracing::debug!(?node, from = ?self.cached, to = ?root, "root surface changed");
            self.cached = root;
        }
        root
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/position.rs"]
mod tests;
