use crate::foundation::core::{Rgba8, Vec2};
use crate::foundation::error::{FrostError, FrostResult};
use crate::render::buffer::PixelBuffer;

/// Index of a node in a [`SurfaceTree`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub u32);

/// What a node paints.
#[derive(Clone, Debug, PartialEq)]
pub enum NodeKind {
    /// Container. Only groups may have children. `fill` paints the group's box underneath them.
    Group { fill: Option<Rgba8> },
    /// Rectangle of one straight-alpha color.
    Solid(Rgba8),
    /// Image stretched over the node's box.
    Image(PixelBuffer),
}

impl NodeKind {
    pub fn is_container(&self) -> bool {
        matches!(self, Self::Group { .. })
    }
}

#[derive(Clone, Debug)]
pub struct Node {
    pub kind: NodeKind,
    pub(crate) parent: Option<NodeId>,
    /// Offset of this node's origin inside its parent.
    pub offset: Vec2,
    pub width: u32,
    pub height: u32,
    pub opacity: f32,
    pub visible: bool,
    children: Vec<NodeId>,
}

impl Node {
    /// Containing node. `None` for the root surface and for detached nodes.
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}

/// Arena-backed layer tree standing in for the host's view hierarchy.
///
/// Node 0 is the root surface: a parentless group whose size is the surface size. Removed nodes
/// leave an empty slot so ids stay stable; their children keep a dangling parent link until they
/// are reparented.
#[derive(Clone, Debug)]
pub struct SurfaceTree {
    nodes: Vec<Option<Node>>,
}

impl SurfaceTree {
    pub fn new(width: u32, height: u32, fill: Option<Rgba8>) -> Self {
        Self {
            nodes: vec![Some(Node {
                kind: NodeKind::Group { fill },
                parent: None,
                offset: Vec2::ZERO,
                width,
                height,
                opacity: 1.0,
                visible: true,
                children: Vec::new(),
            })],
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Number of slots, including removed ones.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0 as usize).and_then(Option::as_ref)
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.0 as usize).and_then(Option::as_mut)
    }

    fn require_mut(&mut self, id: NodeId) -> FrostResult<&mut Node> {
        self.node_mut(id)
            .ok_or_else(|| FrostError::validation(format!("{id:?} is not in the tree")))
    }

    fn require_container(&self, id: NodeId) -> FrostResult<()> {
        match self.node(id) {
            Some(n) if n.kind.is_container() => Ok(()),
            Some(_) => Err(FrostError::validation(format!(
                "{id:?} is not a group and cannot hold children"
            ))),
            None => Err(FrostError::validation(format!("{id:?} is not in the tree"))),
        }
    }

    /// Whether `id` names a live, parentless group (a root surface).
    pub fn is_root_surface(&self, id: NodeId) -> bool {
        self.node(id)
            .is_some_and(|n| n.parent.is_none() && n.kind.is_container())
    }

    /// Append a child to `parent`; it paints above its earlier siblings.
    pub fn add_node(
        &mut self,
        parent: NodeId,
        kind: NodeKind,
        offset: Vec2,
        width: u32,
        height: u32,
    ) -> FrostResult<NodeId> {
        self.require_container(parent)?;
        let id = NodeId(
            u32::try_from(self.nodes.len())
                .map_err(|_| FrostError::validation("surface tree is full"))?,
        );
        self.nodes.push(Some(Node {
            kind,
            parent: Some(parent),
            offset,
            width,
            height,
            opacity: 1.0,
            visible: true,
            children: Vec::new(),
        }));
        self.require_mut(parent)?.children.push(id);
        Ok(id)
    }

    pub fn add_group(
        &mut self,
        parent: NodeId,
        offset: Vec2,
        width: u32,
        height: u32,
    ) -> FrostResult<NodeId> {
        self.add_node(parent, NodeKind::Group { fill: None }, offset, width, height)
    }

    /// Remove a single node. Its children are not removed.
    pub fn remove(&mut self, id: NodeId) -> FrostResult<Node> {
        if id == self.root() {
            return Err(FrostError::validation("cannot remove the root surface"));
        }
        self.detach(id)?;
        self.nodes
            .get_mut(id.0 as usize)
            .and_then(Option::take)
            .ok_or_else(|| FrostError::validation(format!("{id:?} is not in the tree")))
    }

    /// Unlink `id` from its parent; it stops painting and resolves to the origin.
    pub fn detach(&mut self, id: NodeId) -> FrostResult<()> {
        let parent = self.require_mut(id)?.parent.take();
        if let Some(p) = parent
            && let Some(pn) = self.node_mut(p)
        {
            pn.children.retain(|&c| c != id);
        }
        Ok(())
    }

    /// Move `id` under `new_parent`, painting above its new siblings.
    pub fn reparent(&mut self, id: NodeId, new_parent: NodeId) -> FrostResult<()> {
        self.require_container(new_parent)?;
        if self.node(id).is_none() {
            return Err(FrostError::validation(format!("{id:?} is not in the tree")));
        }
        if self.is_ancestor_or_self(id, new_parent) {
            return Err(FrostError::validation(format!(
                "reparenting {id:?} under {new_parent:?} would create a cycle"
            )));
        }
        self.detach(id)?;
        self.require_mut(id)?.parent = Some(new_parent);
        self.require_mut(new_parent)?.children.push(id);
        Ok(())
    }

    fn is_ancestor_or_self(&self, ancestor: NodeId, mut node: NodeId) -> bool {
        for _ in 0..=self.nodes.len() {
            if node == ancestor {
                return true;
            }
            match self.node(node).and_then(|n| n.parent) {
                Some(p) => node = p,
                None => return false,
            }
        }
        false
    }

    pub fn set_offset(&mut self, id: NodeId, offset: Vec2) -> FrostResult<()> {
        self.require_mut(id)?.offset = offset;
        Ok(())
    }

    pub fn translate(&mut self, id: NodeId, delta: Vec2) -> FrostResult<()> {
        self.require_mut(id)?.offset += delta;
        Ok(())
    }

    pub fn set_size(&mut self, id: NodeId, width: u32, height: u32) -> FrostResult<()> {
        let n = self.require_mut(id)?;
        n.width = width;
        n.height = height;
        Ok(())
    }

    pub fn set_opacity(&mut self, id: NodeId, opacity: f32) -> FrostResult<()> {
        self.require_mut(id)?.opacity = opacity.clamp(0.0, 1.0);
        Ok(())
    }

    pub fn set_visible(&mut self, id: NodeId, visible: bool) -> FrostResult<()> {
        self.require_mut(id)?.visible = visible;
        Ok(())
    }

    /// Nodes under `root` (inclusive) in paint order, with their offset relative to `root` and
    /// their accumulated opacity. Hidden or fully transparent nodes prune their whole subtree.
    pub(crate) fn paint_order(&self, root: NodeId) -> Vec<PaintItem<'_>> {
        let mut out = Vec::new();
        let mut stack = vec![(root, Vec2::ZERO, 1.0f32)];
        while let Some((id, origin, parent_opacity)) = stack.pop() {
            let Some(node) = self.node(id) else {
                continue;
            };
            let opacity = parent_opacity * node.opacity;
            if !node.visible || opacity <= 0.0 {
                continue;
            }
            out.push(PaintItem {
                node,
                origin,
                opacity,
            });
            // Reverse so the first child is popped, and therefore painted, first.
            for &child in node.children.iter().rev() {
                if let Some(c) = self.node(child) {
                    stack.push((child, origin + c.offset, opacity));
                }
            }
        }
        out
    }
}

/// One node ready to draw: where it sits relative to the capture root and how opaque it is.
pub(crate) struct PaintItem<'a> {
    pub(crate) node: &'a Node,
    pub(crate) origin: Vec2,
    pub(crate) opacity: f32,
}

#[cfg(test)]
#[path = "../../tests/unit/scene/tree.rs"]
mod tests;
