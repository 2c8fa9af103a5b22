use glam::Vec3;
use gridview_common::{Aabb, EntityId, Transform};
use std::collections::BTreeMap;

/// Geometry of a node, in local space centered on the origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape {
    /// Axis-aligned cube with the given edge length.
    Cube { size: f32 },
}

impl Shape {
    /// Unit cube, the default box geometry.
    pub const UNIT_CUBE: Shape = Shape::Cube { size: 1.0 };

    /// Local-space bounds before the node transform is applied.
    pub fn local_bounds(&self) -> Aabb {
        match *self {
            Shape::Cube { size } => Aabb::from_center_size(Vec3::ZERO, Vec3::splat(size)),
        }
    }
}

/// A renderable node: geometry, flat color and placement.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub transform: Transform,
    pub shape: Shape,
    /// Linear RGBA. Nodes are drawn unlit.
    pub color: [f32; 4],
    pub visible: bool,
}

impl Node {
    pub fn cube(position: Vec3, color: [f32; 4]) -> Self {
        Self {
            transform: Transform::from_position(position),
            shape: Shape::UNIT_CUBE,
            color,
            visible: true,
        }
    }
}

/// The scene graph the viewer renders.
///
/// Flat by construction: every node is a root. Uses BTreeMap so picking and
/// drawing walk nodes in the same order on every run.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    nodes: BTreeMap<EntityId, Node>,
    /// Clear color. `None` keeps the renderer's default backdrop.
    background: Option<[f32; 4]>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn nodes(&self) -> &BTreeMap<EntityId, Node> {
        &self.nodes
    }

    pub fn background(&self) -> Option<[f32; 4]> {
        self.background
    }

    pub fn set_background(&mut self, background: Option<[f32; 4]>) {
        self.background = background;
    }

    /// Add a node and return its id.
    pub fn add(&mut self, node: Node) -> EntityId {
        let id = EntityId::new();
        self.add_with_id(id, node);
        id
    }

    /// Add a node under a caller-chosen id, replacing any previous node.
    pub fn add_with_id(&mut self, id: EntityId, node: Node) {
        tracing::debug!(id = %id.short(), "node added");
        self.nodes.insert(id, node);
    }

    pub fn remove(&mut self, id: EntityId) -> Option<Node> {
        let removed = self.nodes.remove(&id);
        if removed.is_some() {
            tracing::debug!(id = %id.short(), "node removed");
        }
        removed
    }

    pub fn get(&self, id: EntityId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Node> {
        self.nodes.get_mut(&id)
    }

    /// Replace a node's transform. Returns false if the node does not exist.
    pub fn set_transform(&mut self, id: EntityId, transform: Transform) -> bool {
        match self.nodes.get_mut(&id) {
            Some(node) => {
                node.transform = transform;
                true
            }
            None => false,
        }
    }

    /// Move a node, keeping rotation and scale.
    pub fn set_position(&mut self, id: EntityId, position: Vec3) -> bool {
        match self.nodes.get_mut(&id) {
            Some(node) => {
                node.transform.position = position;
                true
            }
            None => false,
        }
    }
}
