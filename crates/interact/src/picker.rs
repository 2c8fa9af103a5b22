use crate::interactable::Interactables;
use glam::{UVec2, Vec2, Vec3};
use gridview_common::{EntityId, Ray};
use gridview_render::ViewCamera;
use gridview_scene::Scene;

/// A candidate the pointer ray passes through.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PickHit {
    pub id: EntityId,
    /// Distance from the ray origin to the entry point, in world units.
    pub distance: f32,
    pub point: Vec3,
}

/// Tracks the pointer in normalized device coordinates and resolves which
/// scene nodes lie under it.
#[derive(Debug, Clone, Default)]
pub struct PointerPicker {
    ndc: Vec2,
}

impl PointerPicker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last normalized pointer position, x right and y up, both in [-1, 1].
    pub fn pointer(&self) -> Vec2 {
        self.ndc
    }

    /// Convert a pointer position in surface pixels to normalized device
    /// coordinates and remember it. Pixel y grows downward; the result's y
    /// grows upward.
    pub fn on_pointer_move(&mut self, pixel: Vec2, viewport: UVec2) -> Vec2 {
        let size = viewport.max(UVec2::ONE).as_vec2();
        let x = pixel.x / size.x * 2.0 - 1.0;
        let y = -(pixel.y / size.y * 2.0 - 1.0);
        self.ndc = Vec2::new(x, y).clamp(Vec2::NEG_ONE, Vec2::ONE);
        self.ndc
    }

    /// Set the pointer directly in normalized coordinates.
    pub fn set_pointer(&mut self, ndc: Vec2) {
        self.ndc = ndc.clamp(Vec2::NEG_ONE, Vec2::ONE);
    }

    pub fn ray(&self, camera: &ViewCamera) -> Ray {
        camera.ray_from_ndc(self.ndc)
    }

    /// Every candidate the pointer ray intersects, nearest first.
    /// Unknown and hidden nodes are never hit.
    pub fn intersect(
        &self,
        camera: &ViewCamera,
        scene: &Scene,
        candidates: impl IntoIterator<Item = EntityId>,
    ) -> Vec<PickHit> {
        let ray = self.ray(camera);
        let mut hits: Vec<PickHit> = candidates
            .into_iter()
            .filter_map(|id| {
                let node = scene.get(id).filter(|n| n.visible)?;
                // Test in the node's local space so rotation and scale are honored.
                let model = node.transform.matrix();
                let inv = model.inverse();
                let local = Ray {
                    origin: inv.transform_point3(ray.origin),
                    direction: inv.transform_vector3(ray.direction),
                };
                let t = node.shape.local_bounds().ray_intersection(&local)?;
                let point = model.transform_point3(local.origin + local.direction * t);
                Some(PickHit {
                    id,
                    distance: ray.origin.distance(point),
                    point,
                })
            })
            .collect();
        hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        hits
    }

    /// Intersect every registered interactable and refresh all hover flags:
    /// hit objects become hovered, every other candidate is cleared.
    pub fn pick(
        &self,
        camera: &ViewCamera,
        scene: &Scene,
        interactables: &mut Interactables,
    ) -> Vec<PickHit> {
        let candidates: Vec<EntityId> = interactables.ids().collect();
        if candidates.is_empty() {
            return Vec::new();
        }
        let hits = self.intersect(camera, scene, candidates.iter().copied());
        for id in candidates {
            let hovered = hits.iter().any(|h| h.id == id);
            interactables.set_hovered(id, hovered);
        }
        tracing::trace!(pointer = ?self.ndc, hits = hits.len(), "pick");
        hits
    }
}
