use glam::Vec3;
use gridview_common::{EntityId, lerp};
use gridview_scene::Scene;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// How hovered objects move: where they rest, where they rise to, how fast.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HoverMotion {
    /// Offset along `axis` while hovered.
    pub raised_offset: f32,
    /// Offset along `axis` while not hovered.
    pub rest_offset: f32,
    /// Easing rate per second. The per-frame factor is `delta * rate`,
    /// clamped to [0, 1], so a slow frame lands on the target instead of
    /// overshooting it.
    pub rate: f32,
    /// Direction the offset is applied along. Normalized on use.
    pub axis: Vec3,
}

impl Default for HoverMotion {
    fn default() -> Self {
        Self {
            raised_offset: 2.0,
            rest_offset: 0.0,
            rate: 5.0,
            axis: Vec3::Y,
        }
    }
}

impl HoverMotion {
    pub fn target(&self, hovered: bool) -> f32 {
        if hovered {
            self.raised_offset
        } else {
            self.rest_offset
        }
    }

    /// True when `rate` is finite and not negative.
    pub fn has_valid_rate(&self) -> bool {
        self.rate.is_finite() && self.rate >= 0.0
    }

    /// Interpolation factor for a frame of `delta` seconds. A NaN product
    /// (NaN rate, or infinite rate on a zero delta) holds the offset still.
    pub fn factor(&self, delta: f32) -> f32 {
        let factor = delta * self.rate;
        if factor.is_nan() {
            return 0.0;
        }
        factor.clamp(0.0, 1.0)
    }
}

/// Interaction state attached to one scene node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interaction {
    hovered: bool,
    current_offset: f32,
    rest_position: Vec3,
}

impl Interaction {
    pub fn new(rest_position: Vec3) -> Self {
        Self {
            hovered: false,
            current_offset: 0.0,
            rest_position,
        }
    }

    pub fn hovered(&self) -> bool {
        self.hovered
    }

    /// Record whether the pointer is over this object. Does not move it.
    pub fn set_hovered(&mut self, hovered: bool) {
        self.hovered = hovered;
    }

    pub fn current_offset(&self) -> f32 {
        self.current_offset
    }

    pub fn rest_position(&self) -> Vec3 {
        self.rest_position
    }

    pub fn target_offset(&self, motion: &HoverMotion) -> f32 {
        motion.target(self.hovered)
    }

    /// Ease `current_offset` toward the hover target by one frame.
    ///
    /// Negative or non-finite deltas are treated as zero.
    pub fn update(&mut self, delta: f32, motion: &HoverMotion) -> f32 {
        let delta = if delta.is_finite() && delta >= 0.0 {
            delta
        } else {
            tracing::warn!(delta, "invalid frame delta, treating as zero");
            0.0
        };
        let target = self.target_offset(motion);
        self.current_offset = lerp(self.current_offset, target, motion.factor(delta));
        self.current_offset
    }

    /// Displayed position for the current offset.
    pub fn position(&self, motion: &HoverMotion) -> Vec3 {
        self.rest_position + motion.axis.normalize_or_zero() * self.current_offset
    }
}

/// Interaction side table for scene nodes, keyed by node id.
#[derive(Debug, Clone, Default)]
pub struct Interactables {
    motion: HoverMotion,
    entries: BTreeMap<EntityId, Interaction>,
}

impl Interactables {
    pub fn new(motion: HoverMotion) -> Self {
        if !motion.has_valid_rate() {
            tracing::warn!(rate = motion.rate, "hover rate is not a finite non-negative number");
        }
        Self {
            motion,
            entries: BTreeMap::new(),
        }
    }

    pub fn motion(&self) -> &HoverMotion {
        &self.motion
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Make an existing scene node interactable, resting where it is now.
    /// Returns false if the node is not in the scene.
    pub fn register(&mut self, id: EntityId, scene: &Scene) -> bool {
        let Some(node) = scene.get(id) else {
            return false;
        };
        self.entries
            .insert(id, Interaction::new(node.transform.position));
        tracing::debug!(id = %id.short(), "interactable registered");
        true
    }

    pub fn remove(&mut self, id: EntityId) -> Option<Interaction> {
        self.entries.remove(&id)
    }

    pub fn get(&self, id: EntityId) -> Option<&Interaction> {
        self.entries.get(&id)
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.entries.contains_key(&id)
    }

    /// Registered ids in stable order.
    pub fn ids(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.entries.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (EntityId, &Interaction)> {
        self.entries.iter().map(|(id, i)| (*id, i))
    }

    pub fn set_hovered(&mut self, id: EntityId, hovered: bool) -> bool {
        match self.entries.get_mut(&id) {
            Some(entry) => {
                if entry.hovered() != hovered {
                    tracing::debug!(id = %id.short(), hovered, "hover changed");
                }
                entry.set_hovered(hovered);
                true
            }
            None => false,
        }
    }

    pub fn hovered_count(&self) -> usize {
        self.entries.values().filter(|e| e.hovered()).count()
    }

    /// Advance every interactable by one frame and write the resulting
    /// positions into the scene. Entries whose node is gone are skipped.
    pub fn update_all(&mut self, delta: f32, scene: &mut Scene) {
        for (id, entry) in &mut self.entries {
            entry.update(delta, &self.motion);
            scene.set_position(*id, entry.position(&self.motion));
        }
    }
}
