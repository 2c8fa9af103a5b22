use gridview_common::EntityId;
use gridview_interact::Interactables;
use gridview_scene::Scene;

/// Scene inspector for developer tooling.
///
/// Read-only queries against the scene and its interaction state, for logs
/// and the headless CLI.
pub struct SceneInspector;

impl SceneInspector {
    pub fn summary(scene: &Scene, interactables: &Interactables) -> SceneSummary {
        SceneSummary {
            node_count: scene.node_count(),
            visible_count: scene.nodes().values().filter(|n| n.visible).count(),
            interactable_count: interactables.len(),
            hovered_count: interactables.hovered_count(),
        }
    }

    /// Interaction state and displayed position of one interactable node.
    pub fn inspect(
        scene: &Scene,
        interactables: &Interactables,
        id: EntityId,
    ) -> Option<InteractableInfo> {
        let entry = interactables.get(id)?;
        let node = scene.get(id)?;
        let p = node.transform.position;
        Some(InteractableInfo {
            id,
            position: [p.x, p.y, p.z],
            hovered: entry.hovered(),
            offset: entry.current_offset(),
            target: entry.target_offset(interactables.motion()),
        })
    }

    pub fn list(scene: &Scene, interactables: &Interactables) -> Vec<InteractableInfo> {
        interactables
            .ids()
            .filter_map(|id| Self::inspect(scene, interactables, id))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SceneSummary {
    pub node_count: usize,
    pub visible_count: usize,
    pub interactable_count: usize,
    pub hovered_count: usize,
}

impl std::fmt::Display for SceneSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Scene: nodes={} visible={} interactables={} hovered={}",
            self.node_count, self.visible_count, self.interactable_count, self.hovered_count
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct InteractableInfo {
    pub id: EntityId,
    pub position: [f32; 3],
    pub hovered: bool,
    pub offset: f32,
    pub target: f32,
}

impl std::fmt::Display for InteractableInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[{}] pos=({:.3}, {:.3}, {:.3}) hovered={} offset={:.3}/{:.3}",
            self.id.short(),
            self.position[0],
            self.position[1],
            self.position[2],
            self.hovered,
            self.offset,
            self.target,
        )
    }
}
