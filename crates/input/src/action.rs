use glam::Vec2;

/// A viewer-level action produced from raw window input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    /// Pointer moved to a position in surface pixels (origin top-left).
    PointerMoved { position: Vec2 },
    /// Surface resized, in physical pixels.
    Resized { width: u32, height: u32 },
    /// Orbit the camera by a pointer delta in pixels.
    Orbit { dx: f32, dy: f32 },
    /// Zoom the camera. Positive moves closer.
    Zoom(f32),
    /// Show or hide the grid settings panel.
    ToggleSettings,
    /// Cycle the stats overlay panel.
    ToggleStats,
    /// Close the viewer.
    Quit,
    /// Input with no binding.
    Noop,
}

impl Action {
    pub fn is_noop(&self) -> bool {
        matches!(self, Action::Noop)
    }
}
