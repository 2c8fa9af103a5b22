use crate::action::Action;
use glam::Vec2;

/// Pointer buttons the viewer distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    Left,
    Right,
    Middle,
    Other,
}

/// Keys with a binding. Everything else maps to `Key::Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    F1,
    F2,
    Escape,
    Other,
}

/// Pixels of wheel travel that count as one line.
const PIXELS_PER_LINE: f32 = 40.0;

/// Turns raw pointer, wheel and key input into `Action`s.
///
/// Keeps the little state needed for that: the last pointer position and
/// whether the orbit button is down.
#[derive(Debug, Clone)]
pub struct InputMapper {
    orbit_button: Button,
    orbiting: bool,
    last_pointer: Option<Vec2>,
}

impl Default for InputMapper {
    fn default() -> Self {
        Self::new(Button::Right)
    }
}

impl InputMapper {
    pub fn new(orbit_button: Button) -> Self {
        Self {
            orbit_button,
            orbiting: false,
            last_pointer: None,
        }
    }

    pub fn is_orbiting(&self) -> bool {
        self.orbiting
    }

    pub fn last_pointer(&self) -> Option<Vec2> {
        self.last_pointer
    }

    /// Pointer moved. Always yields `PointerMoved`; also yields `Orbit`
    /// while the orbit button is held.
    pub fn pointer_moved(&mut self, position: Vec2) -> Vec<Action> {
        let mut actions = vec![Action::PointerMoved { position }];
        if self.orbiting {
            if let Some(prev) = self.last_pointer {
                let d = position - prev;
                if d != Vec2::ZERO {
                    actions.push(Action::Orbit { dx: d.x, dy: d.y });
                }
            }
        }
        self.last_pointer = Some(position);
        actions
    }

    /// Pointer left the window. The next move must not produce a jump.
    pub fn pointer_left(&mut self) {
        self.last_pointer = None;
    }

    pub fn button(&mut self, button: Button, pressed: bool) -> Action {
        if button == self.orbit_button {
            if self.orbiting != pressed {
                tracing::trace!(pressed, "orbit button");
            }
            self.orbiting = pressed;
        }
        Action::Noop
    }

    /// Wheel input in lines. Pixel deltas are converted first with
    /// `wheel_pixels`.
    pub fn wheel_lines(&self, lines: f32) -> Action {
        if lines == 0.0 || !lines.is_finite() {
            return Action::Noop;
        }
        Action::Zoom(lines)
    }

    pub fn wheel_pixels(&self, pixels: f32) -> Action {
        self.wheel_lines(pixels / PIXELS_PER_LINE)
    }

    /// Key press. Releases never produce actions.
    pub fn key(&self, key: Key, pressed: bool) -> Action {
        if !pressed {
            return Action::Noop;
        }
        match key {
            Key::F1 => Action::ToggleSettings,
            Key::F2 => Action::ToggleStats,
            Key::Escape => Action::Quit,
            Key::Other => Action::Noop,
        }
    }

    pub fn resized(&self, width: u32, height: u32) -> Action {
        Action::Resized { width, height }
    }
}
