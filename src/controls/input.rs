//! Platform-agnostic pointer input
//!
//! Concrete platform adapters translate their events into [`PointerEvent`]
//! and feed them to the camera pose controller.

use glam::Vec2;

/// Mouse button enumeration
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    Other(u16),
}

/// Button state
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ButtonState {
    Pressed,
    Released,
}

/// Pointer and window events the camera controller reacts to.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum PointerEvent {
    Button { button: MouseButton, state: ButtonState },
    /// Cursor position in window pixels.
    Moved { position: Vec2 },
    /// Wheel movement; positive `delta_y` moves the camera away.
    Wheel { delta_y: f32 },
    /// A context-menu request (usually a secondary click).
    ContextMenu,
    Resized { width: u32, height: u32 },
    /// The cursor left the window; any drag in progress ends.
    Left,
}

/// Interaction mode, driven by which button is held.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum InteractionMode {
    #[default]
    Idle,
    Rotating,
    Panning,
}

impl InteractionMode {
    /// The mode a press of `button` starts from idle, if any.
    #[must_use]
    pub fn for_button(button: MouseButton) -> Option<Self> {
        match button {
            MouseButton::Left => Some(Self::Rotating),
            MouseButton::Right => Some(Self::Panning),
            MouseButton::Middle | MouseButton::Other(_) => None,
        }
    }
}

/// Cursor shape the host should show.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum CursorHint {
    Default,
    Rotate,
    Pan,
    Zoom,
}

/// Tracks the cursor so moves can be turned into deltas.
#[derive(Debug, Default, Clone)]
pub(crate) struct CursorTracker {
    position: Option<Vec2>,
}

impl CursorTracker {
    /// Records `position` and returns the delta from the previous one.
    /// The first sample after a reset yields no delta.
    pub(crate) fn moved_to(&mut self, position: Vec2) -> Option<Vec2> {
        let delta = self.position.map(|last| position - last);
        self.position = Some(position);
        delta
    }

    pub(crate) fn reset(&mut self) {
        self.position = None;
    }
}
