//! Frame-coherent mouse state with click-versus-drag detection.
//!
//! A left-button press that travels less than [`DRAG_THRESHOLD`] pixels
//! before release is a click (body selection). Once it travels further it
//! becomes a drag and every later movement orbits the camera; its release
//! produces no click.

use glam::Vec2;
use winit::event::{ElementState, MouseButton, MouseScrollDelta};

/// Pixels the cursor may travel with the button down and still count as a click.
pub const DRAG_THRESHOLD: f32 = 4.0;

/// Pixel-delta scroll is normalized so this many pixels equal one line.
const PIXELS_PER_LINE: f64 = 40.0;

#[derive(Debug, Clone, Copy, Default)]
struct Press {
    travel: f32,
    dragging: bool,
}

#[derive(Debug, Clone, Default)]
pub struct MouseState {
    position: Option<Vec2>,
    delta: Vec2,
    drag_delta: Vec2,
    scroll: f32,
    press: Option<Press>,
    click: Option<Vec2>,
    cursor_in_window: bool,
}

impl MouseState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// `CursorMoved`, in physical pixels. The first sample only seeds the position.
    pub fn on_cursor_moved(&mut self, x: f64, y: f64) {
        let new_pos = Vec2::new(x as f32, y as f32);
        self.cursor_in_window = true;
        let Some(old_pos) = self.position.replace(new_pos) else {
            return;
        };
        let step = new_pos - old_pos;
        self.delta += step;

        if let Some(press) = self.press.as_mut() {
            if press.dragging {
                self.drag_delta += step;
            } else {
                press.travel += step.length();
                if press.travel > DRAG_THRESHOLD {
                    press.dragging = true;
                    tracing::trace!(travel = press.travel, "Drag started");
                }
            }
        }
    }

    /// `MouseInput`. Only the left button selects and drags.
    pub fn on_button(&mut self, button: MouseButton, state: ElementState) {
        if button != MouseButton::Left {
            return;
        }
        match state {
            ElementState::Pressed => {
                self.press = Some(Press::default());
            }
            ElementState::Released => {
                if let Some(press) = self.press.take()
                    && !press.dragging
                {
                    self.click = self.position;
                }
            }
        }
    }

    /// `MouseWheel`. Positive is away from the user (zoom in).
    pub fn on_scroll(&mut self, delta: MouseScrollDelta) {
        self.scroll += match delta {
            MouseScrollDelta::LineDelta(_, y) => y,
            MouseScrollDelta::PixelDelta(pos) => (pos.y / PIXELS_PER_LINE) as f32,
        };
    }

    pub fn on_cursor_entered(&mut self) {
        self.cursor_in_window = true;
    }

    /// The hover ray disappears, and a press in progress is abandoned
    /// because its release may never be delivered.
    pub fn on_cursor_left(&mut self) {
        self.cursor_in_window = false;
        self.press = None;
    }

    /// Reset per-tick accumulators. An unconsumed click is dropped.
    pub fn clear_transients(&mut self) {
        self.delta = Vec2::ZERO;
        self.drag_delta = Vec2::ZERO;
        self.scroll = 0.0;
        self.click = None;
    }

    /// Cursor position while it is inside the window.
    #[must_use]
    pub fn hover_position(&self) -> Option<Vec2> {
        if self.cursor_in_window {
            self.position
        } else {
            None
        }
    }

    /// Raw movement since the last clear, whether or not a button is down.
    #[must_use]
    pub fn delta(&self) -> Vec2 {
        self.delta
    }

    /// Movement since the last clear that belongs to a drag.
    #[must_use]
    pub fn drag_delta(&self) -> Vec2 {
        self.drag_delta
    }

    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.press.is_some_and(|p| p.dragging)
    }

    #[must_use]
    pub fn scroll(&self) -> f32 {
        self.scroll
    }

    /// The position of a completed click, consumed by this call.
    pub fn take_click(&mut self) -> Option<Vec2> {
        self.click.take()
    }
}
