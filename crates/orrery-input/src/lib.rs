//! Input handling for the orrery: keyboard and mouse state tracked per frame
//! and mapped to viewer actions through configurable keybindings.

pub mod action_map;
pub mod keybindings;
pub mod keyboard;
pub mod mouse;

pub use action_map::{Action, ActionResolver, ActionState, FOCUS_SLOTS, InputMap};
pub use keybindings::{BindingError, Conflict, key_from_name, key_name};
pub use keyboard::{KeyboardState, RawKeyEvent};
pub use mouse::{DRAG_THRESHOLD, MouseState};
