//! Action-level input state
//!
//! The core never sees physical keys. The host maps its bindings to action
//! ids and feeds them in here; gameplay asks by action id.

use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;

/// Action ids understood by the built-in objects
pub mod actions {
    pub const MOVE_UP: &str = "move_up";
    pub const MOVE_DOWN: &str = "move_down";
    pub const MOVE_LEFT: &str = "move_left";
    pub const MOVE_RIGHT: &str = "move_right";
    /// Toggles collision debug drawing
    pub const DEBUG_MODE: &str = "debug_mode";
}

/// Named keybind lookups
pub trait InputSource {
    /// Held this frame
    fn is_down(&self, action: &str) -> bool;
    /// Went down this frame
    fn is_pressed(&self, action: &str) -> bool;
}

/// Held and freshly pressed actions for the current frame
#[derive(Debug, Clone, Default)]
pub struct KeyState {
    down: HashSet<String>,
    pressed: HashSet<String>,
}

impl KeyState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark an action held; it also counts as pressed unless it was already down
    pub fn press(&mut self, action: &str) {
        if self.down.insert(action.to_string()) {
            self.pressed.insert(action.to_string());
        }
    }

    pub fn release(&mut self, action: &str) {
        self.down.remove(action);
        self.pressed.remove(action);
    }

    pub fn release_all(&mut self) {
        self.down.clear();
        self.pressed.clear();
    }

    /// Forget one-shot presses; call once per frame after the update
    pub fn end_frame(&mut self) {
        self.pressed.clear();
    }
}

impl InputSource for KeyState {
    fn is_down(&self, action: &str) -> bool {
        self.down.contains(action)
    }

    fn is_pressed(&self, action: &str) -> bool {
        self.pressed.contains(action)
    }
}

/// A source shared with the host, which keeps feeding it between updates
impl<T: InputSource> InputSource for Rc<RefCell<T>> {
    fn is_down(&self, action: &str) -> bool {
        self.borrow().is_down(action)
    }

    fn is_pressed(&self, action: &str) -> bool {
        self.borrow().is_pressed(action)
    }
}
