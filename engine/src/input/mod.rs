//! Input Module
//!
//! Platform-agnostic input handling for keyboard and mouse. Decoupled from
//! winit: the event loop translates window events into [`KeyCode`]s and raw
//! deltas, and the frame update drains them once per frame.
//!
//! # Example
//!
//! ```rust,ignore
//! use labyrinth_engine::input::{InputState, KeyCode, InputAction};
//!
//! let mut input = InputState::new();
//! input.handle_key(KeyCode::W, true);
//! input.handle_key(KeyCode::F12, true);
//!
//! assert!(input.movement.forward);
//! for action in input.drain_actions() {
//!     // ToggleVsync fires once
//! }
//! ```

pub mod bindings;
pub mod keyboard;
pub mod mouse_state;

pub use bindings::{InputAction, KeyBindings};
pub use keyboard::{KeyCode, MovementKeys};
pub use mouse_state::FpsMouseState;

/// Combined input state owned by the frame loop.
///
/// Held actions update [`MovementKeys`]; one-shot actions are queued on the
/// press edge and handed out by [`InputState::drain_actions`].
#[derive(Debug, Clone, Default)]
pub struct InputState {
    pub bindings: KeyBindings,
    pub movement: MovementKeys,
    pub mouse: FpsMouseState,
    pending: Vec<InputAction>,
}

impl InputState {
    /// Create a new input state with default bindings and nothing pressed.
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a key press or release.
    ///
    /// Returns the bound action, if any. Key repeat is expected to be filtered
    /// by the caller; a repeated press queues its action again.
    pub fn handle_key(&mut self, key: KeyCode, pressed: bool) -> Option<InputAction> {
        let action = self.bindings.get_action(key)?;
        match action {
            InputAction::MoveForward => self.movement.forward = pressed,
            InputAction::MoveBack => self.movement.backward = pressed,
            InputAction::MoveLeft => self.movement.left = pressed,
            InputAction::MoveRight => self.movement.right = pressed,
            InputAction::Jump => self.movement.jump = pressed,
            _ if pressed => self.pending.push(action),
            _ => {}
        }
        Some(action)
    }

    /// Take every one-shot action queued since the last call, in press order.
    pub fn drain_actions(&mut self) -> Vec<InputAction> {
        std::mem::take(&mut self.pending)
    }

    /// Release everything, e.g. when the window loses focus.
    pub fn reset(&mut self) {
        self.movement.reset();
        self.mouse.reset();
        self.pending.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_state_default() {
        let input = InputState::new();
        assert!(!input.movement.any_pressed());
    }

    #[test]
    fn test_held_keys_track_press_and_release() {
        let mut input = InputState::new();
        assert_eq!(input.handle_key(KeyCode::W, true), Some(InputAction::MoveForward));
        assert!(input.movement.forward);
        input.handle_key(KeyCode::W, false);
        assert!(!input.movement.forward);
        assert!(input.drain_actions().is_empty());
    }

    #[test]
    fn test_one_shot_actions_queue_on_press_only() {
        let mut input = InputState::new();
        input.handle_key(KeyCode::F12, true);
        input.handle_key(KeyCode::F12, false);
        input.handle_key(KeyCode::F11, true);

        assert_eq!(
            input.drain_actions(),
            vec![InputAction::ToggleVsync, InputAction::CycleAntialiasing]
        );
        assert!(input.drain_actions().is_empty());
    }

    #[test]
    fn test_unbound_key_is_ignored() {
        let mut input = InputState::new();
        assert_eq!(input.handle_key(KeyCode::Unknown, true), None);
        assert!(input.drain_actions().is_empty());
    }
}
