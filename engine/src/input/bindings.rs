//! Input Bindings Module
//!
//! Maps physical keys to logical actions, allowing for future key remapping support.

use std::collections::HashMap;

use super::KeyCode;

/// Logical input actions that can be bound to physical keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputAction {
    /// Move forward (default: W)
    MoveForward,
    /// Move backward (default: S)
    MoveBack,
    /// Strafe left (default: A)
    MoveLeft,
    /// Strafe right (default: D)
    MoveRight,
    /// Jump (default: Space)
    Jump,
    /// Close the window (default: Escape)
    Quit,
    /// Switch between windowed and fullscreen (default: F10)
    ToggleFullscreen,
    /// Step antialiasing off → 2x → 4x → 8x → off, applied on restart (default: F11)
    CycleAntialiasing,
    /// Turn vertical sync on/off (default: F12)
    ToggleVsync,
}

/// Maps physical keys to logical actions, supporting customizable key bindings.
#[derive(Debug, Clone)]
pub struct KeyBindings {
    /// Map from physical key to logical action
    key_to_action: HashMap<KeyCode, InputAction>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyBindings {
    /// Create a new KeyBindings instance with default key mappings.
    ///
    /// Default bindings:
    /// - W/S/A/D = movement
    /// - Space = Jump
    /// - Escape = Quit
    /// - F10 = ToggleFullscreen
    /// - F11 = CycleAntialiasing
    /// - F12 = ToggleVsync
    pub fn new() -> Self {
        let mut bindings = Self {
            key_to_action: HashMap::new(),
        };

        bindings.bind(KeyCode::W, InputAction::MoveForward);
        bindings.bind(KeyCode::S, InputAction::MoveBack);
        bindings.bind(KeyCode::A, InputAction::MoveLeft);
        bindings.bind(KeyCode::D, InputAction::MoveRight);
        bindings.bind(KeyCode::Space, InputAction::Jump);
        bindings.bind(KeyCode::Escape, InputAction::Quit);
        bindings.bind(KeyCode::F10, InputAction::ToggleFullscreen);
        bindings.bind(KeyCode::F11, InputAction::CycleAntialiasing);
        bindings.bind(KeyCode::F12, InputAction::ToggleVsync);

        bindings
    }

    /// Bind a physical key to a logical action.
    ///
    /// Each action has at most one key: any key previously bound to `action`
    /// is unbound first.
    pub fn bind(&mut self, key: KeyCode, action: InputAction) {
        self.key_to_action.retain(|_, bound| *bound != action);
        self.key_to_action.insert(key, action);
    }

    /// Get the action bound to a physical key, if any.
    pub fn get_action(&self, key: KeyCode) -> Option<InputAction> {
        self.key_to_action.get(&key).copied()
    }
}
