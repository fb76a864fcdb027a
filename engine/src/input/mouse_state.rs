//! FPS-style Mouse State Tracker
//!
//! Handles captured mouse input with delta accumulation for FPS-style camera control.
//! Raw mouse deltas and scroll steps accumulate between frames and are consumed
//! once per frame by the camera.

/// FPS-style mouse state tracker with delta accumulation.
///
/// - **Delta accumulation**: Raw mouse deltas accumulate until consumed
/// - **Scroll accumulation**: Wheel steps accumulate the same way and drive zoom
/// - **Cursor capture tracking**: Knows whether the cursor is currently captured
///
/// # Example
///
/// ```rust,ignore
/// use labyrinth_engine::input::FpsMouseState;
///
/// let mut mouse = FpsMouseState::new();
///
/// // In event loop: accumulate raw mouse motion
/// mouse.accumulate_delta(10.0, -5.0);
/// mouse.accumulate_delta(3.0, 2.0);
///
/// // In update loop: consume accumulated delta
/// let (dx, dy) = mouse.consume_delta();
/// camera.process_mouse(dx, dy);
/// ```
#[derive(Debug, Clone, Default)]
pub struct FpsMouseState {
    /// Accumulated horizontal delta since last consume.
    delta_x: f32,
    /// Accumulated vertical delta since last consume.
    delta_y: f32,
    /// Accumulated wheel steps since last consume (positive = away from user).
    scroll: f32,
    /// Whether the cursor is currently captured (hidden and confined).
    cursor_captured: bool,
}

impl FpsMouseState {
    /// Create a new FPS mouse state with zero deltas and cursor not captured.
    pub fn new() -> Self {
        Self::default()
    }

    /// Accumulate raw mouse motion delta.
    ///
    /// Call this from the event loop whenever raw mouse motion is received.
    /// Deltas accumulate until `consume_delta()` is called.
    #[inline]
    pub fn accumulate_delta(&mut self, dx: f32, dy: f32) {
        self.delta_x += dx;
        self.delta_y += dy;
    }

    /// Accumulate wheel movement in line steps.
    #[inline]
    pub fn accumulate_scroll(&mut self, steps: f32) {
        self.scroll += steps;
    }

    /// Consume the accumulated delta, returning it and resetting to zero.
    #[inline]
    pub fn consume_delta(&mut self) -> (f32, f32) {
        let delta = (self.delta_x, self.delta_y);
        self.delta_x = 0.0;
        self.delta_y = 0.0;
        delta
    }

    /// Consume the accumulated scroll, returning it and resetting to zero.
    #[inline]
    pub fn consume_scroll(&mut self) -> f32 {
        std::mem::take(&mut self.scroll)
    }

    /// Set whether the cursor is captured.
    ///
    /// Releasing the cursor drops any pending motion.
    #[inline]
    pub fn set_captured(&mut self, captured: bool) {
        self.cursor_captured = captured;
        // Clear accumulated deltas when capture state changes to prevent jumps
        if !captured {
            self.delta_x = 0.0;
            self.delta_y = 0.0;
        }
    }

    /// Check if the cursor is currently captured.
    #[inline]
    pub fn is_captured(&self) -> bool {
        self.cursor_captured
    }

    /// Reset all state to defaults.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
