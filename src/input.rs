use std::collections::HashSet;

use glam::Vec2;

/// Identifier for a physical keyboard key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    Named(NamedKey),
    Character(char),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NamedKey {
    Escape,
}

/// What a bound key does to the frame context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    MoveForward,
    MoveBackward,
    StrafeLeft,
    StrafeRight,
    PanUp,
    PanDown,
    ToggleProjection,
    Quit,
}

/// Fixed key bindings for the viewer.
pub const BINDINGS: [(KeyCode, Action); 8] = [
    (KeyCode::Character('W'), Action::MoveForward),
    (KeyCode::Character('S'), Action::MoveBackward),
    (KeyCode::Character('A'), Action::StrafeLeft),
    (KeyCode::Character('D'), Action::StrafeRight),
    (KeyCode::Character('Q'), Action::PanUp),
    (KeyCode::Character('E'), Action::PanDown),
    (KeyCode::Character('P'), Action::ToggleProjection),
    (KeyCode::Named(NamedKey::Escape), Action::Quit),
];

/// Held keys plus the presses seen since the last frame.
///
/// Presses are latched as they arrive, so a key pressed and released between
/// two frames still fires its edge action once.
#[derive(Debug, Default, Clone)]
pub struct InputState {
    keys: HashSet<KeyCode>,
    pressed: HashSet<KeyCode>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a key going down. Auto-repeat of a held key is not a new press.
    pub fn set_key_down(&mut self, key: KeyCode) {
        if self.keys.insert(key) {
            self.pressed.insert(key);
        }
    }

    pub fn set_key_up(&mut self, key: KeyCode) {
        self.keys.remove(&key);
    }

    pub fn is_key_down(&self, key: KeyCode) -> bool {
        self.keys.contains(&key)
    }

    /// True if the key went down since the last [`InputState::end_frame`].
    pub fn was_pressed(&self, key: KeyCode) -> bool {
        self.pressed.contains(&key)
    }

    /// Actions whose key is currently held, in binding order.
    pub fn held_actions(&self) -> impl Iterator<Item = Action> + '_ {
        BINDINGS
            .iter()
            .filter(|(key, _)| self.is_key_down(*key))
            .map(|(_, action)| *action)
    }

    /// Actions whose key went down since the last [`InputState::end_frame`].
    pub fn pressed_actions(&self) -> impl Iterator<Item = Action> + '_ {
        BINDINGS
            .iter()
            .filter(|(key, _)| self.was_pressed(*key))
            .map(|(_, action)| *action)
    }

    /// Forgets the presses consumed by this frame.
    pub fn end_frame(&mut self) {
        self.pressed.clear();
    }

    /// Drops all held keys, e.g. when the window loses focus.
    pub fn release_all(&mut self) {
        self.keys.clear();
    }
}

/// Converts absolute cursor positions into per-event deltas.
#[derive(Debug, Clone, PartialEq)]
pub struct MouseLatch {
    first_mouse: bool,
    last: Vec2,
}

impl MouseLatch {
    /// Starts latched at the centre of a `width` x `height` window.
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            first_mouse: true,
            last: Vec2::new(width / 2.0, height / 2.0),
        }
    }

    /// Returns `(dx, dy)` with `dy` flipped so that moving up is positive.
    /// The first reading only primes the latch and yields a zero delta.
    pub fn offset(&mut self, x: f32, y: f32) -> Vec2 {
        if self.first_mouse {
            self.last = Vec2::new(x, y);
            self.first_mouse = false;
        }
        let offset = Vec2::new(x - self.last.x, self.last.y - y);
        self.last = Vec2::new(x, y);
        offset
    }
}
