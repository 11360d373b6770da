//! Keyboard routing: held movement keys versus single-shot focus keys.

use std::collections::BTreeSet;

use winit::event::ElementState;
use winit::keyboard::{Key, NamedKey};

use super::keybinds::Keybinds;

/// Keys that act for as long as they are held.
///
/// The declaration order is the order held keys are visited in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MoveKey {
    Up,
    Down,
    Left,
    Right,
    ZoomIn,
    ZoomOut,
}

impl MoveKey {
    /// Arrow keys pan, `+`/`=` zoom in, `-`/`_` zoom out.
    pub fn from_key(key: &Key) -> Option<Self> {
        match key {
            Key::Named(NamedKey::ArrowUp) => Some(Self::Up),
            Key::Named(NamedKey::ArrowDown) => Some(Self::Down),
            Key::Named(NamedKey::ArrowLeft) => Some(Self::Left),
            Key::Named(NamedKey::ArrowRight) => Some(Self::Right),
            Key::Character(s) => match s.as_str() {
                "+" | "=" => Some(Self::ZoomIn),
                "-" | "_" => Some(Self::ZoomOut),
                _ => None,
            },
            _ => None,
        }
    }
}

/// Movement keys currently down, iterated in [`MoveKey`] order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeldKeys {
    keys: BTreeSet<MoveKey>,
}

impl HeldKeys {
    pub fn press(&mut self, key: MoveKey) {
        self.keys.insert(key);
    }

    /// Releasing a key that is not held is a no-op.
    pub fn release(&mut self, key: MoveKey) {
        self.keys.remove(&key);
    }

    pub fn contains(&self, key: MoveKey) -> bool {
        self.keys.contains(&key)
    }

    pub fn iter(&self) -> impl Iterator<Item = MoveKey> + '_ {
        self.keys.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn clear(&mut self) {
        self.keys.clear();
    }
}

/// A request to focus the camera on a body, produced by a bound key press.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FocusRequest {
    pub body: String,
}

/// Sorts raw key events into held-key updates and focus requests.
#[derive(Debug, Clone)]
pub struct InputRouter {
    held: HeldKeys,
    keybinds: Keybinds,
}

impl InputRouter {
    pub fn new(keybinds: Keybinds) -> Self {
        Self {
            held: HeldKeys::default(),
            keybinds,
        }
    }

    pub fn held(&self) -> &HeldKeys {
        &self.held
    }

    pub fn keybinds(&self) -> &Keybinds {
        &self.keybinds
    }

    /// Forget every held key, e.g. when the window loses focus and the
    /// matching releases will never arrive.
    pub fn clear(&mut self) {
        self.held.clear();
    }

    /// Route one key event.
    ///
    /// Movement keys update the held set on press and release. A bound focus
    /// key yields a [`FocusRequest`] on its initial press only; auto-repeat and
    /// release are ignored and focus keys never enter the held set.
    pub fn route(&mut self, key: &Key, state: ElementState, repeat: bool) -> Option<FocusRequest> {
        if let Some(move_key) = MoveKey::from_key(key) {
            match state {
                ElementState::Pressed => self.held.press(move_key),
                ElementState::Released => self.held.release(move_key),
            }
            return None;
        }

        if state != ElementState::Pressed || repeat {
            return None;
        }

        let c = single_char(key)?;
        self.keybinds.body_for(c).map(|body| FocusRequest {
            body: body.to_string(),
        })
    }
}

fn single_char(key: &Key) -> Option<char> {
    let Key::Character(s) = key else {
        return None;
    };
    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Some(c),
        _ => None,
    }
}
