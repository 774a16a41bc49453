//! Alternate input channel: discrete key events.
//!
//! Key events bypass the repeat tracker (the platform already provides
//! key-repeat) but go through the same enable gates, so keyboard and gamepad
//! produce the same action sequence for the same zone ownership.

use egui::{Event, Key};
use serde::{Deserialize, Serialize};
use std::cell::Cell;
use std::rc::Rc;
use tokio::sync::broadcast;
use tracing::debug;

use crate::controller::action::Action;

/// Binds one key to an action
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyBinding {
    pub key: Key,
    pub action: Action,
}

/// Key-to-action table
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeyBindings(pub Vec<KeyBinding>);

impl Default for KeyBindings {
    fn default() -> Self {
        let bind = |key, action| KeyBinding { key, action };
        Self(vec![
            bind(Key::ArrowUp, Action::Up),
            bind(Key::ArrowDown, Action::Down),
            bind(Key::ArrowLeft, Action::Left),
            bind(Key::ArrowRight, Action::Right),
            bind(Key::Enter, Action::A),
            bind(Key::Space, Action::A),
            bind(Key::Escape, Action::B),
            bind(Key::Backspace, Action::B),
            bind(Key::Q, Action::Lb),
            bind(Key::PageUp, Action::Lb),
            bind(Key::E, Action::Rb),
            bind(Key::PageDown, Action::Rb),
        ])
    }
}

impl KeyBindings {
    pub fn action_for(&self, key: Key) -> Option<Action> {
        self.0
            .iter()
            .find(|binding| binding.key == key)
            .map(|binding| binding.action)
    }

    /// Translates a key-down event, including auto-repeats. Releases and
    /// non-key events yield nothing.
    pub fn translate(&self, event: &Event) -> Option<Action> {
        match event {
            Event::Key {
                key, pressed: true, ..
            } => self.action_for(*key),
            _ => None,
        }
    }
}

/// One key press, deliverable to many consumers but handled by at most one.
///
/// Presses never leave the dispatch thread.
#[derive(Clone, Debug)]
pub struct KeyPress {
    pub action: Action,
    claimed: Rc<Cell<bool>>,
}

impl KeyPress {
    pub fn new(action: Action) -> Self {
        Self {
            action,
            claimed: Rc::new(Cell::new(false)),
        }
    }

    /// Marks the press as handled. Returns false if it already was.
    pub fn claim(&self) -> bool {
        !self.claimed.replace(true)
    }

    pub fn is_claimed(&self) -> bool {
        self.claimed.get()
    }
}

/// Fan-out of key presses to every mounted consumer
#[derive(Clone, Debug)]
pub struct KeyChannel {
    sender: broadcast::Sender<KeyPress>,
    bindings: Rc<KeyBindings>,
}

impl KeyChannel {
    pub fn new(bindings: KeyBindings) -> Self {
        let (sender, _) = broadcast::channel(64);
        Self {
            sender,
            bindings: Rc::new(bindings),
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<KeyPress> {
        self.sender.subscribe()
    }

    /// Translates and publishes a UI event. Returns the action if one was sent.
    pub fn feed(&self, event: &Event) -> Option<Action> {
        let action = self.bindings.translate(event)?;
        self.press(action);
        Some(action)
    }

    pub fn press(&self, action: Action) -> KeyPress {
        let press = KeyPress::new(action);
        if self.sender.send(press.clone()).is_err() {
            debug!("Key press {} dropped, no consumer mounted", action);
        }
        press
    }
}
