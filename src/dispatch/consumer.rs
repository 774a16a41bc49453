//! Consumer - one independent dispatcher instance
//!
//! Each UI surface that wants actions owns a [`Consumer`]. The consumer keeps
//! a private key table, samples its [`EnableGate`] once per tick, runs every
//! tracked key through [`KeyState::step`] and hands fired actions to its
//! [`ActionHandler`].
//!
//! # Ghost-press suppression
//!
//! A closed gate keeps tracking. When the gate opens (compared against the
//! value sampled on the previous tick) every key that is physically held is
//! moved to [`KeyState::Suppressed`]. The same snapshot runs when the consumer
//! is primed at mount. A held key therefore never fires into a surface that
//! became active while it was already down; only a release followed by a
//! fresh press fires again.

use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;
use tracing::debug;

use crate::controller::action::Action;
use crate::controller::device::DeviceSnapshot;
use crate::controller::profile::{KeyId, Profile, Signal};
use crate::dispatch::gate::EnableGate;
use crate::dispatch::keys::KeyPress;
use crate::dispatch::tracker::{KeyState, RepeatTiming};

/// Receives fired actions. Invoked synchronously inside the tick.
pub trait ActionHandler {
    fn on_action(&mut self, action: Action);
}

impl<F> ActionHandler for F
where
    F: FnMut(Action),
{
    fn on_action(&mut self, action: Action) {
        self(action)
    }
}

/// Per-consumer tuning
#[derive(Clone, Debug)]
pub struct ConsumerOptions {
    /// Name used in logs
    pub label: String,
    pub repeat: RepeatTiming,
    pub profile: Profile,
}

impl Default for ConsumerOptions {
    fn default() -> Self {
        Self {
            label: "consumer".to_string(),
            repeat: RepeatTiming::default(),
            profile: Profile::default(),
        }
    }
}

impl ConsumerOptions {
    pub fn labeled(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            ..Self::default()
        }
    }
}

pub struct Consumer {
    label: String,
    profile: Profile,
    timing: RepeatTiming,
    gate: EnableGate,
    handler: Box<dyn ActionHandler>,
    keys: BTreeMap<KeyId, KeyState>,
    /// Gate value sampled on the previous tick; `None` until primed
    last_enabled: Option<bool>,
}

impl Consumer {
    pub fn new(
        options: ConsumerOptions,
        gate: impl Into<EnableGate>,
        handler: impl ActionHandler + 'static,
    ) -> Self {
        Self {
            label: options.label,
            profile: options.profile,
            timing: options.repeat,
            gate: gate.into(),
            handler: Box::new(handler),
            keys: BTreeMap::new(),
            last_enabled: None,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn set_gate(&mut self, gate: impl Into<EnableGate>) {
        self.gate = gate.into();
    }

    pub fn key_state(&self, key: KeyId) -> KeyState {
        self.keys.get(&key).copied().unwrap_or_default()
    }

    pub fn is_primed(&self) -> bool {
        self.last_enabled.is_some()
    }

    /// Creation-time snapshot: suppresses every key already held.
    ///
    /// Runs at most once; a consumer that is ticked without being primed
    /// primes itself on its first tick.
    pub fn prime(&mut self, devices: &[Option<DeviceSnapshot>]) {
        if self.is_primed() {
            return;
        }
        let signals = self.profile.signals(devices);
        self.suppress_held(&signals, "mount");
        self.last_enabled = Some(self.gate.sample());
    }

    /// Runs one frame. Returns the number of actions fired.
    pub fn tick(&mut self, now: Duration, devices: &[Option<DeviceSnapshot>]) -> usize {
        let enabled = self.gate.sample();
        let signals = self.profile.signals(devices);

        match self.last_enabled {
            None => self.suppress_held(&signals, "mount"),
            Some(false) if enabled => self.suppress_held(&signals, "re-enable"),
            _ => {}
        }
        self.last_enabled = Some(enabled);

        let mut fired = Vec::new();
        for signal in &signals {
            let state = self.keys.entry(signal.key).or_default();
            let (next, fire) = state.step(signal.active, enabled, now, &self.timing);
            *state = next;
            if fire {
                fired.push(signal.key);
            }
        }

        for key in &fired {
            debug!(
                "[{}] fire {} (device {}) at {:?}",
                self.label, key.action, key.device, now
            );
            self.handler.on_action(key.action);
        }
        fired.len()
    }

    /// Delivers a discrete key press. Handled only if the gate is open and no
    /// other consumer claimed the press first.
    pub fn on_key(&mut self, press: &KeyPress) -> bool {
        if !self.gate.sample() || !press.claim() {
            return false;
        }
        debug!("[{}] key {}", self.label, press.action);
        self.handler.on_action(press.action);
        true
    }

    fn suppress_held(&mut self, signals: &[Signal], reason: &str) {
        let mut count = 0;
        for signal in signals.iter().filter(|signal| signal.active) {
            self.keys.insert(signal.key, KeyState::Suppressed);
            count += 1;
        }
        // Holds on absent devices: the pad may come back still held
        for (key, state) in self.keys.iter_mut() {
            let stale = matches!(state, KeyState::Pressed { .. } | KeyState::Repeating { .. });
            if stale && !signals.iter().any(|signal| signal.key == *key) {
                *state = KeyState::Suppressed;
                count += 1;
            }
        }
        if count > 0 {
            debug!(
                "[{}] suppressed {} held key(s) on {}",
                self.label, count, reason
            );
        }
    }
}

impl fmt::Debug for Consumer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Consumer")
            .field("label", &self.label)
            .field("timing", &self.timing)
            .field("gate", &self.gate)
            .field("keys", &self.keys)
            .field("last_enabled", &self.last_enabled)
            .finish_non_exhaustive()
    }
}
