//! Per-key press/hold/repeat state machine.
//!
//! Every tracked key (device + action) moves through [`KeyState`] once per
//! tick, driven by its physical signal and the owning consumer's enable gate:
//!
//! ```text
//!            physical && enabled (fire)
//!   Idle ─────────────────────────────► Pressed{since}
//!    ▲                                     │ held past delay and interval (fire)
//!    │ !physical (from any state)          ▼
//!    └──────────────────────────── Repeating{since, last_fired}
//!
//!   Suppressed: held across a mount or a re-enable; never fires until release
//! ```
//!
//! The first press always fires, so release followed by an immediate re-press
//! is never throttled.

use std::time::Duration;

/// Key-repeat tuning for one consumer
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RepeatTiming {
    /// Hold time after the initial press before repeats start
    pub delay: Duration,
    /// Minimum spacing between repeats
    pub interval: Duration,
}

impl Default for RepeatTiming {
    fn default() -> Self {
        Self {
            delay: Duration::from_millis(400),
            interval: Duration::from_millis(150),
        }
    }
}

impl RepeatTiming {
    pub fn from_millis(delay_ms: u64, interval_ms: u64) -> Self {
        Self {
            delay: Duration::from_millis(delay_ms),
            interval: Duration::from_millis(interval_ms),
        }
    }
}

/// State of one tracked key
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum KeyState {
    /// Not physically held
    #[default]
    Idle,
    /// Held; the only fire so far happened at `since`
    Pressed { since: Duration },
    /// Held and refreshed since the initial press
    Repeating { since: Duration, last_fired: Duration },
    /// Held across a gate transition. Cannot fire until observed released.
    Suppressed,
}

impl KeyState {
    pub fn is_held(self) -> bool {
        !matches!(self, KeyState::Idle)
    }

    /// Advances the key by one tick. Returns the next state and whether the
    /// action fires now.
    ///
    /// While `enabled` is false the key keeps tracking the physical state and
    /// its last-fired time follows `now`, but nothing fires.
    pub fn step(
        self,
        physical: bool,
        enabled: bool,
        now: Duration,
        timing: &RepeatTiming,
    ) -> (KeyState, bool) {
        if !physical {
            return (KeyState::Idle, false);
        }

        match self {
            KeyState::Idle => (KeyState::Pressed { since: now }, enabled),
            KeyState::Suppressed => (KeyState::Suppressed, false),
            KeyState::Pressed { since } | KeyState::Repeating { since, .. } if !enabled => (
                KeyState::Repeating {
                    since,
                    last_fired: now,
                },
                false,
            ),
            KeyState::Pressed { since } => repeat(since, since, now, timing),
            KeyState::Repeating { since, last_fired } => repeat(since, last_fired, now, timing),
        }
    }
}

fn repeat(
    since: Duration,
    last_fired: Duration,
    now: Duration,
    timing: &RepeatTiming,
) -> (KeyState, bool) {
    let held = now.saturating_sub(since);
    let quiet = now.saturating_sub(last_fired);

    if held > timing.delay && quiet >= timing.interval {
        (
            KeyState::Repeating {
                since,
                last_fired: now,
            },
            true,
        )
    } else if last_fired == since {
        (KeyState::Pressed { since }, false)
    } else {
        (KeyState::Repeating { since, last_fired }, false)
    }
}
