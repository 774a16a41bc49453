//! Zone ownership.
//!
//! Exactly one [`Zone`] owns input at a time: the top of the overlay stack if
//! any overlay is open, otherwise the base zone. Consumers are gated on
//! ownership through [`FocusRouter::gate`], so transfers take effect on each
//! consumer's next tick and the ghost-press rules of the consumer apply to
//! every transfer.

use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;
use tracing::{debug, info};

use crate::controller::action::Action;
use crate::dispatch::gate::EnableGate;

/// A UI region that can own input
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Zone {
    /// Main item grid
    Library,
    /// Side panel list
    Sidebar,
    Modal,
    /// Confirmation dialog
    Dialog,
    /// On-screen character entry
    Keyboard,
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Zone::Library => write!(f, "Library"),
            Zone::Sidebar => write!(f, "Sidebar"),
            Zone::Modal => write!(f, "Modal"),
            Zone::Dialog => write!(f, "Dialog"),
            Zone::Keyboard => write!(f, "Keyboard"),
        }
    }
}

#[derive(Debug)]
struct FocusState {
    base: Zone,
    overlays: Vec<Zone>,
    handoffs: HashMap<(Zone, Action), Zone>,
}

impl FocusState {
    fn owner(&self) -> Zone {
        self.overlays.last().copied().unwrap_or(self.base)
    }
}

/// Single-threaded handle to the shared ownership state.
///
/// Clones share state, so handlers can capture a clone and move ownership
/// while a tick is running.
#[derive(Clone, Debug)]
pub struct FocusRouter {
    state: Rc<RefCell<FocusState>>,
}

impl FocusRouter {
    pub fn new(initial: Zone) -> Self {
        Self {
            state: Rc::new(RefCell::new(FocusState {
                base: initial,
                overlays: Vec::new(),
                handoffs: HashMap::new(),
            })),
        }
    }

    /// Library grid and sidebar, joined left/right
    pub fn launcher() -> Self {
        Self::new(Zone::Library)
            .with_handoff(Zone::Library, Action::Left, Zone::Sidebar)
            .with_handoff(Zone::Sidebar, Action::Right, Zone::Library)
    }

    /// Registers an adjacency: `action` at the boundary of `from` moves
    /// ownership to `to`
    pub fn with_handoff(self, from: Zone, action: Action, to: Zone) -> Self {
        self.state.borrow_mut().handoffs.insert((from, action), to);
        self
    }

    pub fn owner(&self) -> Zone {
        self.state.borrow().owner()
    }

    pub fn is_owner(&self, zone: Zone) -> bool {
        self.owner() == zone
    }

    pub fn has_overlay(&self) -> bool {
        !self.state.borrow().overlays.is_empty()
    }

    /// Gate that is open exactly while `zone` owns input
    pub fn gate(&self, zone: Zone) -> EnableGate {
        let router = self.clone();
        EnableGate::from_fn(move || router.is_owner(zone))
    }

    /// Moves the base zone. Open overlays keep ownership until closed.
    pub fn focus(&self, zone: Zone) {
        let mut state = self.state.borrow_mut();
        if state.base != zone {
            info!("Base focus {} -> {}", state.base, zone);
            state.base = zone;
        }
    }

    /// Boundary hand-off. Succeeds only if `from` currently owns input and
    /// has an adjacent zone for `action`; returns the new owner.
    pub fn hand_off(&self, from: Zone, action: Action) -> Option<Zone> {
        let mut state = self.state.borrow_mut();
        if state.owner() != from {
            debug!("Ignoring hand-off from {}, owner is {}", from, state.owner());
            return None;
        }
        let to = *state.handoffs.get(&(from, action))?;

        match state.overlays.last_mut() {
            Some(top) => *top = to,
            None => state.base = to,
        }
        info!("Hand-off {} -{}-> {}", from, action, to);
        Some(to)
    }

    /// Opens an overlay above everything currently shown
    pub fn open_overlay(&self, zone: Zone) {
        let mut state = self.state.borrow_mut();
        info!("Overlay {} opened over {}", zone, state.owner());
        state.overlays.push(zone);
    }

    /// Closes the top overlay, returning ownership to whatever is beneath it
    pub fn close_overlay(&self) -> Option<Zone> {
        let mut state = self.state.borrow_mut();
        let closed = state.overlays.pop()?;
        info!("Overlay {} closed, {} owns input", closed, state.owner());
        Some(closed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_owner_at_a_time() {
        let router = FocusRouter::launcher();
        let gates: Vec<(Zone, EnableGate)> = [Zone::Library, Zone::Sidebar, Zone::Dialog]
            .into_iter()
            .map(|zone| (zone, router.gate(zone)))
            .collect();

        let open = |gates: &[(Zone, EnableGate)]| -> Vec<Zone> {
            gates
                .iter()
                .filter(|(_, gate)| gate.sample())
                .map(|(zone, _)| *zone)
                .collect()
        };

        assert_eq!(open(&gates), vec![Zone::Library]);
        router.open_overlay(Zone::Dialog);
        assert_eq!(open(&gates), vec![Zone::Dialog]);
        router.close_overlay();
        assert_eq!(open(&gates), vec![Zone::Library]);
    }

    #[test]
    fn hand_off_follows_adjacency() {
        let router = FocusRouter::launcher();
        assert_eq!(router.hand_off(Zone::Library, Action::Right), None);
        assert_eq!(
            router.hand_off(Zone::Library, Action::Left),
            Some(Zone::Sidebar)
        );
        assert_eq!(router.owner(), Zone::Sidebar);
        assert_eq!(
            router.hand_off(Zone::Sidebar, Action::Right),
            Some(Zone::Library)
        );
        assert_eq!(router.owner(), Zone::Library);
    }

    #[test]
    fn only_the_owner_can_hand_off() {
        let router = FocusRouter::launcher();
        router.open_overlay(Zone::Modal);
        assert_eq!(router.hand_off(Zone::Library, Action::Left), None);
        assert_eq!(router.owner(), Zone::Modal);
    }

    #[test]
    fn overlays_stack_and_restore() {
        let router = FocusRouter::new(Zone::Sidebar);
        router.open_overlay(Zone::Modal);
        router.open_overlay(Zone::Keyboard);
        assert_eq!(router.owner(), Zone::Keyboard);

        assert_eq!(router.close_overlay(), Some(Zone::Keyboard));
        assert_eq!(router.owner(), Zone::Modal);
        assert_eq!(router.close_overlay(), Some(Zone::Modal));
        assert_eq!(router.owner(), Zone::Sidebar);
        assert_eq!(router.close_overlay(), None);
        assert!(!router.has_overlay());
    }

    #[test]
    fn focus_under_overlay_applies_after_close() {
        let router = FocusRouter::launcher();
        router.open_overlay(Zone::Dialog);
        router.focus(Zone::Sidebar);
        assert_eq!(router.owner(), Zone::Dialog);
        router.close_overlay();
        assert_eq!(router.owner(), Zone::Sidebar);
    }
}
