//! Physical-to-logical mapping.
//!
//! A [`Profile`] turns a [`DeviceSnapshot`] into one boolean "physically
//! active" signal per tracked [`Action`]. Directions are active when either a
//! mapped digital button is held or the stick is pushed past the threshold in
//! the matching sign.

use serde::{Deserialize, Serialize};

use crate::controller::action::Action;
use crate::controller::device::DeviceSnapshot;

/// Binds one physical button index to an action
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ButtonBinding {
    pub index: usize,
    pub action: Action,
}

/// Identifies one tracked key: a logical action on a specific device
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct KeyId {
    pub device: usize,
    pub action: Action,
}

/// The physical state of one tracked key in a single frame
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Signal {
    pub key: KeyId,
    pub active: bool,
}

/// Button/axis map plus analog threshold.
///
/// The button table does not have to be total or injective: several indices
/// may map to the same action and unmapped indices are ignored.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Profile {
    pub axis_x: usize,
    pub axis_y: usize,
    pub threshold: f32,
    pub buttons: Vec<ButtonBinding>,
}

impl Default for Profile {
    /// Standard layout: face buttons 0/1, shoulders 4/5, d-pad 12-15,
    /// left stick on axes 0/1
    fn default() -> Self {
        Self {
            axis_x: 0,
            axis_y: 1,
            threshold: 0.5,
            buttons: vec![
                ButtonBinding { index: 0, action: Action::A },
                ButtonBinding { index: 1, action: Action::B },
                ButtonBinding { index: 4, action: Action::Lb },
                ButtonBinding { index: 5, action: Action::Rb },
                ButtonBinding { index: 12, action: Action::Up },
                ButtonBinding { index: 13, action: Action::Down },
                ButtonBinding { index: 14, action: Action::Left },
                ButtonBinding { index: 15, action: Action::Right },
            ],
        }
    }
}

impl Profile {
    /// Actions this profile produces signals for, in [`Action`] order
    pub fn tracked_actions(&self) -> impl Iterator<Item = Action> + '_ {
        Action::ALL.into_iter().filter(move |action| {
            action.is_direction() || self.buttons.iter().any(|b| b.action == *action)
        })
    }

    pub fn is_active(&self, action: Action, device: &DeviceSnapshot) -> bool {
        let digital = self
            .buttons
            .iter()
            .filter(|binding| binding.action == action)
            .any(|binding| device.button(binding.index));

        let x = device.axis(self.axis_x);
        let y = device.axis(self.axis_y);
        let analog = match action {
            Action::Right => x > self.threshold,
            Action::Left => x < -self.threshold,
            Action::Down => y > self.threshold,
            Action::Up => y < -self.threshold,
            _ => false,
        };

        digital || analog
    }

    /// Evaluates every tracked action on every connected device.
    ///
    /// Empty slots are skipped; the result is ordered by device index, then
    /// by action.
    pub fn signals(&self, devices: &[Option<DeviceSnapshot>]) -> Vec<Signal> {
        devices
            .iter()
            .enumerate()
            .filter_map(|(index, slot)| slot.as_ref().map(|device| (index, device)))
            .flat_map(|(index, device)| {
                self.tracked_actions().map(move |action| Signal {
                    key: KeyId {
                        device: index,
                        action,
                    },
                    active: self.is_active(action, device),
                })
            })
            .collect()
    }
}
