use gilrs::{Axis, Button, Event, EventType, Gilrs};
use tracing::{debug, error, info, warn};

use crate::controller::device::{DeviceSnapshot, DeviceSource, SourceError};

/// Button order of the standard cross-vendor layout
const STANDARD_BUTTONS: [Button; 17] = [
    Button::South,
    Button::East,
    Button::West,
    Button::North,
    Button::LeftTrigger,
    Button::RightTrigger,
    Button::LeftTrigger2,
    Button::RightTrigger2,
    Button::Select,
    Button::Start,
    Button::LeftThumb,
    Button::RightThumb,
    Button::DPadUp,
    Button::DPadDown,
    Button::DPadLeft,
    Button::DPadRight,
    Button::Mode,
];

/// Axis order of the standard layout; `true` marks axes gilrs reports with
/// positive pointing up
const STANDARD_AXES: [(Axis, bool); 4] = [
    (Axis::LeftStickX, false),
    (Axis::LeftStickY, true),
    (Axis::RightStickX, false),
    (Axis::RightStickY, true),
];

/// [`DeviceSource`] backed by gilrs.
///
/// Each poll drains pending gilrs events so the cached gamepad state is
/// current, then snapshots every connected gamepad into the slot given by its
/// id.
pub struct GilrsSource {
    gilrs: Gilrs,
    connected: usize,
}

impl GilrsSource {
    pub fn new() -> Result<Self, SourceError> {
        info!("Initializing gilrs controller interface");
        let gilrs = match Gilrs::new() {
            Ok(g) => {
                info!("Successfully initialized gilrs");
                g
            }
            Err(e) => {
                error!("Failed to initialize gilrs: {}", e);
                return Err(SourceError::InitializationError(e.to_string()));
            }
        };

        let connected = gilrs.gamepads().count();
        if connected == 0 {
            warn!("No gamepad connected, polling empty slots until one appears");
        }
        for (id, gamepad) in gilrs.gamepads() {
            info!("  [{}] Name: {}, UUID: {:?}", id, gamepad.name(), gamepad.uuid());
        }

        Ok(Self { gilrs, connected })
    }

    fn drain_events(&mut self) {
        while let Some(Event { id, event, .. }) = self.gilrs.next_event() {
            match event {
                EventType::Connected => info!("Gamepad {} connected", id),
                EventType::Disconnected => warn!("Gamepad {} disconnected", id),
                _ => {}
            }
        }
    }
}

impl DeviceSource for GilrsSource {
    fn poll(&mut self) -> Vec<Option<DeviceSnapshot>> {
        self.drain_events();

        let mut slots: Vec<Option<DeviceSnapshot>> = Vec::new();
        for (id, gamepad) in self.gilrs.gamepads() {
            let index = usize::from(id);
            if slots.len() <= index {
                slots.resize(index + 1, None);
            }

            let buttons = STANDARD_BUTTONS
                .iter()
                .map(|button| gamepad.is_pressed(*button))
                .collect();
            let axes = STANDARD_AXES
                .iter()
                .map(|(axis, flip)| {
                    let value = gamepad.value(*axis);
                    if *flip {
                        -value
                    } else {
                        value
                    }
                })
                .collect();

            slots[index] = Some(DeviceSnapshot::new(buttons, axes));
        }

        let connected = slots.iter().flatten().count();
        if connected != self.connected {
            info!("Connected gamepads: {} -> {}", self.connected, connected);
            self.connected = connected;
        }
        debug!("Polled {} device slots", slots.len());

        slots
    }
}
