use thiserror::Error;

/// Point-in-time state of one connected device.
///
/// Buttons and axes are ordered by index in the standard cross-vendor layout.
/// Axis values are in `-1.0..=1.0`, positive X pointing right and positive Y
/// pointing down.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DeviceSnapshot {
    pub buttons: Vec<bool>,
    pub axes: Vec<f32>,
}

impl DeviceSnapshot {
    pub fn new(buttons: Vec<bool>, axes: Vec<f32>) -> Self {
        Self { buttons, axes }
    }

    /// A device with `button_count` released buttons and four centred axes
    pub fn idle(button_count: usize) -> Self {
        Self {
            buttons: vec![false; button_count],
            axes: vec![0.0; 4],
        }
    }

    /// Out-of-range indices read as released
    pub fn button(&self, index: usize) -> bool {
        self.buttons.get(index).copied().unwrap_or(false)
    }

    /// Out-of-range indices read as centred
    pub fn axis(&self, index: usize) -> f32 {
        self.axes.get(index).copied().unwrap_or(0.0)
    }

    pub fn with_button(mut self, index: usize, pressed: bool) -> Self {
        if self.buttons.len() <= index {
            self.buttons.resize(index + 1, false);
        }
        self.buttons[index] = pressed;
        self
    }

    pub fn with_axis(mut self, index: usize, value: f32) -> Self {
        if self.axes.len() <= index {
            self.axes.resize(index + 1, 0.0);
        }
        self.axes[index] = value;
        self
    }
}

/// Errors raised while bringing up a device backend
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Failed to initialize device backend: {0}")]
    InitializationError(String),
}

/// Platform device-state query.
///
/// Called once per frame. Returns one slot per device index; `None` marks a
/// disconnected or empty slot, which contributes no signals.
pub trait DeviceSource {
    fn poll(&mut self) -> Vec<Option<DeviceSnapshot>>;
}

impl<F> DeviceSource for F
where
    F: FnMut() -> Vec<Option<DeviceSnapshot>>,
{
    fn poll(&mut self) -> Vec<Option<DeviceSnapshot>> {
        self()
    }
}
