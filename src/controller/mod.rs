//! Controller subsystem: physical device state
//!
//! Turns raw device state into per-action signals:
//!
//! 1. [`device`] - Device snapshots and the [`DeviceSource`](device::DeviceSource) seam
//! 2. [`gilrs_source`] - gilrs-backed device source
//! 3. [`poller`] - Frame poller publishing one snapshot per frame
//! 4. [`profile`] - Button/axis map turning snapshots into [`Action`](action::Action) signals
//!
//! # Architecture
//!
//! ```text
//! Gamepads ──► DeviceSource ──► Poller ──► Frame (watch) ──► consumers
//!                                              │
//!                                         Profile::signals
//! ```

pub mod action;
pub mod device;
pub mod gilrs_source;
pub mod poller;
pub mod profile;

pub use action::Action;
pub use device::{DeviceSnapshot, DeviceSource, SourceError};
pub use gilrs_source::GilrsSource;
pub use poller::{Frame, PollerHandle, PollerSettings};
pub use profile::{ButtonBinding, KeyId, Profile, Signal};
