//! Dispatch subsystem: physical signals to fired actions
//!
//! 1. [`tracker`] - Per-key press/hold/repeat state machine
//! 2. [`gate`] - Per-consumer enable predicate
//! 3. [`consumer`] - Independent dispatcher instance with its own key table
//! 4. [`keys`] - Alternate channel for discrete key events
//! 5. [`mount`] - Frame-driven tick loop and [`Dispatcher`](mount::Dispatcher)
//!
//! # Architecture
//!
//! ```text
//! Frame ──► Consumer::tick ──► KeyState::step ──► gate open? ──► ActionHandler
//!                                                                     │
//! KeyPress ──► Consumer::on_key ───────────────► gate open? ──────────┘
//! ```
//!
//! Everything runs on one thread. Consumers never share state; a disabled
//! consumer keeps tracking so it can suppress held keys when it reopens.

pub mod consumer;
pub mod gate;
pub mod keys;
pub mod mount;
pub mod tracker;

pub use consumer::{ActionHandler, Consumer, ConsumerOptions};
pub use gate::EnableGate;
pub use keys::{KeyBinding, KeyBindings, KeyChannel, KeyPress};
pub use mount::{Dispatcher, MountHandle};
pub use tracker::{KeyState, RepeatTiming};
