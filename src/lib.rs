//! Gamepad navigation input for controller-driven launcher UIs.
//!
//! Raw gamepad state is polled once per frame, mapped to a small set of
//! logical [`Action`](controller::Action)s and fed to independent
//! [`Consumer`](dispatch::Consumer)s. Each consumer turns held inputs into
//! press/repeat events, and a [`FocusRouter`](focus::FocusRouter) decides which
//! consumer is allowed to act.

pub mod config;
pub mod controller;
pub mod dispatch;
pub mod focus;
