//! Focus subsystem: which UI region receives actions
//!
//! - [`router`] - zone ownership, overlays and boundary hand-offs
//! - [`nav`] - grid/list cursors that report when an action hits a boundary

pub mod nav;
pub mod router;

pub use nav::{GridCursor, NavOutcome};
pub use router::{FocusRouter, Zone};
