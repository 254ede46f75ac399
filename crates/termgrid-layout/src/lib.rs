//! # termgrid-layout
//!
//! Pure pane-layout geometry for the termgrid host.
//!
//! Given the number of visible panes, a [`LayoutMode`], and a container
//! size, [`rects_for`] produces one rectangle per pane, index-aligned
//! with the visible-set order the store derives. No state, no I/O.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod engine;

pub use engine::{rects_for, GAP, PADDING};
