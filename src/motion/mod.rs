//! Scripted scrolling subsystem.
//!
//! Replacement for native smooth-scroll where finer control is needed:
//! a fixed-duration ease-in-out cubic curve (easing.rs) driven frame by
//! frame against a scrollable surface (animator.rs).

pub mod animator;
pub mod easing;

pub use animator::{ScrollAnimator, ScrollSurface, DEFAULT_HEADER_OFFSET, SCROLL_DURATION_MS};
pub use easing::{ease_in_out_cubic, ScrollAnimation};
