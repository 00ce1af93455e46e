//! Frame-driven scroll animator.
//!
//! # Design Decisions
//! - The animator owns a monotonic generation counter; starting a new
//!   animation invalidates any in-flight one, so two animations never
//!   fight over the scroll position
//! - A missing target element is a no-op, not an error
//! - Frames tick on the tokio clock, which keeps the animation testable
//!   with a paused runtime

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;

use crate::motion::easing::ScrollAnimation;

/// Pixels subtracted from the element top to clear the fixed header.
pub const DEFAULT_HEADER_OFFSET: f64 = 80.0;

/// Fixed animation duration in milliseconds.
pub const SCROLL_DURATION_MS: u64 = 800;

/// Frame interval, roughly 60fps.
const FRAME_MS: u64 = 16;

/// The scrollable document the animator drives.
///
/// `element_top` reports an element's absolute document position, so the
/// target is independent of the current scroll offset.
pub trait ScrollSurface: Send + Sync {
    fn element_top(&self, id: &str) -> Option<f64>;
    fn scroll_offset(&self) -> f64;
    fn set_scroll_offset(&self, offset: f64);
}

/// Animated scrolling with single-flight semantics.
///
/// Clones share the generation counter: any clone starting an animation
/// cancels whatever animation is currently running.
#[derive(Clone, Default)]
pub struct ScrollAnimator {
    generation: Arc<AtomicU64>,
}

impl ScrollAnimator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Animate the surface's scroll offset to `target_id`, stopping
    /// `offset` pixels short of the element top (header clearance).
    ///
    /// Returns once the animation completes or is superseded by a newer
    /// one. Unknown targets return immediately.
    pub async fn scroll_to(&self, surface: &dyn ScrollSurface, target_id: &str, offset: Option<f64>) {
        let Some(element_top) = surface.element_top(target_id) else {
            tracing::debug!(target = target_id, "scroll target not found");
            return;
        };

        let offset = offset.unwrap_or(DEFAULT_HEADER_OFFSET);
        let start = surface.scroll_offset();
        let distance = (element_top - offset) - start;
        let animation = ScrollAnimation::new(start, distance, SCROLL_DURATION_MS);

        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let started = Instant::now();
        let mut frames = tokio::time::interval(Duration::from_millis(FRAME_MS));
        frames.tick().await; // first tick fires immediately

        loop {
            frames.tick().await;
            if self.generation.load(Ordering::SeqCst) != generation {
                return; // superseded
            }

            let elapsed = started.elapsed().as_millis() as u64;
            surface.set_scroll_offset(animation.position_at(elapsed));
            if animation.is_complete(elapsed) {
                return;
            }
        }
    }
}
