//! Drag session tracking between pointer down and release.
//!
//! A [`DragSession`] follows the gesture protocol the container expects:
//! the item is brought to front when the drag starts, the display position
//! is derived from the accumulated translation without touching the model,
//! and on release the snap target is resolved and committed in two steps.

use crate::container::SnapContainer;
use crate::geometry::AnchorTarget;
use kurbo::{Point, Vec2};
use std::fmt;
use std::hash::Hash;

/// Result of a finished drag.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragOutcome {
    /// Where the item was let go.
    pub released: Point,
    /// Anchor and position the item settles on.
    pub target: AnchorTarget,
}

impl DragOutcome {
    /// Distance the item still has to travel to reach its anchor.
    pub fn settle_delta(&self) -> Vec2 {
        self.target.position - self.released
    }
}

/// State of one in-progress drag.
#[derive(Debug, Clone)]
pub struct DragSession<K> {
    /// The item being dragged.
    id: K,
    /// Item position when the drag started.
    start: Point,
    /// Current pointer translation since the start.
    translation: Vec2,
}

impl<K> DragSession<K>
where
    K: Eq + Hash + Clone + fmt::Debug,
{
    /// Start dragging an item. Returns `None` if the item is not positioned.
    pub fn begin(container: &mut SnapContainer<K>, id: K) -> Option<Self> {
        if !container.is_positioned(&id) {
            return None;
        }
        container.bring_to_front(&id);
        let start = container.position(&id);
        log::trace!("Drag started for {:?} at {:?}", id, start);
        Some(Self {
            id,
            start,
            translation: Vec2::ZERO,
        })
    }

    pub fn id(&self) -> &K {
        &self.id
    }

    pub fn start(&self) -> Point {
        self.start
    }

    pub fn translation(&self) -> Vec2 {
        self.translation
    }

    /// Record the pointer translation and return the display position.
    pub fn update(&mut self, container: &SnapContainer<K>, translation: Vec2) -> Point {
        self.translation = translation;
        self.display_position(container)
    }

    /// Start position plus translation, kept inside the canvas.
    pub fn display_position(&self, container: &SnapContainer<K>) -> Point {
        container.clamped_position(&self.id, self.start + self.translation)
    }

    /// Release the item with the given velocity (points per second).
    ///
    /// The item first jumps to the release point, then to its snap target.
    /// Hosts that animate should animate between the two points of the
    /// returned outcome.
    pub fn finish(self, container: &mut SnapContainer<K>, velocity: Vec2) -> Option<DragOutcome> {
        let released = self.display_position(container);
        let target = container.resolve_snap_target(&self.id, released, velocity)?;
        container.set_position(&self.id, released);
        container.set_position(&self.id, target.position);
        Some(DragOutcome { released, target })
    }

    /// Abandon the drag and put the item back where it started.
    pub fn cancel(self, container: &mut SnapContainer<K>) {
        container.set_position(&self.id, self.start);
    }
}
