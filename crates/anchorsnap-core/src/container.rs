//! Container model: the item table, canvas size and stacking order.
//!
//! A [`SnapContainer`] tracks every draggable item placed on one canvas. It
//! decides which anchor each item rests on, recomputes positions when the
//! canvas is resized, resolves drag releases to the nearest anchor, and
//! reports the stack transform for items that share an anchor.
//!
//! The container is a plain owned value. It does not notify anyone; hosts
//! compare [`SnapContainer::revision`] between frames to decide whether to
//! redraw.

use crate::anchor::{Anchor, AnchorSet};
use crate::config::{ConfigError, ContainerConfig};
use crate::geometry::{
    anchor_position, clamped, items_overlap, nearest_anchor, project_point, AnchorTarget,
    DecelerationRate, Insets,
};
use crate::stack::{StackLayout, StackTransform};
use kurbo::{Point, Size, Vec2};
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use uuid::Uuid;

/// Default identity key for container items.
pub type ItemId = Uuid;

/// One tracked item.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemRecord<K> {
    id: K,
    anchor: Anchor,
    position: Option<Point>,
    size: Size,
    z_index: u64,
}

impl<K> ItemRecord<K> {
    pub fn id(&self) -> &K {
        &self.id
    }

    /// The anchor this item rests on (or will rest on once positioned).
    pub fn anchor(&self) -> Anchor {
        self.anchor
    }

    /// Center position, or `None` until the canvas size is known.
    pub fn position(&self) -> Option<Point> {
        self.position
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn z_index(&self) -> u64 {
        self.z_index
    }

    pub fn is_positioned(&self) -> bool {
        self.position.is_some()
    }
}

/// Tracks items snapped to anchors inside one canvas.
///
/// Keys only need to be stable and comparable; any `Eq + Hash + Clone`
/// type works, with [`ItemId`] as the default.
#[derive(Debug)]
pub struct SnapContainer<K = ItemId> {
    /// Anchors items may snap to.
    anchors: AnchorSet,
    /// Margins anchors are computed within.
    insets: Insets,
    /// Layout used by [`stack_transform`](Self::stack_transform).
    layout: Box<dyn StackLayout>,
    /// Rate used to project release velocities.
    deceleration_rate: DecelerationRate,
    /// All tracked items, keyed by ID.
    items: HashMap<K, ItemRecord<K>>,
    /// Current canvas size; zero until first reported.
    canvas_size: Size,
    /// Last allocated z-index.
    last_z: u64,
    /// Bumped on every effective mutation.
    revision: u64,
}

impl<K> SnapContainer<K>
where
    K: Eq + Hash + Clone + fmt::Debug,
{
    /// Create an empty container.
    pub fn new(anchors: AnchorSet, insets: Insets, layout: impl StackLayout + 'static) -> Self {
        Self {
            anchors,
            insets,
            layout: Box::new(layout),
            deceleration_rate: DecelerationRate::NORMAL,
            items: HashMap::new(),
            canvas_size: Size::ZERO,
            last_z: 0,
            revision: 0,
        }
    }

    /// Create a container from a configuration, validating it first.
    pub fn from_config(config: &ContainerConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::new(config.anchors, config.insets, config.layout)
            .with_deceleration_rate(config.deceleration_rate))
    }

    /// Use a different deceleration rate for snap resolution.
    pub fn with_deceleration_rate(mut self, rate: DecelerationRate) -> Self {
        self.deceleration_rate = rate;
        self
    }

    pub fn anchors(&self) -> AnchorSet {
        self.anchors
    }

    pub fn insets(&self) -> Insets {
        self.insets
    }

    pub fn layout(&self) -> &dyn StackLayout {
        self.layout.as_ref()
    }

    pub fn deceleration_rate(&self) -> DecelerationRate {
        self.deceleration_rate
    }

    /// Current canvas size (zero until a valid size was reported).
    pub fn canvas_size(&self) -> Size {
        self.canvas_size
    }

    /// Whether a valid canvas size has been reported.
    pub fn has_canvas(&self) -> bool {
        is_valid_size(self.canvas_size)
    }

    /// Change counter. Unchanged between two reads means nothing to redraw.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn contains(&self, id: &K) -> bool {
        self.items.contains_key(id)
    }

    pub fn item(&self, id: &K) -> Option<&ItemRecord<K>> {
        self.items.get(id)
    }

    /// Center position of an item, or `Point::ZERO` if unknown or unpositioned.
    pub fn position(&self, id: &K) -> Point {
        self.items
            .get(id)
            .and_then(|item| item.position)
            .unwrap_or(Point::ZERO)
    }

    pub fn is_positioned(&self, id: &K) -> bool {
        self.items.get(id).is_some_and(ItemRecord::is_positioned)
    }

    /// Z-index of an item, or 0 if unknown.
    pub fn z_index(&self, id: &K) -> u64 {
        self.items.get(id).map_or(0, |item| item.z_index)
    }

    pub fn anchor(&self, id: &K) -> Option<Anchor> {
        self.items.get(id).map(|item| item.anchor)
    }

    /// Items in z-order (back to front).
    pub fn items_ordered(&self) -> Vec<&ItemRecord<K>> {
        let mut items: Vec<_> = self.items.values().collect();
        items.sort_by_key(|item| item.z_index);
        items
    }

    /// Start tracking an item, or update an already tracked one.
    ///
    /// New items get the next z-index. When the canvas size is known the
    /// item is positioned at `anchor` right away.
    pub fn register_item(&mut self, id: K, size: Size, anchor: Anchor) {
        let canvas = self.canvas_size;
        let insets = self.insets;
        let position = is_valid_size(canvas).then(|| anchor_position(anchor, canvas, size, insets));

        if let Some(item) = self.items.get_mut(&id) {
            item.size = size;
            item.anchor = anchor;
            if position.is_some() {
                item.position = position;
            }
            log::debug!("Re-registered item {:?} at {:?}", id, anchor);
        } else {
            let z_index = self.allocate_z();
            log::debug!("Registered item {:?} at {:?} (z {})", id, anchor, z_index);
            self.items.insert(
                id.clone(),
                ItemRecord {
                    id,
                    anchor,
                    position,
                    size,
                    z_index,
                },
            );
        }
        self.touch();
    }

    /// Stop tracking an item. Returns its record if it was tracked.
    pub fn unregister_item(&mut self, id: &K) -> Option<ItemRecord<K>> {
        let removed = self.items.remove(id);
        if removed.is_some() {
            log::debug!("Unregistered item {:?}", id);
            self.touch();
        }
        removed
    }

    /// Move an item to a different anchor.
    ///
    /// Does nothing if the item is unknown or already at `anchor`.
    pub fn update_anchor(&mut self, id: &K, anchor: Anchor) {
        let canvas = self.canvas_size;
        let insets = self.insets;
        let Some(item) = self.items.get_mut(id) else {
            return;
        };
        if item.anchor == anchor {
            return;
        }
        item.anchor = anchor;
        if is_valid_size(canvas) {
            item.position = Some(anchor_position(anchor, canvas, item.size, insets));
        }
        log::debug!("Moved item {:?} to {:?}", id, anchor);
        self.touch();
    }

    /// Report a new canvas size.
    ///
    /// Sizes with a non-positive dimension are ignored. The first valid size
    /// positions every waiting item at its anchor; later sizes recompute the
    /// position of every positioned item at the anchor it already holds.
    pub fn update_canvas_size(&mut self, size: Size) {
        if !is_valid_size(size) {
            log::warn!("Ignoring invalid canvas size {:?}", size);
            return;
        }
        if size == self.canvas_size {
            return;
        }

        let first_layout = !self.has_canvas();
        self.canvas_size = size;
        let insets = self.insets;
        log::debug!(
            "Canvas resized to {}x{} ({} items)",
            size.width,
            size.height,
            self.items.len()
        );

        // The first layout places waiting items; later ones move placed items.
        for item in self.items.values_mut() {
            if item.is_positioned() == first_layout {
                continue;
            }
            let position = anchor_position(item.anchor, size, item.size, insets);
            log::trace!("Item {:?} at {:?} -> {:?}", item.id, item.anchor, position);
            item.position = Some(position);
        }
        self.touch();
    }

    /// Pick the anchor a released drag should settle on.
    ///
    /// The release `velocity` (points per second) is projected forward from
    /// `current`, and the anchor nearest to the projected point wins. The
    /// item's anchor is updated but its position is left to the caller, see
    /// [`set_position`](Self::set_position).
    ///
    /// Without a valid canvas the item's current anchor and `current` are
    /// returned unchanged. Returns `None` for unknown items.
    pub fn resolve_snap_target(
        &mut self,
        id: &K,
        current: Point,
        velocity: Vec2,
    ) -> Option<AnchorTarget> {
        let canvas = self.canvas_size;
        let insets = self.insets;
        let anchors = self.anchors;
        let rate = self.deceleration_rate;
        let item = self.items.get_mut(id)?;

        if !is_valid_size(canvas) {
            return Some(AnchorTarget {
                anchor: item.anchor,
                position: current,
            });
        }

        let projected = project_point(current, velocity, rate);
        let target = nearest_anchor(projected, anchors, canvas, item.size, insets);
        log::debug!(
            "Item {:?} released at {:?}, projected {:?}, snapping to {:?}",
            id,
            current,
            projected,
            target.anchor
        );
        if item.anchor != target.anchor {
            item.anchor = target.anchor;
            self.touch();
        }
        Some(target)
    }

    /// Overwrite an item's position and mark it positioned.
    pub fn set_position(&mut self, id: &K, position: Point) {
        if let Some(item) = self.items.get_mut(id) {
            item.position = Some(position);
            self.touch();
        }
    }

    /// Give an item a z-index above every other item.
    pub fn bring_to_front(&mut self, id: &K) {
        if !self.items.contains_key(id) {
            return;
        }
        let z_index = self.allocate_z();
        if let Some(item) = self.items.get_mut(id) {
            item.z_index = z_index;
        }
        self.touch();
    }

    /// Depth and group size of an item among positioned items sharing its
    /// anchor. Depth 0 is the item with the lowest z-index.
    pub fn stack_depth(&self, id: &K) -> Option<(usize, usize)> {
        let item = self.items.get(id).filter(|item| item.is_positioned())?;
        let mut group: Vec<&ItemRecord<K>> = self
            .items
            .values()
            .filter(|other| other.is_positioned() && other.anchor == item.anchor)
            .collect();
        group.sort_by_key(|other| other.z_index);
        let depth = group.iter().position(|other| other.id == item.id)?;
        Some((depth, group.len()))
    }

    /// Stack transform of an item using the container's layout.
    pub fn stack_transform(&self, id: &K) -> StackTransform {
        self.stack_transform_with(id, self.layout.as_ref())
    }

    /// Stack transform of an item using `layout`.
    ///
    /// Unknown and unpositioned items get the identity transform.
    pub fn stack_transform_with(&self, id: &K, layout: &dyn StackLayout) -> StackTransform {
        match (self.items.get(id), self.stack_depth(id)) {
            (Some(item), Some((depth, count))) => layout.transform(depth, count, item.anchor),
            _ => StackTransform::IDENTITY,
        }
    }

    /// Positioned items whose bounds overlap the given item, back to front.
    pub fn overlapping(&self, id: &K) -> Vec<K> {
        let Some((position, size)) = self
            .items
            .get(id)
            .and_then(|item| item.position.map(|p| (p, item.size)))
        else {
            return Vec::new();
        };

        self.items_ordered()
            .into_iter()
            .filter(|other| other.id != *id)
            .filter(|other| {
                other
                    .position
                    .is_some_and(|p| items_overlap(position, p, size, other.size))
            })
            .map(|other| other.id.clone())
            .collect()
    }

    /// Clamp a display point so the item stays inside the canvas.
    ///
    /// Returns `point` unchanged for unknown items or without a canvas.
    pub fn clamped_position(&self, id: &K, point: Point) -> Point {
        match self.items.get(id) {
            Some(item) if self.has_canvas() => {
                clamped(point, self.canvas_size, item.size, self.insets)
            }
            _ => point,
        }
    }

    fn allocate_z(&mut self) -> u64 {
        self.last_z += 1;
        self.last_z
    }

    fn touch(&mut self) {
        self.revision += 1;
    }
}

fn is_valid_size(size: Size) -> bool {
    size.width > 0.0 && size.height > 0.0
}
